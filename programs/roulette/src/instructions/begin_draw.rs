use anchor_lang::prelude::*;
use crate::{
    constants::*,
    errors::ErrorCode,
    events::{DrawCompleted, PayoutDeferred, PlayersUpdated},
    randomness::{ClockEntropy, WinnerSelector},
    state::Pool,
    utils::{find_ticket, move_lamports, write_ticket},
};
#[cfg(feature = "devnet")]
use crate::randomness::FixedRandomness;

/// Remaining accounts: where the pot may go. For each player pass the wallet
/// (writable) to have the winner paid in this instruction, and/or the player's
/// ticket (writable) to park the pot there for `claim_credit`.
///
/// The wallet is only paid if it ends up rent-exempt; a wallet that would not
/// (e.g. one holding 0 lamports when the pot is below the rent minimum) falls
/// back to the ticket. Leave such wallets out. If neither the winner's wallet
/// nor their ticket can take the pot, the draw fails with `PayoutFailed`.
#[derive(Accounts)]
pub struct BeginDraw<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [SEED_POOL],
        bump,
    )]
    pub pool: AccountLoader<'info, Pool>,
}

pub fn handler<'info>(ctx: Context<'_, '_, 'info, 'info, BeginDraw<'info>>) -> Result<Pubkey> {
    let clock = Clock::get()?;
    let round_id = ctx.accounts.pool.load()?.round_id;
    let entropy = ClockEntropy::from_clock(
        &clock,
        ctx.accounts.owner.key(),
        ctx.accounts.pool.key(),
        round_id,
    );

    execute_draw(ctx, &entropy)
}

/// Admin-only draw with caller-chosen randomness (bypasses the clock source).
#[cfg(feature = "devnet")]
pub fn mock_handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, BeginDraw<'info>>,
    randomness: [u8; 32],
) -> Result<Pubkey> {
    execute_draw(ctx, &FixedRandomness(randomness))
}

fn execute_draw<'info, S: WinnerSelector>(
    ctx: Context<'_, '_, 'info, 'info, BeginDraw<'info>>,
    selector: &S,
) -> Result<Pubkey> {
    let caller = ctx.accounts.owner.key();
    let pool_key = ctx.accounts.pool.key();

    // Round is closed before any lamports leave the pool
    let outcome = {
        let mut pool = ctx.accounts.pool.load_mut()?;
        pool.settle_draw(&caller, selector)?
    };

    let pool_info = ctx.accounts.pool.to_account_info();
    let rent = Rent::get()?;
    let wallet = ctx.remaining_accounts.iter().find(|info| {
        *info.key == outcome.winner
            && info.is_writable
            && !info.executable
            && info
                .lamports()
                .checked_add(outcome.amount)
                .is_some_and(|after| rent.is_exempt(after, info.data_len()))
    });

    let paid_out = match wallet {
        Some(winner_info) => {
            let floor = rent.minimum_balance(pool_info.data_len());
            move_lamports(&pool_info, winner_info, outcome.amount, floor)
                .map_err(|_| error!(ErrorCode::PayoutFailed))?;
            true
        }
        None => {
            let (ticket_info, mut ticket) = find_ticket(
                ctx.remaining_accounts,
                &pool_key,
                &outcome.winner,
                outcome.round_id,
            )
            .ok_or(ErrorCode::PayoutFailed)?;

            ctx.accounts
                .pool
                .load_mut()?
                .defer_payout(&pool_key, &mut ticket, &outcome)?;
            write_ticket(ticket_info, &ticket)?;

            emit!(PayoutDeferred {
                round_id: outcome.round_id,
                winner: outcome.winner,
                amount: outcome.amount,
            });
            false
        }
    };

    msg!(
        "Round {} winner: {} (index {} of {}), pot {}",
        outcome.round_id,
        outcome.winner,
        outcome.winner_index,
        outcome.players_before,
        outcome.amount
    );

    emit!(DrawCompleted {
        round_id: outcome.round_id,
        winner: outcome.winner,
        winner_index: outcome.winner_index,
        amount: outcome.amount,
        paid_out,
    });

    let next_round = ctx.accounts.pool.load()?.round_id;
    emit!(PlayersUpdated {
        round_id: next_round,
        players_count: 0,
        pot: 0,
    });

    Ok(outcome.winner)
}
