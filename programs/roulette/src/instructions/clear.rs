use anchor_lang::prelude::*;
use crate::{
    constants::*,
    errors::ErrorCode,
    events::{PlayersUpdated, RoundCleared},
    state::Pool,
    utils::{find_ticket, write_ticket},
};

/// Remaining accounts: the ticket of every current player, writable, in any order.
/// Fees stay in the pool; each entrant withdraws theirs via `claim_credit`.
#[derive(Accounts)]
pub struct Clear<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [SEED_POOL],
        bump,
    )]
    pub pool: AccountLoader<'info, Pool>,
}

pub fn handler<'info>(ctx: Context<'_, '_, 'info, 'info, Clear<'info>>) -> Result<()> {
    let owner = ctx.accounts.owner.key();
    let pool_key = ctx.accounts.pool.key();
    let mut pool = ctx.accounts.pool.load_mut()?;

    let cancelled = pool.cancel_round(&owner)?;

    for player in &cancelled.refunded {
        let (info, mut ticket) =
            find_ticket(ctx.remaining_accounts, &pool_key, player, cancelled.round_id)
                .ok_or(ErrorCode::MissingTicket)?;
        ticket.add_credit(cancelled.entry_fee)?;
        write_ticket(info, &ticket)?;
    }

    emit!(RoundCleared {
        round_id: cancelled.round_id,
        owner,
        players_refunded: cancelled.refunded.len() as u16,
        total_refunded: cancelled.total_refunded,
    });
    emit!(PlayersUpdated {
        round_id: pool.round_id,
        players_count: 0,
        pot: 0,
    });

    Ok(())
}
