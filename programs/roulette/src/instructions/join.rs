use anchor_lang::prelude::*;
use anchor_lang::system_program;
use crate::{
    constants::*,
    events::PlayersUpdated,
    state::{PlayerTicket, Pool},
};

#[derive(Accounts)]
pub struct Join<'info> {
    #[account(mut)]
    pub player: Signer<'info>,

    #[account(
        mut,
        seeds = [SEED_POOL],
        bump,
    )]
    pub pool: AccountLoader<'info, Pool>,

    /// Membership entry; created on first join and reused for later rounds.
    #[account(
        init_if_needed,
        payer = player,
        space = PlayerTicket::SPACE,
        seeds = [SEED_TICKET, pool.key().as_ref(), player.key().as_ref()],
        bump
    )]
    pub ticket: Account<'info, PlayerTicket>,

    pub system_program: Program<'info, System>,
}

/// `amount` is the value attached to the call; it must equal the entry fee exactly.
pub fn handler(ctx: Context<Join>, amount: u64) -> Result<()> {
    let pool_key = ctx.accounts.pool.key();
    let player_key = ctx.accounts.player.key();
    let ticket = &mut ctx.accounts.ticket;

    let mut pool = ctx.accounts.pool.load_mut()?;
    pool.admit(pool_key, player_key, ticket, amount)?;
    ticket.bump = ctx.bumps.ticket;

    let round_id = pool.round_id;
    let players_count = pool.players_count();
    let pot = pool.pot()?;

    // Drop RefMut before CPI
    drop(pool);

    system_program::transfer(
        CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            system_program::Transfer {
                from: ctx.accounts.player.to_account_info(),
                to: ctx.accounts.pool.to_account_info(),
            },
        ),
        amount,
    )?;

    emit!(PlayersUpdated {
        round_id,
        players_count,
        pot,
    });

    Ok(())
}
