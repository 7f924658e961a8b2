use anchor_lang::prelude::*;
use crate::{
    constants::*,
    events::CreditClaimed,
    state::{PlayerTicket, Pool},
    utils::move_lamports,
};

#[derive(Accounts)]
pub struct ClaimCredit<'info> {
    #[account(mut)]
    pub claimant: Signer<'info>,

    #[account(
        mut,
        seeds = [SEED_POOL],
        bump,
    )]
    pub pool: AccountLoader<'info, Pool>,

    #[account(
        mut,
        seeds = [SEED_TICKET, pool.key().as_ref(), claimant.key().as_ref()],
        bump = ticket.bump,
        constraint = ticket.player == claimant.key(),
    )]
    pub ticket: Account<'info, PlayerTicket>,
}

/// Withdraw a deferred draw payout or refunds from cleared rounds.
pub fn handler(ctx: Context<ClaimCredit>) -> Result<u64> {
    let claimant = ctx.accounts.claimant.key();
    let amount = ctx.accounts.ticket.take_credit()?;
    ctx.accounts.pool.load_mut()?.release_credit(amount)?;

    let pool_info = ctx.accounts.pool.to_account_info();
    let floor = Rent::get()?.minimum_balance(pool_info.data_len());
    move_lamports(
        &pool_info,
        &ctx.accounts.claimant.to_account_info(),
        amount,
        floor,
    )?;

    emit!(CreditClaimed { claimant, amount });

    Ok(amount)
}
