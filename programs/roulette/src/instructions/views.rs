//! Read-only instructions. Clients call these through transaction simulation
//! and read the return data; nothing is written.

use anchor_lang::prelude::*;
use crate::{
    constants::*,
    state::{Pool, PoolStatus},
    utils::read_ticket,
};

#[derive(Accounts)]
pub struct ReadPool<'info> {
    #[account(seeds = [SEED_POOL], bump)]
    pub pool: AccountLoader<'info, Pool>,
}

#[derive(Accounts)]
#[instruction(player: Pubkey)]
pub struct ReadMembership<'info> {
    #[account(seeds = [SEED_POOL], bump)]
    pub pool: AccountLoader<'info, Pool>,

    /// CHECK: may not exist yet; an uninitialised ticket means "not a member".
    #[account(
        seeds = [SEED_TICKET, pool.key().as_ref(), player.as_ref()],
        bump,
    )]
    pub ticket: UncheckedAccount<'info>,
}

pub fn read_players(ctx: Context<ReadPool>) -> Result<Vec<Pubkey>> {
    Ok(ctx.accounts.pool.load()?.players())
}

pub fn read_players_count(ctx: Context<ReadPool>) -> Result<u16> {
    Ok(ctx.accounts.pool.load()?.players_count())
}

pub fn read_owner(ctx: Context<ReadPool>) -> Result<Pubkey> {
    Ok(ctx.accounts.pool.load()?.owner())
}

pub fn read_entry_fee(ctx: Context<ReadPool>) -> Result<u64> {
    Ok(ctx.accounts.pool.load()?.entry_fee())
}

pub fn read_status(ctx: Context<ReadPool>) -> Result<PoolStatus> {
    ctx.accounts.pool.load()?.status()
}

pub fn read_membership(ctx: Context<ReadMembership>, _player: Pubkey) -> Result<bool> {
    let Some(ticket) = read_ticket(&ctx.accounts.ticket.to_account_info()) else {
        return Ok(false);
    };

    let pool = ctx.accounts.pool.load()?;
    Ok(pool.is_member(&ctx.accounts.pool.key(), &ticket))
}
