use anchor_lang::prelude::*;

pub mod constants;
pub mod errors;
pub mod events;
pub mod randomness;
pub mod state;
pub mod utils;
pub mod instructions;

use instructions::*;
use state::PoolStatus;

#[cfg(feature = "devnet")]
declare_id!("45fCNGg7gzUXaQ3ZwxMNyoGy1Hng9peefU6THi7yGM9s");

#[cfg(not(feature = "devnet"))]
declare_id!("DVisVuCJ6v9DbSjSW3pGkHqC5wqj3wX83GQfeY38B2Ev");

#[program]
pub mod roulette {
    use super::*;

    pub fn create_pool(ctx: Context<CreatePool>, args: CreatePoolArgs) -> Result<()> {
        create_pool::handler(ctx, args)
    }

    /// Enter the running round. `amount` lamports are moved into the pool and must
    /// equal the entry fee.
    pub fn join(ctx: Context<Join>, amount: u64) -> Result<()> {
        join::handler(ctx, amount)
    }

    /// Owner-only: pick a winner, reset the round, pay out the pot.
    pub fn begin_draw<'info>(
        ctx: Context<'_, '_, 'info, 'info, BeginDraw<'info>>,
    ) -> Result<Pubkey> {
        begin_draw::handler(ctx)
    }

    /// Owner-only: end the round without a draw. Entry fees become refundable credits.
    pub fn clear<'info>(ctx: Context<'_, '_, 'info, 'info, Clear<'info>>) -> Result<()> {
        clear::handler(ctx)
    }

    /// Withdraw a deferred payout or a refund.
    pub fn claim_credit(ctx: Context<ClaimCredit>) -> Result<u64> {
        claim_credit::handler(ctx)
    }

    pub fn get_players(ctx: Context<ReadPool>) -> Result<Vec<Pubkey>> {
        views::read_players(ctx)
    }

    pub fn players_count(ctx: Context<ReadPool>) -> Result<u16> {
        views::read_players_count(ctx)
    }

    pub fn players_mapping(ctx: Context<ReadMembership>, player: Pubkey) -> Result<bool> {
        views::read_membership(ctx, player)
    }

    pub fn owner(ctx: Context<ReadPool>) -> Result<Pubkey> {
        views::read_owner(ctx)
    }

    pub fn entry_fee(ctx: Context<ReadPool>) -> Result<u64> {
        views::read_entry_fee(ctx)
    }

    pub fn pool_status(ctx: Context<ReadPool>) -> Result<PoolStatus> {
        views::read_status(ctx)
    }

    /// Admin-only draw with explicit randomness. Only available with `devnet` feature.
    #[cfg(feature = "devnet")]
    pub fn mock_draw<'info>(
        ctx: Context<'_, '_, 'info, 'info, BeginDraw<'info>>,
        randomness: [u8; 32],
    ) -> Result<Pubkey> {
        begin_draw::mock_handler(ctx, randomness)
    }
}
