use anchor_lang::prelude::*;
use crate::{constants::*, events::PoolCreated, state::Pool};

#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct CreatePoolArgs {
    /// Lamports each player must attach to `join`. Must be > 0.
    pub entry_fee: u64,
}

#[derive(Accounts)]
pub struct CreatePool<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,
    pub owner: Signer<'info>,

    #[account(
        init,
        payer = payer,
        space = Pool::SPACE,
        seeds = [SEED_POOL],
        bump
    )]
    pub pool: AccountLoader<'info, Pool>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<CreatePool>, args: CreatePoolArgs) -> Result<()> {
    let owner = ctx.accounts.owner.key();

    let mut pool = ctx.accounts.pool.load_init()?;
    pool.initialize(owner, args.entry_fee, ctx.bumps.pool)?;

    emit!(PoolCreated {
        pool: ctx.accounts.pool.key(),
        owner,
        entry_fee: args.entry_fee,
    });

    Ok(())
}
