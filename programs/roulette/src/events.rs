use anchor_lang::prelude::*;

#[event]
pub struct PoolCreated {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub entry_fee: u64,
}

/// Membership changed: a player joined, or the round ended by draw or clear.
#[event]
pub struct PlayersUpdated {
    pub round_id: u64,
    pub players_count: u16,
    pub pot: u64,
}

#[event]
pub struct DrawCompleted {
    pub round_id: u64,
    pub winner: Pubkey,
    pub winner_index: u16,
    pub amount: u64,
    /// False when the pot was parked as a credit instead of sent.
    pub paid_out: bool,
}

#[event]
pub struct PayoutDeferred {
    pub round_id: u64,
    pub winner: Pubkey,
    pub amount: u64,
}

#[event]
pub struct RoundCleared {
    pub round_id: u64,
    pub owner: Pubkey,
    pub players_refunded: u16,
    pub total_refunded: u64,
}

#[event]
pub struct CreditClaimed {
    pub claimant: Pubkey,
    pub amount: u64,
}
