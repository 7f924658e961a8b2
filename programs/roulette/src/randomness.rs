//! Winner selection.
//!
//! The draw only needs an index into the current player list, so selection sits
//! behind [`WinnerSelector`] and bookkeeping never sees where the bytes came from.
//!
//! [`ClockEntropy`] is the default source and it is weak: every input is either
//! public before the draw lands or chosen by the slot leader, and the owner picks
//! when to send `begin_draw`. An owner or block producer who wants a particular
//! winner can simulate the digest and time the draw. It is pseudo-random only;
//! swap in an oracle-backed selector if the pot is worth attacking.

use anchor_lang::prelude::*;
use crate::errors::ErrorCode;

pub trait WinnerSelector {
    /// Index of the winner in `[0, player_count)`.
    fn select_index(&self, player_count: usize) -> Result<usize>;
}

/// First 16 bytes as a little-endian `u128`, reduced modulo `player_count`.
pub fn reduce_to_index(randomness: &[u8; 32], player_count: usize) -> Result<usize> {
    require!(player_count > 0, ErrorCode::InsufficientPlayers);

    let mut bytes16 = [0u8; 16];
    bytes16.copy_from_slice(&randomness[..16]);
    let r = u128::from_le_bytes(bytes16);
    Ok((r % player_count as u128) as usize)
}

/// Execution-environment state mixed with blake3.
#[derive(Clone, Debug)]
pub struct ClockEntropy {
    pub slot: u64,
    pub unix_timestamp: i64,
    pub epoch: u64,
    pub caller: Pubkey,
    pub pool: Pubkey,
    pub round_id: u64,
}

impl ClockEntropy {
    pub fn from_clock(clock: &Clock, caller: Pubkey, pool: Pubkey, round_id: u64) -> Self {
        Self {
            slot: clock.slot,
            unix_timestamp: clock.unix_timestamp,
            epoch: clock.epoch,
            caller,
            pool,
            round_id,
        }
    }

    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.slot.to_le_bytes());
        hasher.update(&self.unix_timestamp.to_le_bytes());
        hasher.update(&self.epoch.to_le_bytes());
        hasher.update(self.caller.as_ref());
        hasher.update(self.pool.as_ref());
        hasher.update(&self.round_id.to_le_bytes());
        *hasher.finalize().as_bytes()
    }
}

impl WinnerSelector for ClockEntropy {
    fn select_index(&self, player_count: usize) -> Result<usize> {
        reduce_to_index(&self.digest(), player_count)
    }
}

/// Caller-supplied bytes, same reduction as the clock source.
#[derive(Clone, Copy, Debug)]
pub struct FixedRandomness(pub [u8; 32]);

impl WinnerSelector for FixedRandomness {
    fn select_index(&self, player_count: usize) -> Result<usize> {
        reduce_to_index(&self.0, player_count)
    }
}
