use anchor_lang::prelude::*;
use bytemuck::{Pod, Zeroable};
use crate::{
    constants::{FIRST_ROUND_ID, MAX_PLAYERS},
    errors::ErrorCode,
    randomness::WinnerSelector,
    utils::{checked_add_u64, checked_mul_u64, checked_sub_u64},
};

/// Wrapper for the player list: bytemuck doesn't impl Pod for arbitrary array sizes.
#[derive(Copy, Clone)]
#[repr(C)]
pub struct PlayersArray {
    pub data: [[u8; 32]; MAX_PLAYERS],
}

unsafe impl Pod for PlayersArray {}
unsafe impl Zeroable for PlayersArray {}

#[cfg(feature = "idl-build")]
impl anchor_lang::IdlBuild for PlayersArray {
    fn create_type() -> Option<anchor_lang::idl::types::IdlTypeDef> {
        use anchor_lang::idl::types::*;
        Some(IdlTypeDef {
            name: "PlayersArray".to_string(),
            docs: vec![],
            serialization: IdlSerialization::Bytemuck,
            repr: Some(IdlRepr::C(IdlReprModifier { packed: false, align: None })),
            generics: vec![],
            ty: IdlTypeDefTy::Struct {
                fields: Some(IdlDefinedFields::Named(vec![IdlField {
                    name: "data".to_string(),
                    docs: vec![],
                    ty: IdlType::Array(
                        Box::new(IdlType::Array(Box::new(IdlType::U8), IdlArrayLen::Value(32))),
                        IdlArrayLen::Value(MAX_PLAYERS),
                    ),
                }])),
            },
        })
    }
    fn insert_types(types: &mut std::collections::BTreeMap<String, anchor_lang::idl::types::IdlTypeDef>) {
        if let Some(ty) = Self::create_type() {
            types.insert("PlayersArray".to_string(), ty);
        }
    }
    fn get_full_path() -> String {
        "PlayersArray".to_string()
    }
}

/// The wager pool. Zero-copy: instructions use `AccountLoader<'info, Pool>`.
///
/// Lamports held above the rent-exempt minimum always equal
/// `entry_fee * players_count + credits_total`.
#[account(zero_copy)]
#[repr(C)]
pub struct Pool {
    pub owner: [u8; 32],
    pub entry_fee: u64,
    /// Current round. Tickets stamped with an older id are no longer members.
    pub round_id: u64,
    /// Sum of every ticket's unclaimed credit.
    pub credits_total: u64,
    pub players_count: u16,
    pub bump: u8,
    pub _padding: [u8; 5],

    /// Join order; only the first `players_count` slots are live.
    pub players: PlayersArray,

    pub reserved: [u8; 32],
}

/// Result of a draw, computed after membership has already been reset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawOutcome {
    pub round_id: u64,
    pub winner: Pubkey,
    pub winner_index: u16,
    pub amount: u64,
    pub players_before: u16,
}

/// A round ended by `clear`. Each of `refunded` is owed `entry_fee` on their ticket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundCancellation {
    pub round_id: u64,
    pub entry_fee: u64,
    pub refunded: Vec<Pubkey>,
    pub total_refunded: u64,
}

/// Snapshot returned by the `pool_status` view.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct PoolStatus {
    pub owner: Pubkey,
    pub entry_fee: u64,
    pub round_id: u64,
    pub players_count: u16,
    pub pot: u64,
    pub credits_total: u64,
}

impl Pool {
    pub const SPACE: usize = 8 + core::mem::size_of::<Pool>();

    /// Account data is zeroed by `init`; only the non-zero fields are written.
    pub fn initialize(&mut self, owner: Pubkey, entry_fee: u64, bump: u8) -> Result<()> {
        require!(entry_fee > 0, ErrorCode::InvalidConfiguration);

        self.owner = owner.to_bytes();
        self.entry_fee = entry_fee;
        self.round_id = FIRST_ROUND_ID;
        self.bump = bump;
        Ok(())
    }

    pub fn owner(&self) -> Pubkey {
        Pubkey::new_from_array(self.owner)
    }

    pub fn entry_fee(&self) -> u64 {
        self.entry_fee
    }

    pub fn players_count(&self) -> u16 {
        self.players_count
    }

    pub fn player(&self, index: usize) -> Pubkey {
        Pubkey::new_from_array(self.players.data[index])
    }

    pub fn players(&self) -> Vec<Pubkey> {
        self.players.data[..self.players_count as usize]
            .iter()
            .map(|p| Pubkey::new_from_array(*p))
            .collect()
    }

    pub fn pot(&self) -> Result<u64> {
        checked_mul_u64(self.entry_fee, self.players_count as u64)
    }

    /// Everything the pool must be able to pay out: the running pot plus credits.
    pub fn owed_lamports(&self) -> Result<u64> {
        checked_add_u64(self.pot()?, self.credits_total)
    }

    pub fn is_member(&self, pool_key: &Pubkey, ticket: &PlayerTicket) -> bool {
        ticket.pool == *pool_key && ticket.round_id == self.round_id
    }

    pub fn status(&self) -> Result<PoolStatus> {
        Ok(PoolStatus {
            owner: self.owner(),
            entry_fee: self.entry_fee,
            round_id: self.round_id,
            players_count: self.players_count,
            pot: self.pot()?,
            credits_total: self.credits_total,
        })
    }

    pub fn ensure_owner(&self, caller: &Pubkey) -> Result<()> {
        require!(caller.to_bytes() == self.owner, ErrorCode::NotOwner);
        Ok(())
    }

    /// Add `player` to the running round, stamping their ticket. Returns the join index.
    /// The caller moves `amount` into the pool only after this succeeds.
    pub fn admit(
        &mut self,
        pool_key: Pubkey,
        player: Pubkey,
        ticket: &mut PlayerTicket,
        amount: u64,
    ) -> Result<u16> {
        require!(amount == self.entry_fee, ErrorCode::InvalidPayment);

        let fresh = ticket.player == Pubkey::default();
        require!(
            fresh || (ticket.player == player && ticket.pool == pool_key),
            ErrorCode::InvalidTicket
        );
        require!(!self.is_member(&pool_key, ticket), ErrorCode::AlreadyJoined);

        let index = self.players_count as usize;
        require!(index < MAX_PLAYERS, ErrorCode::PoolFull);
        checked_mul_u64(self.entry_fee, index as u64 + 1)?;

        self.players.data[index] = player.to_bytes();
        self.players_count = (index + 1) as u16;

        ticket.pool = pool_key;
        ticket.player = player;
        ticket.round_id = self.round_id;
        ticket.index = index as u16;

        Ok(index as u16)
    }

    /// Pick the winner and reset membership. Moving the pot is left to the caller,
    /// which only happens once this has returned and the round is already closed.
    pub fn settle_draw<S: WinnerSelector>(
        &mut self,
        caller: &Pubkey,
        selector: &S,
    ) -> Result<DrawOutcome> {
        self.ensure_owner(caller)?;

        let count = self.players_count as usize;
        require!(count >= 2, ErrorCode::InsufficientPlayers);

        let winner_index = selector.select_index(count)?;
        let winner = self.players.data[..count]
            .get(winner_index)
            .map(|p| Pubkey::new_from_array(*p))
            .ok_or(ErrorCode::MathOverflow)?;
        let amount = self.pot()?;
        let round_id = self.round_id;

        self.end_round()?;

        Ok(DrawOutcome {
            round_id,
            winner,
            winner_index: winner_index as u16,
            amount,
            players_before: count as u16,
        })
    }

    /// Park a draw payout on the winner's ticket instead of sending it.
    pub fn defer_payout(
        &mut self,
        pool_key: &Pubkey,
        ticket: &mut PlayerTicket,
        outcome: &DrawOutcome,
    ) -> Result<()> {
        require!(
            ticket.belongs_to(pool_key, &outcome.winner, outcome.round_id),
            ErrorCode::PayoutFailed
        );
        let credits_total = checked_add_u64(self.credits_total, outcome.amount)
            .map_err(|_| error!(ErrorCode::PayoutFailed))?;
        ticket
            .add_credit(outcome.amount)
            .map_err(|_| error!(ErrorCode::PayoutFailed))?;

        self.credits_total = credits_total;
        Ok(())
    }

    /// End the round without a draw. The whole pot moves into `credits_total`;
    /// the caller then credits `entry_fee` to every refunded player's ticket.
    /// An empty pool is left untouched.
    pub fn cancel_round(&mut self, caller: &Pubkey) -> Result<RoundCancellation> {
        self.ensure_owner(caller)?;

        let refunded = self.players();
        let round_id = self.round_id;
        let total_refunded = self.pot()?;

        if !refunded.is_empty() {
            self.credits_total = checked_add_u64(self.credits_total, total_refunded)?;
            self.end_round()?;
        }

        Ok(RoundCancellation {
            round_id,
            entry_fee: self.entry_fee,
            refunded,
            total_refunded,
        })
    }

    /// Account for a credit leaving the pool through `claim_credit`.
    pub fn release_credit(&mut self, amount: u64) -> Result<()> {
        self.credits_total = checked_sub_u64(self.credits_total, amount)?;
        Ok(())
    }

    fn end_round(&mut self) -> Result<()> {
        let next_round = checked_add_u64(self.round_id, 1)?;
        let count = self.players_count as usize;

        self.players.data[..count].fill([0u8; 32]);
        self.players_count = 0;
        self.round_id = next_round;
        Ok(())
    }
}

/// Membership entry, one PDA per (pool, player), reused across rounds.
/// Also holds whatever the pool owes this player outside a running round.
#[account]
#[derive(Default)]
pub struct PlayerTicket {
    pub pool: Pubkey,
    pub player: Pubkey,
    /// Round this ticket was last stamped for.
    pub round_id: u64,
    /// Refunds and deferred draw payouts not yet withdrawn.
    pub credit: u64,
    pub index: u16,
    pub bump: u8,
    pub reserved: [u8; 16],
}

impl PlayerTicket {
    pub const SPACE: usize = 8
        + 32 + 32
        + 8 + 8
        + 2 + 1
        + 16;

    /// True if this ticket was stamped for `player` in round `round_id` of `pool`.
    pub fn belongs_to(&self, pool: &Pubkey, player: &Pubkey, round_id: u64) -> bool {
        self.pool == *pool && self.player == *player && self.round_id == round_id
    }

    pub fn add_credit(&mut self, amount: u64) -> Result<()> {
        self.credit = checked_add_u64(self.credit, amount)?;
        Ok(())
    }

    /// Remove and return the whole credit.
    pub fn take_credit(&mut self) -> Result<u64> {
        require!(self.credit > 0, ErrorCode::NoCreditToClaim);
        Ok(core::mem::take(&mut self.credit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::randomness::FixedRandomness;

    const FEE: u64 = 1_000;

    fn key(n: u8) -> Pubkey {
        Pubkey::new_from_array([n; 32])
    }

    fn pool_key() -> Pubkey {
        key(200)
    }

    fn owner() -> Pubkey {
        key(1)
    }

    fn sample_pool() -> Pool {
        let mut pool = Pool::zeroed();
        pool.initialize(owner(), FEE, 254).unwrap();
        pool
    }

    fn code_of(err: anchor_lang::error::Error) -> u32 {
        match err {
            anchor_lang::error::Error::AnchorError(e) => e.error_code_number,
            other => panic!("expected anchor error, got {other:?}"),
        }
    }

    fn assert_code<T: std::fmt::Debug>(result: Result<T>, expected: ErrorCode) {
        assert_eq!(code_of(result.unwrap_err()), u32::from(expected));
    }

    fn randomness_for(index: u8) -> FixedRandomness {
        let mut bytes = [0u8; 32];
        bytes[0] = index;
        FixedRandomness(bytes)
    }

    fn join_all(pool: &mut Pool, players: &[u8]) -> Vec<PlayerTicket> {
        players
            .iter()
            .map(|n| {
                let mut ticket = PlayerTicket::default();
                pool.admit(pool_key(), key(*n), &mut ticket, FEE).unwrap();
                ticket
            })
            .collect()
    }

    /// What `clear` does with the returned cancellation.
    fn refund_all(cancelled: &RoundCancellation, tickets: &mut [PlayerTicket]) {
        for player in &cancelled.refunded {
            let ticket = tickets
                .iter_mut()
                .find(|t| t.belongs_to(&pool_key(), player, cancelled.round_id))
                .unwrap();
            ticket.add_credit(cancelled.entry_fee).unwrap();
        }
    }

    #[test]
    fn account_layouts_have_expected_sizes() {
        assert_eq!(core::mem::size_of::<Pool>(), 64 + 32 * MAX_PLAYERS + 32);
        assert!(Pool::SPACE <= 10_240, "pool must fit a single CPI allocation");

        let mut data = Vec::new();
        PlayerTicket::default().try_serialize(&mut data).unwrap();
        assert_eq!(data.len(), PlayerTicket::SPACE);
    }

    #[test]
    fn initialize_sets_owner_and_fee() {
        let pool = sample_pool();
        assert_eq!(pool.owner(), owner());
        assert_eq!(pool.entry_fee(), FEE);
        assert_eq!(pool.round_id, FIRST_ROUND_ID);
        assert_eq!(pool.players_count(), 0);
        assert_eq!(pool.pot().unwrap(), 0);
    }

    #[test]
    fn zero_entry_fee_is_rejected() {
        let mut pool = Pool::zeroed();
        assert_code(pool.initialize(owner(), 0, 254), ErrorCode::InvalidConfiguration);
    }

    #[test]
    fn admit_appends_in_join_order() {
        let mut pool = sample_pool();
        let tickets = join_all(&mut pool, &[10, 11, 12]);

        assert_eq!(pool.players(), vec![key(10), key(11), key(12)]);
        assert_eq!(pool.pot().unwrap(), 3 * FEE);
        for (i, ticket) in tickets.iter().enumerate() {
            assert!(pool.is_member(&pool_key(), ticket));
            assert_eq!(ticket.index as usize, i);
            assert_eq!(ticket.round_id, FIRST_ROUND_ID);
        }
        assert!(!pool.is_member(&pool_key(), &PlayerTicket::default()));
    }

    #[test]
    fn wrong_payment_changes_nothing() {
        let mut pool = sample_pool();
        let mut ticket = PlayerTicket::default();

        assert_code(pool.admit(pool_key(), key(10), &mut ticket, FEE + 10), ErrorCode::InvalidPayment);
        assert_code(pool.admit(pool_key(), key(10), &mut ticket, FEE - 10), ErrorCode::InvalidPayment);
        assert_code(pool.admit(pool_key(), key(10), &mut ticket, 0), ErrorCode::InvalidPayment);

        assert_eq!(pool.players_count(), 0);
        assert_eq!(ticket.player, Pubkey::default());
        assert!(!pool.is_member(&pool_key(), &ticket));
    }

    #[test]
    fn second_join_in_same_round_is_rejected() {
        let mut pool = sample_pool();
        let mut ticket = PlayerTicket::default();
        pool.admit(pool_key(), key(10), &mut ticket, FEE).unwrap();

        assert_code(pool.admit(pool_key(), key(10), &mut ticket, FEE), ErrorCode::AlreadyJoined);
        assert_eq!(pool.players_count(), 1);
    }

    #[test]
    fn foreign_ticket_is_rejected() {
        let mut pool = sample_pool();
        let mut ticket = PlayerTicket::default();
        pool.admit(pool_key(), key(10), &mut ticket, FEE).unwrap();

        assert_code(pool.admit(pool_key(), key(11), &mut ticket, FEE), ErrorCode::InvalidTicket);
        assert_eq!(pool.players(), vec![key(10)]);
    }

    #[test]
    fn full_round_rejects_more_players() {
        let mut pool = sample_pool();
        let ids: Vec<u8> = (10..10 + MAX_PLAYERS as u8).collect();
        join_all(&mut pool, &ids);

        let mut late = PlayerTicket::default();
        assert_code(pool.admit(pool_key(), key(99), &mut late, FEE), ErrorCode::PoolFull);
        assert_eq!(pool.players_count() as usize, MAX_PLAYERS);
    }

    #[test]
    fn draw_requires_owner() {
        let mut pool = sample_pool();
        join_all(&mut pool, &[10, 11]);

        assert_code(pool.settle_draw(&key(10), &randomness_for(0)), ErrorCode::NotOwner);
        assert_eq!(pool.players_count(), 2);

        let mut empty = sample_pool();
        assert_code(empty.settle_draw(&key(10), &randomness_for(0)), ErrorCode::NotOwner);
    }

    #[test]
    fn draw_requires_two_players() {
        let mut pool = sample_pool();
        assert_code(pool.settle_draw(&owner(), &randomness_for(0)), ErrorCode::InsufficientPlayers);

        join_all(&mut pool, &[10]);
        assert_code(pool.settle_draw(&owner(), &randomness_for(0)), ErrorCode::InsufficientPlayers);
        assert_eq!(pool.players(), vec![key(10)]);
        assert_eq!(pool.round_id, FIRST_ROUND_ID);
    }

    #[test]
    fn draw_picks_selected_player_and_resets_round() {
        let mut pool = sample_pool();
        let tickets = join_all(&mut pool, &[10, 11, 12]);

        let outcome = pool.settle_draw(&owner(), &randomness_for(4)).unwrap();
        assert_eq!(
            outcome,
            DrawOutcome {
                round_id: FIRST_ROUND_ID,
                winner: key(11),
                winner_index: 1,
                amount: 3 * FEE,
                players_before: 3,
            }
        );

        assert_eq!(pool.players_count(), 0);
        assert!(pool.players().is_empty());
        assert_eq!(pool.round_id, FIRST_ROUND_ID + 1);
        for ticket in &tickets {
            assert!(!pool.is_member(&pool_key(), ticket));
        }
    }

    #[test]
    fn players_can_rejoin_after_draw() {
        let mut pool = sample_pool();
        let mut tickets = join_all(&mut pool, &[10, 11]);
        pool.settle_draw(&owner(), &randomness_for(0)).unwrap();

        let index = pool.admit(pool_key(), key(10), &mut tickets[0], FEE).unwrap();
        assert_eq!(index, 0);
        assert!(pool.is_member(&pool_key(), &tickets[0]));
        assert!(!pool.is_member(&pool_key(), &tickets[1]));
        assert_eq!(tickets[0].round_id, FIRST_ROUND_ID + 1);
    }

    #[test]
    fn deferred_payout_lands_on_winner_ticket() {
        let mut pool = sample_pool();
        let mut tickets = join_all(&mut pool, &[10, 11]);
        let outcome = pool.settle_draw(&owner(), &randomness_for(1)).unwrap();

        assert_code(
            pool.defer_payout(&pool_key(), &mut tickets[0], &outcome),
            ErrorCode::PayoutFailed,
        );
        pool.defer_payout(&pool_key(), &mut tickets[1], &outcome).unwrap();
        assert_eq!(tickets[1].credit, 2 * FEE);
        assert_eq!(pool.owed_lamports().unwrap(), 2 * FEE);

        let claimed = tickets[1].take_credit().unwrap();
        pool.release_credit(claimed).unwrap();
        assert_eq!(claimed, 2 * FEE);
        assert_eq!(pool.credits_total, 0);
        assert_code(tickets[1].take_credit(), ErrorCode::NoCreditToClaim);
    }

    #[test]
    fn credit_survives_rejoining() {
        let mut pool = sample_pool();
        let mut tickets = join_all(&mut pool, &[10, 11]);
        let outcome = pool.settle_draw(&owner(), &randomness_for(0)).unwrap();
        pool.defer_payout(&pool_key(), &mut tickets[0], &outcome).unwrap();

        pool.admit(pool_key(), key(10), &mut tickets[0], FEE).unwrap();
        assert_eq!(tickets[0].credit, 2 * FEE);
        assert_eq!(pool.owed_lamports().unwrap(), 3 * FEE);
    }

    #[test]
    fn clear_refunds_every_player() {
        let mut pool = sample_pool();
        let mut tickets = join_all(&mut pool, &[10, 11, 12]);

        let cancelled = pool.cancel_round(&owner()).unwrap();
        assert_eq!(
            cancelled,
            RoundCancellation {
                round_id: FIRST_ROUND_ID,
                entry_fee: FEE,
                refunded: vec![key(10), key(11), key(12)],
                total_refunded: 3 * FEE,
            }
        );
        refund_all(&cancelled, &mut tickets);

        assert_eq!(pool.players_count(), 0);
        for ticket in &tickets {
            assert_eq!(ticket.credit, FEE);
            assert!(!pool.is_member(&pool_key(), ticket));
        }
        assert_eq!(pool.owed_lamports().unwrap(), 3 * FEE);
    }

    #[test]
    fn unclaimed_refunds_never_block_clear() {
        let mut pool = sample_pool();
        let mut tickets: Vec<PlayerTicket> = Vec::new();

        // far more unclaimed refunds than a single round can hold
        for round in 0..10u8 {
            let start = 10 + round * 22;
            let ids: Vec<u8> = (start..start + 22).collect();
            let mut joined = join_all(&mut pool, &ids);

            let cancelled = pool.cancel_round(&owner()).unwrap();
            refund_all(&cancelled, &mut joined);
            tickets.extend(joined);
        }

        join_all(&mut pool, &[250]);
        let last = pool.cancel_round(&owner()).unwrap();
        assert_eq!(last.refunded, vec![key(250)]);
        assert_eq!(pool.players_count(), 0);
        assert_eq!(pool.credits_total, 221 * FEE);
        assert!(tickets.iter().all(|t| t.credit == FEE));
    }

    #[test]
    fn clear_on_empty_pool_is_noop() {
        let mut pool = sample_pool();
        let cancelled = pool.cancel_round(&owner()).unwrap();

        assert!(cancelled.refunded.is_empty());
        assert_eq!(cancelled.total_refunded, 0);
        assert_eq!(pool.round_id, FIRST_ROUND_ID);
        assert_eq!(pool.credits_total, 0);

        assert!(pool.cancel_round(&owner()).is_ok());
        assert_eq!(pool.round_id, FIRST_ROUND_ID);
    }

    #[test]
    fn clear_requires_owner() {
        let mut pool = sample_pool();
        join_all(&mut pool, &[10, 11]);
        assert_code(pool.cancel_round(&key(10)), ErrorCode::NotOwner);
        assert_eq!(pool.players_count(), 2);
    }

    #[test]
    fn release_beyond_credits_overflows() {
        let mut pool = sample_pool();
        assert_code(pool.release_credit(1), ErrorCode::MathOverflow);
    }

    #[test]
    fn status_reports_pot_and_credits() {
        let mut pool = sample_pool();
        pool.credits_total = 42;
        join_all(&mut pool, &[10, 11]);

        assert_eq!(
            pool.status().unwrap(),
            PoolStatus {
                owner: owner(),
                entry_fee: FEE,
                round_id: FIRST_ROUND_ID,
                players_count: 2,
                pot: 2 * FEE,
                credits_total: 42,
            }
        );
    }
}
