use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("Attached value must equal the entry fee")]
    InvalidPayment,
    #[msg("Player already joined this round")]
    AlreadyJoined,
    #[msg("Only the pool owner can do this")]
    NotOwner,
    #[msg("Not enough players in roulette")]
    InsufficientPlayers,
    #[msg("Payout to the winner could not be completed or deferred")]
    PayoutFailed,
    #[msg("Entry fee must be greater than zero")]
    InvalidConfiguration,
    #[msg("Round is full")]
    PoolFull,
    #[msg("Ticket of a refunded player was not passed as a writable account")]
    MissingTicket,
    #[msg("No credit to claim")]
    NoCreditToClaim,
    #[msg("Ticket does not belong to this pool or player")]
    InvalidTicket,
    #[msg("Math overflow")]
    MathOverflow,
}
