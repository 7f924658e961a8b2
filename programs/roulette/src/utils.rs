use anchor_lang::prelude::*;
use crate::{errors::ErrorCode, state::PlayerTicket};

pub fn checked_add_u64(a: u64, b: u64) -> Result<u64> {
    a.checked_add(b).ok_or(ErrorCode::MathOverflow.into())
}

pub fn checked_sub_u64(a: u64, b: u64) -> Result<u64> {
    a.checked_sub(b).ok_or(ErrorCode::MathOverflow.into())
}

pub fn checked_mul_u64(a: u64, b: u64) -> Result<u64> {
    a.checked_mul(b).ok_or(ErrorCode::MathOverflow.into())
}

/// Balance left after paying `amount` out of `balance`, refusing to dip below `floor`
/// (the rent-exempt minimum of the paying account).
pub fn debit_above_floor(balance: u64, amount: u64, floor: u64) -> Result<u64> {
    let remaining = checked_sub_u64(balance, amount)?;
    require!(remaining >= floor, ErrorCode::PayoutFailed);
    Ok(remaining)
}

/// Move lamports out of a program-owned account. The runtime only lets the owning
/// program debit, so this is a direct balance edit rather than a system transfer.
pub fn move_lamports<'info>(
    from: &AccountInfo<'info>,
    to: &AccountInfo<'info>,
    amount: u64,
    from_floor: u64,
) -> Result<()> {
    let from_after = debit_above_floor(from.lamports(), amount, from_floor)?;
    let to_after = checked_add_u64(to.lamports(), amount)?;

    **from.try_borrow_mut_lamports()? = from_after;
    **to.try_borrow_mut_lamports()? = to_after;
    Ok(())
}

/// Read a ticket out of an arbitrary account. `None` unless the account is a
/// `PlayerTicket` owned by this program.
pub fn read_ticket(info: &AccountInfo) -> Option<PlayerTicket> {
    if *info.owner != crate::ID || info.data_is_empty() {
        return None;
    }
    let data = info.try_borrow_data().ok()?;
    PlayerTicket::try_deserialize(&mut &data[..]).ok()
}

pub fn write_ticket(info: &AccountInfo, ticket: &PlayerTicket) -> Result<()> {
    let mut data = info.try_borrow_mut_data()?;
    let mut writer: &mut [u8] = &mut data[..];
    ticket.try_serialize(&mut writer)
}

/// Find the writable ticket stamped for `player` in round `round_id` of `pool`
/// among `accounts` (usually the instruction's remaining accounts).
pub fn find_ticket<'a, 'info>(
    accounts: &'a [AccountInfo<'info>],
    pool: &Pubkey,
    player: &Pubkey,
    round_id: u64,
) -> Option<(&'a AccountInfo<'info>, PlayerTicket)> {
    accounts.iter().filter(|info| info.is_writable).find_map(|info| {
        let ticket = read_ticket(info)?;
        ticket
            .belongs_to(pool, player, round_id)
            .then_some((info, ticket))
    })
}
