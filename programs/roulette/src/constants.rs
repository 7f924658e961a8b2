/// Upper bound on entrants per round. `get_players` returns the whole list as
/// return data, which the runtime caps at 1024 bytes (4-byte length + 30 keys).
pub const MAX_PLAYERS: usize = 30;

pub const SEED_POOL: &[u8] = b"pool";
pub const SEED_TICKET: &[u8] = b"ticket";

/// First round id. Fresh tickets carry round 0 so they never look like members.
pub const FIRST_ROUND_ID: u64 = 1;
