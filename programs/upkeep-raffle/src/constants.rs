pub const CONFIG_SEED: &[u8] = b"config";
pub const RAFFLE_SEED: &[u8] = b"raffle";
pub const VAULT_SEED: &[u8] = b"vault";

/// Upper bound on entrants per round, fixed by the raffle account's space.
pub const MAX_PLAYERS: usize = 100;

pub const MIN_ENTRANCE_FEE: u64 = 1_000_000; // 0.001 SOL
pub const MIN_INTERVAL: i64 = 1;
pub const MAX_INTERVAL: i64 = 30 * 24 * 60 * 60; // 30 days in seconds

// Parameters forwarded to the randomness coordinator with every request
pub const REQUEST_CONFIRMATIONS: u16 = 3;
pub const NUM_WORDS: u32 = 1;
