use anchor_lang::prelude::*;

use crate::{
    constants::{NUM_WORDS, REQUEST_CONFIRMATIONS},
    error::RaffleError,
    state::{available_pot, Raffle, Vault},
};

/// Event the randomness coordinator listens for. It answers by calling
/// `fulfill_randomness` with the same `request_id`.
#[event]
pub struct RandomnessRequested {
    /// The pubkey of the raffle
    pub raffle: Pubkey,
    /// Id correlating the request with its fulfillment
    pub request_id: u64,
    /// Randomness lane on the coordinator side
    pub key_hash: [u8; 32],
    /// Confirmations the coordinator waits before answering
    pub request_confirmations: u16,
    /// Compute budget for the fulfillment
    pub callback_compute_limit: u32,
    /// Number of random words requested
    pub num_words: u32,
}

/// Starts settlement of the current round.
///
/// Anyone may call this; it fails with `UpkeepNotEligible` unless the raffle
/// is Open, the interval has passed since the last settlement, and the
/// round has players and a non-empty pot. On success the raffle moves to
/// Calculating and a `RandomnessRequested` event is emitted.
pub fn perform_upkeep(ctx: Context<PerformUpkeep>, _perform_data: Vec<u8>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let balance = available_pot(&ctx.accounts.vault.to_account_info())?;

    let raffle = &mut ctx.accounts.raffle;
    let request_id = raffle.request_randomness(now, balance)?;

    msg!(
        "Requested randomness {} for {} players, pot {}",
        request_id,
        raffle.number_of_players(),
        balance
    );

    emit!(RandomnessRequested {
        raffle: raffle.key(),
        request_id,
        key_hash: raffle.key_hash,
        request_confirmations: REQUEST_CONFIRMATIONS,
        callback_compute_limit: raffle.callback_compute_limit,
        num_words: NUM_WORDS,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct PerformUpkeep<'info> {
    #[account(mut)]
    pub raffle: Account<'info, Raffle>,

    #[account(address = raffle.vault @ RaffleError::InvalidVault)]
    pub vault: Account<'info, Vault>,

    /// The keeper triggering the upkeep
    pub signer: Signer<'info>,
}
