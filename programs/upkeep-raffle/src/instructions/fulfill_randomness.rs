use anchor_lang::prelude::*;

use crate::{
    constants::CONFIG_SEED,
    error::RaffleError,
    state::{available_pot, Config, Raffle, Vault},
};

/// Event emitted when a round is settled
#[event]
pub struct WinnerPicked {
    /// The pubkey of the raffle
    pub raffle: Pubkey,
    /// The winner's address
    pub winner: Pubkey,
    /// Lamports paid to the winner
    pub prize: u64,
    /// The request that produced the winning randomness
    pub request_id: u64,
    /// Number of rounds settled so far, including this one
    pub round: u64,
}

/// Randomness callback from the coordinator.
///
/// Execution requirements:
/// 1. The signer must be the coordinator stored in config
/// 2. `request_id` must be the raffle's pending request
/// 3. `winner` must be the player at `random_words[0] mod players`
///
/// The whole pot is moved from the vault to the winner before the raffle is
/// reset. If the transfer fails the instruction fails and the raffle stays
/// Calculating with the same pending request, so the coordinator can retry.
///
/// # Errors
/// - `NotCoordinator` if the signer is not the configured coordinator
/// - `MissingRandomWords` if no word was supplied
/// - `UnknownRequest` if the request id is not pending (never issued, stale or duplicate)
/// - `WinnerMismatch` if the winner account is not the drawn player
/// - `TransferFailed` if the prize could not be moved
pub fn fulfill_randomness(
    ctx: Context<FulfillRandomness>,
    request_id: u64,
    random_words: Vec<[u8; 32]>,
) -> Result<()> {
    let random_word = random_words
        .first()
        .ok_or(RaffleError::MissingRandomWords)?;
    let now = Clock::get()?.unix_timestamp;

    let vault_info = ctx.accounts.vault.to_account_info();
    let winner_info = ctx.accounts.winner.to_account_info();
    let prize = available_pot(&vault_info)?;

    let raffle = &mut ctx.accounts.raffle;
    let winner = raffle.fulfill_randomness(request_id, random_word, now, |drawn| {
        require_keys_eq!(*drawn, winner_info.key(), RaffleError::WinnerMismatch);
        pay_out(&vault_info, &winner_info, prize)
    })?;

    msg!("Request {} settled: winner {} receives {}", request_id, winner, prize);

    emit!(WinnerPicked {
        raffle: raffle.key(),
        winner,
        prize,
        request_id,
        round: raffle.rounds_settled,
    });

    Ok(())
}

/// Moves `prize` lamports from the program-owned vault to the winner.
fn pay_out<'info>(
    vault: &AccountInfo<'info>,
    winner: &AccountInfo<'info>,
    prize: u64,
) -> Result<()> {
    let pre_transfer_balance = winner.lamports();

    vault
        .sub_lamports(prize)
        .map_err(|_| RaffleError::TransferFailed)?;
    winner
        .add_lamports(prize)
        .map_err(|_| RaffleError::TransferFailed)?;

    require!(
        winner.lamports()
            == pre_transfer_balance
                .checked_add(prize)
                .ok_or(RaffleError::Overflow)?,
        RaffleError::TransferFailed
    );

    Ok(())
}

#[derive(Accounts)]
pub struct FulfillRandomness<'info> {
    #[account(mut)]
    pub raffle: Account<'info, Raffle>,

    #[account(mut, address = raffle.vault @ RaffleError::InvalidVault)]
    pub vault: Account<'info, Vault>,

    #[account(
        seeds = [CONFIG_SEED],
        bump = config.bump,
        has_one = coordinator @ RaffleError::NotCoordinator,
    )]
    pub config: Account<'info, Config>,

    pub coordinator: Signer<'info>,

    /// Receives the prize; must be the drawn player
    #[account(mut)]
    pub winner: SystemAccount<'info>,
}
