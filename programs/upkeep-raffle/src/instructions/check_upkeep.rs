use anchor_lang::prelude::*;

use crate::{
    error::RaffleError,
    state::{available_pot, Raffle, UpkeepStatus, Vault},
};

/// Read-only upkeep check for keepers.
///
/// Returns the `UpkeepStatus` as instruction return data so a keeper can
/// simulate this instruction before sending `perform_upkeep`. `check_data`
/// is accepted for keeper compatibility and ignored.
pub fn check_upkeep(ctx: Context<CheckUpkeep>, _check_data: Vec<u8>) -> Result<UpkeepStatus> {
    let now = Clock::get()?.unix_timestamp;
    let balance = available_pot(&ctx.accounts.vault.to_account_info())?;
    let status = ctx.accounts.raffle.check_upkeep(now, balance);

    msg!(
        "Upkeep needed: {} (open={} time_passed={} players={} balance={})",
        status.upkeep_needed,
        status.is_open,
        status.time_passed,
        ctx.accounts.raffle.number_of_players(),
        balance
    );

    Ok(status)
}

#[derive(Accounts)]
pub struct CheckUpkeep<'info> {
    pub raffle: Account<'info, Raffle>,

    #[account(address = raffle.vault @ RaffleError::InvalidVault)]
    pub vault: Account<'info, Vault>,
}
