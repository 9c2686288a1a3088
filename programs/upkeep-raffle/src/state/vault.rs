use anchor_lang::prelude::*;

// 8 discriminator, 32 pubkey, 1 bump
pub const VAULT_ACCOUNT_SIZE: usize = 8 + 32 + 1;

/// Holds entrant payments for a raffle until they are paid out to the winner.
#[account]
pub struct Vault {
    pub raffle: Pubkey,
    pub bump: u8,
}

/// Lamports in the vault that are available as prize, i.e. everything above
/// the rent-exempt minimum the account must keep.
pub fn prize_pot(vault_lamports: u64, rent_exempt_minimum: u64) -> u64 {
    vault_lamports.saturating_sub(rent_exempt_minimum)
}

/// Prize pot currently held by `vault`.
pub fn available_pot(vault: &AccountInfo) -> Result<u64> {
    let rent_exempt_minimum = Rent::get()?.minimum_balance(VAULT_ACCOUNT_SIZE);
    Ok(prize_pot(vault.lamports(), rent_exempt_minimum))
}
