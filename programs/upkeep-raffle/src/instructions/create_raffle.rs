use crate::{
    constants::{CONFIG_SEED, RAFFLE_SEED, VAULT_SEED},
    error::RaffleError,
    state::{Config, Raffle, RaffleParams, Vault, RAFFLE_ACCOUNT_SIZE, VAULT_ACCOUNT_SIZE},
};
use anchor_lang::prelude::*;

/// Event emitted when a raffle is created
#[event]
pub struct RaffleCreated {
    /// The pubkey of the created raffle
    pub raffle: Pubkey,
    /// Vault holding the entrance payments
    pub vault: Pubkey,
    /// Minimum payment per entry in lamports
    pub entrance_fee: u64,
    /// Seconds between settlements
    pub interval: i64,
    /// When the raffle was created
    pub creation_time: i64,
}

/// Instruction to create a new raffle with the given parameters
///
/// # Arguments
/// * `ctx` - The context object containing all required accounts
/// * `params` - Entrance fee, upkeep interval and randomness request settings
///
/// # Security Considerations
/// 1. Validates caller is the management authority via config PDA
/// 2. Ensures the entrance fee is at least `MIN_ENTRANCE_FEE`
/// 3. Ensures the interval lies within `MIN_INTERVAL..=MAX_INTERVAL`
/// 4. Uses a PDA for the vault with proper seeds
///
/// # Implementation Notes
/// - Initializes raffle in Open state with no players
/// - The creation time starts the first interval
pub fn create_raffle(ctx: Context<CreateRaffle>, params: RaffleParams) -> Result<()> {
    let current_time = Clock::get()?.unix_timestamp;
    let raffle_key = ctx.accounts.raffle.key();
    let vault_key = ctx.accounts.vault.key();

    ctx.accounts.raffle.initialize(
        ctx.accounts.management_authority.key(),
        vault_key,
        &params,
        current_time,
        ctx.bumps.raffle,
    )?;
    ctx.accounts.vault.raffle = raffle_key;
    ctx.accounts.vault.bump = ctx.bumps.vault;

    // Increment the raffle counter
    ctx.accounts.config.raffle_counter = ctx
        .accounts
        .config
        .raffle_counter
        .checked_add(1)
        .ok_or(RaffleError::Overflow)?;

    emit!(RaffleCreated {
        raffle: raffle_key,
        vault: vault_key,
        entrance_fee: params.entrance_fee,
        interval: params.interval,
        creation_time: current_time,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct CreateRaffle<'info> {
    #[account(
        init,
        payer = management_authority,
        space = RAFFLE_ACCOUNT_SIZE,
        seeds = [
            RAFFLE_SEED,
            config.raffle_counter.to_le_bytes().as_ref(),
        ],
        bump
    )]
    pub raffle: Account<'info, Raffle>,

    #[account(mut)]
    pub management_authority: Signer<'info>,

    #[account(
        init,
        payer = management_authority,
        space = VAULT_ACCOUNT_SIZE,
        seeds = [
            VAULT_SEED,
            raffle.key().as_ref(),
        ],
        bump,
    )]
    pub vault: Account<'info, Vault>,

    /// The config account storing the authorities and raffle counter
    #[account(
        mut,
        seeds = [CONFIG_SEED],
        bump = config.bump,
        has_one = management_authority @ RaffleError::NotProgramManagementAuthority,
    )]
    pub config: Account<'info, Config>,

    pub system_program: Program<'info, System>,
}
