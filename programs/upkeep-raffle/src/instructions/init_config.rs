use crate::{
    constants::CONFIG_SEED,
    state::{Config, CONFIG_ACCOUNT_SIZE},
};
use anchor_lang::prelude::*;

/// One-time setup of the program config PDA.
///
/// Records who may create raffles and which key delivers randomness. The
/// coordinator has to sign every `fulfill_randomness` call for every raffle
/// of this program, so it is normally the oracle's fulfillment key.
///
/// # Account Validations
/// * Config - PDA with seed "config", created here and paid by the deployer
/// * Management Authority - becomes the only signer allowed to create raffles
/// * Coordinator - becomes the only signer allowed to settle rounds
pub fn init_config(ctx: Context<InitConfig>) -> Result<()> {
    ctx.accounts.config.management_authority = ctx.accounts.management_authority.key();
    ctx.accounts.config.coordinator = ctx.accounts.coordinator.key();
    ctx.accounts.config.upgrade_authority = ctx.accounts.upgrade_authority.key();
    ctx.accounts.config.bump = ctx.bumps.config;
    ctx.accounts.config.raffle_counter = 0;

    msg!(
        "Config initialized: management_authority={} coordinator={}",
        ctx.accounts.config.management_authority,
        ctx.accounts.config.coordinator
    );
    Ok(())
}

#[derive(Accounts)]
pub struct InitConfig<'info> {
    #[account(
        init,
        payer = upgrade_authority,
        space = CONFIG_ACCOUNT_SIZE,
        seeds = [CONFIG_SEED],
        bump
    )]
    pub config: Account<'info, Config>,

    #[account(mut)]
    pub upgrade_authority: Signer<'info>,
    pub management_authority: SystemAccount<'info>,
    pub coordinator: SystemAccount<'info>,

    pub system_program: Program<'info, System>,
}
