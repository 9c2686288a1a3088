use anchor_lang::prelude::*;

use crate::{
    error::RaffleError,
    state::{Raffle, Vault},
};

/// Event emitted when a player enters the current round
#[event]
pub struct RaffleEntered {
    /// The pubkey of the raffle
    pub raffle: Pubkey,
    /// The entrant's address
    pub player: Pubkey,
    /// Amount paid in lamports
    pub payment: u64,
    /// Number of players in the round after this entry
    pub players: u64,
}

/// Instruction to enter the current round of a raffle
///
/// # Arguments
/// * `ctx` - The context object containing all required accounts
/// * `payment` - Lamports paid into the vault, at least the entrance fee
///
/// # Security Considerations
/// 1. Payment must cover the entrance fee
/// 2. The raffle must be Open
/// 3. Verifies the vault account matches the one stored in raffle
/// 4. Verifies the transfer landed by checking the vault balance
///
/// # Implementation Notes
/// - Any overpayment stays in the vault and becomes part of the prize
/// - The same signer may enter more than once
pub fn enter_raffle(ctx: Context<EnterRaffle>, payment: u64) -> Result<()> {
    let player = ctx.accounts.signer.key();
    ctx.accounts.raffle.enter(player, payment)?;

    let pre_transfer_balance = ctx.accounts.vault.to_account_info().lamports();

    // Transfer lamports from the player to the raffle vault
    anchor_lang::solana_program::program::invoke(
        &anchor_lang::solana_program::system_instruction::transfer(
            &player,
            &ctx.accounts.vault.key(),
            payment,
        ),
        &[
            ctx.accounts.signer.to_account_info(),
            ctx.accounts.system_program.to_account_info(),
            ctx.accounts.vault.to_account_info(),
        ],
    )?;

    let post_transfer_balance = ctx.accounts.vault.to_account_info().lamports();
    require!(
        post_transfer_balance
            == pre_transfer_balance
                .checked_add(payment)
                .ok_or(RaffleError::Overflow)?,
        RaffleError::TransferFailed
    );

    emit!(RaffleEntered {
        raffle: ctx.accounts.raffle.key(),
        player,
        payment,
        players: ctx.accounts.raffle.number_of_players() as u64,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct EnterRaffle<'info> {
    #[account(mut)]
    pub raffle: Account<'info, Raffle>,

    /// Vault that receives the payment, the one recorded in `raffle`
    #[account(mut, address = raffle.vault @ RaffleError::InvalidVault)]
    pub vault: Account<'info, Vault>,

    #[account(mut)]
    pub signer: Signer<'info>,

    pub system_program: Program<'info, System>,
}
