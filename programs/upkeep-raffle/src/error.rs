use anchor_lang::error_code;

#[error_code]
pub enum RaffleError {
    Overflow,
    #[msg("Payment is below the entrance fee")]
    InsufficientPayment,
    #[msg("Raffle is not open")]
    NotOpen,
    #[msg("Upkeep is not eligible")]
    UpkeepNotEligible,
    #[msg("Randomness request id does not match the pending request")]
    UnknownRequest,
    #[msg("Prize transfer failed")]
    TransferFailed,
    #[msg("Raffle has reached the maximum number of players")]
    RaffleFull,
    #[msg("Entrance fee is below the minimum allowed")]
    EntranceFeeTooLow,
    #[msg("Interval is outside the allowed range")]
    InvalidInterval,
    #[msg("Only the program management authority can create raffles")]
    NotProgramManagementAuthority,
    #[msg("Only the randomness coordinator can fulfill requests")]
    NotCoordinator,
    #[msg("Winner account does not match the drawn player")]
    WinnerMismatch,
    #[msg("No random words were supplied")]
    MissingRandomWords,
    #[msg("Vault account does not belong to this raffle")]
    InvalidVault,
}
