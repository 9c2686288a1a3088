use anchor_lang::prelude::*;

use crate::{
    constants::{MAX_INTERVAL, MAX_PLAYERS, MIN_ENTRANCE_FEE, MIN_INTERVAL},
    error::RaffleError,
    randomness::winner_index,
};

// Space calculation:
// 8 (discriminator) +
// 32 (authority) +
// 32 (vault) +
// 8 (entrance_fee) +
// 8 (interval) +
// 8 (last_timestamp) +
// 1 (raffle_state) +
// 4 + 32 * MAX_PLAYERS (players) +
// 33 (recent_winner: Option<Pubkey>) +
// 9 (pending_request_id: Option<u64>) +
// 8 (request_counter) +
// 8 (rounds_settled) +
// 32 (key_hash) +
// 4 (callback_compute_limit) +
// 1 (bump)
pub const RAFFLE_ACCOUNT_SIZE: usize =
    8 + 32 + 32 + 8 + 8 + 8 + 1 + (4 + 32 * MAX_PLAYERS) + 33 + 9 + 8 + 8 + 32 + 4 + 1;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RaffleState {
    #[default]
    Open = 0,
    Calculating = 1,
}

/// Parameters fixed when a raffle is created.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct RaffleParams {
    /// Minimum payment in lamports to enter a round
    pub entrance_fee: u64,
    /// Seconds that must pass after a settlement before the next upkeep
    pub interval: i64,
    /// Selects the randomness lane on the coordinator side
    pub key_hash: [u8; 32],
    /// Compute budget the coordinator should attach to the fulfillment
    pub callback_compute_limit: u32,
}

/// Result of an upkeep check. `upkeep_needed` is the conjunction of the
/// other four flags.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpkeepStatus {
    pub upkeep_needed: bool,
    pub is_open: bool,
    pub time_passed: bool,
    pub has_players: bool,
    pub has_balance: bool,
}

#[account]
#[derive(Default)]
pub struct Raffle {
    pub authority: Pubkey,
    pub vault: Pubkey,
    pub entrance_fee: u64,
    pub interval: i64,
    pub last_timestamp: i64,
    pub raffle_state: RaffleState,
    pub players: Vec<Pubkey>,
    pub recent_winner: Option<Pubkey>,
    pub pending_request_id: Option<u64>,
    pub request_counter: u64,
    pub rounds_settled: u64,
    pub key_hash: [u8; 32],
    pub callback_compute_limit: u32,
    pub bump: u8,
}

impl Raffle {
    pub fn initialize(
        &mut self,
        authority: Pubkey,
        vault: Pubkey,
        params: &RaffleParams,
        now: i64,
        bump: u8,
    ) -> Result<()> {
        require!(
            params.entrance_fee >= MIN_ENTRANCE_FEE,
            RaffleError::EntranceFeeTooLow
        );
        require!(
            (MIN_INTERVAL..=MAX_INTERVAL).contains(&params.interval),
            RaffleError::InvalidInterval
        );

        self.authority = authority;
        self.vault = vault;
        self.entrance_fee = params.entrance_fee;
        self.interval = params.interval;
        self.key_hash = params.key_hash;
        self.callback_compute_limit = params.callback_compute_limit;
        self.bump = bump;

        self.last_timestamp = now;
        self.raffle_state = RaffleState::Open;
        self.players = Vec::new();
        self.recent_winner = None;
        self.pending_request_id = None;
        self.request_counter = 0;
        self.rounds_settled = 0;

        Ok(())
    }

    /// Records `player` in the current round. The caller is responsible for
    /// moving `payment` into the vault in the same instruction.
    pub fn enter(&mut self, player: Pubkey, payment: u64) -> Result<()> {
        require!(
            payment >= self.entrance_fee,
            RaffleError::InsufficientPayment
        );
        require!(
            self.raffle_state == RaffleState::Open,
            RaffleError::NotOpen
        );
        require!(self.players.len() < MAX_PLAYERS, RaffleError::RaffleFull);

        self.players.push(player);
        Ok(())
    }

    pub fn check_upkeep(&self, now: i64, balance: u64) -> UpkeepStatus {
        let is_open = self.raffle_state == RaffleState::Open;
        let time_passed = now
            .checked_sub(self.last_timestamp)
            .map_or(false, |elapsed| elapsed >= self.interval);
        let has_players = !self.players.is_empty();
        let has_balance = balance > 0;

        UpkeepStatus {
            upkeep_needed: is_open && time_passed && has_players && has_balance,
            is_open,
            time_passed,
            has_players,
            has_balance,
        }
    }

    /// Moves the raffle into `Calculating` and returns the id of the new
    /// randomness request.
    pub fn request_randomness(&mut self, now: i64, balance: u64) -> Result<u64> {
        let status = self.check_upkeep(now, balance);
        if !status.upkeep_needed {
            msg!(
                "Upkeep not eligible: balance={} players={} state={:?} time_passed={}",
                balance,
                self.players.len(),
                self.raffle_state,
                status.time_passed
            );
            return err!(RaffleError::UpkeepNotEligible);
        }

        let request_id = self
            .request_counter
            .checked_add(1)
            .ok_or(RaffleError::Overflow)?;

        self.request_counter = request_id;
        self.pending_request_id = Some(request_id);
        self.raffle_state = RaffleState::Calculating;

        Ok(request_id)
    }

    /// Picks the winner for `request_id` without touching any state.
    pub fn draw_winner(&self, request_id: u64, random_word: &[u8; 32]) -> Result<Pubkey> {
        require!(
            self.pending_request_id == Some(request_id),
            RaffleError::UnknownRequest
        );

        // A pending request always has at least one player behind it
        let index =
            winner_index(random_word, self.players.len()).ok_or(RaffleError::UnknownRequest)?;
        Ok(self.players[index])
    }

    /// Settles the round for `request_id`.
    ///
    /// `payout` must transfer the whole pot to the given winner. It runs
    /// before any field is written, so if it fails the raffle is left exactly
    /// as it was: still `Calculating` with the same pending request.
    pub fn fulfill_randomness<F>(
        &mut self,
        request_id: u64,
        random_word: &[u8; 32],
        now: i64,
        payout: F,
    ) -> Result<Pubkey>
    where
        F: FnOnce(&Pubkey) -> Result<()>,
    {
        let winner = self.draw_winner(request_id, random_word)?;
        let rounds_settled = self
            .rounds_settled
            .checked_add(1)
            .ok_or(RaffleError::Overflow)?;

        payout(&winner)?;

        self.recent_winner = Some(winner);
        self.players.clear();
        self.raffle_state = RaffleState::Open;
        self.last_timestamp = now;
        self.pending_request_id = None;
        self.rounds_settled = rounds_settled;

        Ok(winner)
    }

    pub fn player(&self, index: usize) -> Option<Pubkey> {
        self.players.get(index).copied()
    }

    pub fn number_of_players(&self) -> usize {
        self.players.len()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::randomness::word_from_u64;

    const FEE: u64 = 10_000_000; // 0.01 SOL
    const INTERVAL: i64 = 30;
    const START: i64 = 1_700_000_000;

    fn open_raffle() -> Raffle {
        let mut raffle = Raffle::default();
        raffle
            .initialize(
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                &RaffleParams {
                    entrance_fee: FEE,
                    interval: INTERVAL,
                    key_hash: [7u8; 32],
                    callback_compute_limit: 500_000,
                },
                START,
                255,
            )
            .unwrap();
        raffle
    }

    fn with_players(count: usize) -> (Raffle, Vec<Pubkey>) {
        let mut raffle = open_raffle();
        let players: Vec<Pubkey> = (0..count).map(|_| Pubkey::new_unique()).collect();
        for player in &players {
            raffle.enter(*player, FEE).unwrap();
        }
        (raffle, players)
    }

    fn assert_error<T: std::fmt::Debug>(result: Result<T>, expected: RaffleError) {
        match result {
            Err(anchor_lang::error::Error::AnchorError(err)) => {
                assert_eq!(err.error_code_number, u32::from(expected), "{:?}", err)
            }
            other => panic!("expected {:?}, got {:?}", expected, other),
        }
    }

    fn no_payout(_: &Pubkey) -> Result<()> {
        Ok(())
    }

    #[test]
    fn initializes_open_with_parameters() {
        let raffle = open_raffle();

        assert_eq!(raffle.raffle_state, RaffleState::Open);
        assert_eq!(raffle.entrance_fee, FEE);
        assert_eq!(raffle.interval, INTERVAL);
        assert_eq!(raffle.last_timestamp, START);
        assert_eq!(raffle.number_of_players(), 0);
        assert_eq!(raffle.recent_winner, None);
        assert_eq!(raffle.pending_request_id, None);
    }

    #[test]
    fn rejects_invalid_parameters() {
        let mut params = RaffleParams {
            entrance_fee: MIN_ENTRANCE_FEE - 1,
            interval: INTERVAL,
            key_hash: [0u8; 32],
            callback_compute_limit: 0,
        };
        let key = Pubkey::new_unique();
        assert_error(
            Raffle::default().initialize(key, key, &params, START, 0),
            RaffleError::EntranceFeeTooLow,
        );

        params.entrance_fee = FEE;
        params.interval = 0;
        assert_error(
            Raffle::default().initialize(key, key, &params, START, 0),
            RaffleError::InvalidInterval,
        );
    }

    #[test]
    fn underpaid_entry_is_rejected_and_players_unchanged() {
        let (mut raffle, players) = with_players(2);

        for payment in [0, 1, FEE / 2, FEE - 1] {
            assert_error(
                raffle.enter(Pubkey::new_unique(), payment),
                RaffleError::InsufficientPayment,
            );
        }
        assert_eq!(raffle.players, players);
    }

    #[test]
    fn entries_are_recorded_in_call_order() {
        let (mut raffle, players) = with_players(5);
        // overpaying is accepted
        let whale = Pubkey::new_unique();
        raffle.enter(whale, FEE * 3).unwrap();

        assert_eq!(raffle.number_of_players(), 6);
        for (index, player) in players.iter().enumerate() {
            assert_eq!(raffle.player(index), Some(*player));
        }
        assert_eq!(raffle.player(5), Some(whale));
        assert_eq!(raffle.player(6), None);
    }

    #[test]
    fn entry_is_rejected_while_calculating() {
        let (mut raffle, _) = with_players(1);
        raffle.request_randomness(START + INTERVAL + 1, FEE).unwrap();

        assert_error(
            raffle.enter(Pubkey::new_unique(), FEE),
            RaffleError::NotOpen,
        );
        assert_eq!(raffle.number_of_players(), 1);
    }

    #[test]
    fn entry_is_rejected_when_full() {
        let (mut raffle, _) = with_players(MAX_PLAYERS);

        assert_error(
            raffle.enter(Pubkey::new_unique(), FEE),
            RaffleError::RaffleFull,
        );
    }

    #[test]
    fn upkeep_not_needed_without_players() {
        let raffle = open_raffle();

        for elapsed in [0, INTERVAL, INTERVAL * 1_000] {
            let status = raffle.check_upkeep(START + elapsed, FEE);
            assert!(!status.upkeep_needed);
            assert!(!status.has_players);
        }
    }

    #[test]
    fn upkeep_needs_the_full_interval() {
        let (raffle, _) = with_players(1);

        let early = raffle.check_upkeep(START + INTERVAL - 1, FEE);
        assert!(!early.upkeep_needed);
        assert!(!early.time_passed);

        let due = raffle.check_upkeep(START + INTERVAL, FEE);
        assert_eq!(
            due,
            UpkeepStatus {
                upkeep_needed: true,
                is_open: true,
                time_passed: true,
                has_players: true,
                has_balance: true,
            }
        );
    }

    #[test]
    fn upkeep_not_needed_without_balance() {
        let (raffle, _) = with_players(1);

        let status = raffle.check_upkeep(START + INTERVAL, 0);
        assert!(!status.upkeep_needed);
        assert!(!status.has_balance);
    }

    #[test]
    fn upkeep_not_needed_while_calculating() {
        let (mut raffle, _) = with_players(2);
        raffle.request_randomness(START + INTERVAL, 2 * FEE).unwrap();

        let status = raffle.check_upkeep(START + INTERVAL * 10, 2 * FEE);
        assert!(!status.upkeep_needed);
        assert!(!status.is_open);
    }

    #[test]
    fn request_is_rejected_when_not_eligible() {
        let (mut raffle, _) = with_players(1);

        assert_error(
            raffle.request_randomness(START + 1, FEE),
            RaffleError::UpkeepNotEligible,
        );
        assert_eq!(raffle.raffle_state, RaffleState::Open);
        assert_eq!(raffle.pending_request_id, None);
        assert_eq!(raffle.request_counter, 0);
    }

    #[test]
    fn second_request_is_rejected() {
        let (mut raffle, _) = with_players(1);
        let now = START + INTERVAL;

        let request_id = raffle.request_randomness(now, FEE).unwrap();
        assert_eq!(request_id, 1);
        assert_eq!(raffle.raffle_state, RaffleState::Calculating);
        assert_eq!(raffle.pending_request_id, Some(request_id));

        assert_error(
            raffle.request_randomness(now, FEE),
            RaffleError::UpkeepNotEligible,
        );
        assert_eq!(raffle.pending_request_id, Some(request_id));
    }

    #[test]
    fn unknown_request_is_rejected_without_changes() {
        let (mut raffle, players) = with_players(3);

        // nothing pending yet
        assert_error(
            raffle.fulfill_randomness(1, &word_from_u64(0), START, no_payout),
            RaffleError::UnknownRequest,
        );

        let request_id = raffle.request_randomness(START + INTERVAL, 3 * FEE).unwrap();
        assert_error(
            raffle.fulfill_randomness(request_id + 1, &word_from_u64(0), START + 99, no_payout),
            RaffleError::UnknownRequest,
        );

        assert_eq!(raffle.raffle_state, RaffleState::Calculating);
        assert_eq!(raffle.pending_request_id, Some(request_id));
        assert_eq!(raffle.players, players);
        assert_eq!(raffle.last_timestamp, START);
        assert_eq!(raffle.recent_winner, None);
    }

    #[test]
    fn pending_request_without_players_is_rejected() {
        let mut raffle = open_raffle();
        raffle.raffle_state = RaffleState::Calculating;
        raffle.pending_request_id = Some(1);

        assert_error(raffle.draw_winner(1, &word_from_u64(3)), RaffleError::UnknownRequest);
        assert_error(
            raffle.fulfill_randomness(1, &word_from_u64(3), START + INTERVAL, no_payout),
            RaffleError::UnknownRequest,
        );
        assert_eq!(raffle.raffle_state, RaffleState::Calculating);
        assert_eq!(raffle.pending_request_id, Some(1));
        assert_eq!(raffle.rounds_settled, 0);
    }

    #[test]
    fn four_entrants_settle_to_the_drawn_winner() {
        let (mut raffle, players) = with_players(4);
        let pot = 4 * FEE;
        let mut balances: HashMap<Pubkey, u64> = players.iter().map(|p| (*p, 0)).collect();

        let now = START + INTERVAL;
        assert!(raffle.check_upkeep(now, pot).upkeep_needed);
        let request_id = raffle.request_randomness(now, pot).unwrap();

        // 5 mod 4 == 1
        let settled_at = now + 12;
        let winner = raffle
            .fulfill_randomness(request_id, &word_from_u64(5), settled_at, |winner| {
                *balances.get_mut(winner).unwrap() += pot;
                Ok(())
            })
            .unwrap();

        assert_eq!(winner, players[1]);
        assert_eq!(raffle.recent_winner, Some(players[1]));
        assert_eq!(raffle.number_of_players(), 0);
        assert_eq!(raffle.player(0), None);
        assert_eq!(raffle.raffle_state, RaffleState::Open);
        assert_eq!(raffle.last_timestamp, settled_at);
        assert_eq!(raffle.pending_request_id, None);
        assert_eq!(raffle.rounds_settled, 1);
        assert_eq!(balances[&players[1]], 40_000_000);
        assert_eq!(balances[&players[0]], 0);
    }

    #[test]
    fn duplicate_fulfillment_is_rejected() {
        let (mut raffle, _) = with_players(2);
        let request_id = raffle.request_randomness(START + INTERVAL, 2 * FEE).unwrap();

        raffle
            .fulfill_randomness(request_id, &word_from_u64(9), START + INTERVAL, no_payout)
            .unwrap();
        let winner = raffle.recent_winner;

        let mut paid_again = false;
        assert_error(
            raffle.fulfill_randomness(request_id, &word_from_u64(8), START + INTERVAL + 5, |_| {
                paid_again = true;
                Ok(())
            }),
            RaffleError::UnknownRequest,
        );
        assert!(!paid_again);
        assert_eq!(raffle.recent_winner, winner);
        assert_eq!(raffle.rounds_settled, 1);
    }

    #[test]
    fn failed_payout_leaves_round_calculating_for_retry() {
        let (mut raffle, players) = with_players(3);
        let request_id = raffle.request_randomness(START + INTERVAL, 3 * FEE).unwrap();

        assert_error(
            raffle.fulfill_randomness(request_id, &word_from_u64(2), START + 40, |_| {
                err!(RaffleError::TransferFailed)
            }),
            RaffleError::TransferFailed,
        );
        assert_eq!(raffle.raffle_state, RaffleState::Calculating);
        assert_eq!(raffle.pending_request_id, Some(request_id));
        assert_eq!(raffle.players, players);
        assert_eq!(raffle.recent_winner, None);
        assert_eq!(raffle.last_timestamp, START);
        assert_eq!(raffle.rounds_settled, 0);

        let winner = raffle
            .fulfill_randomness(request_id, &word_from_u64(2), START + 41, no_payout)
            .unwrap();
        assert_eq!(winner, players[2]);
        assert_eq!(raffle.raffle_state, RaffleState::Open);
    }

    #[test]
    fn next_round_waits_a_full_interval_after_settlement() {
        let (mut raffle, _) = with_players(1);
        let first = raffle.request_randomness(START + INTERVAL, FEE).unwrap();
        let settled_at = START + INTERVAL + 3;
        raffle
            .fulfill_randomness(first, &word_from_u64(0), settled_at, no_payout)
            .unwrap();

        let player = Pubkey::new_unique();
        raffle.enter(player, FEE).unwrap();
        assert!(!raffle.check_upkeep(settled_at + INTERVAL - 1, FEE).upkeep_needed);

        let second = raffle.request_randomness(settled_at + INTERVAL, FEE).unwrap();
        assert_eq!(second, first + 1);

        let winner = raffle
            .fulfill_randomness(second, &word_from_u64(77), settled_at + INTERVAL, no_payout)
            .unwrap();
        assert_eq!(winner, player);
        assert_eq!(raffle.rounds_settled, 2);
    }
}
