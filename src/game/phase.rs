//! Betting-round state machine.
//!
//! A hand moves through five phases in strict forward order, with no skips
//! and no way back: pre-flop, flop, turn, river, showdown. Each [`Phase`]
//! value is one betting round; the owning game constructs the next round
//! from the current one and keeps the finished rounds as history.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::GameError;
use super::entities::{Blinds, Card, Chips, Deck, Player, Pot};

/// The five betting rounds, in play order.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum PhaseName {
    PreFlop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl PhaseName {
    /// The round that follows this one, if any.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            Self::PreFlop => Some(Self::Flop),
            Self::Flop => Some(Self::Turn),
            Self::Turn => Some(Self::River),
            Self::River => Some(Self::Showdown),
            Self::Showdown => None,
        }
    }

    /// Cards on the board once this round is in play.
    #[must_use]
    pub fn community_target(self) -> usize {
        match self {
            Self::PreFlop => 0,
            Self::Flop => 3,
            Self::Turn => 4,
            Self::River | Self::Showdown => 5,
        }
    }
}

impl fmt::Display for PhaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::PreFlop => "pre-flop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
            Self::Showdown => "showdown",
        };
        write!(f, "{repr}")
    }
}

/// Indices into a hand's player list for the button and the blinds.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct HandPositions {
    pub dealer_idx: usize,
    pub small_blind_idx: usize,
    pub big_blind_idx: usize,
}

/// One betting round: the board so far, the round's bets, the carried pot,
/// and the turn pointer. The deck stays with the owning game; operations
/// that draw borrow it for the duration of the call.
#[derive(Clone, Debug)]
pub struct Phase {
    name: PhaseName,
    community: Vec<Card>,
    round_bets: Pot,
    /// Chips collected in earlier rounds of the hand.
    pot: Chips,
    current_idx: usize,
    num_players: usize,
    positions: HandPositions,
    /// Bets and folds taken this round.
    actions: usize,
    hole_cards_dealt: bool,
}

impl Phase {
    /// The hand's opening pre-flop round.
    pub(crate) fn opening(num_players: usize, positions: HandPositions) -> Self {
        Self {
            name: PhaseName::PreFlop,
            community: Vec::with_capacity(5),
            round_bets: Pot::new(),
            pot: 0,
            current_idx: 0,
            num_players,
            positions,
            actions: 0,
            hole_cards_dealt: false,
        }
    }

    /// The round after `prev`, carrying the board, pot, and positions.
    /// The turn opens on the first non-folded player after the dealer.
    pub(crate) fn following(prev: &Phase, name: PhaseName, pot: Chips, players: &[Player]) -> Self {
        let mut phase = Self {
            name,
            community: prev.community.clone(),
            round_bets: Pot::new(),
            pot,
            current_idx: 0,
            num_players: prev.num_players,
            positions: prev.positions,
            actions: 0,
            hole_cards_dealt: true,
        };
        phase.skip_folded(players);
        phase
    }

    #[must_use]
    pub fn name(&self) -> PhaseName {
        self.name
    }

    #[must_use]
    pub fn community(&self) -> &[Card] {
        &self.community
    }

    #[must_use]
    pub fn round_bets(&self) -> &Pot {
        &self.round_bets
    }

    /// Chips wagered so far this round.
    #[must_use]
    pub fn round_pot(&self) -> Chips {
        self.round_bets.size()
    }

    /// Chips carried in from earlier rounds plus this round's bets.
    #[must_use]
    pub fn total_pot(&self) -> Chips {
        self.pot + self.round_bets.size()
    }

    #[must_use]
    pub fn current_player_idx(&self) -> usize {
        self.current_idx
    }

    #[must_use]
    pub fn positions(&self) -> HandPositions {
        self.positions
    }

    /// Deal two hole cards to every player, one card per player per pass,
    /// two passes in list order. Pre-flop only, exactly once.
    pub fn deal_hole_cards(
        &mut self,
        deck: &mut Deck,
        players: &mut [Player],
    ) -> Result<(), GameError> {
        if self.name != PhaseName::PreFlop || self.hole_cards_dealt {
            return Err(GameError::HoleDealOutOfPhase);
        }
        self.hole_cards_dealt = true;
        let requested = 2 * players.len();
        let mut dealt = 0;
        for _ in 0..2 {
            for player in players.iter_mut() {
                match deck.draw() {
                    Some(card) => {
                        player.add_to_hand(card);
                        dealt += 1;
                    }
                    None => return Err(GameError::ShortDeck { requested, dealt }),
                }
            }
        }
        Ok(())
    }

    /// Append `n` cards to the board. Valid only while filling the board on
    /// entry to the flop, turn, or river; a short deck appends what is
    /// available and reports how far it got.
    pub fn deal_community_cards(&mut self, deck: &mut Deck, n: usize) -> Result<usize, GameError> {
        let target = match self.name {
            PhaseName::Flop | PhaseName::Turn | PhaseName::River => self.name.community_target(),
            other => return Err(GameError::CommunityDealOutOfPhase(other)),
        };
        if self.community.len() + n > target {
            return Err(GameError::CommunityAlreadyDealt(self.name));
        }
        for dealt in 0..n {
            match deck.draw() {
                Some(card) => self.community.push(card),
                None => {
                    return Err(GameError::ShortDeck {
                        requested: n,
                        dealt,
                    });
                }
            }
        }
        Ok(n)
    }

    /// Post the small and big blinds into the round pot and put the action
    /// on the seat after the big blind. Pre-flop, before any betting.
    pub fn post_blinds(&mut self, players: &mut [Player], blinds: Blinds) -> Result<(), GameError> {
        if self.name != PhaseName::PreFlop || !self.round_bets.is_empty() || self.actions > 0 {
            return Err(GameError::BlindsOutOfPhase);
        }
        let sb = self.positions.small_blind_idx;
        let bb = self.positions.big_blind_idx;
        players[sb].bet(blinds.small)?;
        self.round_bets.add(sb, blinds.small);
        players[bb].bet(blinds.big)?;
        self.round_bets.add(bb, blinds.big);
        self.refresh_matched(players);
        self.current_idx = bb;
        self.advance_turn(players);
        Ok(())
    }

    /// Wager `amount` for the player on turn, then advance the action.
    /// Nothing changes when the player cannot cover the amount.
    pub fn bet(&mut self, players: &mut [Player], amount: Chips) -> Result<(), GameError> {
        if self.name == PhaseName::Showdown {
            return Err(GameError::HandComplete);
        }
        players[self.current_idx].bet(amount)?;
        self.round_bets.add(self.current_idx, amount);
        self.actions += 1;
        self.refresh_matched(players);
        self.advance_turn(players);
        Ok(())
    }

    /// Fold the player on turn, then advance the action.
    pub fn fold(&mut self, players: &mut [Player]) -> Result<(), GameError> {
        if self.name == PhaseName::Showdown {
            return Err(GameError::HandComplete);
        }
        players[self.current_idx].set_folded(true);
        players[self.current_idx].set_bet_matched(false);
        self.actions += 1;
        self.advance_turn(players);
        Ok(())
    }

    /// Move the turn pointer one seat forward, wrapping past the last index.
    pub fn next_player(&mut self) -> usize {
        self.current_idx = (self.current_idx + 1) % self.num_players;
        self.current_idx
    }

    /// Whether every non-folded player has acted this round and matched the
    /// call or is all-in.
    #[must_use]
    pub fn is_betting_complete(&self, players: &[Player]) -> bool {
        let active = players.iter().filter(|p| !p.is_folded()).count();
        if self.actions < active {
            return false;
        }
        let call = self.round_bets.call_amount();
        players
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.is_folded())
            .all(|(idx, p)| self.round_bets.investment(idx) == call || p.chips() == 0)
    }

    /// Verify the round's bets are matched and hand the round pot over for
    /// collection. Folded players' contributions are collected as-is, and
    /// an all-in player may be short of the call.
    pub fn resolve_bets(&mut self, players: &mut [Player]) -> Result<Pot, GameError> {
        let call = self.round_bets.call_amount();
        for (idx, player) in players.iter().enumerate() {
            if player.is_folded() {
                continue;
            }
            if self.round_bets.investment(idx) != call && player.chips() > 0 {
                return Err(GameError::UnmatchedBets);
            }
        }
        for player in players.iter_mut() {
            player.set_bet_matched(false);
        }
        Ok(std::mem::take(&mut self.round_bets))
    }

    fn advance_turn(&mut self, players: &[Player]) {
        self.next_player();
        self.skip_folded(players);
    }

    fn skip_folded(&mut self, players: &[Player]) {
        for _ in 0..self.num_players {
            if !players[self.current_idx].is_folded() {
                return;
            }
            self.next_player();
        }
    }

    fn refresh_matched(&self, players: &mut [Player]) {
        let call = self.round_bets.call_amount();
        for (idx, player) in players.iter_mut().enumerate() {
            if player.is_folded() {
                continue;
            }
            player.set_bet_matched(self.round_bets.investment(idx) == call);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Suit;

    fn players(n: usize) -> Vec<Player> {
        (0..n)
            .map(|i| Player::new(format!("player{i}"), 1000))
            .collect()
    }

    fn positions() -> HandPositions {
        HandPositions {
            dealer_idx: 2,
            small_blind_idx: 0,
            big_blind_idx: 1,
        }
    }

    // === Phase Order Tests ===

    #[test]
    fn test_phase_order_is_strictly_forward() {
        assert_eq!(PhaseName::PreFlop.next(), Some(PhaseName::Flop));
        assert_eq!(PhaseName::Flop.next(), Some(PhaseName::Turn));
        assert_eq!(PhaseName::Turn.next(), Some(PhaseName::River));
        assert_eq!(PhaseName::River.next(), Some(PhaseName::Showdown));
        assert_eq!(PhaseName::Showdown.next(), None);
    }

    #[test]
    fn test_community_targets() {
        assert_eq!(PhaseName::PreFlop.community_target(), 0);
        assert_eq!(PhaseName::Flop.community_target(), 3);
        assert_eq!(PhaseName::Turn.community_target(), 4);
        assert_eq!(PhaseName::River.community_target(), 5);
        assert_eq!(PhaseName::Showdown.community_target(), 5);
    }

    // === Dealing Tests ===

    #[test]
    fn test_deal_hole_cards_gives_two_each() {
        let mut phase = Phase::opening(3, positions());
        let mut players = players(3);
        let mut deck = Deck::standard();
        phase.deal_hole_cards(&mut deck, &mut players).unwrap();
        for player in &players {
            assert_eq!(player.hand().len(), 2);
        }
        assert_eq!(deck.remaining(), 52 - 6);
    }

    #[test]
    fn test_deal_hole_cards_alternates_passes() {
        // One card per player per pass: with a stacked deck, player 0 gets
        // cards 0 and 2, player 1 gets cards 1 and 3.
        let stacked = vec![
            Card(2, Suit::Club),
            Card(3, Suit::Club),
            Card(4, Suit::Club),
            Card(5, Suit::Club),
        ];
        let mut deck = Deck::from(stacked);
        let mut phase = Phase::opening(2, HandPositions::default());
        let mut players = players(2);
        phase.deal_hole_cards(&mut deck, &mut players).unwrap();
        assert_eq!(players[0].hand(), &[Card(2, Suit::Club), Card(4, Suit::Club)]);
        assert_eq!(players[1].hand(), &[Card(3, Suit::Club), Card(5, Suit::Club)]);
    }

    #[test]
    fn test_deal_hole_cards_twice_is_rejected() {
        let mut phase = Phase::opening(2, HandPositions::default());
        let mut players = players(2);
        let mut deck = Deck::standard();
        phase.deal_hole_cards(&mut deck, &mut players).unwrap();
        let err = phase.deal_hole_cards(&mut deck, &mut players).unwrap_err();
        assert_eq!(err, GameError::HoleDealOutOfPhase);
    }

    #[test]
    fn test_short_deck_hole_deal_reports_progress() {
        let mut deck = Deck::from(vec![Card(2, Suit::Club), Card(3, Suit::Club)]);
        let mut phase = Phase::opening(2, HandPositions::default());
        let mut players = players(2);
        let err = phase.deal_hole_cards(&mut deck, &mut players).unwrap_err();
        assert_eq!(
            err,
            GameError::ShortDeck {
                requested: 4,
                dealt: 2,
            }
        );
    }

    #[test]
    fn test_community_deal_rejected_pre_flop() {
        let mut phase = Phase::opening(2, HandPositions::default());
        let mut deck = Deck::standard();
        let err = phase.deal_community_cards(&mut deck, 3).unwrap_err();
        assert_eq!(
            err,
            GameError::CommunityDealOutOfPhase(PhaseName::PreFlop)
        );
        assert_eq!(deck.remaining(), 52);
    }

    #[test]
    fn test_community_deal_fills_the_flop() {
        let pre = Phase::opening(2, HandPositions::default());
        let players = players(2);
        let mut flop = Phase::following(&pre, PhaseName::Flop, 0, &players);
        let mut deck = Deck::standard();
        assert_eq!(flop.deal_community_cards(&mut deck, 3).unwrap(), 3);
        assert_eq!(flop.community().len(), 3);
        assert_eq!(deck.remaining(), 49);
    }

    #[test]
    fn test_community_deal_rejected_when_street_complete() {
        let pre = Phase::opening(2, HandPositions::default());
        let players = players(2);
        let mut flop = Phase::following(&pre, PhaseName::Flop, 0, &players);
        let mut deck = Deck::standard();
        flop.deal_community_cards(&mut deck, 3).unwrap();
        let err = flop.deal_community_cards(&mut deck, 1).unwrap_err();
        assert_eq!(err, GameError::CommunityAlreadyDealt(PhaseName::Flop));
    }

    #[test]
    fn test_short_deck_community_deal_reports_progress() {
        let pre = Phase::opening(2, HandPositions::default());
        let players = players(2);
        let mut flop = Phase::following(&pre, PhaseName::Flop, 0, &players);
        let mut deck = Deck::from(vec![Card(9, Suit::Heart)]);
        let err = flop.deal_community_cards(&mut deck, 3).unwrap_err();
        assert_eq!(
            err,
            GameError::ShortDeck {
                requested: 3,
                dealt: 1,
            }
        );
        assert_eq!(flop.community().len(), 1);
    }

    // === Turn Pointer Tests ===

    #[test]
    fn test_next_player_wraps_to_zero() {
        let mut phase = Phase::opening(4, HandPositions::default());
        assert_eq!(phase.next_player(), 1);
        assert_eq!(phase.next_player(), 2);
        assert_eq!(phase.next_player(), 3);
        assert_eq!(phase.next_player(), 0);
    }

    #[test]
    fn test_next_player_full_lap_returns_to_start() {
        let mut phase = Phase::opening(5, HandPositions::default());
        let start = phase.current_player_idx();
        for _ in 0..5 {
            phase.next_player();
        }
        assert_eq!(phase.current_player_idx(), start);
    }

    #[test]
    fn test_action_skips_folded_players() {
        let mut phase = Phase::opening(3, positions());
        let mut players = players(3);
        phase.fold(&mut players).unwrap();
        assert_eq!(phase.current_player_idx(), 1);
        phase.bet(&mut players, 10).unwrap();
        // Player 0 folded, so the action passes them over back to 1 after 2.
        phase.bet(&mut players, 10).unwrap();
        assert_eq!(phase.current_player_idx(), 1);
    }

    // === Betting Tests ===

    #[test]
    fn test_bet_moves_chips_into_round_pot_and_advances() {
        let mut phase = Phase::opening(3, positions());
        let mut players = players(3);
        phase.bet(&mut players, 40).unwrap();
        assert_eq!(players[0].chips(), 960);
        assert_eq!(phase.round_pot(), 40);
        assert_eq!(phase.current_player_idx(), 1);
    }

    #[test]
    fn test_failed_bet_leaves_round_unchanged() {
        let mut phase = Phase::opening(2, HandPositions::default());
        let mut players = players(2);
        let err = phase.bet(&mut players, 5000).unwrap_err();
        assert!(matches!(err, GameError::InsufficientChips { .. }));
        assert_eq!(players[0].chips(), 1000);
        assert_eq!(phase.round_pot(), 0);
        assert_eq!(phase.current_player_idx(), 0);
    }

    #[test]
    fn test_bet_matched_flags_follow_the_call() {
        let mut phase = Phase::opening(2, HandPositions::default());
        let mut players = players(2);
        phase.bet(&mut players, 50).unwrap();
        assert!(players[0].is_bet_matched());
        assert!(!players[1].is_bet_matched());
        phase.bet(&mut players, 50).unwrap();
        assert!(players[1].is_bet_matched());
    }

    #[test]
    fn test_post_blinds_debits_blind_seats() {
        let mut phase = Phase::opening(3, positions());
        let mut players = players(3);
        let blinds = Blinds::from_small(5);
        phase.post_blinds(&mut players, blinds).unwrap();
        assert_eq!(players[0].chips(), 995);
        assert_eq!(players[1].chips(), 990);
        assert_eq!(phase.round_pot(), 15);
        // Action opens after the big blind.
        assert_eq!(phase.current_player_idx(), 2);
    }

    #[test]
    fn test_post_blinds_after_betting_is_rejected() {
        let mut phase = Phase::opening(3, positions());
        let mut players = players(3);
        phase.bet(&mut players, 10).unwrap();
        let err = phase
            .post_blinds(&mut players, Blinds::from_small(5))
            .unwrap_err();
        assert_eq!(err, GameError::BlindsOutOfPhase);
    }

    // === Resolution Tests ===

    #[test]
    fn test_resolve_rejects_unmatched_bets() {
        let mut phase = Phase::opening(2, HandPositions::default());
        let mut players = players(2);
        phase.bet(&mut players, 100).unwrap();
        let err = phase.resolve_bets(&mut players).unwrap_err();
        assert_eq!(err, GameError::UnmatchedBets);
    }

    #[test]
    fn test_resolve_accepts_matched_bets() {
        let mut phase = Phase::opening(2, HandPositions::default());
        let mut players = players(2);
        phase.bet(&mut players, 100).unwrap();
        phase.bet(&mut players, 100).unwrap();
        let round = phase.resolve_bets(&mut players).unwrap();
        assert_eq!(round.size(), 200);
        assert_eq!(phase.round_pot(), 0);
    }

    #[test]
    fn test_resolve_accepts_short_all_in() {
        let mut phase = Phase::opening(2, HandPositions::default());
        let mut players = vec![Player::new("short", 60), Player::new("deep", 1000)];
        phase.bet(&mut players, 60).unwrap();
        phase.bet(&mut players, 100).unwrap();
        let round = phase.resolve_bets(&mut players).unwrap();
        assert_eq!(round.size(), 160);
    }

    #[test]
    fn test_resolve_collects_folded_contributions() {
        let mut phase = Phase::opening(3, positions());
        let mut players = players(3);
        phase.bet(&mut players, 50).unwrap();
        phase.fold(&mut players).unwrap();
        phase.bet(&mut players, 50).unwrap();
        let round = phase.resolve_bets(&mut players).unwrap();
        assert_eq!(round.size(), 100);
    }

    #[test]
    fn test_betting_complete_after_everyone_matches() {
        let mut phase = Phase::opening(3, positions());
        let mut players = players(3);
        assert!(!phase.is_betting_complete(&players));
        phase.bet(&mut players, 20).unwrap();
        phase.bet(&mut players, 20).unwrap();
        assert!(!phase.is_betting_complete(&players));
        phase.bet(&mut players, 20).unwrap();
        assert!(phase.is_betting_complete(&players));
    }

    #[test]
    fn test_no_betting_at_showdown() {
        let pre = Phase::opening(2, HandPositions::default());
        let players_list = players(2);
        let mut showdown = Phase::following(&pre, PhaseName::Showdown, 0, &players_list);
        let mut players_list = players_list;
        assert_eq!(
            showdown.bet(&mut players_list, 10).unwrap_err(),
            GameError::HandComplete
        );
        assert_eq!(
            showdown.fold(&mut players_list).unwrap_err(),
            GameError::HandComplete
        );
    }
}
