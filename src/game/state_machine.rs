//! The per-hand game machine.
//!
//! A [`Game`] owns the deck and the hand's ordered player list, and drives
//! the betting rounds from pre-flop to showdown. Phases never hold the
//! deck; they borrow it from the game for the duration of a dealing call.

use log::debug;
use std::collections::HashSet;
use uuid::Uuid;

use super::GameError;
use super::entities::{Blinds, Chips, Deck, Player, Pot, SidePot};
use super::phase::{HandPositions, Phase, PhaseName};

/// A single hand, from the deal to showdown.
#[derive(Debug)]
pub struct Game {
    id: Uuid,
    deck: Deck,
    players: Vec<Player>,
    blinds: Blinds,
    positions: HandPositions,
    /// Chips collected from resolved rounds, by player index.
    pot: Pot,
    current_phase: Phase,
    history: Vec<Phase>,
}

impl Game {
    /// Start a hand from an ordered player list with a freshly shuffled
    /// deck. The list order is fixed for the hand; `positions` index it.
    pub fn new(
        blinds: Blinds,
        players: Vec<Player>,
        positions: HandPositions,
    ) -> Result<Self, GameError> {
        Self::with_deck(Deck::shuffled(), blinds, players, positions)
    }

    /// Start a hand drawing from a caller-supplied deck.
    pub fn with_deck(
        deck: Deck,
        blinds: Blinds,
        mut players: Vec<Player>,
        positions: HandPositions,
    ) -> Result<Self, GameError> {
        if players.len() < 2 {
            return Err(GameError::NotEnoughPlayers);
        }
        if positions.dealer_idx >= players.len()
            || positions.small_blind_idx >= players.len()
            || positions.big_blind_idx >= players.len()
        {
            return Err(GameError::InvalidPosition);
        }
        for player in &mut players {
            player.reset_for_new_hand();
        }
        let current_phase = Phase::opening(players.len(), positions);
        Ok(Self {
            id: Uuid::new_v4(),
            deck,
            players,
            blinds,
            positions,
            pot: Pot::new(),
            current_phase,
            history: Vec::new(),
        })
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn blinds(&self) -> Blinds {
        self.blinds
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn positions(&self) -> HandPositions {
        self.positions
    }

    #[must_use]
    pub fn current_phase(&self) -> &Phase {
        &self.current_phase
    }

    /// Completed rounds, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Phase] {
        &self.history
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Chips in the hand's pot, this round's bets included.
    #[must_use]
    pub fn pot_size(&self) -> Chips {
        self.pot.size() + self.current_phase.round_pot()
    }

    /// Players still contesting the pot.
    #[must_use]
    pub fn active_players(&self) -> usize {
        self.players.iter().filter(|p| !p.is_folded()).count()
    }

    /// Deal hole cards for the opening round.
    pub fn deal(&mut self) -> Result<(), GameError> {
        self.current_phase
            .deal_hole_cards(&mut self.deck, &mut self.players)
    }

    /// Post the small and big blinds into the opening round.
    pub fn post_blinds(&mut self) -> Result<(), GameError> {
        self.current_phase.post_blinds(&mut self.players, self.blinds)
    }

    /// Wager `amount` for the player on turn.
    pub fn bet(&mut self, amount: Chips) -> Result<(), GameError> {
        self.current_phase.bet(&mut self.players, amount)
    }

    /// Fold the player on turn.
    pub fn fold(&mut self) -> Result<(), GameError> {
        self.current_phase.fold(&mut self.players)
    }

    /// Whether the current round's betting has concluded.
    #[must_use]
    pub fn is_betting_complete(&self) -> bool {
        self.current_phase.is_betting_complete(&self.players)
    }

    /// Close the current round and enter the next phase: resolve the
    /// round's bets into the pot, then deal the entry tranche of community
    /// cards (3 for the flop, 1 each for the turn and river).
    pub fn advance_phase(&mut self) -> Result<PhaseName, GameError> {
        let next_name = self
            .current_phase
            .name()
            .next()
            .ok_or(GameError::HandComplete)?;
        let round = self.current_phase.resolve_bets(&mut self.players)?;
        self.pot.absorb(round);

        let mut next = Phase::following(&self.current_phase, next_name, self.pot.size(), &self.players);
        let tranche = next_name
            .community_target()
            .saturating_sub(next.community().len());
        if tranche > 0 {
            next.deal_community_cards(&mut self.deck, tranche)?;
        }
        debug!(
            "hand {}: entering {next_name} with a ${} pot",
            self.id,
            self.pot.size()
        );
        self.history.push(std::mem::replace(&mut self.current_phase, next));
        Ok(next_name)
    }

    /// Layered settlement of the hand's pot so far, folded players
    /// excluded from eligibility. Resolve the final round first.
    #[must_use]
    pub fn side_pots(&self) -> Vec<SidePot> {
        let folded: HashSet<usize> = self
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_folded())
            .map(|(idx, _)| idx)
            .collect();
        self.pot.side_pots(&folded)
    }
}
