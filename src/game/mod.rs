//! Per-hand game engine.
//!
//! This module provides the hand-level machinery:
//! - Entities: cards, the deck, chips, blinds, players, and pots
//! - [`Phase`]: one betting round and its turn pointer
//! - [`Game`]: the per-hand machine that owns the deck and player list
//!
//! A [`Game`] is created by a table's hand-launch pipeline and discarded
//! when the hand ends; only chip stacks outlive it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod entities;
pub mod phase;
pub mod state_machine;

pub use entities::{Blinds, Card, Chips, Deck, Player, Pot, SidePot, Suit, Value};
pub use phase::{HandPositions, Phase, PhaseName};
pub use state_machine::Game;

/// Errors that can occur while running a hand.
#[derive(Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum GameError {
    #[error("need 2+ players")]
    NotEnoughPlayers,
    #[error("position index out of bounds")]
    InvalidPosition,
    #[error("bet of ${amount} exceeds stack of ${chips}")]
    InsufficientChips { amount: Chips, chips: Chips },
    #[error("deck ran out: wanted {requested} cards, dealt {dealt}")]
    ShortDeck { requested: usize, dealt: usize },
    #[error("hole cards are dealt once, before the flop")]
    HoleDealOutOfPhase,
    #[error("community cards cannot be dealt during the {0}")]
    CommunityDealOutOfPhase(PhaseName),
    #[error("community cards for the {0} are already dealt")]
    CommunityAlreadyDealt(PhaseName),
    #[error("blinds are posted before any pre-flop betting")]
    BlindsOutOfPhase,
    #[error("round bets are not matched")]
    UnmatchedBets,
    #[error("the hand is already at showdown")]
    HandComplete,
}
