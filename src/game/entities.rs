use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::{
    collections::{HashMap, HashSet},
    fmt,
};
use uuid::Uuid;

use super::GameError;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Club,
    Spade,
    Diamond,
    Heart,
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Club => "♣",
            Self::Spade => "♠",
            Self::Diamond => "♦",
            Self::Heart => "♥",
        };
        write!(f, "{repr}")
    }
}

/// Placeholder for card values (2..=10, J=11, Q=12, K=13, A=14).
pub type Value = u8;

/// A card is a tuple of a uInt8 value and a suit.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card(pub Value, pub Suit);

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let value = match self.0 {
            14 => "A",
            11 => "J",
            12 => "Q",
            13 => "K",
            v => &v.to_string(),
        };
        let repr = format!("{value}/{}", self.1);
        write!(f, "{repr:>4}")
    }
}

/// Type alias for whole chips. All bets and player stacks are whole chips;
/// a negative stack is unrepresentable.
pub type Chips = u32;

/// A drawable sequence of cards. Drawing from an exhausted deck yields
/// `None` rather than an error; short deals are reported by the callers
/// that know how many cards they wanted.
#[derive(Clone, Debug)]
pub struct Deck {
    cards: Vec<Card>,
    next_idx: usize,
}

impl Deck {
    /// The full 52-card deck in construction order.
    #[must_use]
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(52);
        for value in 2u8..=14 {
            for suit in [Suit::Club, Suit::Spade, Suit::Diamond, Suit::Heart] {
                cards.push(Card(value, suit));
            }
        }
        Self { cards, next_idx: 0 }
    }

    /// A freshly shuffled 52-card deck.
    #[must_use]
    pub fn shuffled() -> Self {
        let mut deck = Self::standard();
        deck.shuffle();
        deck
    }

    /// Reshuffle the whole deck and start drawing from the top again.
    pub fn shuffle(&mut self) {
        self.cards.shuffle(&mut rand::rng());
        self.next_idx = 0;
    }

    pub fn draw(&mut self) -> Option<Card> {
        let card = self.cards.get(self.next_idx).copied()?;
        self.next_idx += 1;
        Some(card)
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.cards.len() - self.next_idx
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::standard()
    }
}

/// A stacked deck drawn front to back, for deterministic play.
impl From<Vec<Card>> for Deck {
    fn from(cards: Vec<Card>) -> Self {
        Self { cards, next_idx: 0 }
    }
}

/// Small and big blind amounts. The big blind is always derived as twice
/// the small blind.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Blinds {
    pub small: Chips,
    pub big: Chips,
}

impl Blinds {
    #[must_use]
    pub fn from_small(small: Chips) -> Self {
        Self {
            small,
            big: 2 * small,
        }
    }
}

impl fmt::Display for Blinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = format!("${}/{}", self.small, self.big);
        write!(f, "{repr}")
    }
}

/// A participant in a hand.
///
/// Players are plain owned values: a table's seats hold the canonical
/// players, and a game works on per-hand clones whose chip stacks the table
/// writes back when the hand finishes.
#[derive(Clone, Debug)]
pub struct Player {
    id: Uuid,
    name: String,
    chips: Chips,
    hand: Vec<Card>,
    folded: bool,
    bet_matched: bool,
}

impl Player {
    #[must_use]
    pub fn new(name: impl Into<String>, chips: Chips) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            chips,
            hand: Vec::with_capacity(2),
            folded: false,
            bet_matched: false,
        }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn chips(&self) -> Chips {
        self.chips
    }

    pub fn set_chips(&mut self, chips: Chips) {
        self.chips = chips;
    }

    /// Remove `amount` from the stack. The stack is unchanged on failure.
    pub fn bet(&mut self, amount: Chips) -> Result<(), GameError> {
        if amount > self.chips {
            return Err(GameError::InsufficientChips {
                amount,
                chips: self.chips,
            });
        }
        self.chips -= amount;
        Ok(())
    }

    #[must_use]
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn add_to_hand(&mut self, card: Card) {
        self.hand.push(card);
    }

    #[must_use]
    pub fn is_folded(&self) -> bool {
        self.folded
    }

    pub fn set_folded(&mut self, folded: bool) {
        self.folded = folded;
    }

    #[must_use]
    pub fn is_bet_matched(&self) -> bool {
        self.bet_matched
    }

    pub fn set_bet_matched(&mut self, matched: bool) {
        self.bet_matched = matched;
    }

    /// Clear per-hand state. The chip stack carries over.
    pub fn reset_for_new_hand(&mut self) {
        self.hand.clear();
        self.folded = false;
        self.bet_matched = false;
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (${})", self.name, self.chips)
    }
}

/// One layer of a settled pot and the players eligible to win it.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SidePot {
    pub amount: Chips,
    /// Player indices, ascending.
    pub eligible: Vec<usize>,
}

/// Chips wagered, tracked per player index within the hand's player list.
#[derive(Clone, Debug, Default)]
pub struct Pot {
    investments: HashMap<usize, Chips>,
}

impl Pot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, player_idx: usize, amount: Chips) {
        let investment = self.investments.entry(player_idx).or_default();
        *investment += amount;
    }

    /// Highest investment so far; the amount to match to stay in.
    #[must_use]
    pub fn call_amount(&self) -> Chips {
        *self.investments.values().max().unwrap_or(&0)
    }

    /// The amount the player has put in.
    #[must_use]
    pub fn investment(&self, player_idx: usize) -> Chips {
        *self.investments.get(&player_idx).unwrap_or(&0)
    }

    #[must_use]
    pub fn size(&self) -> Chips {
        self.investments.values().sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Fold another pot's investments into this one.
    pub fn absorb(&mut self, other: Pot) {
        for (player_idx, amount) in other.investments {
            self.add(player_idx, amount);
        }
    }

    /// Layered settlement of the pot.
    ///
    /// Each distinct non-folded investment level caps one layer: every
    /// investor contributes up to the cap, and the non-folded players who
    /// reached the cap are eligible for that layer. Folded players
    /// contribute to the layers but are never eligible; an uncalled
    /// overage forms a final layer owed to its sole investor. The layer
    /// amounts always sum to the pot size.
    #[must_use]
    pub fn side_pots(&self, folded: &HashSet<usize>) -> Vec<SidePot> {
        let mut caps: Vec<Chips> = self
            .investments
            .iter()
            .filter(|&(player_idx, _)| !folded.contains(player_idx))
            .map(|(_, &amount)| amount)
            .collect();
        caps.sort_unstable();
        caps.dedup();

        let mut pots: Vec<SidePot> = Vec::with_capacity(caps.len());
        let mut prev = 0;
        for cap in caps {
            let amount = self
                .investments
                .values()
                .map(|&inv| inv.min(cap).saturating_sub(prev))
                .sum();
            let mut eligible: Vec<usize> = self
                .investments
                .iter()
                .filter(|&(player_idx, &inv)| !folded.contains(player_idx) && inv >= cap)
                .map(|(&player_idx, _)| player_idx)
                .collect();
            eligible.sort_unstable();
            if amount > 0 {
                pots.push(SidePot { amount, eligible });
            }
            prev = cap;
        }

        // Contributions above every non-folded cap are dead money; they
        // land in the last layer so nothing leaks from the pot.
        let collected: Chips = pots.iter().map(|pot| pot.amount).sum();
        let remainder = self.size() - collected;
        if remainder > 0 {
            match pots.last_mut() {
                Some(last) => last.amount += remainder,
                None => pots.push(SidePot {
                    amount: remainder,
                    eligible: Vec::new(),
                }),
            }
        }
        pots
    }
}
