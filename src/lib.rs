//! # Card Table
//!
//! A turn-based card-table engine: seat occupancy, dealer/blind role
//! rotation, an event-gated pipeline that launches a new hand whenever
//! seating changes, and a round-by-round betting state machine.
//!
//! Everything runs single-threaded and synchronously; seat notifications
//! and the hand-launch pipeline execute on the caller's stack.
//!
//! ## Architecture
//!
//! Components, leaf to root:
//!
//! - **Seat**: atomic occupancy and role holder
//! - **Pipeline**: ordered, abortable step-runner gating the hand launch
//! - **Table**: a fixed ring of seats and blind amounts; assigns roles and
//!   decides whether a seating change starts a hand
//! - **Phase**: one betting round (pre-flop, flop, turn, river, showdown)
//!   with its board, round pot, and turn pointer
//! - **Game**: the per-hand machine owning the deck and the ordered player
//!   list
//!
//! ## Example
//!
//! ```
//! use card_table::{Player, Table, TableConfig};
//!
//! let mut table = Table::new(TableConfig {
//!     name: "cash game".to_string(),
//!     small_blind: 5,
//!     seat_count: 6,
//! })
//! .unwrap();
//!
//! // Seating the second player launches a hand automatically.
//! table.occupy_seat(0, Player::new("alice", 200)).unwrap();
//! table.occupy_seat(1, Player::new("bob", 200)).unwrap();
//! assert!(table.game_in_progress());
//!
//! let game = table.current_game_mut().unwrap();
//! game.deal().unwrap();
//! game.post_blinds().unwrap();
//! ```

/// Table and seat notifications.
pub mod events;
pub use events::{Notifier, TableEvent};

/// Per-hand game engine: entities, betting rounds, and the hand machine.
pub mod game;
pub use game::{
    Game, GameError,
    entities::{Blinds, Card, Chips, Deck, Player, Pot, SidePot, Suit},
    phase::{HandPositions, Phase, PhaseName},
};

/// Ordered, abortable step pipelines.
pub mod pipeline;
pub use pipeline::{Pipeline, PipelineRun, RunOutcome, StepOutcome};

/// Seating, role assignment, and table lifecycle.
pub mod table;
pub use table::{Role, Seat, Table, TableConfig, TableError, TableManager, TableSummary};
