//! Seating and hand-launch orchestration for a card table.
//!
//! This module implements:
//! - [`Seat`]: atomic occupancy and role holder
//! - [`Table`]: a fixed ring of seats, blind amounts, role assignment, and
//!   the event-gated pipeline that launches a new hand on seating changes
//! - [`TableConfig`]: validated construction parameters
//! - [`TableManager`]: a create/find/remove registry over tables
//!
//! A table runs at most one hand at a time. Seating changes go through the
//! table (`occupy_seat`/`vacate_seat`) so every change drives the launch
//! pipeline within the same call stack.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod config;
pub mod manager;
pub mod seat;
pub mod state;

pub use config::TableConfig;
pub use manager::{TableManager, TableSummary};
pub use seat::{Role, Seat};
pub use state::Table;

/// Errors from table configuration and seat operations.
#[derive(Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum TableError {
    #[error("small blind must be greater than zero")]
    InvalidBlind,
    #[error("need at least 2 seats, got {0}")]
    InvalidSize(usize),
    #[error("seat {0} does not exist")]
    InvalidSeatIndex(usize),
    #[error("seat {position} is already occupied")]
    SeatAlreadyOccupied { position: usize },
}
