//! Table notifications.
//!
//! Entities do not inherit from a common emitter; a table owns a single
//! [`Notifier`] and shares it with its seats. Subscribers run synchronously
//! on the emitting call's stack, in subscription order.

use serde::{Deserialize, Serialize};
use std::{cell::RefCell, fmt};
use uuid::Uuid;

/// Notification emitted by a table or one of its seats.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum TableEvent {
    /// A player sat down.
    SeatOccupied {
        seat_id: Uuid,
        position: usize,
        player_id: Uuid,
    },
    /// A seat was cleared.
    SeatVacated { seat_id: Uuid, position: usize },
    /// The hand-launch pipeline reached its terminal step and a hand began.
    NewGame {
        table_id: Uuid,
        occupancy: usize,
        players: Vec<Uuid>,
        dealer_position: usize,
    },
}

impl TableEvent {
    /// Notification name, for subscribers that dispatch by kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SeatOccupied { .. } => "seat.occupied",
            Self::SeatVacated { .. } => "seat.vacated",
            Self::NewGame { .. } => "table.newGame",
        }
    }
}

impl fmt::Display for TableEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::SeatOccupied {
                position,
                player_id,
                ..
            } => format!("player {player_id} took seat {position}"),
            Self::SeatVacated { position, .. } => format!("seat {position} vacated"),
            Self::NewGame {
                occupancy,
                dealer_position,
                ..
            } => format!("new hand with {occupancy} players, dealer at {dealer_position}"),
        };
        write!(f, "{repr}")
    }
}

type Subscriber = Box<dyn Fn(&TableEvent)>;

/// Subscribe/emit channel owned by a table and shared with its seats.
///
/// Emission is synchronous and re-entrant within the caller's stack.
/// Subscribers must not subscribe while an emission is in flight.
#[derive(Default)]
pub struct Notifier {
    subscribers: RefCell<Vec<Subscriber>>,
}

impl Notifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, subscriber: impl Fn(&TableEvent) + 'static) {
        self.subscribers.borrow_mut().push(Box::new(subscriber));
    }

    pub fn emit(&self, event: &TableEvent) {
        for subscriber in self.subscribers.borrow().iter() {
            subscriber(event);
        }
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
