use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt, rc::Rc};
use uuid::Uuid;

use super::TableError;
use crate::events::{Notifier, TableEvent};
use crate::game::entities::Player;

/// Positional role a seat holds for the current hand.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Role {
    Dealer,
    SmallBlind,
    BigBlind,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Dealer => "dealer",
            Self::SmallBlind => "small blind",
            Self::BigBlind => "big blind",
        };
        write!(f, "{repr}")
    }
}

/// One chair at a table: occupancy plus the roles assigned for a hand.
///
/// A seat's position is fixed at construction. Roles are only meaningful
/// while the seat is occupied and are fully recomputed on every assignment
/// pass.
#[derive(Debug)]
pub struct Seat {
    id: Uuid,
    position: usize,
    roles: BTreeSet<Role>,
    player: Option<Player>,
    notifier: Rc<Notifier>,
}

impl Seat {
    pub(crate) fn new(position: usize, notifier: Rc<Notifier>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            roles: BTreeSet::new(),
            player: None,
            notifier,
        }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn is_occupied(&self) -> bool {
        self.player.is_some()
    }

    #[must_use]
    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub(crate) fn player_mut(&mut self) -> Option<&mut Player> {
        self.player.as_mut()
    }

    #[must_use]
    pub fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }

    pub fn add_role(&mut self, role: Role) {
        self.roles.insert(role);
    }

    pub fn clear_roles(&mut self) {
        self.roles.clear();
    }

    /// Sit `player` down. The seat must be vacant.
    pub fn occupy(&mut self, player: Player) -> Result<(), TableError> {
        if self.player.is_some() {
            return Err(TableError::SeatAlreadyOccupied {
                position: self.position,
            });
        }
        let player_id = player.id();
        self.player = Some(player);
        self.notifier.emit(&TableEvent::SeatOccupied {
            seat_id: self.id,
            position: self.position,
            player_id,
        });
        Ok(())
    }

    /// Clear the seat, dropping its roles, and hand the player back.
    /// A vacant seat stays vacant and emits nothing.
    pub fn vacate(&mut self) -> Option<Player> {
        let player = self.player.take()?;
        self.roles.clear();
        self.notifier.emit(&TableEvent::SeatVacated {
            seat_id: self.id,
            position: self.position,
        });
        Some(player)
    }
}
