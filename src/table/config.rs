//! Table configuration models.

use serde::{Deserialize, Serialize};

use super::TableError;
use crate::game::entities::Chips;

/// Table configuration
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TableConfig {
    /// Table name
    pub name: String,

    /// Small blind amount; the big blind is derived as twice this.
    pub small_blind: Chips,

    /// Number of seats, fixed for the table's lifetime.
    pub seat_count: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            name: "Main Table".to_string(),
            small_blind: 50,
            seat_count: 9,
        }
    }
}

impl TableConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), TableError> {
        if self.small_blind == 0 {
            return Err(TableError::InvalidBlind);
        }
        if self.seat_count < 2 {
            return Err(TableError::InvalidSize(self.seat_count));
        }
        Ok(())
    }

    /// Big blind derived from the small blind.
    #[must_use]
    pub fn big_blind(&self) -> Chips {
        2 * self.small_blind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(TableConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_small_blind_is_rejected() {
        let config = TableConfig {
            small_blind: 0,
            ..TableConfig::default()
        };
        assert_eq!(config.validate().unwrap_err(), TableError::InvalidBlind);
    }

    #[test]
    fn test_single_seat_is_rejected() {
        let config = TableConfig {
            seat_count: 1,
            ..TableConfig::default()
        };
        assert_eq!(config.validate().unwrap_err(), TableError::InvalidSize(1));
    }

    #[test]
    fn test_big_blind_is_twice_the_small() {
        let config = TableConfig {
            small_blind: 25,
            ..TableConfig::default()
        };
        assert_eq!(config.big_blind(), 50);
    }
}
