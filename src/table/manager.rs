//! Registry of active tables.

use log::info;
use std::collections::HashMap;
use uuid::Uuid;

use super::TableError;
use super::config::TableConfig;
use super::state::Table;
use crate::game::entities::Blinds;

/// Table metadata for discovery
#[derive(Clone, Debug)]
pub struct TableSummary {
    pub id: Uuid,
    pub name: String,
    pub occupied_seats: usize,
    pub seat_count: usize,
    pub blinds: Blinds,
    pub game_in_progress: bool,
}

/// Create/find/remove registry over table instances.
#[derive(Debug, Default)]
pub struct TableManager {
    tables: HashMap<Uuid, Table>,
}

impl TableManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table and register it under its id.
    pub fn create_table(&mut self, config: TableConfig) -> Result<Uuid, TableError> {
        let table = Table::new(config)?;
        let id = table.id();
        info!("created table {id} ({})", table.name());
        self.tables.insert(id, table);
        Ok(id)
    }

    #[must_use]
    pub fn get_table(&self, id: &Uuid) -> Option<&Table> {
        self.tables.get(id)
    }

    pub fn get_table_mut(&mut self, id: &Uuid) -> Option<&mut Table> {
        self.tables.get_mut(id)
    }

    /// Drop a table from the registry, returning it if it existed.
    pub fn remove_table(&mut self, id: &Uuid) -> Option<Table> {
        let table = self.tables.remove(id);
        if table.is_some() {
            info!("removed table {id}");
        }
        table
    }

    /// Metadata for every registered table, sorted by name.
    #[must_use]
    pub fn list_tables(&self) -> Vec<TableSummary> {
        let mut summaries: Vec<TableSummary> = self
            .tables
            .values()
            .map(|table| TableSummary {
                id: table.id(),
                name: table.name().to_string(),
                occupied_seats: table.occupied_count(),
                seat_count: table.seats().len(),
                blinds: table.blinds(),
                game_in_progress: table.game_in_progress(),
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }

    #[must_use]
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}
