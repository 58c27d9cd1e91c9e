//! The collected line tables and address lookups over them.

use dwarfline_core::DebugLocation;

use super::config::FileAttribution;
use super::line::{LineEntry, LineTable};

/// Every line table produced during ingestion, in decode order.
///
/// Tables are only ever appended; nothing is mutated or removed afterwards.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DebugLineStore {
    tables: Vec<LineTable>,
}

impl DebugLineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append tables in order.
    pub fn extend(&mut self, tables: impl IntoIterator<Item = LineTable>) {
        self.tables.extend(tables);
    }

    pub fn tables(&self) -> &[LineTable] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Total rows across all tables.
    pub fn entry_count(&self) -> usize {
        self.tables.iter().map(|t| t.entries().len()).sum()
    }

    /// The first table (in store order) whose first and last rows bracket
    /// `address`, with the row covering it.
    pub fn find_entry(&self, address: u64) -> Option<(&LineTable, &LineEntry)> {
        self.tables
            .iter()
            .filter(|t| t.brackets(address))
            .find_map(|t| t.floor_entry(address).map(|e| (t, e)))
    }

    /// Resolve `address` to a source location.
    pub fn lookup(&self, address: u64, attribution: FileAttribution) -> Option<DebugLocation> {
        let (table, entry) = self.find_entry(address)?;
        Some(DebugLocation::from_path(
            entry.line,
            table.path_for(entry, attribution),
        ))
    }

    /// Every row address, table by table, duplicates included.
    pub fn executable_addresses(&self) -> Vec<u64> {
        self.tables
            .iter()
            .flat_map(|t| t.entries().iter().map(|e| e.address))
            .collect()
    }

    /// The first file path of each table.
    pub fn source_files(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.primary_path()).collect()
    }
}
