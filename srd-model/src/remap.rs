//! Address translation for plugins that were merged into others.

use crate::ModelResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Translates a `(plugin, local ID)` address into the address the host
/// actually uses.
///
/// Implementations return the input unchanged for addresses they do not know.
pub trait FormRemapper {
    fn remap(&self, file: &str, local_id: u32) -> (String, u32);
}

/// One translation as stored in a remap file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemapEntry {
    pub file: String,
    pub local_id: u32,
    pub to_file: String,
    pub to_local_id: u32,
}

/// Table-backed [`FormRemapper`]. Plugin names match case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct RemapTable {
    entries: HashMap<(String, u32), (String, u32)>,
}

impl RemapTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: RemapEntry) {
        self.entries.insert(
            (entry.file.to_ascii_lowercase(), entry.local_id),
            (entry.to_file, entry.to_local_id),
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses a JSON array of [`RemapEntry`].
    pub fn from_json_str(json: &str) -> ModelResult<Self> {
        let entries: Vec<RemapEntry> = serde_json::from_str(json)?;
        Ok(entries.into_iter().collect())
    }

    /// Reads a JSON remap file.
    pub fn load(path: &Path) -> ModelResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

impl FromIterator<RemapEntry> for RemapTable {
    fn from_iter<I: IntoIterator<Item = RemapEntry>>(iter: I) -> Self {
        let mut table = Self::new();
        for entry in iter {
            table.insert(entry);
        }
        table
    }
}

impl FormRemapper for RemapTable {
    fn remap(&self, file: &str, local_id: u32) -> (String, u32) {
        match self.entries.get(&(file.to_ascii_lowercase(), local_id)) {
            Some((to_file, to_local_id)) => (to_file.clone(), *to_local_id),
            None => (file.to_string(), local_id),
        }
    }
}
