//! The extraction result table.
//!
//! Sample identifiers map to per-parameter records. Both levels preserve
//! insertion order so repeated runs over the same grid serialize
//! identically; re-inserting an existing key replaces the value in place
//! (last-write-wins, first-seen position).

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// One sample's extracted values, keyed by parameter or group name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    entries: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Record {
        Record::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The full result of one aggregation pass: sample identifier → record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    rows: Vec<(String, Record)>,
}

impl ResultTable {
    pub fn new() -> ResultTable {
        ResultTable::default()
    }

    /// Insert a sample's record. A later sample with the same identifier
    /// overwrites the earlier record entirely; there is no merge.
    pub fn insert(&mut self, sample_id: impl Into<String>, record: Record) {
        let sample_id = sample_id.into();
        match self.rows.iter_mut().find(|(id, _)| *id == sample_id) {
            Some(row) => row.1 = record,
            None => self.rows.push((sample_id, record)),
        }
    }

    pub fn get(&self, sample_id: &str) -> Option<&Record> {
        self.rows
            .iter()
            .find(|(id, _)| id == sample_id)
            .map(|(_, record)| record)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Record)> {
        self.rows.iter().map(|(id, record)| (id.as_str(), record))
    }

    pub fn sample_ids(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|(id, _)| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for ResultTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.rows.len()))?;
        for (id, record) in &self.rows {
            map.serialize_entry(id, record)?;
        }
        map.end()
    }
}
