//! Core data types: items, head-to-head records and round history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Stable identifier of a catalog item
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Head-to-head record accumulated during the final phase only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadToHead {
    /// One win per beaten opponent
    pub wins: u32,
    /// One loss per round lost
    pub losses: u32,
    /// Rounds participated in
    pub matches: u32,
    /// Rounds won
    pub score: u32,
}

impl HeadToHead {
    /// Wins over decided pairings, 0.0 when nothing has been decided yet
    pub fn win_rate(&self) -> f64 {
        let decided = self.wins + self.losses;
        if decided == 0 {
            return 0.0;
        }
        self.wins as f64 / decided as f64
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A catalog entry together with its tournament state.
///
/// Display fields (title, album, provider ids, ...) are carried verbatim and
/// never interpreted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// Opaque display fields from the catalog
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    /// Cumulative wins during discovery and elimination
    #[serde(default)]
    pub score: u32,
    /// Number of rounds this item has been shown in
    #[serde(default)]
    pub appearances: u32,
    #[serde(default)]
    pub eliminated: bool,
    #[serde(default)]
    pub h2h: HeadToHead,
    /// Appearances since the current phase began
    #[serde(skip)]
    pub(crate) phase_appearances: u32,
}

impl Item {
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
            score: 0,
            appearances: 0,
            eliminated: false,
            h2h: HeadToHead::default(),
            phase_appearances: 0,
        }
    }

    /// Attach a display field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Look up a display field as a string
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Human-readable name: the `title` field when present, otherwise the id
    pub fn display_name(&self) -> &str {
        self.field_str("title").unwrap_or(self.id.as_str())
    }

    pub fn is_active(&self) -> bool {
        !self.eliminated
    }

    /// Appearances counted since the current phase started
    pub fn phase_appearances(&self) -> u32 {
        self.phase_appearances
    }

    /// Same catalog entry with all tournament state cleared
    pub fn fresh(&self) -> Self {
        Self {
            id: self.id.clone(),
            fields: self.fields.clone(),
            ..Self::new(self.id.clone())
        }
    }

    /// Record one inclusion in a round's candidate set
    pub(crate) fn record_appearance(&mut self) {
        self.appearances += 1;
        self.phase_appearances += 1;
    }
}

/// One completed round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// 1-based round number
    pub round: usize,
    /// Candidates exactly as presented, in slot order
    pub candidates: Vec<ItemId>,
    pub winner: ItemId,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn contains(&self, id: &ItemId) -> bool {
        self.candidates.contains(id)
    }
}
