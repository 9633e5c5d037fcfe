//! The most recent finished calculations, newest first.

use std::collections::VecDeque;

use chrono::{DateTime, Local};

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub expression: String,
    pub result: String,
    pub timestamp: DateTime<Local>,
}

#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(History::DEFAULT_LIMIT)
    }
}

impl History {
    pub const DEFAULT_LIMIT: usize = 10;

    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Adds an entry at the front, dropping the oldest beyond the limit.
    pub fn record(&mut self, expression: &str, result: &str) -> &HistoryEntry {
        self.entries.push_front(HistoryEntry {
            expression: expression.to_string(),
            result: result.to_string(),
            timestamp: Local::now(),
        });
        self.entries.truncate(self.limit.max(1));
        &self.entries[0]
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
