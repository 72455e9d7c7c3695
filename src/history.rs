//! Event history tracking for debugging and diagnostics.

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::types::BulbAddress;

/// A recorded event in the history.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub kind: String,
    pub address: Option<BulbAddress>,
    /// Seconds since history creation
    pub timestamp: f64,
}

/// Bounded log of the events the dispatcher has handled.
#[derive(Debug, Clone)]
pub struct EventHistory {
    counts: HashMap<String, usize>,
    entries: VecDeque<HistoryEntry>,
    last_error: Option<String>,
    last_event: Option<Instant>,
    start_time: Instant,
    max_entries: usize,
}

impl Default for EventHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHistory {
    pub const DEFAULT_MAX_ENTRIES: usize = 100;

    pub fn new() -> Self {
        Self::with_max_entries(Self::DEFAULT_MAX_ENTRIES)
    }

    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            counts: HashMap::new(),
            entries: VecDeque::new(),
            last_error: None,
            last_event: None,
            start_time: Instant::now(),
            max_entries,
        }
    }

    pub fn record(&mut self, kind: &str, address: Option<&BulbAddress>) {
        *self.counts.entry(kind.to_string()).or_default() += 1;
        self.last_event = Some(Instant::now());

        self.entries.push_back(HistoryEntry {
            kind: kind.to_string(),
            address: address.cloned(),
            timestamp: self.start_time.elapsed().as_secs_f64(),
        });
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    pub fn record_error(&mut self, error: &str) {
        self.last_error = Some(error.to_string());
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn count(&self, kind: &str) -> usize {
        self.counts.get(kind).copied().unwrap_or(0)
    }

    /// Total number of events recorded, including ones evicted from the log.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn time_since_last_event(&self) -> Option<f64> {
        self.last_event.map(|t| t.elapsed().as_secs_f64())
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn summary(&self) -> HistorySummary {
        HistorySummary {
            counts: self.counts.clone(),
            total_entries: self.entries.len(),
            last_error: self.last_error.clone(),
        }
    }
}

/// Summary of event history for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySummary {
    pub counts: HashMap<String, usize>,
    pub total_entries: usize,
    pub last_error: Option<String>,
}
