//! Session counters and the bounded display log: newest batch in front → truncate to window.

use crate::transactions::ScoredTransaction;
use serde::Serialize;
use std::collections::VecDeque;

/// Cumulative totals for the lifetime of the owning feed. Never decremented;
/// eviction from the display log does not touch them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RunningCounters {
    pub checked: u64,
    pub blocked: u64,
    /// Sum of blocked amounts.
    pub saved: f64,
}

impl RunningCounters {
    pub fn apply_batch(&mut self, batch: &[ScoredTransaction]) {
        self.checked += batch.len() as u64;
        for tx in batch.iter().filter(|t| t.is_blocked()) {
            self.blocked += 1;
            self.saved += tx.amount;
        }
    }

    /// Percent passed; 100 before anything was checked.
    pub fn pass_rate(&self) -> f64 {
        if self.checked == 0 {
            100.0
        } else {
            (self.checked - self.blocked) as f64 / self.checked as f64 * 100.0
        }
    }
}

/// A transaction in the display log with the sequence number of the request that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub seq: u64,
    #[serde(flatten)]
    pub transaction: ScoredTransaction,
}

#[derive(Debug, Clone)]
pub struct TransactionLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl TransactionLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Put `batch` in front, keeping its internal order, then evict the oldest past capacity.
    pub fn prepend_batch(&mut self, seq: u64, batch: Vec<ScoredTransaction>) {
        for transaction in batch.into_iter().rev() {
            self.entries.push_front(LogEntry { seq, transaction });
        }
        self.entries.truncate(self.capacity);
    }

    /// Newest first, in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Newest first by request sequence rather than arrival. Undoes out-of-order
    /// completions without changing the stored order.
    pub fn by_sequence(&self) -> Vec<&LogEntry> {
        let mut v: Vec<&LogEntry> = self.entries.iter().collect();
        v.sort_by(|a, b| b.seq.cmp(&a.seq));
        v
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
