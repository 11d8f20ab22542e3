// src/typeahead.rs
//! Keyboard type-ahead: a buffered letter sequence that expires after one
//! second of inactivity and drives prefix search over the listing rows.

use std::time::{Duration, Instant};

use crate::listing::Row;

/// Inactivity window after which the buffered sequence is dropped.
pub const SEQUENCE_TIMEOUT: Duration = Duration::from_millis(1000);

/// Two states: idle (empty buffer) and matching (non-empty buffer with a
/// pending expiry deadline).
#[derive(Debug, Default)]
pub struct TypeAhead {
    buffer: String,
    deadline: Option<Instant>,
}

impl TypeAhead {
    pub fn is_matching(&self) -> bool {
        !self.buffer.is_empty()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Append a character and restart the expiry window.
    pub fn push(&mut self, c: char, now: Instant) -> &str {
        self.buffer.extend(c.to_lowercase());
        self.deadline = Some(now + SEQUENCE_TIMEOUT);
        &self.buffer
    }

    /// Enter or a resolved selection clears the sequence immediately.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.deadline = None;
    }

    /// Drop the sequence once the deadline has passed. Returns true when an
    /// expiry actually happened.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(d) if now >= d => {
                self.clear();
                true
            }
            _ => false,
        }
    }
}

/// Find the first row whose name starts with `prefix`, case-insensitive,
/// scanning from the row after `start` and wrapping. Subdirectory rows
/// match on their bare name, placeholder rows never match.
pub fn find_prefix_match(rows: &[Row], start: Option<usize>, prefix: &str) -> Option<usize> {
    if rows.is_empty() || prefix.is_empty() {
        return None;
    }
    let from = match start {
        Some(i) => (i + 1) % rows.len(),
        None => 0,
    };
    for off in 0..rows.len() {
        let idx = (from + off) % rows.len();
        if let Some(name) = rows[idx].name() {
            if name.to_lowercase().starts_with(prefix) {
                return Some(idx);
            }
        }
    }
    None
}

/// Number of leading characters of `name` highlighted for a buffered
/// sequence, case-insensitive.
pub fn highlight_len(name: &str, buffer: &str) -> usize {
    name.chars()
        .zip(buffer.chars())
        .take_while(|(n, b)| n.to_lowercase().eq(b.to_lowercase()))
        .count()
}
