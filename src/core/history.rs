//! Command history with up/down navigation.

use crate::config::MAX_COMMAND_HISTORY;
use crate::utils::RingBuffer;

/// Past command lines plus a navigation cursor.
///
/// The cursor ranges over `0..=len`; `len` means "past the newest entry",
/// which is a fresh empty prompt.
#[derive(Clone, Debug)]
pub struct CommandHistory {
    entries: RingBuffer<String>,
    cursor: usize,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::with_capacity(MAX_COMMAND_HISTORY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RingBuffer::new(capacity),
            cursor: 0,
        }
    }

    /// Record a submitted line and reset the cursor to a fresh prompt.
    ///
    /// Blank lines and repeats of the newest entry are skipped.
    pub fn push(&mut self, line: &str) {
        if !line.trim().is_empty() && self.entries.last().map(String::as_str) != Some(line) {
            self.entries.push(line.to_string());
        }
        self.cursor = self.entries.len();
    }

    /// Step back to the previous entry (stops at the oldest).
    pub fn prev_entry(&mut self) -> &str {
        self.cursor = self.cursor.saturating_sub(1);
        self.current()
    }

    /// Step forward; one past the newest yields an empty string.
    pub fn next_entry(&mut self) -> &str {
        self.cursor = (self.cursor + 1).min(self.entries.len());
        self.current()
    }

    fn current(&self) -> &str {
        self.entries.get(self.cursor).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new()
    }
}
