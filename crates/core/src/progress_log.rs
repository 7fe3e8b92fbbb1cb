// crates/core/src/progress_log.rs
//! Append-only log of human-readable job status lines.
//!
//! Writers append from the job task while any number of readers poll with a
//! cursor. Readers always observe a prefix of the appends, in append order.

use std::sync::RwLock;

use crate::types::ProgressBatch;

/// Process-lifetime progress log shared by the job runner and pollers.
///
/// There is no clear operation: entries live until the owning value is dropped.
#[derive(Debug, Default)]
pub struct ProgressLog {
    entries: RwLock<Vec<String>>,
}

impl ProgressLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line. Never fails; a poisoned lock is recovered.
    pub fn append(&self, text: impl Into<String>) {
        let text = text.into();
        tracing::debug!(message = %text, "progress");
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::error!("RwLock poisoned writing progress log; recovering");
                poisoned.into_inner()
            }
        };
        entries.push(text);
    }

    /// Every entry at or after `cursor`, plus the cursor for the next call.
    ///
    /// A cursor past the end yields an empty batch and is returned unchanged.
    pub fn read_since(&self, cursor: usize) -> ProgressBatch {
        let entries = match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if cursor >= entries.len() {
            return ProgressBatch {
                entries: Vec::new(),
                cursor,
            };
        }
        ProgressBatch {
            entries: entries[cursor..].to_vec(),
            cursor: entries.len(),
        }
    }

    pub fn len(&self) -> usize {
        match self.entries.read() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[test]
    fn test_read_since_zero_on_empty_log() {
        let log = ProgressLog::new();
        let batch = log.read_since(0);
        assert!(batch.entries.is_empty());
        assert_eq!(batch.cursor, 0);
        assert!(log.is_empty());
    }

    #[test]
    fn test_read_since_returns_exactly_new_entries() {
        let log = ProgressLog::new();
        let first = log.read_since(0);

        log.append("one");
        log.append("two");
        log.append("three");

        let batch = log.read_since(first.cursor);
        assert_eq!(batch.entries, vec!["one", "two", "three"]);
        assert_eq!(batch.cursor, 3);

        let again = log.read_since(batch.cursor);
        assert!(again.entries.is_empty());
        assert_eq!(again.cursor, 3);
    }

    #[test]
    fn test_read_since_is_pure() {
        let log = ProgressLog::new();
        log.append("a");
        log.append("b");
        assert_eq!(log.read_since(1), log.read_since(1));
        assert_eq!(log.read_since(1).entries, vec!["b"]);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_cursor_past_end_is_empty() {
        let log = ProgressLog::new();
        log.append("a");
        let batch = log.read_since(10);
        assert!(batch.entries.is_empty());
        assert_eq!(batch.cursor, 10);
    }

    #[test]
    fn test_instances_are_independent() {
        let a = ProgressLog::new();
        let b = ProgressLog::new();
        a.append("only in a");
        assert_eq!(a.len(), 1);
        assert!(b.is_empty());
    }

    #[test]
    fn test_concurrent_reader_sees_ordered_prefix() {
        let log = Arc::new(ProgressLog::new());
        let writer_log = Arc::clone(&log);

        let writer = std::thread::spawn(move || {
            for i in 0..500 {
                writer_log.append(format!("msg {i}"));
            }
        });

        let mut seen = Vec::new();
        let mut cursor = 0;
        while seen.len() < 500 {
            let batch = log.read_since(cursor);
            cursor = batch.cursor;
            seen.extend(batch.entries);
        }
        writer.join().unwrap();

        let expected: Vec<String> = (0..500).map(|i| format!("msg {i}")).collect();
        assert_eq!(seen, expected);
    }
}
