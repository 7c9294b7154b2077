use std::fmt::Debug;

use log::Level;
use spin::RwLock;

use crate::entry::{ErrorSnapshot, LogEntry};

/// Read access to recorded log events.
///
/// Implemented by the live [`Recorder`] and by the immutable
/// [`Snapshot`] taken from it. All queries return entries in emission
/// order and can be repeated; without new captures two consecutive
/// calls yield equal results.
pub trait LogSpy {
    /// All recorded entries.
    fn entries(&self) -> Vec<LogEntry>;

    /// All recorded entries with the given level.
    fn entries_at(&self, level: Level) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.level == level)
            .collect()
    }

    /// The messages of all recorded entries with the given level.
    fn messages_at(&self, level: Level) -> Vec<String> {
        self.entries_at(level)
            .into_iter()
            .map(|entry| entry.message)
            .collect()
    }

    /// All messages with the severity error.
    fn errors(&self) -> Vec<String> {
        self.messages_at(Level::Error)
    }

    /// All messages with the severity warning.
    fn warnings(&self) -> Vec<String> {
        self.messages_at(Level::Warn)
    }

    /// All messages with the severity info.
    fn infos(&self) -> Vec<String> {
        self.messages_at(Level::Info)
    }

    /// All messages with the severity debug.
    fn debugs(&self) -> Vec<String> {
        self.messages_at(Level::Debug)
    }

    /// All messages with the severity trace.
    fn traces(&self) -> Vec<String> {
        self.messages_at(Level::Trace)
    }

    /// All recorded error snapshots.
    fn error_snapshots(&self) -> Vec<ErrorSnapshot> {
        self.entries()
            .into_iter()
            .filter_map(|entry| entry.error)
            .collect()
    }
}

/// A collection of all logging activity for one bound log source.
///
/// Append-only while bound. Captures may arrive from multiple emitting
/// threads; each append is atomic, but relative ordering across threads
/// is unspecified.
pub struct Recorder {
    stream: RwLock<Vec<LogEntry>>,
}

impl Recorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stream: RwLock::new(Vec::new()),
        }
    }

    /// Appends an entry to the stream.
    ///
    /// This function never fails and never panics into the caller's
    /// logging path.
    pub fn capture(&self, entry: LogEntry) {
        self.stream.write().push(entry);
    }

    /// Takes an immutable copy of the current stream.
    ///
    /// Entries captured after this call do not appear in the snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            entries: self.stream.read().clone(),
        }
    }

    /// The number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stream.read().len()
    }

    /// Whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stream.read().is_empty()
    }
}

impl LogSpy for Recorder {
    fn entries(&self) -> Vec<LogEntry> {
        self.stream.read().clone()
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Recorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recorder")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

/// An immutable copy of a recorder's stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    entries: Vec<LogEntry>,
}

impl LogSpy for Snapshot {
    fn entries(&self) -> Vec<LogEntry> {
        self.entries.clone()
    }
}
