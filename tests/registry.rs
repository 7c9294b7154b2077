use std::any::type_name;
use std::error::Error;
use std::fmt::{self, Display};
use std::sync::Arc;
use std::thread;

use log::Level;
use logspy::{ErrorSnapshot, LogEntry, LogSpy, Recorder, SpyRegistry, SpySource};

#[test]
fn capture_splits_by_level() {
    let registry = SpyRegistry::new();
    let recorder = registry.bind(&SpySource::literal("X"));

    recorder.capture(LogEntry::new(Level::Info, "a"));
    recorder.capture(LogEntry::new(Level::Warn, "b"));

    assert_eq!(recorder.infos(), ["a"]);
    assert_eq!(recorder.warnings(), ["b"]);
    assert_eq!(recorder.errors(), Vec::<String>::new());
}

#[test]
fn entries_keep_emission_order() {
    let recorder = Recorder::new();
    recorder.capture(LogEntry::new(Level::Info, "first"));
    recorder.capture(LogEntry::new(Level::Error, "second"));
    recorder.capture(LogEntry::new(Level::Info, "third"));

    let messages = recorder
        .entries()
        .into_iter()
        .map(|entry| entry.message)
        .collect::<Vec<_>>();
    assert_eq!(messages, ["first", "second", "third"]);

    // Level filtered views preserve the emission order as well.
    assert_eq!(recorder.infos(), ["first", "third"]);
}

#[test]
fn entries_at_is_idempotent() {
    let recorder = Recorder::new();
    recorder.capture(LogEntry::new(Level::Debug, "probe"));

    let first = recorder.entries_at(Level::Debug);
    let second = recorder.entries_at(Level::Debug);
    assert_eq!(first, second);
}

#[test]
fn rebinding_yields_distinct_recorder() {
    let registry = SpyRegistry::new();
    let source = SpySource::literal("rebound");

    let first = registry.bind(&source);
    let second = registry.bind(&source);

    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn resolve_after_rebind_sees_only_new_entries() {
    let registry = SpyRegistry::new();
    let source = SpySource::literal("rebound");

    let first = registry.bind(&source);
    first.capture(LogEntry::new(Level::Info, "before"));

    let second = registry.bind(&source);
    let resolved = registry.resolve("rebound").expect("binding vanished");
    resolved.capture(LogEntry::new(Level::Info, "after"));

    assert_eq!(first.infos(), ["before"]);
    assert_eq!(second.infos(), ["after"]);
}

#[test]
fn unbind_clears_resolution() {
    let registry = SpyRegistry::new();
    let source = SpySource::literal("transient");

    registry.bind(&source);
    assert!(registry.resolve("transient").is_some());

    registry.unbind(&source);
    assert!(registry.resolve("transient").is_none());
}

#[test]
fn unknown_identifier_resolves_to_nothing() {
    let registry = SpyRegistry::new();
    assert!(registry.resolve("never::bound").is_none());
}

enum Marker {}

#[test]
fn by_type_binding_captures_under_type_name_only() {
    let registry = SpyRegistry::new();
    let recorder = registry.bind(&SpySource::of::<Marker>());

    let resolved = registry
        .resolve(type_name::<Marker>())
        .expect("type binding did not resolve");
    resolved.capture(LogEntry::new(Level::Info, "typed"));

    assert_eq!(recorder.infos(), ["typed"]);
    assert!(registry.resolve("Y").is_none());
}

#[test]
fn snapshot_is_unaffected_by_later_captures() {
    let recorder = Recorder::new();
    recorder.capture(LogEntry::new(Level::Info, "early"));

    let snapshot = recorder.snapshot();
    recorder.capture(LogEntry::new(Level::Info, "late"));

    assert_eq!(snapshot.infos(), ["early"]);
    assert_eq!(recorder.infos(), ["early", "late"]);
}

#[derive(Debug)]
struct ParseFailure;

impl Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unexpected token at line 3")
    }
}

impl Error for ParseFailure {}

#[derive(Debug)]
struct ConfigRejected {
    cause: ParseFailure,
}

impl Display for ConfigRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config rejected")
    }
}

impl Error for ConfigRejected {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.cause)
    }
}

#[test]
fn error_snapshot_keeps_cause_chain() {
    let error = ConfigRejected {
        cause: ParseFailure,
    };
    let snapshot = ErrorSnapshot::of(&error);

    assert!(snapshot.type_name.ends_with("ConfigRejected"));
    assert_eq!(snapshot.message, "config rejected");
    assert_eq!(snapshot.causes, ["unexpected token at line 3"]);
}

#[test]
fn captured_errors_are_queryable() {
    let recorder = Recorder::new();
    recorder.capture(
        LogEntry::new(Level::Error, "loading config failed").with_error(&ConfigRejected {
            cause: ParseFailure,
        }),
    );
    recorder.capture(LogEntry::new(Level::Info, "continuing with defaults"));

    let snapshots = recorder.error_snapshots();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].message, "config rejected");
}

#[test]
fn entry_args_are_recorded() {
    let recorder = Recorder::new();
    recorder.capture(
        LogEntry::new(Level::Info, "this is a test").with_args(["this", "a"]),
    );

    let entries = recorder.entries();
    assert_eq!(entries[0].args, ["this", "a"]);
}

#[test]
fn concurrent_captures_stay_atomic() {
    let recorder = Arc::new(Recorder::new());

    let handles = (0..4)
        .map(|worker| {
            let recorder = Arc::clone(&recorder);
            thread::spawn(move || {
                for seq in 0..250 {
                    recorder.capture(LogEntry::new(
                        Level::Info,
                        format!("worker-{worker}-seq-{seq}"),
                    ));
                }
            })
        })
        .collect::<Vec<_>>();

    for handle in handles {
        handle.join().expect("capture worker panicked");
    }

    assert_eq!(recorder.len(), 1000);

    // No entry was torn, and each worker's own captures stay ordered.
    let mut next_seq = [0usize; 4];
    for message in recorder.infos() {
        let rest = message
            .strip_prefix("worker-")
            .expect("interleaved capture detected");
        let (worker, seq) = rest.split_once("-seq-").expect("interleaved capture detected");
        let worker = worker.parse::<usize>().expect("damaged worker id");
        let seq = seq.parse::<usize>().expect("damaged sequence number");

        assert_eq!(seq, next_seq[worker]);
        next_seq[worker] += 1;
    }
    assert_eq!(next_seq, [250; 4]);
}
