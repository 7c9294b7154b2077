#![warn(missing_docs)]
//!
//! Observing log output in tests, without a real logging backend.
//!
//! Code under test usually logs through the `log` facade and nobody
//! looks at the output. When a test *does* want to assert on it, this
//! crate substitutes a spy for the backend: a test registers interest
//! in a log source, the code under test logs as usual, and the test
//! reads back what was emitted.
//!
//! ```
//! use logspy::{spy_on_logger, LogSpy};
//!
//! let spy = spy_on_logger("app::auth", || {
//!     log::info!(target: "app::auth", "login accepted");
//!     log::warn!(target: "app::auth", "token close to expiry");
//! });
//!
//! assert_eq!(spy.infos(), ["login accepted"]);
//! assert_eq!(spy.warnings(), ["token close to expiry"]);
//! ```
//!
//! # Log sources
//!
//! A spy selects records by their target, either through a literal name
//! or through a type whose canonical name serves as the logger name
//! (see [`SpySource`]). Matching is exact; everything else passes the
//! spy untouched.
//!
//! # The spy logger
//!
//! Capturing works by installing [`SpyLogger`] as the `log` backend.
//! The scoped helpers install a quiet one on first use; install one
//! explicitly via the builder to control what happens to records no
//! spy claims:
//!
//! ```no_run
//! use logspy::SpyLogger;
//!
//! SpyLogger::new()
//!     .add_filters("warn,app::db=trace")
//!     .finish()
//!     .expect("failed to set logger");
//! ```
//!
//! Longer-lived spies can bypass the scoped helpers and work with
//! [`SpyLogger::bind`] and [`SpyLogger::unbind`] directly, or keep a
//! private [`SpyRegistry`] altogether.

mod entry;
mod filter;
mod fmt;
mod logger;
mod recorder;
mod registry;

pub use entry::{ErrorSnapshot, LogEntry};
pub use fmt::LogFormat;
pub use logger::{SpyLogger, TargetPolicy};
pub use recorder::{LogSpy, Recorder, Snapshot};
pub use registry::{SpyRegistry, SpySource};

/// Collects the log events emitted for the type `T` during `block`.
///
/// The spy only sees events from after its creation. Note that `log`
/// macros target the emitting module path by default; code that wants
/// to be spied on by type must log with
/// `target: std::any::type_name::<T>()`.
///
/// # Panics
///
/// Panics if a foreign logging backend is already installed.
pub fn spy_on<T: ?Sized>(block: impl FnOnce()) -> Snapshot {
    spy(SpySource::of::<T>(), block)
}

/// Collects the log events emitted for a logger with a given literal
/// name during `block`.
///
/// The spy only sees events from after its creation.
///
/// # Panics
///
/// Panics if a foreign logging backend is already installed.
pub fn spy_on_logger(name: impl Into<String>, block: impl FnOnce()) -> Snapshot {
    spy(SpySource::literal(name), block)
}

fn spy(source: SpySource, block: impl FnOnce()) -> Snapshot {
    let recorder = SpyLogger::bind(&source)
        .expect("failed to install the spy logger: a foreign logging backend is already set");

    // Unbind on drop, so a panicking block does not leak the binding.
    struct Unbind(SpySource);
    impl Drop for Unbind {
        fn drop(&mut self) {
            SpyLogger::unbind(&self.0);
        }
    }

    let guard = Unbind(source);
    block();
    let snapshot = recorder.snapshot();
    drop(guard);
    snapshot
}
