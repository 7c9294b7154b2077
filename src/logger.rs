use std::fmt::Debug;
use std::sync::Arc;

use log::{Level, LevelFilter, Log, SetLoggerError};
use spin::RwLock;
use termcolor::{BufferWriter, ColorChoice};

use crate::entry::LogEntry;
use crate::filter::TargetFilters;
use crate::fmt::LogFormat;
use crate::recorder::Recorder;
use crate::registry::{SpyRegistry, SpySource};

static SPY_LOGGER: SpyLoggerWrap = SpyLoggerWrap::uninitialized();

struct SpyLoggerWrap {
    inner: RwLock<Option<SpyLogger>>,
}

impl SpyLoggerWrap {
    const fn uninitialized() -> Self {
        Self {
            inner: RwLock::new(None),
        }
    }

    fn is_set(&self) -> bool {
        self.inner.read().is_some()
    }

    fn reset(&self) {
        self.inner.write().take();
    }

    fn reset_contents(&self, mut new: SpyLogger) {
        let mut lock = self.inner.write();
        if let Some(current) = lock.as_mut() {
            if current.active {
                // Keep the shared registry so that bindings handed out
                // before the reinstall stay resolvable.
                new.registry = Arc::clone(&current.registry);
                *current = new;
            }
        }
    }

    fn set(&self, other: SpyLogger) -> Option<SpyLogger> {
        self.inner.write().replace(other)
    }

    fn registry(&self) -> Option<Arc<SpyRegistry>> {
        self.inner
            .read()
            .as_ref()
            .map(|logger| Arc::clone(&logger.registry))
    }
}

impl Log for SpyLoggerWrap {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        let lock = self.inner.read();
        lock.as_ref().map_or(false, |inner| inner.enabled(metadata))
    }

    fn log(&self, record: &log::Record) {
        let lock = self.inner.read();
        if let Some(inner) = lock.as_ref() {
            inner.log(record);
        }
    }

    fn flush(&self) {}
}

/// A policy deciding per target whether unspied records are forwarded.
pub type TargetPolicy = dyn Fn(&str) -> bool + Send + Sync;

/// A `log` backend that routes emitted calls to active spies.
///
/// On every emitted call the record's target is resolved against the
/// carried [`SpyRegistry`]; a hit captures the rendered message into the
/// bound [`Recorder`], a miss optionally forwards the record to stdout
/// or stderr. Forwarding honors `RUST_LOG` style per-target filters;
/// captured entries are never filtered.
pub struct SpyLogger {
    active: bool,
    registry: Arc<SpyRegistry>,

    stdout_policy: Box<TargetPolicy>,
    stderr_policy: Box<TargetPolicy>,

    filters: TargetFilters,
    format: LogFormat,
}

impl SpyLogger {
    /// Creates a new logger (builder) that forwards unspied records.
    #[must_use]
    pub fn new() -> Self {
        Self {
            active: true,
            registry: Arc::new(SpyRegistry::new()),

            stdout_policy: Box::new(|_| true),
            stderr_policy: Box::new(|_| true),

            filters: TargetFilters::from_env(),
            format: LogFormat::Color,
        }
    }

    /// A logger that does not forward unspied records to stdout or
    /// stderr.
    #[must_use]
    pub fn quiet() -> Self {
        Self {
            active: true,
            registry: Arc::new(SpyRegistry::new()),

            stdout_policy: Box::new(|_| false),
            stderr_policy: Box::new(|_| false),

            filters: TargetFilters::from_env(),
            format: LogFormat::Color,
        }
    }

    /// Sets the loggers activity status.
    #[must_use]
    pub fn active(mut self, is_active: bool) -> Self {
        self.active = is_active;
        self
    }

    /// Set the policy that dictates whether to forward records to
    /// stdout.
    #[must_use]
    pub fn stdout_policy(mut self, predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.stdout_policy = Box::new(predicate);
        self
    }

    /// Set the policy that dictates whether to forward records to
    /// stderr.
    #[must_use]
    pub fn stderr_policy(mut self, predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.stderr_policy = Box::new(predicate);
        self
    }

    /// Adds filter directives for the forwarding path.
    #[must_use]
    pub fn add_filters(mut self, s: &str) -> Self {
        self.filters.parse_str(s);
        self
    }

    /// Sets the output format for forwarded records.
    #[must_use]
    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Uses a caller-owned registry instead of a fresh one.
    ///
    /// Test contexts that keep their own registry can share it with the
    /// installed logger this way.
    #[must_use]
    pub fn registry(mut self, registry: Arc<SpyRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Connects the logger to the logging facade.
    ///
    /// # Errors
    ///
    /// This will fail if another logger is already set that is not of
    /// this type. If the other logger is of this type, its
    /// configuration is replaced while active bindings stay resolvable.
    ///
    /// # Panics
    ///
    /// Panics if somebody steals the logger from the static registry
    /// in a race condition.
    pub fn finish(self) -> Result<(), SetLoggerError> {
        let old = SPY_LOGGER.set(self);
        match log::set_logger(&SPY_LOGGER).map(|()| log::set_max_level(LevelFilter::Trace)) {
            Ok(()) => Ok(()),
            Err(e) => {
                // Since a logger was already set it is either the spy
                // logger itself or a foreign backend.
                if let Some(v) = old {
                    // Old was a spy logger, so keep it and swap in the
                    // recently built contents.
                    let recently_created = SPY_LOGGER.set(v);
                    SPY_LOGGER.reset_contents(recently_created.expect("Logger was stolen"));
                    Ok(())
                } else {
                    SPY_LOGGER.reset();
                    Err(e)
                }
            }
        }
    }

    /// Binds a fresh recorder for a log source at the installed logger,
    /// installing a quiet default logger if none is installed yet.
    ///
    /// # Errors
    ///
    /// Fails if a foreign logging backend is already installed.
    ///
    /// # Panics
    ///
    /// Panics if somebody steals the logger from the static registry
    /// in a race condition.
    pub fn bind(source: &SpySource) -> Result<Arc<Recorder>, SetLoggerError> {
        Self::ensure_installed()?;
        let registry = SPY_LOGGER.registry().expect("Logger was stolen");
        Ok(registry.bind(source))
    }

    /// Removes the binding for a log source at the installed logger.
    ///
    /// A no-op if no spy logger is installed.
    pub fn unbind(source: &SpySource) {
        if let Some(registry) = SPY_LOGGER.registry() {
            registry.unbind(source);
        }
    }

    fn ensure_installed() -> Result<(), SetLoggerError> {
        if SPY_LOGGER.is_set() {
            return Ok(());
        }
        Self::quiet().finish()
    }
}

impl Default for SpyLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for SpyLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpyLogger")
            .field("active", &self.active)
            .field("registry", &self.registry)
            .field("filters", &self.filters)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

impl Log for SpyLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.active && metadata.level() <= log::STATIC_MAX_LEVEL
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let target = record.metadata().target();

        // An active spy intercepts the record; capturing must never
        // fail back into the logging call site.
        if let Some(recorder) = self.registry.resolve(target) {
            recorder.capture(LogEntry::new(record.level(), record.args().to_string()));
            return;
        }

        // Not spied on, forward per policy.
        let policy = match record.level() {
            Level::Error | Level::Warn => &self.stderr_policy,
            _ => &self.stdout_policy,
        };
        if !policy(target) {
            return;
        }
        if record.level() > self.filters.level_for(target) {
            return;
        }

        let choice = match self.format {
            LogFormat::Color => ColorChoice::Always,
            LogFormat::NoColor => ColorChoice::Never,
        };
        let out = match record.level() {
            Level::Error | Level::Warn => BufferWriter::stderr(choice),
            _ => BufferWriter::stdout(choice),
        };

        let mut buffer = out.buffer();
        let msg = format!("{}", record.args());
        if self.format.fmt(target, record.level(), &msg, &mut buffer).is_ok() {
            let _ = out.print(&buffer);
        }
    }

    fn flush(&self) {}
}
