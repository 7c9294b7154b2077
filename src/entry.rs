use std::any::type_name;
use std::error::Error;

use log::Level;

/// A log event that was recorded by a spy.
///
/// Entries are created at emission time and never mutated afterwards.
/// The recorded message is the fully rendered message, the way the
/// logging facade would have printed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// The original log level.
    pub level: Level,
    /// The message, formatted with the std formatter.
    pub message: String,
    /// The formatting arguments, rendered in order.
    ///
    /// Empty for calls that arrive pre-rendered through the `log`
    /// facade.
    pub args: Vec<String>,
    /// A copy of the error as it was observed at the time of logging.
    pub error: Option<ErrorSnapshot>,
}

impl LogEntry {
    /// Creates an entry for a rendered message.
    #[must_use]
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            args: Vec::new(),
            error: None,
        }
    }

    /// Attaches the rendered formatting arguments.
    #[must_use]
    pub fn with_args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Attaches a snapshot of an associated error.
    #[must_use]
    pub fn with_error<E: Error + ?Sized>(mut self, error: &E) -> Self {
        self.error = Some(ErrorSnapshot::of(error));
        self
    }
}

/// An owned copy of an error, taken at emission time.
///
/// Snapshots do not borrow the original error, so entries stay `'static`
/// and remain valid after the error itself is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSnapshot {
    /// The type name of the root error.
    pub type_name: String,
    /// The rendered message of the root error.
    pub message: String,
    /// The rendered messages of the `source()` chain, outermost first.
    pub causes: Vec<String>,
}

impl ErrorSnapshot {
    /// Takes a snapshot of an error and its cause chain.
    #[must_use]
    pub fn of<E: Error + ?Sized>(error: &E) -> Self {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        Self {
            type_name: type_name::<E>().to_string(),
            message: error.to_string(),
            causes,
        }
    }
}
