use std::any::type_name;
use std::fmt::{self, Debug, Display};
use std::sync::Arc;

use fxhash::FxHashMap;
use spin::RwLock;

use crate::recorder::Recorder;

/// Selects which emitted log calls a spy captures.
///
/// A source is either a literal logger name or a type, resolved via the
/// type's canonical name. Resolution is by exact string match; no
/// pattern or hierarchical matching exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SpySource {
    /// A log source addressed by an exact literal name.
    Literal(String),
    /// A log source addressed by a type's canonical name.
    Type(&'static str),
}

impl SpySource {
    /// Creates a source for a logger with a given literal name.
    pub fn literal(name: impl Into<String>) -> Self {
        Self::Literal(name.into())
    }

    /// Creates a source for a logger named after the type `T`.
    #[must_use]
    pub fn of<T: ?Sized>() -> Self {
        Self::Type(type_name::<T>())
    }

    /// The name this source resolves to.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Literal(name) => name,
            Self::Type(name) => name,
        }
    }
}

impl Display for SpySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps log-source identifiers to their active recorders.
///
/// At most one recorder is active per identifier; binding an identifier
/// that already has a recorder silently replaces it. The registry is an
/// explicit value rather than process-wide state, so test contexts can
/// each own one. [`SpyLogger`](crate::SpyLogger) carries a shared
/// registry for calls arriving through the `log` facade.
pub struct SpyRegistry {
    bindings: RwLock<FxHashMap<String, Arc<Recorder>>>,
}

impl SpyRegistry {
    /// Creates a registry with no active bindings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bindings: RwLock::new(FxHashMap::default()),
        }
    }

    /// Binds a fresh recorder to an identifier.
    ///
    /// Any prior binding for the identifier is replaced; the previous
    /// recorder stays readable through handles that were already handed
    /// out, but receives no further entries.
    pub fn bind(&self, source: &SpySource) -> Arc<Recorder> {
        let recorder = Arc::new(Recorder::new());
        self.bindings
            .write()
            .insert(source.name().to_string(), Arc::clone(&recorder));
        recorder
    }

    /// Removes the binding for an identifier, if one is active.
    pub fn unbind(&self, source: &SpySource) {
        self.bindings.write().remove(source.name());
    }

    /// Looks up the active recorder for an emitted call's target.
    ///
    /// An unknown identifier is not an error; it means no spy is
    /// active and the call is not captured.
    #[must_use]
    pub fn resolve(&self, target: &str) -> Option<Arc<Recorder>> {
        self.bindings.read().get(target).cloned()
    }
}

impl Default for SpyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for SpyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpyRegistry")
            .field("bindings", &self.bindings.read().len())
            .finish_non_exhaustive()
    }
}
