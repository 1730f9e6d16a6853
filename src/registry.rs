//! Custom-type registry contract and an in-memory implementation.
//!
//! The parser depends on the registry only through the narrow [`TypeRegistry`]
//! lookup contract: it hands over the leaf text exactly as captured and the
//! registry applies whatever case policy it likes. Registering a multi-word
//! name does not give the grammar any way to recognize that phrase; grammar
//! support and registry membership are orthogonal.

use crate::types::DataType;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Produces a concrete type instance for a registered custom type name.
pub trait TypeFactory: Send + Sync {
    /// Creates the concrete type.
    fn create(&self) -> DataType;
}

impl<F> TypeFactory for F
where
    F: Fn() -> DataType + Send + Sync,
{
    fn create(&self) -> DataType {
        self()
    }
}

/// Lookup contract consumed by type resolution.
pub trait TypeRegistry: Send + Sync {
    /// Looks up a factory for `name`. Case-folding, if any, is the
    /// registry's own policy; the parser passes through the text it captured.
    fn lookup(&self, name: &str) -> Option<Arc<dyn TypeFactory>>;
}

/// Thread-safe registry keyed by ASCII-lowercased type name.
///
/// Registration is expected to happen before steady-state parsing; lookups
/// take a read lock, so any number of concurrent parse calls can resolve
/// custom types against the same registry.
#[derive(Default)]
pub struct InMemoryRegistry {
    types: RwLock<HashMap<String, Arc<dyn TypeFactory>>>,
}

impl InMemoryRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under `name`. Returns `false` if an entry for the
    /// name already existed; the previous factory is replaced either way.
    pub fn register(&self, name: &str, factory: Arc<dyn TypeFactory>) -> bool {
        self.types
            .write()
            .expect("registry lock poisoned")
            .insert(name.to_ascii_lowercase(), factory)
            .is_none()
    }

    /// Removes the entry for `name`. Returns `true` if one was present.
    pub fn unregister(&self, name: &str) -> bool {
        self.types
            .write()
            .expect("registry lock poisoned")
            .remove(&name.to_ascii_lowercase())
            .is_some()
    }
}

impl TypeRegistry for InMemoryRegistry {
    fn lookup(&self, name: &str) -> Option<Arc<dyn TypeFactory>> {
        self.types
            .read()
            .expect("registry lock poisoned")
            .get(&name.to_ascii_lowercase())
            .cloned()
    }
}
