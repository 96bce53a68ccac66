//! The type registry: type name to [`TypeHandler`].
//!
//! A registry is assembled once with [`RegistryBuilder`] and is read-only
//! afterwards. It is passed by reference into every compile, parse, load and
//! serialize call, so independent registries can coexist in one process.
//!
//! ## Examples
//!
//! ```rust
//! use internet_object::registry::TypeRegistry;
//!
//! let registry = TypeRegistry::builder().with_builtins().build();
//! assert!(registry.contains("array"));
//! assert!(!registry.contains("money"));
//! ```

use crate::ast::Position;
use crate::types::{
    AnyDef, ArrayDef, BooleanDef, DateTimeDef, NumberDef, ObjectDef, StringDef, TypeHandler,
};
use crate::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Immutable mapping from type name to handler.
pub struct TypeRegistry {
    handlers: HashMap<&'static str, Box<dyn TypeHandler>>,
}

impl TypeRegistry {
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn TypeHandler> {
        self.handlers.get(name).map(|handler| handler.as_ref())
    }

    /// Looks up a handler, failing with [`InvalidType`](crate::ErrorKind::InvalidType).
    pub fn resolve(&self, name: &str, position: Option<Position>) -> Result<&dyn TypeHandler> {
        self.get(name)
            .ok_or_else(|| Error::invalid_type(name, position))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered type names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for TypeRegistry {
    /// A registry holding the built-in handlers.
    fn default() -> Self {
        TypeRegistry::builder().with_builtins().build()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.names())
            .finish()
    }
}

/// Collects handlers before the registry is frozen.
#[derive(Default)]
pub struct RegistryBuilder {
    handlers: HashMap<&'static str, Box<dyn TypeHandler>>,
}

impl RegistryBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a handler under its own name. A later handler replaces an earlier
    /// one with the same name.
    #[must_use]
    pub fn register<H: TypeHandler + 'static>(mut self, handler: H) -> Self {
        let name = handler.name();
        if self.handlers.insert(name, Box::new(handler)).is_some() {
            warn!(type_name = name, "type handler registered twice; keeping the last one");
        }
        self
    }

    /// Adds `any`, `array`, `boolean`, `datetime`, `number`, `object` and `string`.
    #[must_use]
    pub fn with_builtins(self) -> Self {
        self.register(AnyDef)
            .register(ArrayDef)
            .register(BooleanDef)
            .register(DateTimeDef)
            .register(NumberDef)
            .register(ObjectDef)
            .register(StringDef)
    }

    #[must_use]
    pub fn build(self) -> TypeRegistry {
        debug!(types = self.handlers.len(), "built type registry");
        TypeRegistry {
            handlers: self.handlers,
        }
    }
}

/// A shared registry with the built-in handlers, built on first use.
pub fn builtin() -> &'static TypeRegistry {
    static BUILTIN: OnceLock<TypeRegistry> = OnceLock::new();
    BUILTIN.get_or_init(TypeRegistry::default)
}
