//! Variable stores and per-call validation context
//!
//! Copyright (c) 2025 Schematic Team
//! Licensed under the Apache-2.0 license

use crate::error::Result;
use crate::modifiers::{ModifierFunction, ModifierRegistry};
use crate::schema::Schema;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::trace;

/// Source of variable values during validation
pub trait VariableStore {
    /// Value of `$name`, a `/`-separated path
    fn get_variable(&self, name: &str) -> Option<String>;

    /// Members of `$[name]`, each one a schema source text
    fn get_variable_set(&self, name: &str) -> Option<Vec<String>>;
}

/// In-memory [`VariableStore`]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    variables: HashMap<String, String>,
    sets: HashMap<String, Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_variable(name, value);
        self
    }

    pub fn with_set<I, S>(mut self, name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert_set(name, members);
        self
    }

    pub fn insert_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }

    pub fn insert_set<I, S>(&mut self, name: impl Into<String>, members: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sets
            .insert(name.into(), members.into_iter().map(Into::into).collect());
    }
}

impl VariableStore for MemoryStore {
    fn get_variable(&self, name: &str) -> Option<String> {
        self.variables.get(name).cloned()
    }

    fn get_variable_set(&self, name: &str) -> Option<Vec<String>> {
        self.sets.get(name).cloned()
    }
}

/// Everything a validation call needs besides the schema and the input.
///
/// Built once per call. Set members are compiled lazily and cached by source
/// text for the lifetime of the context.
pub struct ValidationContext<'a> {
    store: &'a dyn VariableStore,
    modifiers: ModifierRegistry,
    members: RefCell<HashMap<String, Rc<Schema>>>,
}

impl<'a> ValidationContext<'a> {
    /// Context using only the built-in modifiers
    pub fn new(store: &'a dyn VariableStore) -> Self {
        Self::with_registry(store, ModifierRegistry::builtin())
    }

    /// Context with caller modifiers merged over the built-ins
    pub fn with_modifiers(
        store: &'a dyn VariableStore,
        overrides: &HashMap<String, ModifierFunction>,
    ) -> Self {
        Self::with_registry(store, ModifierRegistry::merged(overrides))
    }

    pub fn with_registry(store: &'a dyn VariableStore, modifiers: ModifierRegistry) -> Self {
        Self {
            store,
            modifiers,
            members: RefCell::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &dyn VariableStore {
        self.store
    }

    pub fn modifiers(&self) -> &ModifierRegistry {
        &self.modifiers
    }

    /// Compiled schema for a variable set member
    pub(crate) fn member_schema(&self, source: &str) -> Result<Rc<Schema>> {
        if let Some(schema) = self.members.borrow().get(source) {
            trace!(member = source, "set member cache hit");
            return Ok(Rc::clone(schema));
        }

        let schema = Rc::new(Schema::compile(source)?);
        self.members
            .borrow_mut()
            .insert(source.to_string(), Rc::clone(&schema));
        Ok(schema)
    }
}
