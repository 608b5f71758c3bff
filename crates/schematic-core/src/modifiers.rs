//! Variable modifiers
//!
//! A modifier rewrites the segment list a variable resolves to before it is
//! compared against the input. Modifiers are shared closures looked up by name
//! in a [`ModifierRegistry`]; callers may add their own, capturing whatever
//! state they need, or shadow the built-ins per validation call.
//!
//! Copyright (c) 2025 Schematic Team
//! Licensed under the Apache-2.0 license

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result of running a modifier
pub type ModifierResult = std::result::Result<Vec<String>, ModifierError>;

/// Signature shared by every modifier: segments in, segments out
pub type ModifierFunction = Arc<dyn Fn(Vec<String>, &[String]) -> ModifierResult + Send + Sync>;

/// Name of the built-in prefix stripping modifier
pub const STRIP_LAST_PREFIX: &str = "strip_last_prefix";

/// Errors raised by modifier functions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModifierError {
    /// The arguments given in the schema are unusable
    #[error("{modifier}: invalid arguments: {message}")]
    InvalidArguments { modifier: String, message: String },

    /// The modifier could not transform the segments
    #[error("{modifier}: {message}")]
    Failed { modifier: String, message: String },
}

impl ModifierError {
    pub fn invalid_arguments(modifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            modifier: modifier.into(),
            message: message.into(),
        }
    }

    pub fn failed(modifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            modifier: modifier.into(),
            message: message.into(),
        }
    }
}

/// Strip the first matching prefix from the last segment.
///
/// Arguments are tried in order and at most one prefix is removed. An empty
/// segment list is returned unchanged, but the argument check comes first.
pub fn strip_last_prefix(mut segments: Vec<String>, args: &[String]) -> ModifierResult {
    if args.is_empty() {
        return Err(ModifierError::invalid_arguments(
            STRIP_LAST_PREFIX,
            "expected at least 1 prefix argument",
        ));
    }

    if let Some(last) = segments.last_mut() {
        if let Some(stripped) = args.iter().find_map(|prefix| last.strip_prefix(prefix.as_str())) {
            *last = stripped.to_string();
        }
    }

    Ok(segments)
}

/// Name to function lookup table for modifiers
#[derive(Clone, Default)]
pub struct ModifierRegistry {
    functions: HashMap<String, ModifierFunction>,
}

impl ModifierRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry containing only the built-in modifiers
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(STRIP_LAST_PREFIX, strip_last_prefix);
        registry
    }

    /// Built-ins merged with caller overrides; an override wins on a name clash
    pub fn merged(overrides: &HashMap<String, ModifierFunction>) -> Self {
        let mut registry = Self::builtin();
        for (name, function) in overrides {
            registry.functions.insert(name.clone(), Arc::clone(function));
        }
        registry
    }

    /// Add or replace a modifier
    pub fn register<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(Vec<String>, &[String]) -> ModifierResult + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Arc::new(function));
    }

    pub fn get(&self, name: &str) -> Option<ModifierFunction> {
        self.functions.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for ModifierRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModifierRegistry")
            .field("modifiers", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn args(items: &[&str]) -> Vec<String> {
        segs(items)
    }

    #[test]
    fn test_strip_first_matching_prefix() {
        let out = strip_last_prefix(
            segs(&["gitlab", "group", "helm-project"]),
            &args(&["helm-", "ansible-"]),
        )
        .unwrap();
        assert_eq!(out, segs(&["gitlab", "group", "project"]));
    }

    #[test]
    fn test_strip_only_one_prefix() {
        let out = strip_last_prefix(segs(&["a", "ab-ab-x"]), &args(&["ab-", "ab-ab-"])).unwrap();
        assert_eq!(out, segs(&["a", "ab-x"]));
    }

    #[test]
    fn test_strip_no_match_is_unchanged() {
        let out = strip_last_prefix(segs(&["a", "project"]), &args(&["helm-"])).unwrap();
        assert_eq!(out, segs(&["a", "project"]));
    }

    #[test]
    fn test_strip_only_touches_last_segment() {
        let out = strip_last_prefix(segs(&["helm-a", "helm-b"]), &args(&["helm-"])).unwrap();
        assert_eq!(out, segs(&["helm-a", "b"]));
    }

    #[test]
    fn test_strip_empty_list_is_noop() {
        assert_eq!(strip_last_prefix(Vec::new(), &args(&["x"])).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_strip_requires_arguments() {
        let err = strip_last_prefix(segs(&["a"]), &[]).unwrap_err();
        assert!(matches!(err, ModifierError::InvalidArguments { .. }));
        // checked before the empty-list shortcut
        assert!(strip_last_prefix(Vec::new(), &[]).is_err());
    }

    #[test]
    fn test_registry_builtin() {
        let registry = ModifierRegistry::builtin();
        assert!(registry.contains(STRIP_LAST_PREFIX));
        assert_eq!(registry.names(), vec![STRIP_LAST_PREFIX]);
    }

    #[test]
    fn test_registry_override_wins() {
        fn always_empty(_: Vec<String>, _: &[String]) -> ModifierResult {
            Ok(Vec::new())
        }

        let mut overrides: HashMap<String, ModifierFunction> = HashMap::new();
        overrides.insert(STRIP_LAST_PREFIX.to_string(), Arc::new(always_empty));
        overrides.insert("upper".to_string(), Arc::new(always_empty));

        let registry = ModifierRegistry::merged(&overrides);
        assert_eq!(registry.names(), vec![STRIP_LAST_PREFIX, "upper"]);

        let function = registry.get(STRIP_LAST_PREFIX).unwrap();
        assert!(function(segs(&["a"]), &args(&["a"])).unwrap().is_empty());
    }

    #[test]
    fn test_registered_closure_keeps_its_state() {
        let environment = String::from("prod");
        let mut registry = ModifierRegistry::builtin();
        registry.register("with_env", move |mut segments: Vec<String>, _: &[String]| {
            segments.push(environment.clone());
            Ok(segments)
        });

        let function = registry.get("with_env").unwrap();
        assert_eq!(function(segs(&["app"]), &args(&["x"])).unwrap(), segs(&["app", "prod"]));
        assert_eq!(registry.names(), vec![STRIP_LAST_PREFIX, "with_env"]);
    }
}
