//! Variable store backed by the configuration file

use crate::config::InputConfig;
use schematic_core::VariableStore;
use std::collections::HashMap;
use tracing::debug;

/// Resolves `$name` from the environment and `$[name]` from configured lists
#[derive(Debug, Clone, Default)]
pub struct ConfigVariableStore {
    /// variable name -> environment variable it is read from
    environments: HashMap<String, String>,
    sets: HashMap<String, Vec<String>>,
}

impl ConfigVariableStore {
    pub fn from_inputs(inputs: &[InputConfig]) -> Self {
        let mut store = Self::default();
        for input in inputs {
            match input {
                InputConfig::Environment { name, from } => {
                    store.environments.insert(name.clone(), from.clone());
                }
                InputConfig::VariableSet { name, content } => {
                    store.sets.insert(name.clone(), content.clone());
                }
            }
        }
        store
    }
}

impl VariableStore for ConfigVariableStore {
    fn get_variable(&self, name: &str) -> Option<String> {
        let from = self.environments.get(name)?;
        let value = std::env::var(from).ok();
        if value.is_none() {
            debug!(variable = name, env = from.as_str(), "environment variable not set");
        }
        value
    }

    fn get_variable_set(&self, name: &str) -> Option<Vec<String>> {
        self.sets.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_lookup_happens_at_read_time() {
        let store = ConfigVariableStore::from_inputs(&[InputConfig::Environment {
            name: "project".to_string(),
            from: "SCHEMATIC_TEST_STORE_PROJECT".to_string(),
        }]);

        std::env::remove_var("SCHEMATIC_TEST_STORE_PROJECT");
        assert_eq!(store.get_variable("project"), None);

        std::env::set_var("SCHEMATIC_TEST_STORE_PROJECT", "group/app");
        assert_eq!(store.get_variable("project").as_deref(), Some("group/app"));
        std::env::remove_var("SCHEMATIC_TEST_STORE_PROJECT");
    }

    #[test]
    fn test_variable_sets() {
        let store = ConfigVariableStore::from_inputs(&[InputConfig::VariableSet {
            name: "dbs".to_string(),
            content: vec!["postgres".to_string(), "kafka".to_string()],
        }]);

        assert_eq!(store.get_variable_set("dbs").map(|s| s.len()), Some(2));
        assert_eq!(store.get_variable_set("missing"), None);
        assert_eq!(store.get_variable("dbs"), None);
    }

    #[test]
    fn test_validates_with_core_engine() {
        std::env::set_var("SCHEMATIC_TEST_STORE_GITLAB", "deployment/group1/project1/helm-project1-backend");
        let store = ConfigVariableStore::from_inputs(&[
            InputConfig::Environment {
                name: "gitlab_path".to_string(),
                from: "SCHEMATIC_TEST_STORE_GITLAB".to_string(),
            },
            InputConfig::VariableSet {
                name: "technologies".to_string(),
                content: vec!["postgres".to_string(), "kafka".to_string()],
            },
        ]);

        let result = schematic_core::validate(
            r#"$gitlab_path.strip_last_prefix("helm-","ansible-")/$[technologies]/+"#,
            "deployment/group1/project1/project1-backend/kafka/admin",
            &store,
        );
        assert!(result.is_ok());
        std::env::remove_var("SCHEMATIC_TEST_STORE_GITLAB");
    }
}
