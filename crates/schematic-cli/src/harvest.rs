//! Harvesting `<path:...>` placeholders from YAML manifests
//!
//! Placeholders look like `<path:secret/data/app#password>`; the part after
//! the first `#` names a key inside the secret and is not part of the path.

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, trace};
use walkdir::WalkDir;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

/// A placeholder found in a YAML file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placeholder {
    /// File the placeholder was found in
    pub file: PathBuf,
    /// Full `<path:...>` text
    pub raw: String,
    /// Path to validate
    pub path: String,
    /// `#key` suffix, if any
    pub key: Option<String>,
}

fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"<path:([^>]+)>").expect("placeholder pattern is valid"))
}

/// Split every placeholder out of one string value
pub fn placeholders_in(text: &str) -> Vec<(String, String, Option<String>)> {
    placeholder_regex()
        .captures_iter(text)
        .filter_map(|caps| {
            let raw = caps.get(0)?.as_str().to_string();
            let body = caps.get(1)?.as_str();
            let (path, key) = match body.split_once('#') {
                Some((path, key)) => (path.to_string(), Some(key.to_string())),
                None => (body.to_string(), None),
            };
            Some((raw, path, key))
        })
        .collect()
}

/// Every `.yaml` / `.yml` file under `dir`, in file name order.
///
/// Symlinks are not followed, so a link back into the tree cannot make the
/// same manifest show up twice.
pub fn find_yaml_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(Error::FileNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file()
            && matches!(
                entry.path().extension().and_then(|s| s.to_str()),
                Some("yaml") | Some("yml")
            )
        {
            files.push(entry.into_path());
        }
    }

    debug!(dir = %dir.display(), files = files.len(), "found yaml files");
    Ok(files)
}

/// Placeholders in every document of one YAML file
pub fn harvest_file(path: &Path) -> Result<Vec<Placeholder>> {
    let content = std::fs::read_to_string(path)?;
    let mut strings: Vec<String> = Vec::new();

    for document in serde_yaml::Deserializer::from_str(&content) {
        let value = serde_yaml::Value::deserialize(document).map_err(|e| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "YAML".to_string(),
            message: e.to_string(),
        })?;
        collect_strings(&value, &mut strings);
    }

    let placeholders: Vec<Placeholder> = strings
        .iter()
        .flat_map(|text| placeholders_in(text))
        .map(|(raw, path_text, key)| Placeholder {
            file: path.to_path_buf(),
            raw,
            path: path_text,
            key,
        })
        .collect();

    trace!(file = %path.display(), placeholders = placeholders.len(), "harvested file");
    Ok(placeholders)
}

/// Placeholders in every YAML file under `dir`
pub fn harvest_dir(dir: &Path) -> Result<Vec<Placeholder>> {
    let mut placeholders = Vec::new();
    for file in find_yaml_files(dir)? {
        placeholders.extend(harvest_file(&file)?);
    }
    Ok(placeholders)
}

fn collect_strings(value: &serde_yaml::Value, out: &mut Vec<String>) {
    match value {
        serde_yaml::Value::String(s) => out.push(s.clone()),
        serde_yaml::Value::Sequence(items) => {
            for item in items {
                collect_strings(item, out);
            }
        }
        serde_yaml::Value::Mapping(map) => {
            for (key, item) in map {
                collect_strings(key, out);
                collect_strings(item, out);
            }
        }
        serde_yaml::Value::Tagged(tagged) => collect_strings(&tagged.value, out),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_in_string() {
        let found = placeholders_in("user=<path:kv/app/db#user> pass=<path:kv/app/db#pass#2>");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].0, "<path:kv/app/db#user>");
        assert_eq!(found[0].1, "kv/app/db");
        assert_eq!(found[0].2.as_deref(), Some("user"));
        assert_eq!(found[1].2.as_deref(), Some("pass#2"));
    }

    #[test]
    fn test_placeholder_without_key() {
        let found = placeholders_in("<path:kv/app>");
        assert_eq!(found, vec![("<path:kv/app>".to_string(), "kv/app".to_string(), None)]);
    }

    #[test]
    fn test_harvest_dir_walks_nested_documents() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("charts").join("app");
        std::fs::create_dir_all(&nested).unwrap();

        std::fs::write(
            nested.join("values.yaml"),
            "db:\n  password: <path:deployment/group1/app/postgres/admin#password>\n  port: 5432\n---\nlist:\n  - <path:kv/a>\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("other.yml"), "token: '<path:kv/b#t>'\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "<path:kv/ignored>").unwrap();

        let placeholders = harvest_dir(dir.path()).unwrap();
        let paths: Vec<&str> = placeholders.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(paths, vec!["deployment/group1/app/postgres/admin", "kv/a", "kv/b"]);
        assert_eq!(placeholders[0].key.as_deref(), Some("password"));
    }

    #[test]
    fn test_harvest_file_reads_every_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("multi.yaml");
        std::fs::write(
            &path,
            "first: <path:kv/one#a>\n---\n<path:kv/key>: value\n---\n- nested: [\"x <path:kv/two> y\"]\n",
        )
        .unwrap();

        let placeholders = harvest_file(&path).unwrap();
        let paths: Vec<&str> = placeholders.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(paths, vec!["kv/one", "kv/key", "kv/two"]);
        assert!(placeholders.iter().all(|p| p.file == path));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directories_are_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("values.yaml"), "a: <path:kv/a>\n").unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("loop")).unwrap();

        let files = find_yaml_files(dir.path()).unwrap();
        assert_eq!(files, vec![dir.path().join("values.yaml")]);
        assert_eq!(harvest_dir(dir.path()).unwrap().len(), 1);
    }

    #[test]
    fn test_harvest_rejects_invalid_yaml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.yaml"), "a: [unclosed\n").unwrap();
        assert!(matches!(harvest_dir(dir.path()), Err(Error::InvalidFormat { .. })));
    }

    #[test]
    fn test_missing_dir() {
        assert!(matches!(
            find_yaml_files(Path::new("/nonexistent/manifests")),
            Err(Error::FileNotFound { .. })
        ));
    }
}
