//! Component A: the declarative intent store and its scope validator.
//!
//! The store is read-only at runtime. It is reloaded wholesale between
//! operations (never mid-operation) and a missing or malformed file is
//! never treated as fatal: every failure mode here degrades to an empty
//! intent list so that gate checks downstream fail closed via
//! [`IntentStore::get`] returning `None`, rather than the middleware itself
//! crashing the host agent.

use std::path::Path;
use std::path::PathBuf;

use globset::GlobBuilder;
use globset::GlobMatcher;
use governor_protocol::Intent;
use governor_protocol::intent::IntentDocument;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct IntentStore {
    path: PathBuf,
    intents: Vec<Intent>,
}

impl IntentStore {
    /// Load the declarative store at `path`. Any I/O or parse error yields
    /// an empty store rather than propagating — see module docs.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let intents = Self::read(&path).unwrap_or_else(|err| {
            warn!(path = %path.display(), error = %err, "intent store unavailable, falling back to empty");
            Vec::new()
        });
        Self { path, intents }
    }

    /// Build a store directly from an in-memory list, bypassing the file.
    /// Used by tests and by callers that already hold a parsed document.
    pub fn from_intents(intents: Vec<Intent>) -> Self {
        Self {
            path: PathBuf::new(),
            intents,
        }
    }

    fn read(path: &Path) -> std::io::Result<Vec<Intent>> {
        let contents = std::fs::read_to_string(path)?;
        let doc: IntentDocument = serde_yaml::from_str(&contents)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(doc.active_intents)
    }

    /// Reload from disk, replacing the in-memory snapshot.
    pub fn reload(&mut self) {
        *self = Self::load(self.path.clone());
    }

    pub fn get(&self, id: &str) -> Option<&Intent> {
        self.intents.iter().find(|i| i.id == id)
    }

    pub fn all(&self) -> &[Intent] {
        &self.intents
    }

    /// A path is in scope if it matches any of the intent's scope globs.
    /// An intent with an empty scope list is read-only: nothing is in
    /// scope for it.
    pub fn scope_matches(&self, intent: &Intent, path: &str) -> bool {
        let normalized = normalize_path(path);
        intent
            .owned_scope
            .iter()
            .filter_map(|pattern| compile_glob(pattern))
            .any(|matcher| matcher.is_match(&normalized))
    }
}

fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

fn compile_glob(pattern: &str) -> Option<GlobMatcher> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .ok()
        .map(|g| g.compile_matcher())
}

#[cfg(test)]
mod tests {
    use super::*;
    use governor_protocol::IntentStatus;

    fn intent(scope: &[&str]) -> Intent {
        Intent {
            id: "INT-001".to_string(),
            name: "Weather API".to_string(),
            status: IntentStatus::Active,
            owned_scope: scope.iter().map(|s| s.to_string()).collect(),
            constraints: Vec::new(),
            acceptance_criteria: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn missing_store_yields_empty_not_found() {
        let store = IntentStore::load("/nonexistent/path/intents.yaml");
        assert!(store.get("INT-001").is_none());
        assert!(store.all().is_empty());
    }

    #[test]
    fn malformed_store_yields_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("intents.yaml");
        std::fs::write(&path, "not: [valid, yaml: structure").expect("write");
        let store = IntentStore::load(&path);
        assert!(store.all().is_empty());
    }

    #[test]
    fn glob_star_star_matches_nested_paths() {
        let store = IntentStore::load("/nonexistent");
        let intent = intent(&["src/api/weather/**"]);
        assert!(store.scope_matches(&intent, "src/api/weather/fetch.ts"));
        assert!(store.scope_matches(&intent, "src/api/weather/nested/deep.ts"));
        assert!(!store.scope_matches(&intent, "src/other/x.ts"));
    }

    #[test]
    fn single_star_does_not_cross_separators() {
        let store = IntentStore::load("/nonexistent");
        let intent = intent(&["src/api/*.ts"]);
        assert!(store.scope_matches(&intent, "src/api/fetch.ts"));
        assert!(!store.scope_matches(&intent, "src/api/weather/fetch.ts"));
    }

    #[test]
    fn empty_scope_rejects_every_write() {
        let store = IntentStore::load("/nonexistent");
        let intent = intent(&[]);
        assert!(!store.scope_matches(&intent, "anything.txt"));
    }

    #[test]
    fn scope_matches_is_stable_across_repeated_calls() {
        let store = IntentStore::load("/nonexistent");
        let intent = intent(&["src/**"]);
        for _ in 0..5 {
            assert!(store.scope_matches(&intent, "src/main.rs"));
        }
    }

    #[test]
    fn loads_real_yaml_document() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("intents.yaml");
        std::fs::write(
            &path,
            r#"
active_intents:
  - id: INT-001
    name: Weather API
    status: ACTIVE
    owned_scope:
      - "src/api/weather/**"
    constraints:
      - "use fetch, not axios"
    acceptance_criteria:
      - "returns typed response"
"#,
        )
        .expect("write");
        let store = IntentStore::load(&path);
        let intent = store.get("INT-001").expect("intent present");
        assert_eq!(intent.name, "Weather API");
        assert_eq!(intent.constraints, vec!["use fetch, not axios".to_string()]);
    }
}
