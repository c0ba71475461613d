use serde::Deserialize;
use serde::Serialize;

/// A declared, scoped unit of work loaded from the declarative intent store.
///
/// Intents are read-only at runtime: the store is reloaded wholesale between
/// operations, never mutated in place by the middleware.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: IntentStatus,
    #[serde(default, rename = "owned_scope")]
    pub owned_scope: Vec<String>,
    #[serde(default)]
    pub constraints: Vec<String>,
    #[serde(default)]
    pub acceptance_criteria: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IntentStatus {
    #[default]
    Active,
    Completed,
    Paused,
}

/// Root document shape of the declarative store: `{ active_intents: [...] }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntentDocument {
    #[serde(default)]
    pub active_intents: Vec<Intent>,
}
