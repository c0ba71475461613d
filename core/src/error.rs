use thiserror::Error;

pub type Result<T> = std::result::Result<T, GovernorError>;

/// Internal error type for the middleware's own plumbing.
///
/// This is distinct from the policy errors a hook raises against a tool
/// call (see [`crate::recovery`]): those are expected, structured, and
/// handed back to the agent. A `GovernorError` is an unexpected failure in
/// the middleware itself, and every site that can produce one is required
/// to swallow it at a fail-open boundary rather than let it escape to the
/// host agent.
#[derive(Error, Debug)]
pub enum GovernorError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to parse intent store: {0}")]
    IntentStoreParse(String),

    #[error("failed to parse ignore rules: {0}")]
    IgnoreRulesParse(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("lock contended for {path}")]
    LockContended { path: String },

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("intent not found: {0}")]
    IntentNotFound(String),
}
