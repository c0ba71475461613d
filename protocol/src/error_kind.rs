use serde::Deserialize;
use serde::Serialize;

/// Closed taxonomy of error kinds the pipeline can surface to the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    IntentRequired,
    ScopeViolation,
    DestructiveCommand,
    StaleFile,
    FileLocked,
    FileExcluded,
    CommandExcluded,
    MissingIntent,
    HookError,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IntentRequired => "INTENT_REQUIRED",
            Self::ScopeViolation => "SCOPE_VIOLATION",
            Self::DestructiveCommand => "DESTRUCTIVE_COMMAND",
            Self::StaleFile => "STALE_FILE",
            Self::FileLocked => "FILE_LOCKED",
            Self::FileExcluded => "FILE_EXCLUDED",
            Self::CommandExcluded => "COMMAND_EXCLUDED",
            Self::MissingIntent => "MISSING_INTENT",
            Self::HookError => "HOOK_ERROR",
        }
    }

    /// All of these are recoverable except the catastrophic `HookError`
    /// case, which is still recoverable by retrying but carries no
    /// guarantee the retry will take a different path.
    pub const fn recoverable(self) -> bool {
        true
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `error` object of a blocked-call result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    pub message: String,
    pub recoverable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// The `_recovery` object attached to every error payload: a machine-parseable
/// nudge toward how the calling agent should react.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryPayload {
    pub instruction: String,
    pub retry: bool,
    pub suggested_actions: Vec<String>,
}

/// Full JSON body returned to the agent when a tool call is blocked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmErrorResponse {
    pub status: &'static str,
    pub error: ErrorPayload,
    #[serde(rename = "_recovery")]
    pub recovery: RecoveryPayload,
}

impl LlmErrorResponse {
    pub fn new(error: ErrorPayload, recovery: RecoveryPayload) -> Self {
        Self {
            status: "error",
            error,
            recovery,
        }
    }
}
