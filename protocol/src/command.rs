use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandRisk {
    Safe,
    Destructive,
    Unknown,
}

/// Result of classifying a shell command string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandClassification {
    pub risk: CommandRisk,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_alternative: Option<String>,
}

impl CommandClassification {
    pub fn safe() -> Self {
        Self {
            risk: CommandRisk::Safe,
            matched_pattern: None,
            suggested_alternative: None,
        }
    }

    pub fn unknown() -> Self {
        Self {
            risk: CommandRisk::Unknown,
            matched_pattern: None,
            suggested_alternative: None,
        }
    }

    /// Unknown commands are treated like destructive ones for approval
    /// purposes: fail safe rather than silently allow.
    pub fn requires_approval(&self) -> bool {
        matches!(self.risk, CommandRisk::Destructive | CommandRisk::Unknown)
    }
}
