use serde::Deserialize;
use serde::Serialize;

/// One line of the ignore-rules file: `[intent_id:]pattern [kind]`.
///
/// Rules without an `intent_id` are global; an intent-specific rule for the
/// same pattern takes precedence over the global one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoreRule {
    pub intent_id: Option<String>,
    pub pattern: String,
    pub kind: RuleKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Exclude,
    AllowDestructive,
    RequireApproval,
}

impl Default for RuleKind {
    fn default() -> Self {
        Self::Exclude
    }
}

impl std::str::FromStr for RuleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exclude" => Ok(Self::Exclude),
            "allow_destructive" => Ok(Self::AllowDestructive),
            "require_approval" => Ok(Self::RequireApproval),
            other => Err(format!("unknown ignore-rule kind: {other}")),
        }
    }
}
