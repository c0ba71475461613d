use serde::Deserialize;
use serde::Serialize;

/// Closed taxonomy of change categories produced by the mutation classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MutationClass {
    AstRefactor,
    IntentEvolution,
    BugFix,
    PerfImprovement,
    DocsUpdate,
}

impl std::fmt::Display for MutationClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::AstRefactor => "AST_REFACTOR",
            Self::IntentEvolution => "INTENT_EVOLUTION",
            Self::BugFix => "BUG_FIX",
            Self::PerfImprovement => "PERF_IMPROVEMENT",
            Self::DocsUpdate => "DOCS_UPDATE",
        };
        f.write_str(s)
    }
}
