//! Component C: classify a shell command string as safe, destructive, or
//! unknown.
//!
//! Table-driven, in the spirit of `is_known_safe_command` from a typical
//! coding-agent sandbox: an ordered list of destructive patterns is
//! consulted first (first match wins), then an ordered safe list, with
//! anything left over falling to `unknown`. Unlike a sandbox's allowlist,
//! this classifier never executes anything — it only advises the pipeline.

use governor_protocol::CommandClassification;
use governor_protocol::CommandRisk;
use regex_lite::Regex;
use std::sync::LazyLock;

struct DestructivePattern {
    name: &'static str,
    regex: &'static str,
    alternative: Option<&'static str>,
}

/// Minimum required set from the spec, in priority order. `(?i)` makes the
/// match case-insensitive except where the spec calls out case-sensitivity
/// explicitly (none of these do).
const DESTRUCTIVE_PATTERNS: &[DestructivePattern] = &[
    DestructivePattern { name: "rm_rf", regex: r"(?i)rm\s+-rf", alternative: Some("rm -i, or scope the path before deleting") },
    DestructivePattern { name: "rmdir_s", regex: r"(?i)rmdir\s+/s", alternative: Some("remove the directory contents explicitly first") },
    DestructivePattern { name: "format", regex: r"(?i)format", alternative: None },
    DestructivePattern { name: "mkfs", regex: r"(?i)mkfs", alternative: None },
    DestructivePattern { name: "dd_if", regex: r"(?i)dd\s+if=", alternative: Some("cp, or dd with a dry-run count first") },
    DestructivePattern { name: "git_push_force", regex: r"(?i)git\s+push\s+--force", alternative: Some("git push --force-with-lease") },
    DestructivePattern { name: "git_reset_hard", regex: r"(?i)git\s+reset\s+--hard", alternative: Some("git stash, or git reset --mixed") },
    DestructivePattern { name: "git_clean_f", regex: r"(?i)git\s+clean\s+-f", alternative: Some("git clean -n to preview first") },
    DestructivePattern { name: "drop_table", regex: r"(?i)drop\s+table", alternative: Some("rename the table instead of dropping it") },
    DestructivePattern { name: "drop_database", regex: r"(?i)drop\s+database", alternative: None },
    DestructivePattern { name: "delete_from_where", regex: r"(?i)delete\s+from\s+\w+\s+where", alternative: Some("run the equivalent SELECT first to confirm the row set") },
    DestructivePattern { name: "chmod_777", regex: r"(?i)chmod\s+777", alternative: Some("chmod with the minimum needed permission bits") },
    DestructivePattern { name: "chown", regex: r"(?i)chown", alternative: None },
    DestructivePattern { name: "shutdown", regex: r"(?i)shutdown", alternative: None },
    DestructivePattern { name: "reboot", regex: r"(?i)reboot", alternative: None },
    DestructivePattern { name: "kill_9", regex: r"(?i)kill\s+-9", alternative: Some("kill (SIGTERM) before escalating to -9") },
    DestructivePattern { name: "npm_install", regex: r"(?i)npm\s+install", alternative: Some("npm install --dry-run") },
    DestructivePattern { name: "yarn_add", regex: r"(?i)yarn\s+add", alternative: Some("yarn add --dry-run") },
    DestructivePattern { name: "pnpm_add", regex: r"(?i)pnpm\s+add", alternative: Some("pnpm add --dry-run") },
    DestructivePattern { name: "pip_install", regex: r"(?i)pip\s+install", alternative: Some("pip install --dry-run") },
    DestructivePattern { name: "cargo_add", regex: r"(?i)cargo\s+add", alternative: Some("review Cargo.toml changes before running cargo add") },
];

const SAFE_PATTERNS: &[&str] = &[
    r"^\s*(cat|cd|echo|grep|head|ls|pwd|rg|tail|wc|which)\b",
    r"^\s*git\s+(status|log|diff|show|branch)\b",
    r"^\s*cargo\s+check\b",
];

struct CompiledTable {
    destructive: Vec<(&'static DestructivePattern, Regex)>,
    safe: Vec<Regex>,
}

static TABLE: LazyLock<CompiledTable> = LazyLock::new(|| CompiledTable {
    destructive: DESTRUCTIVE_PATTERNS
        .iter()
        .filter_map(|p| Regex::new(p.regex).ok().map(|re| (p, re)))
        .collect(),
    safe: SAFE_PATTERNS.iter().filter_map(|p| Regex::new(p).ok()).collect(),
});

/// Classify a shell command string. First match in the destructive table
/// wins; if nothing destructive matches, the safe table is consulted; any
/// command matching neither is `unknown`, which the pipeline treats like
/// `destructive` for approval purposes (fail safe).
pub fn classify(command: &str) -> CommandClassification {
    for (pattern, regex) in &TABLE.destructive {
        if regex.is_match(command) {
            return CommandClassification {
                risk: CommandRisk::Destructive,
                matched_pattern: Some(pattern.name.to_string()),
                suggested_alternative: pattern.alternative.map(|s| s.to_string()),
            };
        }
    }

    if TABLE.safe.iter().any(|re| re.is_match(command)) {
        return CommandClassification::safe();
    }

    CommandClassification::unknown()
}
