//! Component B: per-intent and global ignore / approval rules.
//!
//! Matching reuses the same ignore-glob semantics as a canonical
//! `.gitignore` implementation (the `ignore` crate's `gitignore` module,
//! the same engine ripgrep and `codex-file-search` build on) rather than
//! hand-rolling glob matching a second time.

use std::path::Path;

use governor_protocol::IgnoreRule;
use governor_protocol::RuleKind;
use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;
use tracing::warn;

const DEFAULT_RULES: &[&str] = &["node_modules/**", ".git/**", "dist/**", "*.log"];

pub struct IgnoreIndex {
    rules: Vec<IgnoreRule>,
    /// Compiled matcher for exclude-kind rules with no intent scoping,
    /// built once at load time so repeated queries don't re-parse globs.
    global_excludes: Gitignore,
}

impl IgnoreIndex {
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let rules = match std::fs::read_to_string(path) {
            Ok(contents) => parse_rules(&contents),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignore rules file unavailable, using defaults");
                DEFAULT_RULES
                    .iter()
                    .map(|p| IgnoreRule {
                        intent_id: None,
                        pattern: (*p).to_string(),
                        kind: RuleKind::Exclude,
                    })
                    .collect()
            }
        };
        let global_excludes = build_matcher(&rules, None, RuleKind::Exclude);
        Self {
            rules,
            global_excludes,
        }
    }

    pub fn is_excluded(&self, path: &str, intent_id: Option<&str>) -> bool {
        if let Some(intent_id) = intent_id {
            let intent_specific = build_matcher(&self.rules, Some(intent_id), RuleKind::Exclude);
            if intent_specific.matched(path, false).is_ignore() {
                return true;
            }
        }
        self.global_excludes.matched(path, false).is_ignore()
    }

    pub fn allows_destructive(&self, intent_id: Option<&str>) -> bool {
        self.matches_kind(intent_id, RuleKind::AllowDestructive, None)
            .is_some()
    }

    pub fn requires_approval(&self, path: &str, intent_id: Option<&str>) -> bool {
        self.matches_kind(intent_id, RuleKind::RequireApproval, Some(path))
            .is_some()
    }

    fn matches_kind(
        &self,
        intent_id: Option<&str>,
        kind: RuleKind,
        path: Option<&str>,
    ) -> Option<&IgnoreRule> {
        // Intent-specific rules override global ones for the same kind, so
        // check them first.
        self.rules
            .iter()
            .filter(|r| r.kind == kind && r.intent_id.is_some())
            .find(|r| {
                matches_intent(r, intent_id) && path.is_none_or(|p| glob_matches(&r.pattern, p))
            })
            .or_else(|| {
                self.rules.iter().filter(|r| r.kind == kind && r.intent_id.is_none()).find(|r| {
                    path.is_none_or(|p| glob_matches(&r.pattern, p))
                })
            })
    }
}

fn matches_intent(rule: &IgnoreRule, intent_id: Option<&str>) -> bool {
    match (&rule.intent_id, intent_id) {
        (Some(want), Some(have)) => want == have,
        (None, _) => true,
        (Some(_), None) => false,
    }
}

fn glob_matches(pattern: &str, path: &str) -> bool {
    let mut builder = GitignoreBuilder::new("");
    if builder.add_line(None, pattern).is_err() {
        return false;
    }
    match builder.build() {
        Ok(matcher) => matcher.matched(path, false).is_ignore(),
        Err(_) => false,
    }
}

fn build_matcher(rules: &[IgnoreRule], intent_id: Option<&str>, kind: RuleKind) -> Gitignore {
    let mut builder = GitignoreBuilder::new("");
    for rule in rules {
        if rule.kind != kind {
            continue;
        }
        if !matches_intent(rule, intent_id) {
            continue;
        }
        let _ = builder.add_line(None, &rule.pattern);
    }
    builder.build().unwrap_or_else(|_| {
        GitignoreBuilder::new("")
            .build()
            .unwrap_or_else(|_| Gitignore::empty())
    })
}

/// Line syntax: blank lines and `#...` comments are ignored. Each rule is
/// `[intent_id:]pattern [kind]`, where `kind` defaults to `exclude`.
fn parse_rules(contents: &str) -> Vec<IgnoreRule> {
    let mut rules = Vec::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut parts = line.split_whitespace();
        let Some(first) = parts.next() else {
            continue;
        };
        let kind = parts
            .next()
            .and_then(|k| k.parse::<RuleKind>().ok())
            .unwrap_or(RuleKind::Exclude);
        let (intent_id, pattern) = match first.split_once(':') {
            Some((id, pattern)) => (Some(id.to_string()), pattern.to_string()),
            None => (None, first.to_string()),
        };
        rules.push(IgnoreRule {
            intent_id,
            pattern,
            kind,
        });
    }
    rules
}
