//! Component E: classify the change between two versions of a blob.
//!
//! A structural comparison is attempted first (tokenizing to a
//! language-agnostic shape and comparing node types only — no identifiers,
//! literals, or comments); when that is unavailable, an ordered set of
//! textual heuristics decides instead. Confidence is advisory, never a
//! correctness guarantee.

use governor_protocol::MutationClass;

#[derive(Debug, Clone, PartialEq)]
pub struct MutationResult {
    pub class: MutationClass,
    pub confidence: f32,
    pub changes: Vec<String>,
}

const TODO_MARKERS: &[&str] = &["TODO", "FIXME"];
const DOC_ANNOTATIONS: &[&str] = &["@param", "@returns", "@throws"];

pub fn classify(original: &str, new: &str) -> MutationResult {
    if let Some(result) = classify_structural(original, new) {
        return result;
    }
    classify_textual(original, new)
}

/// Tokenize both blobs into a shape of node *types* and compare. This is a
/// conservative approximation of full AST comparison: a real parser is
/// pluggable, but absent one, brace/paren/bracket/keyword nesting already
/// captures most refactors vs. structural evolutions.
fn classify_structural(original: &str, new: &str) -> Option<MutationResult> {
    let original_shape = structural_shape(original);
    let new_shape = structural_shape(new);
    if original_shape.is_empty() || new_shape.is_empty() {
        return None;
    }

    if had_markers(original, TODO_MARKERS) && !had_markers(new, TODO_MARKERS) {
        return Some(MutationResult {
            class: MutationClass::BugFix,
            confidence: 0.9,
            changes: vec!["TODO/FIXME marker removed".to_string()],
        });
    }

    if original_shape == new_shape {
        return Some(MutationResult {
            class: MutationClass::AstRefactor,
            confidence: 0.95,
            changes: Vec::new(),
        });
    }

    Some(MutationResult {
        class: MutationClass::IntentEvolution,
        confidence: 0.8,
        changes: vec!["structural shape changed".to_string()],
    })
}

/// A coarse language-agnostic shape: one token per significant syntactic
/// marker (braces, parens, brackets, and a fixed set of keywords),
/// skipping identifiers, literals, and comments entirely.
fn structural_shape(text: &str) -> Vec<&'static str> {
    const KEYWORDS: &[&str] = &[
        "fn", "function", "def", "if", "else", "for", "while", "match", "switch", "return",
        "class", "struct", "impl", "trait", "let", "const", "var",
    ];
    let stripped = strip_comments(text);
    let mut shape = Vec::new();
    for ch in stripped.chars() {
        match ch {
            '{' => shape.push("{"),
            '}' => shape.push("}"),
            '(' => shape.push("("),
            ')' => shape.push(")"),
            '[' => shape.push("["),
            ']' => shape.push("]"),
            _ => {}
        }
    }
    for word in stripped.split(|c: char| !c.is_alphanumeric() && c != '_') {
        if let Some(keyword) = KEYWORDS.iter().find(|k| **k == word) {
            shape.push(keyword);
        }
    }
    shape
}

fn strip_comments(text: &str) -> String {
    text.lines()
        .map(|line| {
            if let Some(idx) = line.find("//") {
                &line[..idx]
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn had_markers(text: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| text.contains(m))
}

fn classify_textual(original: &str, new: &str) -> MutationResult {
    if !has_annotations(original) && has_annotations(new) {
        return MutationResult {
            class: MutationClass::DocsUpdate,
            confidence: 0.9,
            changes: vec!["doc annotations added".to_string()],
        };
    }

    if had_markers(original, TODO_MARKERS) && !had_markers(new, TODO_MARKERS) {
        return MutationResult {
            class: MutationClass::BugFix,
            confidence: 0.8,
            changes: vec!["TODO/FIXME marker removed".to_string()],
        };
    }

    let line_delta = (line_count(original) as i64 - line_count(new) as i64).unsigned_abs();
    let char_delta = (original.chars().count() as i64 - new.chars().count() as i64).unsigned_abs();
    if line_delta > 20 || char_delta > 500 {
        return MutationResult {
            class: MutationClass::IntentEvolution,
            confidence: 0.85,
            changes: vec![format!("line delta {line_delta}, char delta {char_delta}")],
        };
    }

    MutationResult {
        class: MutationClass::AstRefactor,
        confidence: 0.65,
        changes: vec!["minor change".to_string()],
    }
}

fn has_annotations(text: &str) -> bool {
    DOC_ANNOTATIONS.iter().any(|a| text.contains(a))
}

fn line_count(text: &str) -> usize {
    text.lines().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_shape_is_ast_refactor() {
        let original = "fn f(x) { return x + 1; }";
        let new = "fn f(y) { return y + 1; }";
        let result = classify(original, new);
        assert_eq!(result.class, MutationClass::AstRefactor);
        assert!(result.confidence >= 0.9);
    }

    #[test]
    fn todo_removed_with_changed_shape_is_bug_fix() {
        let original = "function f(){ /* TODO: fix */ return 1; }";
        let new = "function f(){ return 1; }";
        let result = classify(original, new);
        assert_eq!(result.class, MutationClass::BugFix);
        assert!(result.confidence >= 0.8);
    }

    #[test]
    fn doc_annotations_added_classifies_as_docs_update() {
        let original = "function f(x) { return x; }";
        let new = "/**\n * @param x input\n * @returns the value\n */\nfunction f(x) { return x; }";
        let result = classify_textual(original, new);
        assert_eq!(result.class, MutationClass::DocsUpdate);
    }

    #[test]
    fn large_delta_without_structural_signal_is_intent_evolution() {
        let original = "a";
        let new = "a".repeat(600);
        let result = classify_textual(original, &new);
        assert_eq!(result.class, MutationClass::IntentEvolution);
    }

    #[test]
    fn minor_textual_change_falls_back_to_ast_refactor() {
        let original = "const x = 1;";
        let new = "const x = 2;";
        let result = classify_textual(original, new);
        assert_eq!(result.class, MutationClass::AstRefactor);
        assert!(result.confidence >= 0.6 && result.confidence <= 0.7);
    }
}
