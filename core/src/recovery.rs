//! Component J: standardized, machine-parseable error payloads.
//!
//! Every policy block the pipeline raises goes through [`format_error`] so
//! the agent always sees the same `{status, error, _recovery}` shape no
//! matter which hook produced it.

use governor_protocol::ErrorKind;
use governor_protocol::ErrorPayload;
use governor_protocol::LlmErrorResponse;
use governor_protocol::RecoveryPayload;

/// Build the full response payload for a blocked call. `suggestion` becomes
/// `error.suggestion`; `details` is attached verbatim for structured
/// context (e.g. a queue position).
pub fn format_error(
    kind: ErrorKind,
    message: impl Into<String>,
    suggestion: Option<String>,
    details: Option<serde_json::Value>,
) -> LlmErrorResponse {
    let error = ErrorPayload {
        kind,
        message: message.into(),
        recoverable: kind.recoverable(),
        suggestion,
        details,
    };
    let recovery = RecoveryPayload {
        instruction: instruction_for(kind),
        retry: true,
        suggested_actions: suggested_actions_for(kind),
    };
    LlmErrorResponse::new(error, recovery)
}

fn instruction_for(kind: ErrorKind) -> String {
    match kind {
        ErrorKind::IntentRequired => "Select an intent before calling this tool.".to_string(),
        ErrorKind::ScopeViolation => "This path is outside the active intent's scope.".to_string(),
        ErrorKind::DestructiveCommand => "This command was classified as destructive and was not approved.".to_string(),
        ErrorKind::StaleFile => "The file changed since it was last read.".to_string(),
        ErrorKind::FileLocked => "The file is locked by another session.".to_string(),
        ErrorKind::FileExcluded => "This path is excluded by the ignore rules.".to_string(),
        ErrorKind::CommandExcluded => "This command is excluded by the ignore rules.".to_string(),
        ErrorKind::MissingIntent => "No intent matches the requested id.".to_string(),
        ErrorKind::HookError => "An internal governance error occurred.".to_string(),
    }
}

fn suggested_actions_for(kind: ErrorKind) -> Vec<String> {
    match kind {
        ErrorKind::IntentRequired => vec![
            "call select_intent with a valid id".to_string(),
            "check the intent declaration store".to_string(),
        ],
        ErrorKind::ScopeViolation => vec![
            "request scope expansion".to_string(),
            "switch to an intent with broader scope".to_string(),
            "restrict changes to allowed globs".to_string(),
        ],
        ErrorKind::DestructiveCommand => vec![
            "use a safer alternative".to_string(),
            "split the operation".to_string(),
            "obtain explicit user approval".to_string(),
        ],
        ErrorKind::StaleFile => vec![
            "re-read current content".to_string(),
            "merge against the new version".to_string(),
            "restart with a fresh snapshot".to_string(),
        ],
        ErrorKind::FileExcluded | ErrorKind::CommandExcluded => vec![
            "remove from the exclusion rules".to_string(),
            "choose a different target".to_string(),
            "ask for approval".to_string(),
        ],
        ErrorKind::FileLocked => vec![
            "wait for queue position N".to_string(),
            "back off and retry".to_string(),
        ],
        ErrorKind::MissingIntent => vec![
            "check the intent declaration store".to_string(),
            "call select_intent with a valid id".to_string(),
        ],
        ErrorKind::HookError => vec!["retry".to_string(), "report to maintainer".to_string()],
    }
}

/// `FILE_LOCKED`'s suggested actions embed the live queue position, unlike
/// every other kind's static list.
pub fn file_locked_response(position: usize) -> LlmErrorResponse {
    let mut response = format_error(
        ErrorKind::FileLocked,
        format!("file is locked; queue position {position}"),
        Some(format!("wait for queue position {position}")),
        Some(serde_json::json!({ "position": position })),
    );
    response.recovery.suggested_actions = vec![
        format!("wait for queue position {position}"),
        "back off and retry".to_string(),
    ];
    response
}

/// `DESTRUCTIVE_COMMAND`'s suggestion should surface the classifier's
/// recorded alternative verbatim when one exists, e.g. `--force-with-lease`
/// in place of a bare `--force`.
pub fn destructive_command_response(command: &str, alternative: Option<&str>) -> LlmErrorResponse {
    let mut response = format_error(
        ErrorKind::DestructiveCommand,
        format!("command '{command}' was classified as destructive and was not approved"),
        alternative.map(|a| a.to_string()),
        None,
    );
    if let Some(alternative) = alternative {
        response.recovery.suggested_actions.insert(0, alternative.to_string());
    }
    response
}

/// `SCOPE_VIOLATION`'s suggestion must literally contain the scope glob
/// that would have allowed the write.
pub fn scope_violation_response(path: &str, scopes: &[String]) -> LlmErrorResponse {
    let joined = scopes.join(", ");
    format_error(
        ErrorKind::ScopeViolation,
        format!("'{path}' is outside the active intent's scope"),
        Some(format!("allowed scopes: {joined}")),
        Some(serde_json::json!({ "scopes": scopes })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_required_has_required_suggested_actions() {
        let response = format_error(ErrorKind::IntentRequired, "no intent", None, None);
        assert_eq!(
            response.recovery.suggested_actions,
            vec![
                "call select_intent with a valid id".to_string(),
                "check the intent declaration store".to_string(),
            ]
        );
        assert_eq!(response.status, "error");
        assert_eq!(response.error.kind, ErrorKind::IntentRequired);
    }

    #[test]
    fn destructive_command_response_surfaces_force_with_lease() {
        let response = destructive_command_response("git push --force", Some("git push --force-with-lease"));
        assert!(
            response
                .recovery
                .suggested_actions
                .iter()
                .any(|a| a.contains("--force-with-lease"))
        );
    }

    #[test]
    fn scope_violation_suggestion_contains_the_glob() {
        let response = scope_violation_response("src/other/x.ts", &["src/api/weather/**".to_string()]);
        assert!(
            response
                .error
                .suggestion
                .expect("suggestion present")
                .contains("src/api/weather/**")
        );
    }

    #[test]
    fn file_locked_includes_position_in_details() {
        let response = file_locked_response(0);
        let details = response.error.details.expect("details present");
        assert_eq!(details["position"], 0);
    }
}
