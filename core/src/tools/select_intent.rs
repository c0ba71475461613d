//! Component M: the one externally-callable bootstrap tool. Not gated by
//! `intent_gatekeeper` — this is how a session acquires an intent in the
//! first place.

use governor_protocol::ErrorKind;
use governor_protocol::IntentStatus;
use governor_protocol::MutationClass;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::pipeline::ToolError;
use crate::recovery::format_error;
use crate::services::Services;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentActivity {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mutation_class: Option<MutationClass>,
    pub timestamp: String,
}

/// A bounded, relevance-filtered summary of an intent — never the full
/// intent record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CuratedContext {
    pub id: String,
    pub name: String,
    pub status: IntentStatus,
    pub constraints: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_focus: Option<String>,
    pub guidance: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_activity: Option<Vec<RecentActivity>>,
}

const CURATED_CONSTRAINT_LIMIT: usize = 3;
const RECENT_ACTIVITY_LIMIT: usize = 3;

/// `args`: `{intent_id, enhanced?: bool, tool_context?: string}`. Setting
/// `enhanced` returns full constraints plus recent trace activity; by
/// default the response is curated (bounded, relevance-filtered).
pub async fn run(args: Value, session_id: &str, services: &Services) -> Result<Value, ToolError> {
    let intent_id = args
        .get("intent_id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| missing_args_error())?;

    let Some(intent) = services.intents.read().get(intent_id).cloned() else {
        return Err(format_error(
            ErrorKind::MissingIntent,
            format!("no intent '{intent_id}' in the declarative store"),
            Some("check the intent declaration store".to_string()),
            None,
        )
        .into());
    };

    services.sessions.set_intent(session_id, Some(intent.id.clone()));

    let enhanced = args.get("enhanced").and_then(|v| v.as_bool()).unwrap_or(false);
    let tool_context = args.get("tool_context").and_then(|v| v.as_str());

    let constraints = if enhanced {
        intent.constraints.clone()
    } else {
        relevant_constraints(&intent.constraints, tool_context)
    };

    let primary_focus = intent.owned_scope.first().cloned();
    let guidance = guidance_message(&primary_focus, intent.constraints.len());

    let recent_activity = enhanced.then(|| recent_activity_for(&intent.id, services));

    let context = CuratedContext {
        id: intent.id,
        name: intent.name,
        status: intent.status,
        constraints,
        primary_focus,
        guidance,
        recent_activity,
    };

    serde_json::to_value(context).map_err(|e| ToolError::Internal(e.into()))
}

fn missing_args_error() -> ToolError {
    format_error(
        ErrorKind::MissingIntent,
        "select_intent requires an intent_id",
        Some("call select_intent with a valid id".to_string()),
        None,
    )
    .into()
}

fn relevant_constraints(constraints: &[String], tool_context: Option<&str>) -> Vec<String> {
    match tool_context {
        Some(context) => {
            let needle = context.to_lowercase();
            let filtered: Vec<String> = constraints
                .iter()
                .filter(|c| c.to_lowercase().contains(&needle))
                .take(CURATED_CONSTRAINT_LIMIT)
                .cloned()
                .collect();
            if filtered.is_empty() {
                constraints.iter().take(CURATED_CONSTRAINT_LIMIT).cloned().collect()
            } else {
                filtered
            }
        }
        None => constraints.iter().take(CURATED_CONSTRAINT_LIMIT).cloned().collect(),
    }
}

fn guidance_message(primary_focus: &Option<String>, constraint_count: usize) -> String {
    match primary_focus {
        Some(focus) => format!("Work within {focus}; {constraint_count} constraint(s) apply."),
        None => "This intent has no declared scope; it is read-only.".to_string(),
    }
}

fn recent_activity_for(intent_id: &str, services: &Services) -> Vec<RecentActivity> {
    let mut records = services.trace.by_intent(intent_id);
    records.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    records
        .into_iter()
        .rev()
        .take(RECENT_ACTIVITY_LIMIT)
        .flat_map(|record| {
            let mutation_class = record.mutation_class;
            let timestamp = record.timestamp.clone();
            record.files.into_iter().map(move |f| RecentActivity {
                file: f.relative_path,
                mutation_class,
                timestamp: timestamp.clone(),
            })
        })
        .take(RECENT_ACTIVITY_LIMIT)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent_store::IntentStore;
    use crate::test_support::test_services;
    use governor_protocol::Intent;
    use serde_json::json;

    fn intent_with_constraints() -> Intent {
        Intent {
            id: "INT-001".to_string(),
            name: "Weather API".to_string(),
            status: IntentStatus::Active,
            owned_scope: vec!["src/api/weather/**".to_string()],
            constraints: vec![
                "use fetch, not axios".to_string(),
                "no console.log".to_string(),
                "type all exports".to_string(),
                "document public functions".to_string(),
            ],
            acceptance_criteria: vec!["returns typed response".to_string()],
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn curated_default_bounds_constraints_to_three() {
        let services = test_services();
        *services.intents.write() = IntentStore::from_intents(vec![intent_with_constraints()]);
        let value = run(json!({"intent_id": "INT-001"}), "S_A", &services).await.expect("ok");
        let context: CuratedContext = serde_json::from_value(value).expect("deserialize");
        assert_eq!(context.constraints.len(), 3);
        assert_eq!(context.primary_focus.as_deref(), Some("src/api/weather/**"));
        assert!(context.recent_activity.is_none());
    }

    #[tokio::test]
    async fn enhanced_returns_full_constraints() {
        let services = test_services();
        *services.intents.write() = IntentStore::from_intents(vec![intent_with_constraints()]);
        let value = run(json!({"intent_id": "INT-001", "enhanced": true}), "S_A", &services)
            .await
            .expect("ok");
        let context: CuratedContext = serde_json::from_value(value).expect("deserialize");
        assert_eq!(context.constraints.len(), 4);
        assert!(context.recent_activity.is_some());
    }

    #[tokio::test]
    async fn selecting_sets_the_session_intent() {
        let services = test_services();
        *services.intents.write() = IntentStore::from_intents(vec![intent_with_constraints()]);
        services.sessions.get_or_create("S_A");
        run(json!({"intent_id": "INT-001"}), "S_A", &services).await.expect("ok");
        let session = services.sessions.get("S_A").expect("session present");
        assert_eq!(session.intent_id.as_deref(), Some("INT-001"));
    }

    #[tokio::test]
    async fn unknown_intent_returns_missing_intent_error() {
        let services = test_services();
        let err = run(json!({"intent_id": "INT-999"}), "S_A", &services).await.unwrap_err();
        match err {
            ToolError::Policy(response) => assert_eq!(response.error.kind, governor_protocol::ErrorKind::MissingIntent),
            ToolError::Internal(_) => unreachable!("expected a policy error"),
        }
    }
}
