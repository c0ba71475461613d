//! Pre-hook on `write_to_file`: exclusion rules, then scope membership.

use async_trait::async_trait;
use governor_protocol::ErrorKind;

use crate::hook::HookContext;
use crate::hook::PreHook;
use crate::hooks::arg_str;
use crate::recovery::format_error;
use crate::recovery::scope_violation_response;
use crate::services::Services;

pub struct ScopeEnforcer;

#[async_trait]
impl PreHook for ScopeEnforcer {
    async fn run(&self, ctx: &mut HookContext, services: &Services) -> anyhow::Result<()> {
        let Some(path) = arg_str(&ctx.args, "path").map(str::to_string) else {
            return Ok(());
        };
        let Some(intent_id) = services.sessions.get(&ctx.session_id).and_then(|s| s.intent_id) else {
            // The gatekeeper should already have blocked this; nothing to enforce.
            return Ok(());
        };

        if services.ignore_index.read().is_excluded(&path, Some(&intent_id)) {
            ctx.block(format_error(
                ErrorKind::FileExcluded,
                format!("'{path}' is excluded by the ignore rules"),
                None,
                None,
            ));
            return Ok(());
        }

        let Some(intent) = services.intents.read().get(&intent_id).cloned() else {
            ctx.block(format_error(
                ErrorKind::MissingIntent,
                format!("intent '{intent_id}' not found in the declarative store"),
                None,
                None,
            ));
            return Ok(());
        };

        if services.intents.read().scope_matches(&intent, &path) {
            return Ok(());
        }

        let response = services
            .approval
            .confirm_scope_violation(&intent_id, &path, &intent.owned_scope)
            .await;
        if response.approved {
            ctx.user_feedback = response.feedback;
            return Ok(());
        }

        ctx.block(scope_violation_response(&path, &intent.owned_scope));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "scope_enforcer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approval::AlwaysReject;
    use crate::test_support::test_services;
    use crate::tool::ToolName;
    use governor_protocol::ErrorKind;
    use governor_protocol::Intent;
    use governor_protocol::IntentStatus;
    use serde_json::json;

    fn seed_intent(services: &Services) {
        let intent = Intent {
            id: "INT-001".to_string(),
            name: "Weather API".to_string(),
            status: IntentStatus::Active,
            owned_scope: vec!["src/api/weather/**".to_string()],
            constraints: Vec::new(),
            acceptance_criteria: Vec::new(),
            created_at: None,
            updated_at: None,
        };
        *services.intents.write() = crate::intent_store::IntentStore::from_intents(vec![intent]);
    }

    #[tokio::test]
    async fn in_scope_write_passes() {
        let services = test_services();
        seed_intent(&services);
        services.sessions.get_or_create("S_A");
        services.sessions.set_intent("S_A", Some("INT-001".to_string()));
        let mut ctx = HookContext::new(
            crate::tool::ToolName::WriteToFile,
            json!({"path": "src/api/weather/fetch.ts"}),
            "S_A",
        );
        ScopeEnforcer.run(&mut ctx, &services).await.expect("hook ok");
        assert!(!ctx.blocked);
    }

    #[tokio::test]
    async fn out_of_scope_write_is_rejected_when_approval_denied() {
        let mut services = test_services();
        services.approval = std::sync::Arc::new(AlwaysReject);
        seed_intent(&services);
        services.sessions.get_or_create("S_A");
        services.sessions.set_intent("S_A", Some("INT-001".to_string()));
        let mut ctx = HookContext::new(ToolName::WriteToFile, json!({"path": "src/other/x.ts"}), "S_A");
        ScopeEnforcer.run(&mut ctx, &services).await.expect("hook ok");
        assert!(ctx.blocked);
        assert_eq!(ctx.error.expect("error set").kind, ErrorKind::ScopeViolation);
        let suggestion = ctx.llm_error.expect("llm error set").error.suggestion.expect("suggestion present");
        assert!(suggestion.contains("src/api/weather/**"));
    }

    #[tokio::test]
    async fn missing_intent_blocks_with_missing_intent() {
        let services = test_services();
        services.sessions.get_or_create("S_A");
        services.sessions.set_intent("S_A", Some("INT-999".to_string()));
        let mut ctx = HookContext::new(ToolName::WriteToFile, json!({"path": "a.ts"}), "S_A");
        ScopeEnforcer.run(&mut ctx, &services).await.expect("hook ok");
        assert!(ctx.blocked);
        assert_eq!(ctx.error.expect("error set").kind, ErrorKind::MissingIntent);
    }
}
