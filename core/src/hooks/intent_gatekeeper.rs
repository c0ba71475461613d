//! Global pre-hook: no tool but `select_intent` may run without an active
//! intent on the session.

use async_trait::async_trait;
use governor_protocol::ErrorKind;

use crate::hook::HookContext;
use crate::hook::PreHook;
use crate::recovery::format_error;
use crate::services::Services;
use crate::tool::ToolName;

pub struct IntentGatekeeper;

#[async_trait]
impl PreHook for IntentGatekeeper {
    async fn run(&self, ctx: &mut HookContext, services: &Services) -> anyhow::Result<()> {
        if ctx.tool_name == ToolName::SelectIntent {
            return Ok(());
        }
        let has_intent = services
            .sessions
            .get(&ctx.session_id)
            .is_some_and(|s| s.intent_id.is_some());
        if !has_intent {
            ctx.block(format_error(
                ErrorKind::IntentRequired,
                "no active intent on this session",
                None,
                None,
            ));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "intent_gatekeeper"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_services;
    use governor_protocol::ErrorKind;
    use serde_json::json;

    #[tokio::test]
    async fn blocks_write_without_an_intent() {
        let services = test_services();
        services.sessions.get_or_create("S_A");
        let mut ctx = HookContext::new(ToolName::WriteToFile, json!({}), "S_A");
        IntentGatekeeper.run(&mut ctx, &services).await.expect("hook ok");
        assert!(ctx.blocked);
        assert_eq!(ctx.error.expect("error set").kind, ErrorKind::IntentRequired);
    }

    #[tokio::test]
    async fn passes_select_intent_regardless_of_session_state() {
        let services = test_services();
        let mut ctx = HookContext::new(ToolName::SelectIntent, json!({}), "S_A");
        IntentGatekeeper.run(&mut ctx, &services).await.expect("hook ok");
        assert!(!ctx.blocked);
    }

    #[tokio::test]
    async fn passes_when_intent_is_set() {
        let services = test_services();
        services.sessions.get_or_create("S_A");
        services.sessions.set_intent("S_A", Some("INT-001".to_string()));
        let mut ctx = HookContext::new(ToolName::WriteToFile, json!({}), "S_A");
        IntentGatekeeper.run(&mut ctx, &services).await.expect("hook ok");
        assert!(!ctx.blocked);
    }
}
