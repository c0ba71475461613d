//! Global post-hook: on a failed call, append a structured lesson entry
//! keyed by intent, tool, and error type.

use async_trait::async_trait;

use crate::hook::HookContext;
use crate::hook::PostHook;
use crate::hook::ToolOutcome;
use crate::lesson_log::LessonEntry;
use crate::services::Services;

pub struct LessonRecorder;

#[async_trait]
impl PostHook for LessonRecorder {
    async fn run(&self, ctx: &HookContext, result: &ToolOutcome, services: &Services) -> anyhow::Result<()> {
        if result.success {
            return Ok(());
        }
        let Some(error) = &ctx.error else {
            return Ok(());
        };
        let intent_id = services.sessions.get(&ctx.session_id).and_then(|s| s.intent_id);
        let entry = LessonEntry {
            timestamp: chrono::Utc::now().to_rfc3339(),
            entry_type: error.kind.as_str().to_string(),
            intent_id,
            tool: ctx.tool_name.to_string(),
            message: error.message.clone(),
            details: error.details.as_ref().map(|d| d.to_string()),
            resolution: ctx.user_feedback.clone(),
            tags: vec![ctx.tool_name.to_string()],
        };
        services.lessons.append(&entry);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "lesson_recorder"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_services;
    use crate::tool::ToolName;
    use governor_protocol::ErrorKind;
    use serde_json::json;

    #[tokio::test]
    async fn failed_call_appends_a_lesson_entry() {
        let services = test_services();
        let mut ctx = HookContext::new(ToolName::WriteToFile, json!({}), "S_A");
        ctx.block(crate::recovery::format_error(ErrorKind::ScopeViolation, "out of scope", None, None));
        LessonRecorder.run(&ctx, &ToolOutcome::failed(json!(null)), &services).await.expect("hook ok");
        let contents = std::fs::read_to_string(services.lessons.path()).expect("read");
        assert!(contents.contains("SCOPE_VIOLATION"));
        assert!(contents.contains("write_to_file"));
    }

    #[tokio::test]
    async fn successful_call_records_nothing() {
        let services = test_services();
        let ctx = HookContext::new(ToolName::WriteToFile, json!({}), "S_A");
        LessonRecorder.run(&ctx, &ToolOutcome::ok(json!(null)), &services).await.expect("hook ok");
        assert!(!services.lessons.path().exists());
    }
}
