//! Post-hook on a successful `write_to_file`: records a `TraceRecord`
//! linking the write back to the session's active intent.

use async_trait::async_trait;
use governor_protocol::Contributor;
use governor_protocol::ContributorKind;
use governor_protocol::FileEntry;
use governor_protocol::Related;
use governor_protocol::RelatedKind;
use governor_protocol::TraceConversation;
use governor_protocol::TraceMetadata;
use governor_protocol::TraceRecord;

use crate::hook::HookContext;
use crate::hook::PostHook;
use crate::hook::ToolOutcome;
use crate::hook::SCRATCH_ORIGINAL_CONTENT;
use crate::hooks::arg_str;
use crate::mutation_classifier;
use crate::services::Services;
use crate::spatial_hash;

pub struct TraceRecorder;

#[async_trait]
impl PostHook for TraceRecorder {
    async fn run(&self, ctx: &HookContext, result: &ToolOutcome, services: &Services) -> anyhow::Result<()> {
        if !result.success {
            return Ok(());
        }
        let Some(path) = arg_str(&ctx.args, "path") else {
            return Ok(());
        };
        let Some(new_content) = arg_str(&ctx.args, "content") else {
            return Ok(());
        };
        let Some(intent_id) = services.sessions.get(&ctx.session_id).and_then(|s| s.intent_id) else {
            return Ok(());
        };

        let original = ctx
            .scratch
            .get(SCRATCH_ORIGINAL_CONTENT)
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        let mutation = mutation_classifier::classify(original, new_content);
        let content_hash = spatial_hash::hash(new_content);
        let end_line = new_content.lines().count().max(1) as u32;

        let model_id = services.sessions.get(&ctx.session_id).and_then(|s| s.model_id);
        let record = TraceRecord {
            uuid: uuid::Uuid::new_v4(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            vcs: services.vcs.revision(),
            files: vec![FileEntry {
                relative_path: path.to_string(),
                conversations: vec![TraceConversation {
                    contributor: Contributor {
                        kind: ContributorKind::Ai,
                        model_id,
                        session_id: Some(ctx.session_id.clone()),
                    },
                    ranges: vec![governor_protocol::Range {
                        start_line: 1,
                        end_line,
                        content_hash,
                        mutation_class: Some(mutation.class),
                        confidence: Some(mutation.confidence),
                    }],
                    related: vec![Related {
                        kind: RelatedKind::Specification,
                        value: intent_id,
                        url: None,
                    }],
                }],
            }],
            mutation_class: Some(mutation.class),
            metadata: TraceMetadata {
                session_id: Some(ctx.session_id.clone()),
                tags: Vec::new(),
            },
        };
        services.trace.append(&record);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "trace_recorder"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_services;
    use crate::tool::ToolName;
    use serde_json::json;

    #[tokio::test]
    async fn records_exactly_one_trace_with_correct_hash() {
        let services = test_services();
        services.sessions.get_or_create("S_A");
        services.sessions.set_intent("S_A", Some("INT-001".to_string()));
        let content = "export const f = 1;\n";
        let mut ctx = HookContext::new(
            ToolName::WriteToFile,
            json!({"path": "src/api/weather/fetch.ts", "content": content}),
            "S_A",
        );
        ctx.scratch.insert(SCRATCH_ORIGINAL_CONTENT.to_string(), json!(""));
        TraceRecorder.run(&ctx, &ToolOutcome::ok(json!(null)), &services).await.expect("hook ok");

        let records = services.trace.by_intent("INT-001");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].files[0].relative_path, "src/api/weather/fetch.ts");
        assert_eq!(
            records[0].files[0].conversations[0].related[0],
            Related {
                kind: RelatedKind::Specification,
                value: "INT-001".to_string(),
                url: None,
            }
        );
        assert_eq!(
            records[0].files[0].conversations[0].ranges[0].content_hash,
            spatial_hash::hash(content)
        );
    }

    #[tokio::test]
    async fn failed_result_records_nothing() {
        let services = test_services();
        services.sessions.get_or_create("S_A");
        services.sessions.set_intent("S_A", Some("INT-001".to_string()));
        let ctx = HookContext::new(
            ToolName::WriteToFile,
            json!({"path": "a.ts", "content": "x"}),
            "S_A",
        );
        TraceRecorder.run(&ctx, &ToolOutcome::failed(json!(null)), &services).await.expect("hook ok");
        assert!(services.trace.by_intent("INT-001").is_empty());
    }
}
