//! Global post-hook: logs the recovery strategy the pipeline attached to a
//! failed call, so an operator tailing logs can see what the agent was
//! told to do next without reading the trace journal.

use async_trait::async_trait;
use tracing::info;

use crate::hook::HookContext;
use crate::hook::PostHook;
use crate::hook::ToolOutcome;
use crate::services::Services;

pub struct RecoveryLogger;

#[async_trait]
impl PostHook for RecoveryLogger {
    async fn run(&self, ctx: &HookContext, result: &ToolOutcome, _services: &Services) -> anyhow::Result<()> {
        if result.success {
            return Ok(());
        }
        if let Some(llm_error) = &ctx.llm_error {
            info!(
                tool = %ctx.tool_name,
                session = %ctx.session_id,
                kind = llm_error.error.kind.as_str(),
                instruction = %llm_error.recovery.instruction,
                "recorded recovery strategy for blocked call"
            );
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recovery_logger"
    }
}
