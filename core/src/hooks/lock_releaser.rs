//! Post-hook on `write_to_file`: releases the lock regardless of outcome.

use async_trait::async_trait;

use crate::hook::HookContext;
use crate::hook::PostHook;
use crate::hook::ToolOutcome;
use crate::hooks::arg_str;
use crate::services::Services;

pub struct LockReleaser;

#[async_trait]
impl PostHook for LockReleaser {
    async fn run(&self, ctx: &HookContext, _result: &ToolOutcome, services: &Services) -> anyhow::Result<()> {
        if let Some(path) = arg_str(&ctx.args, "path") {
            services.locks.release(path, &ctx.session_id);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "lock_releaser"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_services;
    use crate::tool::ToolName;
    use serde_json::json;

    #[tokio::test]
    async fn releases_lock_even_on_failed_result() {
        let services = test_services();
        services.locks.acquire("f.ts", "S_A");
        let ctx = HookContext::new(ToolName::WriteToFile, json!({"path": "f.ts"}), "S_A");
        LockReleaser.run(&ctx, &ToolOutcome::failed(json!(null)), &services).await.expect("hook ok");
        assert_eq!(services.locks.acquire("f.ts", "S_B"), crate::lock_manager::AcquireResult::Acquired);
    }
}
