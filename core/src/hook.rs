//! Components H: `HookContext`, the `PreHook`/`PostHook` traits, and the
//! ordered registry that maps a tool name to the hooks that apply to it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use governor_protocol::ErrorPayload;
use governor_protocol::LlmErrorResponse;
use serde_json::Value;

use crate::services::Services;
use crate::tool::ToolName;

/// Scratch-space key under which `stale_file_detector` stashes the
/// on-disk content it read, for `trace_recorder` to diff against.
pub const SCRATCH_ORIGINAL_CONTENT: &str = "original_content";

/// Carried through one pipeline execution. `blocked` is monotonic: once a
/// pre-hook sets it, nothing downstream may unset it — enforced by
/// [`HookContext::block`] being the only way to flip it, with no
/// corresponding `unblock`.
#[derive(Debug, Clone)]
pub struct HookContext {
    pub tool_name: ToolName,
    pub args: Value,
    pub session_id: String,
    pub blocked: bool,
    pub error: Option<ErrorPayload>,
    pub llm_error: Option<LlmErrorResponse>,
    pub user_feedback: Option<String>,
    /// Free-form handoff between a pre-hook and the post-hooks of the same
    /// call, e.g. the original file content a validator read from disk.
    pub scratch: HashMap<String, Value>,
}

impl HookContext {
    pub fn new(tool_name: ToolName, args: Value, session_id: impl Into<String>) -> Self {
        Self {
            tool_name,
            args,
            session_id: session_id.into(),
            blocked: false,
            error: None,
            llm_error: None,
            user_feedback: None,
            scratch: HashMap::new(),
        }
    }

    /// The only way to set `blocked`. Idempotent: blocking an
    /// already-blocked context keeps the first error that caused it.
    pub fn block(&mut self, response: LlmErrorResponse) {
        if self.blocked {
            return;
        }
        self.blocked = true;
        self.error = Some(response.error.clone());
        self.llm_error = Some(response);
    }
}

/// A hook that runs before the wrapped tool executes. Returning `Err`
/// signals an *internal* failure in the hook itself (fail-open: the
/// pipeline logs it and discards whatever the hook mutated), which is
/// distinct from a policy block, which the hook expresses by calling
/// [`HookContext::block`] and returning `Ok(())`.
#[async_trait]
pub trait PreHook: Send + Sync {
    async fn run(&self, ctx: &mut HookContext, services: &Services) -> anyhow::Result<()>;

    fn name(&self) -> &'static str;
}

/// A hook that runs after the wrapped tool executes, fire-and-forget.
#[async_trait]
pub trait PostHook: Send + Sync {
    async fn run(&self, ctx: &HookContext, result: &ToolOutcome, services: &Services) -> anyhow::Result<()>;

    fn name(&self) -> &'static str;
}

/// The wrapped tool's result, as seen by post-hooks.
#[derive(Debug, Clone)]
pub struct ToolOutcome {
    pub success: bool,
    pub value: Value,
}

impl ToolOutcome {
    pub fn ok(value: Value) -> Self {
        Self { success: true, value }
    }

    pub fn failed(value: Value) -> Self {
        Self { success: false, value }
    }
}

#[derive(Default)]
pub struct HookRegistry {
    pre_global: Vec<Arc<dyn PreHook>>,
    pre_by_tool: HashMap<ToolName, Vec<Arc<dyn PreHook>>>,
    post_global: Vec<Arc<dyn PostHook>>,
    post_by_tool: HashMap<ToolName, Vec<Arc<dyn PostHook>>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_pre_global(&mut self, hook: Arc<dyn PreHook>) {
        self.pre_global.push(hook);
    }

    pub fn register_pre(&mut self, tool: ToolName, hook: Arc<dyn PreHook>) {
        self.pre_by_tool.entry(tool).or_default().push(hook);
    }

    pub fn register_post_global(&mut self, hook: Arc<dyn PostHook>) {
        self.post_global.push(hook);
    }

    pub fn register_post(&mut self, tool: ToolName, hook: Arc<dyn PostHook>) {
        self.post_by_tool.entry(tool).or_default().push(hook);
    }

    /// Global hooks run before tool-specific ones, each group in
    /// registration order.
    pub fn pre_hooks_for(&self, tool: &ToolName) -> Vec<Arc<dyn PreHook>> {
        let mut hooks = self.pre_global.clone();
        if let Some(specific) = self.pre_by_tool.get(tool) {
            hooks.extend(specific.iter().cloned());
        }
        hooks
    }

    pub fn post_hooks_for(&self, tool: &ToolName) -> Vec<Arc<dyn PostHook>> {
        let mut hooks = self.post_global.clone();
        if let Some(specific) = self.post_by_tool.get(tool) {
            hooks.extend(specific.iter().cloned());
        }
        hooks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopPre;

    #[async_trait]
    impl PreHook for NoopPre {
        async fn run(&self, _ctx: &mut HookContext, _services: &Services) -> anyhow::Result<()> {
            Ok(())
        }

        fn name(&self) -> &'static str {
            "noop"
        }
    }

    #[test]
    fn block_is_idempotent_and_monotonic() {
        use governor_protocol::ErrorKind;
        let mut ctx = HookContext::new(ToolName::WriteToFile, Value::Null, "S_A");
        let first = crate::recovery::format_error(ErrorKind::IntentRequired, "first", None, None);
        let second = crate::recovery::format_error(ErrorKind::ScopeViolation, "second", None, None);
        ctx.block(first);
        ctx.block(second);
        assert!(ctx.blocked);
        assert_eq!(ctx.error.expect("error set").kind, ErrorKind::IntentRequired);
    }

    #[test]
    fn global_hooks_run_before_tool_specific_ones() {
        let mut registry = HookRegistry::new();
        registry.register_pre(ToolName::WriteToFile, Arc::new(NoopPre));
        registry.register_pre_global(Arc::new(NoopPre));
        let hooks = registry.pre_hooks_for(&ToolName::WriteToFile);
        assert_eq!(hooks.len(), 2);
    }

    #[test]
    fn tool_specific_hooks_do_not_leak_to_other_tools() {
        let mut registry = HookRegistry::new();
        registry.register_pre(ToolName::WriteToFile, Arc::new(NoopPre));
        assert!(registry.pre_hooks_for(&ToolName::ExecuteCommand).is_empty());
    }
}
