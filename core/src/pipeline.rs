//! Component I: the single entry point a tool call passes through.
//!
//! `Pipeline::execute` never propagates an error to its caller: every
//! failure mode — a blocked pre-hook, a hook's own internal error, or a
//! bug in the pipeline itself — resolves to a `PipelineResult`, the same
//! shape the agent always receives.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use futures::FutureExt;
use governor_protocol::ErrorKind;
use governor_protocol::ErrorPayload;
use governor_protocol::LlmErrorResponse;
use serde_json::Value;
use tracing::error;
use tracing::warn;

use crate::hook::HookContext;
use crate::hook::HookRegistry;
use crate::hook::ToolOutcome;
use crate::recovery::format_error;
use crate::services::Services;
use crate::tool::ToolName;

/// What the wrapped tool itself can fail with. `Policy` lets a tool (e.g.
/// `select_intent` rejecting an unknown id) surface the same structured
/// `LlmErrorResponse` shape a blocked pre-hook would, instead of an opaque
/// internal error.
#[derive(Debug)]
pub enum ToolError {
    Internal(anyhow::Error),
    Policy(Box<LlmErrorResponse>),
}

impl From<anyhow::Error> for ToolError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl From<LlmErrorResponse> for ToolError {
    fn from(response: LlmErrorResponse) -> Self {
        Self::Policy(Box::new(response))
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct PipelineResult {
    pub success: bool,
    pub value: Value,
    pub error: Option<ErrorPayload>,
    pub llm_error: Option<LlmErrorResponse>,
}

impl PipelineResult {
    fn blocked(ctx: &HookContext) -> Self {
        Self {
            success: false,
            value: Value::Null,
            error: ctx.error.clone(),
            llm_error: ctx.llm_error.clone(),
        }
    }

    fn from_outcome(outcome: &ToolOutcome) -> Self {
        Self {
            success: outcome.success,
            value: outcome.value.clone(),
            error: None,
            llm_error: None,
        }
    }

    fn hook_error(message: impl Into<String>) -> Self {
        let response = format_error(ErrorKind::HookError, message, None, None);
        Self {
            success: false,
            value: Value::Null,
            error: Some(response.error.clone()),
            llm_error: Some(response),
        }
    }
}

pub struct Pipeline {
    registry: HookRegistry,
    services: Services,
}

impl Pipeline {
    pub fn new(registry: HookRegistry, services: Services) -> Self {
        Self { registry, services }
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub async fn execute<F, Fut>(
        &self,
        tool_name: ToolName,
        args: Value,
        session_id: &str,
        next: F,
    ) -> PipelineResult
    where
        F: FnOnce(Value) -> Fut,
        Fut: Future<Output = Result<Value, ToolError>>,
    {
        self.services.sessions.get_or_create(session_id);
        let mut ctx = HookContext::new(tool_name.clone(), args.clone(), session_id);

        for hook in self.registry.pre_hooks_for(&tool_name) {
            if ctx.blocked {
                break;
            }
            let snapshot = ctx.clone();
            if let Err(err) = hook.run(&mut ctx, &self.services).await {
                warn!(hook = hook.name(), error = %err, "pre-hook failed internally, discarding its effect");
                ctx = snapshot;
            }
        }

        if ctx.blocked {
            self.services.sessions.record_call(session_id, true);
            let result = PipelineResult::blocked(&ctx);
            self.fire_post_hooks(ctx, ToolOutcome::failed(Value::Null)).await;
            return result;
        }

        let (outcome, policy_response) = match next(args).await {
            Ok(value) => (ToolOutcome::ok(value), None),
            Err(ToolError::Policy(response)) => (ToolOutcome::failed(Value::Null), Some(*response)),
            Err(ToolError::Internal(err)) => {
                warn!(error = %err, "wrapped tool call failed");
                (ToolOutcome::failed(serde_json::json!({ "error": err.to_string() })), None)
            }
        };

        self.services.sessions.record_call(session_id, !outcome.success);
        let result = match &policy_response {
            Some(response) => PipelineResult {
                success: false,
                value: Value::Null,
                error: Some(response.error.clone()),
                llm_error: Some(response.clone()),
            },
            None => PipelineResult::from_outcome(&outcome),
        };
        if let Some(response) = policy_response {
            ctx.error = Some(response.error.clone());
            ctx.llm_error = Some(response);
        }
        self.fire_post_hooks(ctx, outcome).await;
        result
    }

    /// Post-hooks run with per-hook failure isolation and do not affect the
    /// return value the caller already received — "fire and forget" here
    /// means their outcome cannot change the tool result, not that they
    /// run on a separate thread.
    async fn fire_post_hooks(&self, ctx: HookContext, outcome: ToolOutcome) {
        for hook in self.registry.post_hooks_for(&ctx.tool_name) {
            if let Err(err) = hook.run(&ctx, &outcome, &self.services).await {
                warn!(hook = hook.name(), error = %err, "post-hook failed internally");
            }
        }
    }
}

/// Wraps a [`Pipeline`] with a circuit breaker: if the primary panics,
/// subsequent calls bypass hook enforcement entirely (the wrapped tool
/// still runs) for a cooldown window, so a bug in governance can never
/// wedge the host agent.
pub struct FallbackPipeline {
    primary: Arc<Pipeline>,
    bypass_until: parking_lot::Mutex<Option<Instant>>,
}

const BYPASS_COOLDOWN: Duration = Duration::from_secs(60);

impl FallbackPipeline {
    pub fn new(primary: Arc<Pipeline>) -> Self {
        Self {
            primary,
            bypass_until: parking_lot::Mutex::new(None),
        }
    }

    fn in_bypass(&self) -> bool {
        let mut guard = self.bypass_until.lock();
        match *guard {
            Some(until) if Instant::now() < until => true,
            Some(_) => {
                *guard = None;
                false
            }
            None => false,
        }
    }

    pub async fn execute<F, Fut>(
        &self,
        tool_name: ToolName,
        args: Value,
        session_id: &str,
        next: F,
    ) -> PipelineResult
    where
        F: FnOnce(Value) -> Fut,
        Fut: Future<Output = Result<Value, ToolError>>,
    {
        if self.in_bypass() {
            warn!(tool = %tool_name, "governance bypassed; primary pipeline is cooling down");
            return match next(args).await {
                Ok(value) => PipelineResult::from_outcome(&ToolOutcome::ok(value)),
                Err(ToolError::Policy(response)) => PipelineResult {
                    success: false,
                    value: Value::Null,
                    error: Some(response.error.clone()),
                    llm_error: Some(*response),
                },
                Err(ToolError::Internal(err)) => {
                    PipelineResult::from_outcome(&ToolOutcome::failed(serde_json::json!({ "error": err.to_string() })))
                }
            };
        }

        let result = std::panic::AssertUnwindSafe(self.primary.execute(tool_name, args, session_id, next))
            .catch_unwind()
            .await;

        match result {
            Ok(result) => result,
            Err(_) => {
                error!("pipeline primary panicked; entering bypass mode for 60s");
                *self.bypass_until.lock() = Some(Instant::now() + BYPASS_COOLDOWN);
                PipelineResult::hook_error("governance pipeline failed internally")
            }
        }
    }
}
