//! `UserApprovalPort`: the outbound boundary to the host editor's approval
//! UI. Synchronous from the hook's point of view (the hook awaits it), but
//! modeled as async so a real implementation can suspend on a human.

use async_trait::async_trait;
use governor_protocol::CommandClassification;

#[derive(Debug, Clone, Default)]
pub struct ApprovalResponse {
    pub approved: bool,
    pub feedback: Option<String>,
    pub remember: bool,
}

impl ApprovalResponse {
    pub fn approved() -> Self {
        Self {
            approved: true,
            feedback: None,
            remember: false,
        }
    }

    pub fn rejected(feedback: impl Into<String>) -> Self {
        Self {
            approved: false,
            feedback: Some(feedback.into()),
            remember: false,
        }
    }
}

#[async_trait]
pub trait UserApprovalPort: Send + Sync {
    async fn confirm_destructive(
        &self,
        command: &str,
        classification: &CommandClassification,
        intent_id: Option<&str>,
    ) -> ApprovalResponse;

    async fn confirm_scope_violation(&self, intent_id: &str, path: &str, scopes: &[String]) -> ApprovalResponse;

    async fn confirm_intent_evolution(&self, intent_id: &str, summary: &str) -> ApprovalResponse;
}

/// Approves everything. Useful for hosts that have pre-authorized an
/// intent's destructive operations, and for tests exercising the
/// happy path.
pub struct AlwaysApprove;

#[async_trait]
impl UserApprovalPort for AlwaysApprove {
    async fn confirm_destructive(&self, _: &str, _: &CommandClassification, _: Option<&str>) -> ApprovalResponse {
        ApprovalResponse::approved()
    }

    async fn confirm_scope_violation(&self, _: &str, _: &str, _: &[String]) -> ApprovalResponse {
        ApprovalResponse::approved()
    }

    async fn confirm_intent_evolution(&self, _: &str, _: &str) -> ApprovalResponse {
        ApprovalResponse::approved()
    }
}

/// Rejects everything. Useful for tests exercising rejection paths.
pub struct AlwaysReject;

#[async_trait]
impl UserApprovalPort for AlwaysReject {
    async fn confirm_destructive(&self, _: &str, _: &CommandClassification, _: Option<&str>) -> ApprovalResponse {
        ApprovalResponse::rejected("rejected by policy")
    }

    async fn confirm_scope_violation(&self, _: &str, _: &str, _: &[String]) -> ApprovalResponse {
        ApprovalResponse::rejected("rejected by policy")
    }

    async fn confirm_intent_evolution(&self, _: &str, _: &str) -> ApprovalResponse {
        ApprovalResponse::rejected("rejected by policy")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_approve_approves_every_port_method() {
        let port = AlwaysApprove;
        assert!(port.confirm_destructive("rm -rf /", &CommandClassification::unknown(), None).await.approved);
        assert!(port.confirm_scope_violation("INT-001", "x.ts", &[]).await.approved);
        assert!(port.confirm_intent_evolution("INT-001", "summary").await.approved);
    }

    #[tokio::test]
    async fn always_reject_rejects_with_feedback() {
        let port = AlwaysReject;
        let response = port.confirm_destructive("rm -rf /", &CommandClassification::unknown(), None).await;
        assert!(!response.approved);
        assert!(response.feedback.is_some());
    }
}
