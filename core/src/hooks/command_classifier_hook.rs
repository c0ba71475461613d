//! Pre-hook on `execute_command`: exclusion rules, then classification,
//! then approval for anything that isn't provably safe.

use async_trait::async_trait;
use governor_protocol::ErrorKind;

use crate::command_classifier;
use crate::hook::HookContext;
use crate::hook::PreHook;
use crate::hooks::arg_str;
use crate::recovery::destructive_command_response;
use crate::recovery::format_error;
use crate::services::Services;

pub struct CommandClassifierHook;

#[async_trait]
impl PreHook for CommandClassifierHook {
    async fn run(&self, ctx: &mut HookContext, services: &Services) -> anyhow::Result<()> {
        let Some(command) = arg_str(&ctx.args, "command") else {
            return Ok(());
        };
        let command = command.to_string();
        let intent_id = services.sessions.get(&ctx.session_id).and_then(|s| s.intent_id);

        if services.ignore_index.read().is_excluded(&command, intent_id.as_deref()) {
            ctx.block(format_error(
                ErrorKind::CommandExcluded,
                format!("'{command}' is excluded by the ignore rules"),
                None,
                None,
            ));
            return Ok(());
        }

        let classification = command_classifier::classify(&command);
        if !classification.requires_approval() {
            return Ok(());
        }

        if services.ignore_index.read().allows_destructive(intent_id.as_deref()) {
            return Ok(());
        }

        let response = services
            .approval
            .confirm_destructive(&command, &classification, intent_id.as_deref())
            .await;
        if response.approved {
            ctx.user_feedback = response.feedback;
            return Ok(());
        }

        ctx.block(destructive_command_response(
            &command,
            classification.suggested_alternative.as_deref(),
        ));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "command_classifier_hook"
    }
}
