//! Pre-hook on `write_to_file`: optimistic-lock acquisition and
//! read-version validation. Stashes the on-disk content it reads into
//! `ctx.scratch` so `trace_recorder` can diff against it without a second
//! read.

use async_trait::async_trait;
use governor_protocol::ErrorKind;

use crate::hook::HookContext;
use crate::hook::PreHook;
use crate::hook::SCRATCH_ORIGINAL_CONTENT;
use crate::hooks::arg_str;
use crate::lock_manager::AcquireResult;
use crate::lock_manager::ValidateResult;
use crate::recovery::file_locked_response;
use crate::recovery::format_error;
use crate::services::Services;

pub struct StaleFileDetector;

#[async_trait]
impl PreHook for StaleFileDetector {
    async fn run(&self, ctx: &mut HookContext, services: &Services) -> anyhow::Result<()> {
        let Some(path) = arg_str(&ctx.args, "path").map(str::to_string) else {
            return Ok(());
        };

        match services.locks.acquire(&path, &ctx.session_id) {
            AcquireResult::Contended => {
                let handle = services.locks.queue_write(&path, &ctx.session_id);
                ctx.block(file_locked_response(handle.position));
                return Ok(());
            }
            AcquireResult::Acquired => {}
        }

        let on_disk = std::fs::read_to_string(&path).unwrap_or_default();
        match services.locks.validate_write(&path, &ctx.session_id, &on_disk) {
            ValidateResult::Ok => {
                ctx.scratch
                    .insert(SCRATCH_ORIGINAL_CONTENT.to_string(), serde_json::Value::String(on_disk));
                Ok(())
            }
            ValidateResult::Stale(current_hash) => {
                services.locks.release(&path, &ctx.session_id);
                ctx.block(format_error(
                    ErrorKind::StaleFile,
                    format!("'{path}' changed since it was last read"),
                    None,
                    Some(serde_json::json!({ "current_hash": current_hash })),
                ));
                Ok(())
            }
            ValidateResult::NoPriorRead => {
                services.locks.release(&path, &ctx.session_id);
                ctx.block(format_error(
                    ErrorKind::StaleFile,
                    format!("'{path}' was never read by this session"),
                    None,
                    None,
                ));
                Ok(())
            }
        }
    }

    fn name(&self) -> &'static str {
        "stale_file_detector"
    }
}
