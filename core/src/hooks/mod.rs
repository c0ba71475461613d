//! The required pre- and post-hooks from the component design, each in its
//! own module so the registry wiring in [`crate::lib`] reads as a flat
//! list of what governs a tool call.

pub mod command_classifier_hook;
pub mod intent_gatekeeper;
pub mod lesson_recorder;
pub mod lock_releaser;
pub mod recovery_logger;
pub mod scope_enforcer;
pub mod stale_file_detector;
pub mod trace_recorder;

pub(crate) fn arg_str<'a>(args: &'a serde_json::Value, key: &str) -> Option<&'a str> {
    args.get(key).and_then(|v| v.as_str())
}
