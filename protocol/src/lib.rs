//! Wire types shared between `governor-core` and any front end that embeds
//! it (a CLI, an editor extension host, a test harness).
//!
//! This crate holds plain data: the things that get serialized into the
//! declarative intent store, the ignore file, the trace journal, and the
//! structured error payloads handed back to the calling agent. Everything
//! that *decides* what to do with this data lives in `governor-core`.

pub mod command;
pub mod error_kind;
pub mod intent;
pub mod mutation;
pub mod rule;
pub mod trace;

pub use command::CommandClassification;
pub use command::CommandRisk;
pub use error_kind::ErrorKind;
pub use error_kind::ErrorPayload;
pub use error_kind::LlmErrorResponse;
pub use error_kind::RecoveryPayload;
pub use intent::Intent;
pub use intent::IntentStatus;
pub use mutation::MutationClass;
pub use rule::IgnoreRule;
pub use rule::RuleKind;
pub use trace::Contributor;
pub use trace::ContributorKind;
pub use trace::FileEntry;
pub use trace::Range;
pub use trace::Related;
pub use trace::RelatedKind;
pub use trace::TraceConversation;
pub use trace::TraceMetadata;
pub use trace::TraceRecord;
pub use trace::VcsSnapshot;
