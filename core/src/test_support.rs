//! Shared test fixtures for hook and pipeline unit tests.

use std::sync::Arc;

use crate::approval::AlwaysApprove;
use crate::ignore_index::IgnoreIndex;
use crate::intent_store::IntentStore;
use crate::services::Services;
use crate::vcs::UnknownVcsProbe;

/// A fresh `Services` bundle rooted in a unique scratch directory, with an
/// empty intent store, default ignore rules, and an always-approving
/// approval port. Each call gets its own directory so tests never share
/// journal or log state.
pub fn test_services() -> Services {
    let dir = std::env::temp_dir().join(format!("governor-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    Services::new(
        IntentStore::load(dir.join("intents.yaml")),
        IgnoreIndex::load(dir.join("governorignore")),
        dir.join("trace.jsonl"),
        dir.join("lessons.md"),
        Arc::new(AlwaysApprove),
        Arc::new(UnknownVcsProbe),
    )
}
