//! Process-wide services, created once at bootstrap and handed to the
//! pipeline by dependency injection rather than reached for as global
//! singletons. Tests construct fresh instances per-case.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::approval::UserApprovalPort;
use crate::ignore_index::IgnoreIndex;
use crate::intent_store::IntentStore;
use crate::lesson_log::LessonLog;
use crate::lock_manager::LockManager;
use crate::session::SessionRegistry;
use crate::trace_store::TraceStore;
use crate::vcs::VcsProbe;

#[derive(Clone)]
pub struct Services {
    pub intents: Arc<RwLock<IntentStore>>,
    pub ignore_index: Arc<RwLock<IgnoreIndex>>,
    pub locks: Arc<LockManager>,
    pub sessions: Arc<SessionRegistry>,
    pub trace: Arc<TraceStore>,
    pub lessons: Arc<LessonLog>,
    pub approval: Arc<dyn UserApprovalPort>,
    pub vcs: Arc<dyn VcsProbe>,
}

impl Services {
    pub fn new(
        intents: IntentStore,
        ignore_index: IgnoreIndex,
        trace_journal: impl Into<std::path::PathBuf>,
        lesson_log: impl Into<std::path::PathBuf>,
        approval: Arc<dyn UserApprovalPort>,
        vcs: Arc<dyn VcsProbe>,
    ) -> Self {
        Self {
            intents: Arc::new(RwLock::new(intents)),
            ignore_index: Arc::new(RwLock::new(ignore_index)),
            locks: Arc::new(LockManager::new()),
            sessions: Arc::new(SessionRegistry::new()),
            trace: Arc::new(TraceStore::new(trace_journal)),
            lessons: Arc::new(LessonLog::new(lesson_log)),
            approval,
            vcs,
        }
    }
}
