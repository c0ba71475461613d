//! Component K: tracks per-agent runtime state across tool calls.
//!
//! Read-versions live in [`crate::lock_manager::LockManager`] rather than
//! duplicated here — see the design notes on keeping `LockManager` and
//! `SessionRegistry` as flat peers keyed by opaque session ids instead of
//! holding references into each other.

use std::collections::HashMap;
use std::time::Duration;
use std::time::Instant;

use tracing::info;

const IDLE_EXPIRY: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub intent_id: Option<String>,
    pub model_id: Option<String>,
    pub conversation_id: Option<String>,
    pub tool_calls: u64,
    pub blocked_calls: u64,
    last_active: Instant,
}

impl Session {
    fn new(id: String) -> Self {
        Self {
            id,
            intent_id: None,
            model_id: None,
            conversation_id: None,
            tool_calls: 0,
            blocked_calls: 0,
            last_active: Instant::now(),
        }
    }

    fn touch(&mut self) {
        self.last_active = Instant::now();
    }
}

#[derive(Default)]
pub struct SessionRegistry {
    sessions: parking_lot::Mutex<HashMap<String, Session>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session for `id`, creating it on first contact.
    pub fn get_or_create(&self, id: &str) -> Session {
        let mut sessions = self.sessions.lock();
        let session = sessions.entry(id.to_string()).or_insert_with(|| Session::new(id.to_string()));
        session.touch();
        session.clone()
    }

    pub fn get(&self, id: &str) -> Option<Session> {
        self.sessions.lock().get(id).cloned()
    }

    pub fn set_intent(&self, id: &str, intent_id: Option<String>) {
        let mut sessions = self.sessions.lock();
        if let Some(session) = sessions.get_mut(id) {
            session.intent_id = intent_id;
            session.touch();
        }
    }

    pub fn set_model(&self, id: &str, model_id: Option<String>) {
        let mut sessions = self.sessions.lock();
        if let Some(session) = sessions.get_mut(id) {
            session.model_id = model_id;
            session.touch();
        }
    }

    pub fn record_call(&self, id: &str, blocked: bool) {
        let mut sessions = self.sessions.lock();
        if let Some(session) = sessions.get_mut(id) {
            session.tool_calls += 1;
            if blocked {
                session.blocked_calls += 1;
            }
            session.touch();
        }
    }

    /// Drop any session idle beyond [`IDLE_EXPIRY`]. Intended to be called
    /// on a periodic tick, the same cadence the lock reaper runs on.
    pub fn reap_idle(&self) {
        let mut sessions = self.sessions.lock();
        sessions.retain(|id, session| {
            let expired = session.last_active.elapsed() > IDLE_EXPIRY;
            if expired {
                info!(session = %id, "expiring idle session");
            }
            !expired
        });
    }

    pub fn spawn_reaper(self: std::sync::Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(IDLE_EXPIRY);
            loop {
                interval.tick().await;
                self.reap_idle();
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_or_create_is_idempotent_for_the_same_id() {
        let registry = SessionRegistry::new();
        let first = registry.get_or_create("S_A");
        registry.set_intent("S_A", Some("INT-001".to_string()));
        let second = registry.get_or_create("S_A");
        assert_eq!(first.id, second.id);
        assert_eq!(second.intent_id.as_deref(), Some("INT-001"));
    }

    #[test]
    fn unknown_session_lookup_is_none() {
        let registry = SessionRegistry::new();
        assert!(registry.get("ghost").is_none());
    }

    #[test]
    fn record_call_increments_counters() {
        let registry = SessionRegistry::new();
        registry.get_or_create("S_A");
        registry.record_call("S_A", false);
        registry.record_call("S_A", true);
        let session = registry.get("S_A").expect("session present");
        assert_eq!(session.tool_calls, 2);
        assert_eq!(session.blocked_calls, 1);
    }

    #[test]
    fn reap_idle_removes_only_expired_sessions() {
        let registry = SessionRegistry::new();
        registry.get_or_create("S_A");
        {
            let mut sessions = registry.sessions.lock();
            if let Some(session) = sessions.get_mut("S_A") {
                session.last_active = Instant::now() - Duration::from_secs(301);
            }
        }
        registry.get_or_create("S_B");
        registry.reap_idle();
        assert!(registry.get("S_A").is_none());
        assert!(registry.get("S_B").is_some());
    }
}
