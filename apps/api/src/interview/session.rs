//! Interview Session Store — the only shared mutable resource in the system.
//!
//! The store maps caller-supplied session ids to conversation state. It is an
//! injected capability (`Arc<dyn SessionStore>` in `AppState`) so a
//! persistent or distributed backend can replace the in-memory map without
//! touching the turn engine.
//!
//! Each session sits behind its own `tokio::sync::Mutex`: a turn acquires it
//! on entry and releases it on exit (including failure), so concurrent turns
//! against the same id serialize instead of racing on the turn sequence.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::models::interview::TurnRecord;

/// Mutable conversation state for one interview session.
#[derive(Debug)]
pub struct SessionState {
    pub resume_text: String,
    pub job_description: String,
    /// May be updated on any turn.
    pub custom_instructions: String,
    /// Ordered turn history. At most the last entry may lack an answer.
    pub turns: Vec<TurnRecord>,
    pub last_active: Instant,
}

impl SessionState {
    fn new(resume_text: String, job_description: String, custom_instructions: String) -> Self {
        SessionState {
            resume_text,
            job_description,
            custom_instructions,
            turns: Vec::new(),
            last_active: Instant::now(),
        }
    }

    /// True when the most recent turn has a question but no recorded answer.
    pub fn awaiting_answer(&self) -> bool {
        self.turns.last().is_some_and(|t| t.answer.is_none())
    }

    pub fn touch(&mut self) {
        self.last_active = Instant::now();
    }
}

/// A session plus its per-session mutual-exclusion scope.
pub type SharedSession = Arc<tokio::sync::Mutex<SessionState>>;

/// The session-store capability.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Creates a session under `session_id`, overwriting any existing one —
    /// repeated ids reset the conversation rather than erroring.
    async fn create(
        &self,
        session_id: &str,
        resume_text: String,
        job_description: String,
        custom_instructions: String,
    ) -> SharedSession;

    async fn get(&self, session_id: &str) -> Option<SharedSession>;

    /// Idempotent: deleting an absent session is a no-op.
    async fn delete(&self, session_id: &str);

    /// Evicts sessions idle longer than the store's TTL. Returns the number
    /// evicted.
    async fn purge_expired(&self) -> usize;

    /// Active session count, surfaced by the health endpoint.
    async fn len(&self) -> usize;
}

/// Volatile in-memory backend. Process restart loses all sessions — a
/// documented limitation of the scoped use case.
pub struct InMemorySessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, SharedSession>>,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(
        &self,
        session_id: &str,
        resume_text: String,
        job_description: String,
        custom_instructions: String,
    ) -> SharedSession {
        let session = Arc::new(tokio::sync::Mutex::new(SessionState::new(
            resume_text,
            job_description,
            custom_instructions,
        )));
        self.sessions
            .write()
            .expect("session map lock poisoned")
            .insert(session_id.to_string(), Arc::clone(&session));
        session
    }

    async fn get(&self, session_id: &str) -> Option<SharedSession> {
        self.sessions
            .read()
            .expect("session map lock poisoned")
            .get(session_id)
            .cloned()
    }

    async fn delete(&self, session_id: &str) {
        self.sessions
            .write()
            .expect("session map lock poisoned")
            .remove(session_id);
    }

    async fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write().expect("session map lock poisoned");
        let before = sessions.len();
        // A locked session has a turn in flight — leave it alone regardless
        // of its recorded idle time.
        sessions.retain(|_, session| match session.try_lock() {
            Ok(state) => state.last_active.elapsed() < self.ttl,
            Err(_) => true,
        });
        before - sessions.len()
    }

    async fn len(&self) -> usize {
        self.sessions
            .read()
            .expect("session map lock poisoned")
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> InMemorySessionStore {
        InMemorySessionStore::new(Duration::from_secs(3600))
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let store = store();
        store
            .create("s1", "resume".into(), "jd".into(), "".into())
            .await;

        let session = store.get("s1").await.expect("session should exist");
        let state = session.lock().await;
        assert_eq!(state.resume_text, "resume");
        assert!(state.turns.is_empty());
        assert!(!state.awaiting_answer());
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_none() {
        assert!(store().get("missing").await.is_none());
    }

    #[tokio::test]
    async fn test_create_overwrites_existing_session() {
        let store = store();
        let first = store
            .create("s1", "old resume".into(), "jd".into(), "".into())
            .await;
        first
            .lock()
            .await
            .turns
            .push(TurnRecord::unanswered("Q1".into()));

        store
            .create("s1", "new resume".into(), "jd".into(), "".into())
            .await;

        let session = store.get("s1").await.unwrap();
        let state = session.lock().await;
        assert_eq!(state.resume_text, "new resume");
        assert!(state.turns.is_empty());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = store();
        store
            .create("s1", "resume".into(), "jd".into(), "".into())
            .await;
        store.delete("s1").await;
        store.delete("s1").await; // no-op
        assert!(store.get("s1").await.is_none());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_purge_evicts_idle_sessions() {
        let store = InMemorySessionStore::new(Duration::ZERO);
        store
            .create("s1", "resume".into(), "jd".into(), "".into())
            .await;

        let evicted = store.purge_expired().await;
        assert_eq!(evicted, 1);
        assert!(store.get("s1").await.is_none());
    }

    #[tokio::test]
    async fn test_purge_skips_locked_sessions() {
        let store = InMemorySessionStore::new(Duration::ZERO);
        let session = store
            .create("s1", "resume".into(), "jd".into(), "".into())
            .await;

        let guard = session.lock().await; // simulate an in-flight turn
        assert_eq!(store.purge_expired().await, 0);
        drop(guard);
        assert!(store.get("s1").await.is_some());
    }

    #[tokio::test]
    async fn test_purge_keeps_fresh_sessions() {
        let store = store();
        store
            .create("s1", "resume".into(), "jd".into(), "".into())
            .await;
        assert_eq!(store.purge_expired().await, 0);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_awaiting_answer_transitions() {
        let store = store();
        let session = store
            .create("s1", "resume".into(), "jd".into(), "".into())
            .await;
        let mut state = session.lock().await;

        assert!(!state.awaiting_answer());
        state.turns.push(TurnRecord::unanswered("Q1".into()));
        assert!(state.awaiting_answer());
        state.turns.last_mut().unwrap().answer = Some("A1".into());
        assert!(!state.awaiting_answer());
    }
}
