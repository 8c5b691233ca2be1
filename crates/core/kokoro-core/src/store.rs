//! Session persistence contract and the in-memory reference store

use crate::affection::AffectionSession;
use crate::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::RwLock;

/// Persistence boundary for affection sessions
///
/// The tracker performs one store round-trip per turn; everything else in
/// the pipeline is pure computation. Implementations must tolerate unknown
/// ids and must never fabricate sessions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch a session by id, `None` when it does not exist
    async fn get(&self, id: &str) -> Result<Option<AffectionSession>>;

    /// Persist a session, overwriting any previous record
    ///
    /// Returns `true` when the session was newly created, `false` when an
    /// existing record was replaced.
    async fn put(&self, session: &AffectionSession) -> Result<bool>;

    /// Ids of every persisted session, in no particular order
    async fn list_ids(&self) -> Result<Vec<String>>;

    /// Remove one session. Returns whether it existed.
    async fn delete(&self, id: &str) -> Result<bool>;

    /// Remove sessions idle longer than `max_age`, returning the count
    async fn delete_expired(&self, max_age: Duration) -> Result<usize>;
}

/// HashMap-backed store for tests and single-process deployments
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, AffectionSession>>,
}

impl MemorySessionStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions
    pub fn len(&self) -> usize {
        self.sessions.read().unwrap().len()
    }

    /// Whether the store holds no sessions
    pub fn is_empty(&self) -> bool {
        self.sessions.read().unwrap().is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, id: &str) -> Result<Option<AffectionSession>> {
        Ok(self.sessions.read().unwrap().get(id).cloned())
    }

    async fn put(&self, session: &AffectionSession) -> Result<bool> {
        let previous = self
            .sessions
            .write()
            .unwrap()
            .insert(session.id.clone(), session.clone());
        Ok(previous.is_none())
    }

    async fn list_ids(&self) -> Result<Vec<String>> {
        Ok(self.sessions.read().unwrap().keys().cloned().collect())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.sessions.write().unwrap().remove(id).is_some())
    }

    async fn delete_expired(&self, max_age: Duration) -> Result<usize> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().unwrap();
        let before = sessions.len();
        sessions.retain(|_, session| session.idle_for(now) <= max_age);
        Ok(before - sessions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: &str, level: u8) -> AffectionSession {
        AffectionSession::new(id, level, Utc::now())
    }

    #[tokio::test]
    async fn test_put_reports_creation() {
        let store = MemorySessionStore::new();
        assert!(store.put(&session("s1", 15)).await.unwrap());
        assert!(!store.put(&session("s1", 20)).await.unwrap());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_get_round_trips_state() {
        let store = MemorySessionStore::new();
        let mut original = session("s1", 15);
        original.apply_clamped(7, Utc::now());
        store.put(&original).await.unwrap();

        let loaded = store.get("s1").await.unwrap().unwrap();
        assert_eq!(loaded.affection_level, 22);
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_and_list() {
        let store = MemorySessionStore::new();
        store.put(&session("a", 10)).await.unwrap();
        store.put(&session("b", 20)).await.unwrap();

        let mut ids = store.list_ids().await.unwrap();
        ids.sort();
        assert_eq!(ids, vec!["a", "b"]);

        assert!(store.delete("a").await.unwrap());
        assert!(!store.delete("a").await.unwrap());
        assert_eq!(store.list_ids().await.unwrap(), vec!["b"]);
    }

    #[tokio::test]
    async fn test_delete_expired_keeps_active_sessions() {
        let store = MemorySessionStore::new();
        let mut stale = session("stale", 15);
        stale.last_interaction_time = Utc::now() - Duration::days(40);
        store.put(&stale).await.unwrap();
        store.put(&session("fresh", 15)).await.unwrap();

        let removed = store.delete_expired(Duration::days(30)).await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.list_ids().await.unwrap(), vec!["fresh"]);
    }
}
