//! Server-side session store shared across requests

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use sessionkit_core::SessionData;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
struct StoredSession {
    data: SessionData,
    /// `None` keeps the entry until it is removed
    expires_at: Option<DateTime<Utc>>,
}

impl StoredSession {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Cloneable handle to the session data of every client.
///
/// Entries past their expiry read as absent and are dropped lazily.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, StoredSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self, id: &str) -> Option<SessionData> {
        let now = Utc::now();
        let expired = match self.sessions.get(id) {
            Some(entry) if !entry.is_expired(now) => return Some(entry.data.clone()),
            Some(_) => true,
            None => false,
        };

        if expired {
            self.sessions.remove(id);
            debug!(session_id = %id, "Dropped expired session");
        }
        None
    }

    pub fn contains(&self, id: &str) -> bool {
        self.load(id).is_some()
    }

    /// Replace the entry for `id`; `ttl` of `None`, or one reaching past the
    /// representable date range, never expires
    pub fn save(&self, id: &str, data: SessionData, ttl: Option<Duration>) {
        let expires_at = ttl.and_then(|ttl| Utc::now().checked_add_signed(ttl));
        self.sessions
            .insert(id.to_string(), StoredSession { data, expires_at });
    }

    /// Remove the entry and return its data if it was still live
    pub fn take(&self, id: &str) -> Option<SessionData> {
        let now = Utc::now();
        self.sessions
            .remove(id)
            .filter(|(_, stored)| !stored.is_expired(now))
            .map(|(_, stored)| stored.data)
    }

    pub fn remove(&self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, stored| !stored.is_expired(now));
        let purged = before - self.sessions.len();
        if purged > 0 {
            debug!(purged, "Purged expired sessions");
        }
        purged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: &str) -> SessionData {
        let mut data = SessionData::new();
        data.insert("foo".to_string(), json!(value));
        data
    }

    #[test]
    fn test_save_and_load() {
        let store = SessionStore::new();
        store.save("id-1", data("a-foo"), Some(Duration::seconds(300)));

        assert_eq!(store.load("id-1"), Some(data("a-foo")));
        assert!(store.contains("id-1"));
        assert_eq!(store.load("id-2"), None);
    }

    #[test]
    fn test_expired_entry_reads_as_absent() {
        let store = SessionStore::new();
        store.save("old", data("a-foo"), Some(Duration::seconds(-1)));

        assert_eq!(store.load("old"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_no_ttl_never_expires() {
        let store = SessionStore::new();
        store.save("forever", data("a-foo"), None);

        assert_eq!(store.purge_expired(), 0);
        assert!(store.contains("forever"));
    }

    #[test]
    fn test_ttl_past_date_range_never_expires() {
        let store = SessionStore::new();
        store.save("far", data("a-foo"), Some(Duration::MAX));

        assert_eq!(store.purge_expired(), 0);
        assert_eq!(store.load("far"), Some(data("a-foo")));
    }

    #[test]
    fn test_take_removes_entry() {
        let store = SessionStore::new();
        store.save("id", data("a-foo"), None);
        store.save("gone", data("b"), Some(Duration::seconds(-1)));

        assert_eq!(store.take("id"), Some(data("a-foo")));
        assert_eq!(store.take("gone"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_purge_expired() {
        let store = SessionStore::new();
        store.save("live", data("a"), Some(Duration::seconds(300)));
        store.save("dead-1", data("b"), Some(Duration::seconds(-5)));
        store.save("dead-2", data("c"), Some(Duration::seconds(-5)));

        assert_eq!(store.purge_expired(), 2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clones_share_entries() {
        let store = SessionStore::new();
        let other = store.clone();
        store.save("id", data("a"), None);

        assert!(other.remove("id"));
        assert!(!store.contains("id"));
    }
}
