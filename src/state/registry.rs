//! Who is online.
//!
//! The registry maps usernames to live sessions. It is the single place that
//! enforces name uniqueness: [`SessionRegistry::try_register`] inserts through
//! the entry API, so the vacancy check and the insert happen under one shard
//! lock and at most one of two concurrent claims on a name can win.

use crate::state::{DashMapExt, Session};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;

/// Concurrent map of username to session.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, Arc<Session>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `username` for `session`.
    ///
    /// Returns false, leaving the registry untouched, if the name is taken.
    pub fn try_register(&self, username: &str, session: &Arc<Session>) -> bool {
        match self.sessions.entry(username.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Arc::clone(session));
                true
            }
        }
    }

    /// Release `username`. A no-op if it is not registered.
    pub fn remove(&self, username: &str) -> Option<Arc<Session>> {
        self.sessions.remove(username).map(|(_, session)| session)
    }

    /// The session holding `username`, if any.
    pub fn lookup(&self, username: &str) -> Option<Arc<Session>> {
        self.sessions.get_cloned(username)
    }

    /// Point-in-time list of online usernames, sorted.
    pub fn snapshot(&self) -> Vec<String> {
        let mut names = self.sessions.keys_cloned();
        names.sort_unstable();
        names
    }

    /// Point-in-time list of online sessions, safe to hold across `.await`.
    pub fn sessions(&self) -> Vec<Arc<Session>> {
        self.sessions.values_cloned()
    }

    /// Number of online users.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn session(id: u64) -> Arc<Session> {
        let (tx, _rx) = mpsc::channel(1);
        let addr = "127.0.0.1:5000".parse().unwrap();
        Arc::new(Session::new(id, addr, tx, Duration::from_millis(10)))
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = SessionRegistry::new();
        let alice = session(1);

        assert!(registry.try_register("alice", &alice));
        assert_eq!(registry.lookup("alice").map(|s| s.id), Some(1));
        assert!(registry.lookup("bob").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let registry = SessionRegistry::new();
        assert!(registry.try_register("alice", &session(1)));
        assert!(!registry.try_register("alice", &session(2)));
        // First holder is not displaced.
        assert_eq!(registry.lookup("alice").map(|s| s.id), Some(1));
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let registry = SessionRegistry::new();
        assert!(registry.try_register("alice", &session(1)));
        assert!(registry.try_register("Alice", &session(2)));
        assert_eq!(registry.snapshot(), vec!["Alice", "alice"]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let registry = SessionRegistry::new();
        registry.try_register("alice", &session(1));

        assert!(registry.remove("alice").is_some());
        assert!(registry.remove("alice").is_none());
        assert!(registry.is_empty());
        // Name is free again.
        assert!(registry.try_register("alice", &session(2)));
    }

    #[test]
    fn test_snapshot_is_sorted_copy() {
        let registry = SessionRegistry::new();
        for (id, name) in [(1, "carol"), (2, "alice"), (3, "bob")] {
            registry.try_register(name, &session(id));
        }
        let snapshot = registry.snapshot();
        registry.remove("bob");
        assert_eq!(snapshot, vec!["alice", "bob", "carol"]);
        assert_eq!(registry.sessions().len(), 2);
    }

    #[test]
    fn test_concurrent_claims_have_one_winner() {
        for _ in 0..50 {
            let registry = Arc::new(SessionRegistry::new());
            let handles: Vec<_> = (0..8)
                .map(|id| {
                    let registry = Arc::clone(&registry);
                    std::thread::spawn(move || registry.try_register("alice", &session(id)))
                })
                .collect();

            let winners = handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|won| *won)
                .count();
            assert_eq!(winners, 1);
            assert_eq!(registry.len(), 1);
        }
    }
}
