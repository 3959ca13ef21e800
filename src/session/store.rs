// src/session/store.rs
// Process-lifetime session table with per-session turn serialization

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use super::types::{Message, Role, Session};
use crate::error::{Result, VizzyError};

/// One session plus the locks that order its turns.
///
/// `turn` is held for a whole request so concurrent turns on one session run in arrival
/// order. `state` is only write-locked for the instant of an append, so reads never wait
/// on remote calls.
#[derive(Debug)]
pub struct SessionHandle {
    id: String,
    turn: Mutex<()>,
    state: RwLock<Session>,
}

/// Exclusive right to run one turn on a session
pub struct Turn<'a> {
    handle: &'a SessionHandle,
    _guard: MutexGuard<'a, ()>,
}

impl SessionHandle {
    fn new(id: String) -> Self {
        Self {
            state: RwLock::new(Session::new(id.clone())),
            turn: Mutex::new(()),
            id,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Wait for earlier turns on this session to finish
    pub async fn begin_turn(&self) -> Turn<'_> {
        let guard = self.turn.lock().await;
        Turn {
            handle: self,
            _guard: guard,
        }
    }

    /// Read-only copy of the current session state
    pub async fn snapshot(&self) -> Session {
        self.state.read().await.clone()
    }

    /// Append messages atomically, folding user prompts into the taste profile
    pub async fn append(&self, messages: Vec<Message>) {
        let mut session = self.state.write().await;
        for message in messages {
            if message.role == Role::User {
                session.taste.absorb(&message.content);
            }
            session.messages.push(message);
        }
        debug!(session_id = %self.id, total = session.messages.len(), "Session appended");
    }
}

impl Turn<'_> {
    /// Recent history visible to this turn
    pub async fn history(&self, limit: usize) -> Vec<Message> {
        self.handle.state.read().await.recent(limit).to_vec()
    }

    /// Record the completed turn. Consumes the guard, releasing the session.
    pub async fn commit(self, user: Message, assistant: Message) {
        self.handle.append(vec![user, assistant]).await;
    }
}

/// Keyed session table shared by all requests
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Arc<SessionHandle>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chat-creation path: mint a session when no id is given, adopt unknown ids. Never fails.
    ///
    /// A minted session is not registered until [`persist`](Self::persist) is called, so a
    /// turn that fails leaves nothing behind. Caller-supplied ids are registered at once
    /// because concurrent turns on the same id must share one handle.
    pub async fn open(&self, session_id: Option<&str>) -> Arc<SessionHandle> {
        let id = match normalize(session_id) {
            Some(id) => id.to_string(),
            None => return Arc::new(SessionHandle::new(Uuid::new_v4().to_string())),
        };

        if let Some(handle) = self.sessions.read().await.get(&id) {
            return handle.clone();
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(id.clone())
            .or_insert_with(|| {
                info!(session_id = %id, "Session created with caller-supplied id");
                Arc::new(SessionHandle::new(id.clone()))
            })
            .clone()
    }

    /// Existing session for a known id, a fresh one for no id, `SessionNotFound` otherwise
    pub async fn get_or_create(&self, session_id: Option<&str>) -> Result<Arc<SessionHandle>> {
        match normalize(session_id) {
            Some(id) => self
                .handle(id)
                .await
                .ok_or_else(|| VizzyError::SessionNotFound(id.to_string())),
            None => Ok(self.mint().await),
        }
    }

    /// Register a handle from [`open`](Self::open). A no-op for one already in the table.
    pub async fn persist(&self, handle: &Arc<SessionHandle>) {
        let mut sessions = self.sessions.write().await;
        if !sessions.contains_key(handle.id()) {
            info!(session_id = %handle.id(), "Session created");
            sessions.insert(handle.id().to_string(), handle.clone());
        }
    }

    /// Read-only retrieval of a session
    pub async fn lookup(&self, session_id: &str) -> Result<Session> {
        match self.handle(session_id).await {
            Some(handle) => Ok(handle.snapshot().await),
            None => Err(VizzyError::SessionNotFound(session_id.to_string())),
        }
    }

    /// Append messages to a known session
    pub async fn append(&self, session_id: &str, messages: Vec<Message>) -> Result<()> {
        let handle = self
            .handle(session_id)
            .await
            .ok_or_else(|| VizzyError::SessionNotFound(session_id.to_string()))?;
        handle.append(messages).await;
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    async fn handle(&self, session_id: &str) -> Option<Arc<SessionHandle>> {
        self.sessions.read().await.get(session_id).cloned()
    }

    async fn mint(&self) -> Arc<SessionHandle> {
        let id = Uuid::new_v4().to_string();
        let handle = Arc::new(SessionHandle::new(id.clone()));
        self.sessions.write().await.insert(id.clone(), handle.clone());
        info!(session_id = %id, "Session created");
        handle
    }
}

fn normalize(session_id: Option<&str>) -> Option<&str> {
    session_id.map(str::trim).filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_open_mints_when_no_id() {
        let store = SessionStore::new();
        let a = store.open(None).await;
        let b = store.open(Some("  ")).await;
        assert_ne!(a.id(), b.id());
        assert!(Uuid::parse_str(a.id()).is_ok());

        // Minted sessions stay out of the table until persisted
        assert!(store.is_empty().await);
        assert!(store.lookup(a.id()).await.is_err());

        store.persist(&a).await;
        store.persist(&b).await;
        assert_eq!(store.len().await, 2);
        let found = store.get_or_create(Some(a.id())).await.unwrap();
        assert!(Arc::ptr_eq(&found, &a));
    }

    #[tokio::test]
    async fn test_persist_keeps_existing_handle() {
        let store = SessionStore::new();
        let adopted = store.open(Some("kept")).await;
        adopted.append(vec![Message::user("first")]).await;

        store.persist(&adopted).await;
        assert_eq!(store.len().await, 1);
        assert_eq!(store.lookup("kept").await.unwrap().messages.len(), 1);
    }

    #[tokio::test]
    async fn test_open_adopts_unknown_id_and_reuses_it() {
        let store = SessionStore::new();
        let first = store.open(Some("test_session_001")).await;
        let second = store.open(Some("test_session_001")).await;
        assert_eq!(first.id(), "test_session_001");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_or_create_rejects_unknown_id() {
        let store = SessionStore::new();
        let err = store.get_or_create(Some("missing")).await.unwrap_err();
        assert!(matches!(err, VizzyError::SessionNotFound(id) if id == "missing"));

        let minted = store.get_or_create(None).await.unwrap();
        let again = store.get_or_create(Some(minted.id())).await.unwrap();
        assert!(Arc::ptr_eq(&minted, &again));
    }

    #[tokio::test]
    async fn test_lookup_unknown_session() {
        let store = SessionStore::new();
        assert!(matches!(
            store.lookup("nope").await,
            Err(VizzyError::SessionNotFound(_))
        ));
        assert!(store.append("nope", vec![Message::user("x")]).await.is_err());
    }

    #[tokio::test]
    async fn test_commit_appends_turn_and_taste() {
        let store = SessionStore::new();
        let handle = store.get_or_create(None).await.unwrap();
        let turn = handle.begin_turn().await;
        turn.commit(
            Message::user("A dark shadowy forest"),
            Message::assistant("Here is your forest"),
        )
        .await;

        let session = store.lookup(handle.id()).await.unwrap();
        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.messages[0].role, Role::User);
        assert_eq!(session.messages[1].role, Role::Assistant);
        assert_eq!(session.taste.themes, vec!["dark", "shadowy", "forest"]);
    }

    #[tokio::test]
    async fn test_turns_on_one_session_keep_arrival_order() {
        let store = SessionStore::new();
        let handle = store.open(Some("ordered")).await;

        let (locked_tx, locked_rx) = tokio::sync::oneshot::channel();
        let slow = {
            let handle = handle.clone();
            tokio::spawn(async move {
                let turn = handle.begin_turn().await;
                let _ = locked_tx.send(());
                tokio::time::sleep(Duration::from_millis(50)).await;
                turn.commit(Message::user("first"), Message::assistant("one")).await;
            })
        };
        locked_rx.await.unwrap();

        // Arrives second; must wait for the first turn even though it has nothing to wait on
        let fast = {
            let handle = handle.clone();
            tokio::spawn(async move {
                let turn = handle.begin_turn().await;
                turn.commit(Message::user("second"), Message::assistant("two")).await;
            })
        };
        slow.await.unwrap();
        fast.await.unwrap();

        let contents: Vec<_> = store
            .lookup("ordered")
            .await
            .unwrap()
            .messages
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(contents, vec!["first", "one", "second", "two"]);
    }

    #[tokio::test]
    async fn test_dropped_turn_appends_nothing() {
        let store = SessionStore::new();
        let handle = store.get_or_create(None).await.unwrap();
        {
            let turn = handle.begin_turn().await;
            let _ = turn.history(10).await;
        }
        assert!(store.lookup(handle.id()).await.unwrap().messages.is_empty());
        // Guard was released
        let _turn = handle.begin_turn().await;
    }

    #[tokio::test]
    async fn test_distinct_sessions_do_not_block() {
        let store = SessionStore::new();
        let a = store.open(Some("a")).await;
        let b = store.open(Some("b")).await;
        let _held = a.begin_turn().await;
        let turn = tokio::time::timeout(Duration::from_millis(100), b.begin_turn())
            .await
            .expect("session b must not wait on session a");
        turn.commit(Message::user("hi"), Message::assistant("hello")).await;
        assert_eq!(store.lookup("b").await.unwrap().messages.len(), 2);
    }
}
