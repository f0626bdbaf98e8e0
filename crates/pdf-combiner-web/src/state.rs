use bytes::Bytes;
use pdf_combiner_core::{AppConfig, Combiner, PendingList};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Pending files and last result of one browser session
pub struct SessionData {
    pub list: PendingList,
    /// Bytes of the most recent successful combine, served by the download route
    pub last_combined: Option<Bytes>,
    pub last_active: Instant,
}

impl SessionData {
    fn new() -> Self {
        Self {
            list: PendingList::new(),
            last_combined: None,
            last_active: Instant::now(),
        }
    }

    /// Keep the result of combining `combined_from` and drop those files
    /// from the list. Files added while the combine ran stay listed.
    pub fn finish_combine(&mut self, combined_from: &PendingList, bytes: Bytes) -> usize {
        self.last_combined = Some(bytes);
        self.list.remove_combined(combined_from)
    }
}

/// Global application state
pub struct AppState {
    /// Active sessions indexed by list id
    sessions: RwLock<HashMap<Uuid, SessionData>>,
    pub config: AppConfig,
    pub combiner: Combiner,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let combiner = Combiner::new(config.merge.clone());
        Self {
            sessions: RwLock::new(HashMap::new()),
            config,
            combiner,
        }
    }

    /// Session for `id`, inserting an empty one if it was evicted or never existed.
    pub async fn session_by_id(&self, id: Uuid) -> SessionRef<'_> {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(id)
            .and_modify(|s| s.last_active = Instant::now())
            .or_insert_with(SessionData::new);
        SessionRef { id, state: self }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop sessions idle for longer than `max_idle`. Returns how many were dropped.
    pub async fn cleanup_idle_sessions(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let now = Instant::now();
        let before = sessions.len();

        sessions.retain(|_, session| now.duration_since(session.last_active) < max_idle);

        before - sessions.len()
    }
}

/// A borrowed reference to a session that provides safe access patterns.
///
/// Locks are only taken inside the synchronous closures passed to
/// [`with_session`](Self::with_session) and
/// [`with_session_mut`](Self::with_session_mut), so no guard is ever held
/// across an `.await`.
pub struct SessionRef<'a> {
    id: Uuid,
    state: &'a AppState,
}

impl SessionRef<'_> {
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Access session data immutably within a closure.
    ///
    /// Returns `None` if the session was evicted in the meantime.
    pub async fn with_session<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&SessionData) -> R,
    {
        let sessions = self.state.sessions.read().await;
        sessions.get(&self.id).map(f)
    }

    /// Access session data mutably within a closure.
    pub async fn with_session_mut<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut SessionData) -> R,
    {
        let mut sessions = self.state.sessions.write().await;
        sessions.get_mut(&self.id).map(|s| {
            s.last_active = Instant::now();
            f(s)
        })
    }
}
