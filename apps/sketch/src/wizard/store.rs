use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::DEFAULT_SESSION_TTL_SECS;
use crate::errors::AppError;
use crate::wizard::session::WizardSession;

pub type SharedSession = Arc<Mutex<WizardSession>>;

struct Entry {
    session: SharedSession,
    last_touched: Instant,
}

/// In-memory wizard sessions keyed by id. Nothing is persisted. A session
/// untouched for longer than the TTL is treated as gone and dropped by the
/// next sweep.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_SESSION_TTL_SECS))
    }
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn create(&self) -> (Uuid, SharedSession) {
        self.evict_expired();

        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(WizardSession::new()));
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                id,
                Entry {
                    session: session.clone(),
                    last_touched: Instant::now(),
                },
            );
        info!("Created wizard session {id}");
        (id, session)
    }

    /// Looks a session up and refreshes its idle timer.
    pub fn get(&self, id: Uuid) -> Result<SharedSession, AppError> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);

        match sessions.get_mut(&id) {
            Some(entry) if now.duration_since(entry.last_touched) <= self.ttl => {
                entry.last_touched = now;
                Ok(entry.session.clone())
            }
            Some(_) => {
                sessions.remove(&id);
                debug!("Wizard session {id} expired");
                Err(not_found(id))
            }
            None => Err(not_found(id)),
        }
    }

    pub fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .map(|_| info!("Discarded wizard session {id}"))
            .ok_or_else(|| not_found(id))
    }

    /// Drops every session idle for longer than the TTL. Returns how many went.
    pub fn evict_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_touched) <= self.ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Evicted {evicted} idle wizard sessions");
        }
        evicted
    }

    /// Sweeps expired sessions every `period` for as long as the process runs.
    pub async fn run_sweeper(self, period: Duration) {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            self.evict_expired();
        }
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}

/// Locks one session. The guard must not be held across an `.await`.
pub fn lock(session: &SharedSession) -> MutexGuard<'_, WizardSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}
