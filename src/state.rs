//! Application state: the shared item pool and the in-memory session store.
//!
//! Each session owns one engine plus its history and score. Every input event
//! runs under the store's write lock, so events for a session never overlap.
//! The store is bounded: idle sessions expire and the least recently used one
//! is evicted once the cap is reached.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::{load_pool_from_env, session_limits_from_env};
use crate::domain::{Feedback, Pool};
use crate::engine::{RoundEngine, Submission};
use crate::error::DrillError;
use crate::history::InMemoryHistory;
use crate::input::InputDispatcher;

/// One player's drill: engine, history, score and last feedback.
pub struct Session {
    pub id: String,
    pub engine: RoundEngine<StdRng>,
    pub history: InMemoryHistory,
    pub score: u32,
    pub last_feedback: Option<Feedback>,
    pub last_seen: Instant,
}

/// What a client asked for, already decoded from the wire.
#[derive(Debug, Clone)]
pub enum Answer {
    Index(usize),
    Key(String),
    Gloss(String),
}

impl Session {
    pub fn new(pool: Pool) -> Result<Self, DrillError> {
        let history = InMemoryHistory::default();
        let engine = RoundEngine::new(pool, &history, StdRng::from_entropy())?;
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            engine,
            history,
            score: 0,
            last_feedback: None,
            last_seen: Instant::now(),
        })
    }

    /// Routes one answer event through the input dispatcher.
    pub fn answer(&mut self, answer: &Answer) -> Result<Submission, DrillError> {
        let mut d = InputDispatcher {
            engine: &mut self.engine,
            history: &mut self.history,
            score: &mut self.score,
            feedback: &mut self.last_feedback,
        };
        match answer {
            Answer::Index(i) => d.select(*i),
            Answer::Key(code) => d.key(code),
            Answer::Gloss(g) => d.choose(g),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub pool_name: String,
    pub pool: Pool,
    pub sessions: Arc<RwLock<HashMap<String, Session>>>,
    pub limits: SessionLimits,
}

/// Bounds on the session store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    pub max_sessions: usize,
    pub idle_ttl: Duration,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            max_sessions: 1024,
            idle_ttl: Duration::from_secs(30 * 60),
        }
    }
}

/// Drops idle sessions, then the least recently seen ones until one slot is free.
/// Returns how many were removed.
fn evict(sessions: &mut HashMap<String, Session>, limits: SessionLimits, now: Instant) -> usize {
    let before = sessions.len();
    sessions.retain(|_, s| now.saturating_duration_since(s.last_seen) < limits.idle_ttl);
    let cap = limits.max_sessions.max(1);
    while sessions.len() >= cap {
        let oldest = sessions
            .iter()
            .min_by_key(|(_, s)| s.last_seen)
            .map(|(id, _)| id.clone());
        match oldest {
            Some(id) => {
                sessions.remove(&id);
            }
            None => break,
        }
    }
    before - sessions.len()
}

impl AppState {
    /// Build state from env: load the pool file or fall back to seeds.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Result<Self, DrillError> {
        let (pool_name, pool) = load_pool_from_env()?;
        Ok(Self::with_pool(pool_name, pool).with_limits(session_limits_from_env()))
    }

    pub fn with_pool(pool_name: String, pool: Pool) -> Self {
        info!(target: "pick_drill", pool = %pool_name, items = pool.len(), "Pool ready");
        Self {
            pool_name,
            pool,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            limits: SessionLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: SessionLimits) -> Self {
        self.limits = limits;
        self
    }

    /// A session not registered in the store (used by WebSocket connections).
    pub fn detached_session(&self) -> Result<Session, DrillError> {
        Session::new(self.pool.clone())
    }

    #[instrument(level = "info", skip(self))]
    pub async fn create_session(&self) -> Result<String, DrillError> {
        let session = self.detached_session()?;
        let id = session.id.clone();
        let mut sessions = self.sessions.write().await;
        let evicted = evict(&mut sessions, self.limits, Instant::now());
        if evicted > 0 {
            info!(target: "pick_drill", evicted, "Evicted stale sessions");
        }
        sessions.insert(id.clone(), session);
        info!(target: "pick_drill", session = %id, live = sessions.len(), "Session created");
        Ok(id)
    }

    /// Runs `f` against one session under the write lock.
    pub async fn with_session<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut Session) -> Result<T, DrillError>,
    ) -> Result<T, DrillError> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(id) {
            Some(s) => {
                s.last_seen = Instant::now();
                f(s)
            }
            None => {
                warn!(target: "pick_drill", session = %id, "Unknown session");
                Err(DrillError::UnknownSession(id.to_string()))
            }
        }
    }

    #[instrument(level = "info", skip(self))]
    pub async fn remove_session(&self, id: &str) -> Result<(), DrillError> {
        match self.sessions.write().await.remove(id) {
            Some(_) => {
                info!(target: "pick_drill", session = %id, "Session removed");
                Ok(())
            }
            None => Err(DrillError::UnknownSession(id.to_string())),
        }
    }
}
