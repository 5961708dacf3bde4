use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::{debug, info};
use uuid::Uuid;

use crate::analysis::Explorer;
use crate::config::ExplorerConfig;
use crate::error::ExplorerError;
use crate::models::ScenarioTable;

/// Maximum number of live sessions before the least recently used is evicted.
const MAX_SESSIONS: usize = 100;
/// Idle time after which a session expires (2 hours).
const SESSION_TTL_SECS: u64 = 2 * 60 * 60;

/// One user's editable scenario table and time settings.
#[derive(Debug, Clone)]
pub struct Session {
    pub table: ScenarioTable,
    pub explorer: Explorer,
}

type SessionMap = HashMap<Uuid, (Instant, Session)>;

pub struct AppState {
    config: ExplorerConfig,
    sessions: Mutex<SessionMap>,
}

impl AppState {
    pub fn new(config: ExplorerConfig) -> Self {
        Self {
            config,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, SessionMap> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a session with the seeded table and the configured time settings.
    pub fn create_session(&self) -> Result<(Uuid, Session), ExplorerError> {
        let session = Session {
            table: ScenarioTable::seeded(&self.config.defaults),
            explorer: Explorer::new(self.config.time)?,
        };
        let id = Uuid::new_v4();

        let mut map = self.lock();
        evict_expired(&mut map);
        if map.len() >= MAX_SESSIONS {
            evict_oldest(&mut map);
        }
        map.insert(id, (Instant::now(), session.clone()));
        info!(session = %id, live = map.len(), "created session");
        Ok((id, session))
    }

    /// Run `f` against a live session, refreshing its idle timer.
    pub fn with_session<R>(
        &self,
        id: &Uuid,
        f: impl FnOnce(&mut Session) -> Result<R, ExplorerError>,
    ) -> Result<R, ExplorerError> {
        let mut map = self.lock();
        evict_expired(&mut map);
        let (touched, session) = map
            .get_mut(id)
            .ok_or_else(|| ExplorerError::NotFound(format!("Session {id} not found")))?;
        *touched = Instant::now();
        f(session)
    }

    pub fn len(&self) -> usize {
        let mut map = self.lock();
        evict_expired(&mut map);
        map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn evict_expired(map: &mut SessionMap) {
    let ttl = Duration::from_secs(SESSION_TTL_SECS);
    let before = map.len();
    map.retain(|_, (touched, _)| touched.elapsed() < ttl);
    if map.len() < before {
        debug!(evicted = before - map.len(), "expired idle sessions");
    }
}

fn evict_oldest(map: &mut SessionMap) {
    if let Some(oldest_id) = map.iter().min_by_key(|(_, (t, _))| *t).map(|(id, _)| *id) {
        map.remove(&oldest_id);
        debug!(session = %oldest_id, "evicted least recently used session");
    }
}
