//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds the persona and
//! scenario catalogs and the registry of live consultation sessions, plus
//! the background task that evicts expired sessions from it.

use crate::config::Config;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use synthetic_patients_core::{PersonaStore, ScenarioCatalog, TurnEngine};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};
use uuid::Uuid;

struct SessionSlot {
    engine: Arc<Mutex<TurnEngine>>,
    last_used: Instant,
}

/// One engine per session, each behind its own lock so that sessions never
/// wait on each other.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, SessionSlot>>,
}

impl SessionRegistry {
    pub async fn insert(&self, id: Uuid, engine: TurnEngine) -> Arc<Mutex<TurnEngine>> {
        let engine = Arc::new(Mutex::new(engine));
        let slot = SessionSlot {
            engine: engine.clone(),
            last_used: Instant::now(),
        };
        self.sessions.write().await.insert(id, slot);
        engine
    }

    /// Looks up a session and marks it as used.
    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<TurnEngine>>> {
        let mut sessions = self.sessions.write().await;
        let slot = sessions.get_mut(&id)?;
        slot.last_used = Instant::now();
        Some(slot.engine.clone())
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops sessions unused for `idle_ttl`, and ended sessions unused for
    /// `ended_ttl`. Engines locked by a request in flight are kept.
    /// Returns the number of sessions evicted.
    pub async fn sweep(&self, now: Instant, idle_ttl: Duration, ended_ttl: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, slot| {
            let Ok(engine) = slot.engine.try_lock() else {
                return true;
            };
            let ttl = if engine.is_active() {
                idle_ttl
            } else {
                ended_ttl.min(idle_ttl)
            };
            let keep = now.saturating_duration_since(slot.last_used) < ttl;
            if !keep {
                debug!(session_id = %id, active = engine.is_active(), "Evicting session");
            }
            keep
        });
        before - sessions.len()
    }
}

/// Periodically evicts expired sessions from `state`.
pub fn spawn_session_sweeper(state: Arc<AppState>) -> JoinHandle<()> {
    let idle_ttl = state.config.session_idle_ttl;
    let ended_ttl = state.config.ended_session_ttl;
    let period = ended_ttl
        .min(idle_ttl)
        .clamp(Duration::from_secs(1), Duration::from_secs(60));

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let evicted = state
                .sessions
                .sweep(Instant::now(), idle_ttl, ended_ttl)
                .await;
            if evicted > 0 {
                let remaining = state.sessions.len().await;
                info!(
                    evicted,
                    remaining,
                    "Evicted expired sessions"
                );
            }
        }
    })
}

/// The shared application state, created once at startup and passed to all handlers.
pub struct AppState {
    pub config: Arc<Config>,
    pub personas: Arc<PersonaStore>,
    pub scenarios: Arc<ScenarioCatalog>,
    pub sessions: SessionRegistry,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config, personas: PersonaStore, scenarios: ScenarioCatalog) -> Self {
        Self {
            config: Arc::new(config),
            personas: Arc::new(personas),
            scenarios: Arc::new(scenarios),
            sessions: SessionRegistry::default(),
            started_at: Instant::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthetic_patients_core::ThreadRngPicker;

    const IDLE: Duration = Duration::from_secs(60);
    const ENDED: Duration = Duration::from_secs(5);

    fn started(persona_id: &str) -> TurnEngine {
        let mut engine = TurnEngine::new(
            Arc::new(PersonaStore::builtin()),
            Arc::new(ScenarioCatalog::builtin()),
            Box::new(ThreadRngPicker),
        );
        engine.start(persona_id).unwrap();
        engine
    }

    #[tokio::test]
    async fn test_ended_sessions_are_evicted_after_grace_period() {
        let registry = SessionRegistry::default();
        let (active, ended) = (Uuid::new_v4(), Uuid::new_v4());
        registry.insert(active, started("maria-santos")).await;
        registry
            .insert(ended, started("james-wilson"))
            .await
            .lock()
            .await
            .end()
            .unwrap();
        let now = Instant::now();

        assert_eq!(registry.sweep(now, IDLE, ENDED).await, 0);
        assert_eq!(registry.len().await, 2);

        let evicted = registry.sweep(now + Duration::from_secs(10), IDLE, ENDED).await;
        assert_eq!(evicted, 1);
        assert!(registry.get(active).await.is_some());
        assert!(registry.get(ended).await.is_none());
    }

    #[tokio::test]
    async fn test_idle_sessions_are_evicted() {
        let registry = SessionRegistry::default();
        registry.insert(Uuid::new_v4(), started("maria-santos")).await;
        registry.insert(Uuid::new_v4(), started("ahmed-al-farsi")).await;

        let later = Instant::now() + IDLE + Duration::from_secs(1);
        assert_eq!(registry.sweep(later, IDLE, ENDED).await, 2);
        assert_eq!(registry.len().await, 0);
    }

    #[tokio::test]
    async fn test_locked_sessions_survive_sweep() {
        let registry = SessionRegistry::default();
        let id = Uuid::new_v4();
        let engine = registry.insert(id, started("maria-santos")).await;
        let _guard = engine.lock().await;

        let later = Instant::now() + IDLE * 10;
        assert_eq!(registry.sweep(later, IDLE, ENDED).await, 0);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_remove() {
        let registry = SessionRegistry::default();
        let id = Uuid::new_v4();
        registry.insert(id, started("maria-santos")).await;

        assert!(registry.remove(id).await);
        assert!(!registry.remove(id).await);
        assert!(registry.get(id).await.is_none());
    }
}
