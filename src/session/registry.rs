//! Session registry implementation
//!
//! In-memory table of active sessions with per-session TTLs. Expiry is
//! enforced lazily on every touch and eagerly by a periodic sweep task, so
//! staleness is bounded by the sweep interval and abandoned sessions cannot
//! grow memory without bound. All operations take the single map lock for
//! pointer/field updates only, never across I/O or sleeps.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::SessionError;

/// A tracked client session
#[derive(Debug, Clone)]
pub struct Session {
    /// Free-text client label
    pub client_name: String,
    /// Wall-clock creation time
    pub created_at: DateTime<Utc>,
    /// Monotonic instant of the last refresh, used for liveness math
    last_seen: Instant,
    /// Wall-clock time of the last refresh, used for `expires_at`
    last_seen_wall: DateTime<Utc>,
    /// Caller-supplied TTL
    pub timeout: Duration,
}

impl Session {
    /// A session is live iff `now - last_seen <= timeout`
    fn is_live(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_seen) <= self.timeout
    }

    fn expires_at(&self) -> DateTime<Utc> {
        self.last_seen_wall + chrono::Duration::from_std(self.timeout).unwrap_or_default()
    }
}

/// Result of creating or refreshing a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTicket {
    /// Session id
    pub session_id: Uuid,
    /// When the session will expire if not refreshed again
    pub expires_at: DateTime<Utc>,
}

/// In-memory registry of active sessions
///
/// Guarded by a single coarse `Mutex`: every operation is O(1) and holds the
/// lock only for field updates.
pub struct SessionRegistry {
    sessions: Mutex<HashMap<Uuid, Session>>,
}

impl SessionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Create a new session and return its id and expiry
    ///
    /// Ids are v4 UUIDs, never reused. Always succeeds.
    pub fn create(&self, client_name: Option<String>, timeout: Duration) -> SessionTicket {
        let id = Uuid::new_v4();
        let now_wall = Utc::now();
        let session = Session {
            client_name: client_name.unwrap_or_else(|| "unknown".into()),
            created_at: now_wall,
            last_seen: Instant::now(),
            last_seen_wall: now_wall,
            timeout,
        };
        let expires_at = session.expires_at();

        let mut sessions = self.sessions.lock().expect("session lock poisoned");
        sessions.insert(id, session);

        tracing::info!(
            session_id = %id,
            timeout_secs = timeout.as_secs(),
            sessions = sessions.len(),
            "Session created"
        );

        SessionTicket {
            session_id: id,
            expires_at,
        }
    }

    /// Refresh a session's liveness and return its new expiry
    ///
    /// Fails with `NotFound` for unknown ids. A session found past its TTL
    /// is removed and the call fails with `Expired`; the next call for the
    /// same id then reports `NotFound`. Check and refresh happen atomically
    /// under the lock so a session can never be refreshed after it should
    /// have expired.
    pub fn touch(&self, id: Uuid) -> Result<SessionTicket, SessionError> {
        self.touch_at(id, Instant::now())
    }

    /// `touch` with an explicit liveness clock
    pub fn touch_at(&self, id: Uuid, now: Instant) -> Result<SessionTicket, SessionError> {
        let mut sessions = self.sessions.lock().expect("session lock poisoned");

        let session = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
        if !session.is_live(now) {
            sessions.remove(&id);
            tracing::info!(session_id = %id, "Session expired on touch");
            return Err(SessionError::Expired(id));
        }

        session.last_seen = now;
        session.last_seen_wall = Utc::now();
        let expires_at = session.expires_at();

        Ok(SessionTicket {
            session_id: id,
            expires_at,
        })
    }

    /// Remove a session explicitly
    ///
    /// Fails with `NotFound` if absent; a second call for the same id fails.
    pub fn end(&self, id: Uuid) -> Result<(), SessionError> {
        let mut sessions = self.sessions.lock().expect("session lock poisoned");

        if sessions.remove(&id).is_none() {
            return Err(SessionError::NotFound(id));
        }

        tracing::info!(session_id = %id, sessions = sessions.len(), "Session ended");
        Ok(())
    }

    /// Remove every session past its TTL at `now`; returns how many
    pub fn sweep_expired(&self, now: Instant) -> usize {
        let mut sessions = self.sessions.lock().expect("session lock poisoned");

        let expired: Vec<Uuid> = sessions
            .iter()
            .filter(|(_, s)| !s.is_live(now))
            .map(|(id, _)| *id)
            .collect();

        for id in &expired {
            sessions.remove(id);
            tracing::info!(session_id = %id, "Session removed by sweep");
        }

        expired.len()
    }

    /// Number of tracked sessions (live or not yet swept)
    pub fn session_count(&self) -> usize {
        self.sessions.lock().expect("session lock poisoned").len()
    }

    /// Spawn the background sweep task
    ///
    /// Runs for the lifetime of the process; the returned handle can be used
    /// to abort it on shutdown.
    pub fn spawn_sweep_task(self: &Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        let registry = Arc::clone(self);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let removed = registry.sweep_expired(Instant::now());
                if removed > 0 {
                    tracing::debug!(removed, "Session sweep pass");
                }
            }
        })
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(30);

    #[test]
    fn test_touch_after_create_keeps_expiry() {
        let registry = SessionRegistry::new();
        let ticket = registry.create(Some("laptop".into()), TIMEOUT);

        let refreshed = registry.touch(ticket.session_id).unwrap();
        assert_eq!(refreshed.session_id, ticket.session_id);

        // Same clock, same TTL: expiry moves only by the rounding between
        // the two wall-clock reads.
        let drift = (refreshed.expires_at - ticket.expires_at).num_seconds();
        assert!(drift.abs() <= 1);
    }

    #[test]
    fn test_touch_unknown_session() {
        let registry = SessionRegistry::new();
        assert!(matches!(
            registry.touch(Uuid::new_v4()),
            Err(SessionError::NotFound(_))
        ));
    }

    #[test]
    fn test_expired_touch_deletes_then_fails() {
        let registry = SessionRegistry::new();
        let base = Instant::now();
        let ticket = registry.create(None, TIMEOUT);

        // 31s after last_seen: past the TTL
        let late = base + Duration::from_secs(31);
        assert!(matches!(
            registry.touch_at(ticket.session_id, late),
            Err(SessionError::Expired(_))
        ));

        // Entry was removed, so the error degrades to NotFound
        assert!(matches!(
            registry.touch_at(ticket.session_id, late),
            Err(SessionError::NotFound(_))
        ));
        assert_eq!(registry.session_count(), 0);
    }

    #[test]
    fn test_end_is_not_idempotent() {
        let registry = SessionRegistry::new();
        let ticket = registry.create(None, TIMEOUT);

        assert!(registry.end(ticket.session_id).is_ok());
        assert!(matches!(
            registry.end(ticket.session_id),
            Err(SessionError::NotFound(_))
        ));
    }

    #[test]
    fn test_sweep_removes_only_expired() {
        let registry = SessionRegistry::new();
        let base = Instant::now();
        let short = registry.create(None, Duration::from_secs(30));
        let long = registry.create(None, Duration::from_secs(120));

        let removed = registry.sweep_expired(base + Duration::from_secs(60));
        assert_eq!(removed, 1);
        assert_eq!(registry.session_count(), 1);

        // After the pass no remaining session is past its TTL at sweep time
        assert!(registry
            .touch_at(long.session_id, base + Duration::from_secs(60))
            .is_ok());
        assert!(matches!(
            registry.touch_at(short.session_id, base),
            Err(SessionError::NotFound(_))
        ));
    }

    #[test]
    fn test_heartbeat_extends_lifetime() {
        // create at t=0 (timeout 30), touch at t=20 succeeds, touch at t=55
        // (35s past the last refresh) expires, follow-up reports NotFound.
        let registry = SessionRegistry::new();
        let base = Instant::now();
        let ticket = registry.create(None, TIMEOUT);

        let refreshed = registry
            .touch_at(ticket.session_id, base + Duration::from_secs(20))
            .unwrap();
        assert!(refreshed.expires_at >= ticket.expires_at);

        assert!(matches!(
            registry.touch_at(ticket.session_id, base + Duration::from_secs(55)),
            Err(SessionError::Expired(_))
        ));
        assert!(matches!(
            registry.touch_at(ticket.session_id, base + Duration::from_secs(55)),
            Err(SessionError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_sweep_task_runs() {
        let registry = Arc::new(SessionRegistry::new());
        registry.create(None, Duration::from_millis(10));

        let handle = registry.spawn_sweep_task(Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(80)).await;

        assert_eq!(registry.session_count(), 0);
        handle.abort();
    }
}
