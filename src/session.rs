//! Process-local registry of authentication sessions.
//!
//! Tokens live for a fixed time from creation with no renewal. Expired
//! entries are evicted lazily when they are looked up; nothing sweeps them in
//! the background, and a restart drops every session.

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::clock::Clock;

#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
    pub expires: DateTime<Utc>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Unauthorized")]
    Unknown,
    #[error("Session expired")]
    Expired,
}

pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    pub async fn create(&self, user_id: Uuid) -> Session {
        let session = Session {
            token: Uuid::new_v4().simple().to_string(),
            user_id,
            expires: self.clock.now() + self.ttl,
        };
        self.sessions
            .write()
            .await
            .insert(session.token.clone(), session.clone());
        session
    }

    /// Returns the user behind `token`. A token whose expiry has been reached
    /// is removed and reported as [`SessionError::Expired`].
    pub async fn resolve(&self, token: &str) -> Result<Uuid, SessionError> {
        let now = self.clock.now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                None => return Err(SessionError::Unknown),
                Some(session) if now < session.expires => return Ok(session.user_id),
                Some(_) => {}
            }
        }

        self.sessions.write().await.remove(token);
        tracing::debug!("evicted expired session");
        Err(SessionError::Expired)
    }

    pub async fn destroy(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    /// Number of stored entries, expired ones included until they are touched.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
