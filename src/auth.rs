//! Admin login and server-side sessions.
//!
//! A successful login opens a session keyed by a random id. The id is handed
//! to the browser in a cookie and checked against [`SessionStore`] on every
//! gated request, so logging out or expiring a session takes effect at once.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::AuthError;

/// The configured admin username and password.
#[derive(Debug, Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Login is disabled until both values are configured.
    pub fn is_configured(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }

    pub fn authenticate(&self, username: &str, password: &str) -> Result<(), AuthError> {
        if self.is_configured() && username == self.username && password == self.password {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a session and return its id.
    pub fn open(&self) -> String {
        self.open_at(Utc::now())
    }

    fn open_at(&self, now: DateTime<Utc>) -> String {
        let id = Uuid::new_v4().simple().to_string();
        let mut sessions = self.sessions.write();
        sessions.retain(|_, opened| now - *opened < self.ttl);
        sessions.insert(id.clone(), now);
        debug!(active = sessions.len(), "session opened");
        id
    }

    pub fn is_authenticated(&self, id: &str) -> bool {
        self.is_authenticated_at(id, Utc::now())
    }

    fn is_authenticated_at(&self, id: &str, now: DateTime<Utc>) -> bool {
        self.sessions
            .read()
            .get(id)
            .is_some_and(|opened| now - *opened < self.ttl)
    }

    pub fn close(&self, id: &str) {
        if self.sessions.write().remove(id).is_some() {
            debug!("session closed");
        }
    }
}
