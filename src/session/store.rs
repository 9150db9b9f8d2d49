//! In-memory session store.
//!
//! Sessions are keyed by a UUID carried in a cookie and hold JSON
//! scalar/array values. A session survives for the configured idle TTL;
//! expired entries are swept whenever a request opens the store.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::input::RequestInput;

#[derive(Debug)]
struct SessionData {
    values: HashMap<String, Value>,
    last_seen: Instant,
}

impl SessionData {
    fn new() -> Self {
        Self {
            values: HashMap::new(),
            last_seen: Instant::now(),
        }
    }
}

/// Shared store of per-visitor sessions.
#[derive(Debug)]
pub struct SessionStore {
    sessions: DashMap<Uuid, SessionData>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl: Duration::from_secs(config.ttl_secs),
        }
    }

    /// Open the session for `id`, creating a fresh one when the id is
    /// missing, unknown or expired. Returns the handle and whether a new
    /// session was started.
    pub fn open(self: &Arc<Self>, id: Option<Uuid>) -> (SessionHandle, bool) {
        self.purge_expired();

        if let Some(id) = id {
            if let Some(mut entry) = self.sessions.get_mut(&id) {
                entry.last_seen = Instant::now();
                return (
                    SessionHandle {
                        id,
                        store: Arc::clone(self),
                    },
                    false,
                );
            }
        }

        let id = Uuid::new_v4();
        self.sessions.insert(id, SessionData::new());
        tracing::debug!(session = %id, "Started new session");
        (
            SessionHandle {
                id,
                store: Arc::clone(self),
            },
            true,
        )
    }

    /// Terminate one session, discarding its values.
    pub fn destroy(&self, id: Uuid) {
        self.sessions.remove(&id);
    }

    /// Drop sessions idle past the TTL.
    pub fn purge_expired(&self) {
        let ttl = self.ttl;
        self.sessions.retain(|_, data| data.last_seen.elapsed() < ttl);
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Handle to one visitor's session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: Uuid,
    store: Arc<SessionStore>,
}

impl SessionHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Typed read of a stored value.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entry = self.store.sessions.get(&self.id)?;
        let value = entry.values.get(key)?.clone();
        drop(entry);
        serde_json::from_value(value).ok()
    }

    /// Typed read with a fallback.
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    pub fn has(&self, key: &str) -> bool {
        self.store
            .sessions
            .get(&self.id)
            .map(|entry| entry.values.contains_key(key))
            .unwrap_or(false)
    }

    /// Store a value under the key, replacing any previous one.
    pub fn set<T: Serialize>(&self, key: &str, value: T) {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(error) => {
                tracing::error!(%error, key, "Failed to serialize session value");
                return;
            }
        };

        if let Some(mut entry) = self.store.sessions.get_mut(&self.id) {
            entry.values.insert(key.to_string(), value);
        }
    }

    /// Remove a stored value, returning it when present.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.store
            .sessions
            .get_mut(&self.id)
            .and_then(|mut entry| entry.values.remove(key))
    }

    /// Store the request value for `var` under `key`. When the request does
    /// not carry the variable, the existing session value is preserved, and
    /// when that is missing too, the default is stored. Returns the winner.
    pub fn set_from_request(
        &self,
        key: &str,
        var: &str,
        default: &str,
        input: &RequestInput,
    ) -> String {
        let value = input
            .str_param(var)
            .or_else(|| self.get::<String>(key))
            .unwrap_or_else(|| default.to_string());

        self.set(key, &value);
        value
    }

    /// Terminate this session.
    pub fn destroy(self) {
        self.store.destroy(self.id);
    }
}
