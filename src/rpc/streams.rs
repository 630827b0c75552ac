//! Search Stream Registry
//!
//! Tracks every streaming search that is currently delivering results. Each stream gets a
//! UUID and a `CancellationToken` derived from the registry's root token, so a single stream
//! can be stopped on its own and all of them can be stopped at shutdown.

use dashmap::DashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

pub struct SearchStreams {
    streams: Arc<DashMap<Uuid, CancellationToken>>,
    shutdown: CancellationToken,
}

impl SearchStreams {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers a new stream. The stream stays listed until the returned handle is dropped.
    pub fn register(&self) -> SearchStreamHandle {
        let id = Uuid::new_v4();
        let token = self.shutdown.child_token();
        self.streams.insert(id, token.clone());

        tracing::debug!("Registered search stream {}", id);

        SearchStreamHandle {
            id,
            token,
            streams: self.streams.clone(),
        }
    }

    /// Cancels one stream. Returns `false` if no such stream is active.
    pub fn cancel(&self, id: &Uuid) -> bool {
        match self.streams.get(id) {
            Some(entry) => {
                entry.value().cancel();
                true
            }
            None => false,
        }
    }

    /// Cancels every active stream and every stream registered afterwards.
    pub fn cancel_all(&self) {
        tracing::info!("Cancelling {} active search stream(s)", self.streams.len());
        self.shutdown.cancel();
    }

    pub fn active_count(&self) -> usize {
        self.streams.len()
    }

    pub fn active_ids(&self) -> Vec<Uuid> {
        self.streams.iter().map(|entry| *entry.key()).collect()
    }
}

impl Default for SearchStreams {
    fn default() -> Self {
        Self {
            streams: Arc::new(DashMap::new()),
            shutdown: CancellationToken::new(),
        }
    }
}

/// Registration of a single live stream. Deregisters itself on drop.
pub struct SearchStreamHandle {
    id: Uuid,
    token: CancellationToken,
    streams: Arc<DashMap<Uuid, CancellationToken>>,
}

impl SearchStreamHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Drop for SearchStreamHandle {
    fn drop(&mut self) {
        self.streams.remove(&self.id);
        tracing::debug!("Deregistered search stream {}", self.id);
    }
}
