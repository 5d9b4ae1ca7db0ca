//! In-Memory Song State Cache Implementation

use dashmap::DashMap;
use std::sync::Arc;

use crate::application::ports::SongStateCachePort;
use crate::domain::song::{SongKey, SongState};

/// 内存童谣状态缓存
pub struct InMemorySongStateCache {
    states: DashMap<SongKey, SongState>,
}

impl InMemorySongStateCache {
    pub fn new() -> Self {
        Self {
            states: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for InMemorySongStateCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SongStateCachePort for InMemorySongStateCache {
    fn get(&self, key: SongKey) -> Option<SongState> {
        self.states.get(&key).map(|s| s.clone())
    }

    fn put(&self, state: SongState) -> Option<SongState> {
        let key = state.key();
        let previous = self.states.insert(key, state);
        tracing::debug!(key = %key, "Song state cached");
        previous
    }

    fn remove(&self, key: SongKey) {
        self.states.remove(&key);
    }
}
