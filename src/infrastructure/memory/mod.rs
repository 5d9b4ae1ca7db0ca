//! Memory Layer - 内存实现

mod local_store;
mod song_state_cache;

pub use local_store::InMemoryLocalStore;
pub use song_state_cache::InMemorySongStateCache;
