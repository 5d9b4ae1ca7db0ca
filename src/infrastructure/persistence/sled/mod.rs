//! Sled 嵌入式存储

mod local_store;

pub use local_store::{SledLocalStore, SledStoreConfig};
