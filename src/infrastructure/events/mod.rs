//! Events - 应用内事件发布

mod publisher;

pub use publisher::{AppEvent, EventPublisher};
