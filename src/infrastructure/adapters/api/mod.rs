//! Backend API Adapter - reqwest 实现与内存后端

mod dto;
mod envelope;
mod fake_backend;
mod http_backend_client;

pub use fake_backend::FakeBackendApi;
pub use http_backend_client::{HttpBackendClient, HttpBackendConfig};
