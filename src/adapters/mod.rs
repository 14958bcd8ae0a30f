// Adapters layer: concrete implementations for external systems (filesystem storage, http).

pub mod http;
pub mod storage;
