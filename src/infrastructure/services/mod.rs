//! Application services

mod model_kit;

pub use model_kit::{ModelKit, ModelKitOptions, DEFAULT_CACHE_TTL, DEFAULT_STORE_TIMEOUT};
