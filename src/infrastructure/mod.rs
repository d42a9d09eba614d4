//! Infrastructure layer - Store backends, resolution cache, services and logging

pub mod cache;
pub mod logging;
pub mod services;
pub mod store;
