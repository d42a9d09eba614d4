//! API layer - HTTP endpoints for override management and resolution

pub mod features;
pub mod health;
pub mod overrides;
pub mod router;
pub mod state;
pub mod types;

pub use router::{create_default_router, create_router, RouterOptions};
pub use state::AppState;
