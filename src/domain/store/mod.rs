//! Store domain - persistence contract for overrides

mod repository;

pub use repository::OverrideStore;

#[cfg(test)]
pub use repository::MockOverrideStore;
#[cfg(test)]
pub use repository::mock;
