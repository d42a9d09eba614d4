//! Store infrastructure - override store backends

mod factory;
mod file;
mod in_memory;
mod redis;

pub use factory::{StoreConfig, StoreFactory, StoreType};
pub use file::FileOverrideStore;
pub use in_memory::InMemoryOverrideStore;
pub use self::redis::{RedisOverrideStore, RedisStoreConfig, DEFAULT_KEY_PREFIX};
