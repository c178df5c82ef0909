//! The device state store (C2): an abstract per-key hash map with
//! `hget`/`hmget`/`hset` operations, plus `DeviceStateRepo`, the typed
//! accessor layer the rest of the gateway actually talks to.

mod error;
mod kv;
mod memory;
mod repo;

#[cfg(feature = "redis")]
mod redis_store;

pub use error::StoreError;
pub use kv::KvStore;
pub use memory::InMemoryStore;
pub use repo::DeviceStateRepo;

#[cfg(feature = "redis")]
pub use redis_store::RedisStore;
