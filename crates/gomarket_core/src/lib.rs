//! Core cart logic for the GoMarketplace storefront app.
//! This crate is the single source of truth for cart invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;

pub use config::{CartConfig, ConfigError, DecrementPolicy, DEFAULT_CART_STORAGE_KEY};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::cart_item::{CartItem, CartItemValidationError, NewCartItem, ProductId};
pub use repo::cart_repo::{CartRepository, KvCartRepository, RepoError, RepoResult};
pub use service::cart_service::{
    CartChange, CartServiceError, CartServiceResult, CartSnapshot, CartStore,
};
pub use storage::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError, StorageResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
