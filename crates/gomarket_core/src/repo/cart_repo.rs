//! Cart repository contract and key-value implementation.
//!
//! # Responsibility
//! - Encode the whole cart list into one storage slot and back.
//! - Keep the JSON encoding inside the persistence boundary.
//!
//! # Invariants
//! - Writes always replace the full list; there are no partial updates.
//! - Reads reject malformed or invariant-breaking data instead of masking it.

use crate::model::cart_item::{validate_cart_list, CartItem, CartItemValidationError};
use crate::storage::{KeyValueStore, StorageError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Cart persistence error.
#[derive(Debug)]
pub enum RepoError {
    Storage(StorageError),
    /// Stored value is not a JSON cart list.
    Decode(serde_json::Error),
    Encode(serde_json::Error),
    /// Stored value decoded but breaks cart invariants.
    InvalidData(CartItemValidationError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Decode(err) => write!(f, "malformed persisted cart: {err}"),
            Self::Encode(err) => write!(f, "failed to encode cart: {err}"),
            Self::InvalidData(err) => write!(f, "invalid persisted cart data: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Decode(err) | Self::Encode(err) => Some(err),
            Self::InvalidData(err) => Some(err),
        }
    }
}

impl From<StorageError> for RepoError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Whole-list cart persistence.
pub trait CartRepository {
    /// Returns `Ok(None)` when nothing has been persisted yet.
    fn load_cart(&self) -> RepoResult<Option<Vec<CartItem>>>;
    fn save_cart(&self, items: &[CartItem]) -> RepoResult<()>;
    fn clear_cart(&self) -> RepoResult<()>;
}

/// Stores the cart as a JSON array under one key.
pub struct KvCartRepository<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> KvCartRepository<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }
}

impl<S: KeyValueStore> CartRepository for KvCartRepository<S> {
    fn load_cart(&self) -> RepoResult<Option<Vec<CartItem>>> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(None);
        };
        let items = decode_cart(&raw)?;
        Ok(Some(items))
    }

    fn save_cart(&self, items: &[CartItem]) -> RepoResult<()> {
        let encoded = serde_json::to_string(items).map_err(RepoError::Encode)?;
        self.store.set(&self.key, &encoded)?;
        Ok(())
    }

    fn clear_cart(&self) -> RepoResult<()> {
        self.store.remove(&self.key)?;
        Ok(())
    }
}

/// Decodes and validates a persisted cart value.
pub fn decode_cart(raw: &str) -> RepoResult<Vec<CartItem>> {
    let items: Vec<CartItem> = serde_json::from_str(raw).map_err(RepoError::Decode)?;
    validate_cart_list(&items).map_err(RepoError::InvalidData)?;
    Ok(items)
}
