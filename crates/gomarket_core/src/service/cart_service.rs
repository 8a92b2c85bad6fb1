//! Cart store use-case service.
//!
//! # Responsibility
//! - Own the canonical in-memory cart list.
//! - Apply add/increment/decrement/remove/clear and persist the full list.
//!
//! # Invariants
//! - Product IDs are unique in the list; repeated adds bump quantity.
//! - Quantity never drops below 1 for a line that stays in the cart.
//! - Mutations are serialized behind one lock; the persisted write of each
//!   mutation reflects that mutation's resulting list.
//! - Persistence failures never reach callers; they are logged and the
//!   in-memory state is kept.

use crate::config::DecrementPolicy;
use crate::model::cart_item::{CartItem, CartItemValidationError, NewCartItem, ProductId};
use crate::repo::cart_repo::CartRepository;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

pub type CartServiceResult<T> = Result<T, CartServiceError>;

/// Error returned to cart callers.
#[derive(Debug, Clone, PartialEq)]
pub enum CartServiceError {
    /// No line with this product ID is in the cart.
    ItemNotFound(ProductId),
    /// Add request failed validation.
    Validation(CartItemValidationError),
}

impl Display for CartServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ItemNotFound(id) => write!(f, "cart item not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CartServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::ItemNotFound(_) => None,
        }
    }
}

impl From<CartItemValidationError> for CartServiceError {
    fn from(value: CartItemValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Result of one cart operation: the resulting list plus change metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct CartChange {
    /// Revision after the operation; unchanged when `changed` is false.
    pub revision: u64,
    /// Whether the cart list differs from before the operation.
    pub changed: bool,
    /// Whether the resulting list reached storage. Always false for no-ops.
    pub persisted: bool,
    pub products: Vec<CartItem>,
}

/// Point-in-time read of the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartSnapshot {
    pub revision: u64,
    pub products: Vec<CartItem>,
}

#[derive(Debug, Default)]
struct CartState {
    products: Vec<CartItem>,
    revision: u64,
}

enum Outcome {
    Unchanged,
    Changed,
}

/// Cart state container backed by a `CartRepository`.
pub struct CartStore<R: CartRepository> {
    repo: R,
    policy: DecrementPolicy,
    state: Mutex<CartState>,
}

impl<R: CartRepository> CartStore<R> {
    /// Creates a store and hydrates it from the repository.
    ///
    /// Missing data yields an empty cart. Unreadable or malformed data is
    /// logged and also yields an empty cart; startup never fails on storage.
    pub fn open(repo: R, policy: DecrementPolicy) -> Self {
        let started_at = Instant::now();
        let products = match repo.load_cart() {
            Ok(Some(items)) => {
                info!(
                    "event=cart_load module=cart status=ok items={} duration_ms={}",
                    items.len(),
                    started_at.elapsed().as_millis()
                );
                items
            }
            Ok(None) => {
                info!(
                    "event=cart_load module=cart status=empty duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Vec::new()
            }
            Err(err) => {
                warn!(
                    "event=cart_load module=cart status=error fallback=empty duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Vec::new()
            }
        };

        Self {
            repo,
            policy,
            state: Mutex::new(CartState {
                products,
                revision: 0,
            }),
        }
    }

    pub fn policy(&self) -> DecrementPolicy {
        self.policy
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Current cart lines in insertion order.
    pub fn products(&self) -> Vec<CartItem> {
        self.lock_state().products.clone()
    }

    pub fn snapshot(&self) -> CartSnapshot {
        let state = self.lock_state();
        CartSnapshot {
            revision: state.revision,
            products: state.products.clone(),
        }
    }

    pub fn revision(&self) -> u64 {
        self.lock_state().revision
    }

    /// Sum of quantities across all lines.
    pub fn total_quantity(&self) -> u64 {
        self.lock_state()
            .products
            .iter()
            .map(|item| u64::from(item.quantity))
            .sum()
    }

    /// Sum of `price * quantity` across all lines.
    pub fn subtotal(&self) -> f64 {
        self.lock_state().products.iter().map(CartItem::line_total).sum()
    }

    /// Adds one unit of a product.
    ///
    /// # Contract
    /// - Existing line: quantity + 1; display fields keep their first values.
    /// - New line: appended with quantity 1.
    /// - Never returns `ItemNotFound`; fails only on invalid input.
    pub fn add_to_cart(&self, item: NewCartItem) -> CartServiceResult<CartChange> {
        item.validate()?;
        self.mutate("add", |products| {
            match products.iter_mut().find(|line| line.id == item.id) {
                Some(line) => line.quantity = line.quantity.saturating_add(1),
                None => products.push(item.into_cart_item()),
            }
            Ok(Outcome::Changed)
        })
    }

    /// Adds one unit to an existing line.
    pub fn increment(&self, id: &str) -> CartServiceResult<CartChange> {
        self.mutate("increment", |products| {
            let line = find_line(products, id)?;
            line.quantity = line.quantity.saturating_add(1);
            Ok(Outcome::Changed)
        })
    }

    /// Removes one unit from an existing line.
    ///
    /// At quantity 1 the configured `DecrementPolicy` applies.
    pub fn decrement(&self, id: &str) -> CartServiceResult<CartChange> {
        let policy = self.policy;
        self.mutate("decrement", |products| {
            let line = find_line(products, id)?;
            if line.quantity > 1 {
                line.quantity -= 1;
                return Ok(Outcome::Changed);
            }
            match policy {
                DecrementPolicy::FloorAtOne => Ok(Outcome::Unchanged),
                DecrementPolicy::RemoveOnZero => {
                    products.retain(|line| line.id != id);
                    Ok(Outcome::Changed)
                }
            }
        })
    }

    /// Drops a line regardless of its quantity.
    pub fn remove(&self, id: &str) -> CartServiceResult<CartChange> {
        self.mutate("remove", |products| {
            find_line(products, id)?;
            products.retain(|line| line.id != id);
            Ok(Outcome::Changed)
        })
    }

    /// Empties the cart and deletes its storage slot.
    pub fn clear(&self) -> CartChange {
        let mut state = self.lock_state();
        if state.products.is_empty() {
            return CartChange {
                revision: state.revision,
                changed: false,
                persisted: false,
                products: Vec::new(),
            };
        }

        let persisted = match self.repo.clear_cart() {
            Ok(()) => true,
            Err(err) => {
                warn!("event=cart_persist module=cart status=error op=clear error={err}");
                false
            }
        };
        state.products = Vec::new();
        state.revision += 1;
        info!(
            "event=cart_clear module=cart status=ok revision={} persisted={}",
            state.revision, persisted
        );

        CartChange {
            revision: state.revision,
            changed: true,
            persisted,
            products: Vec::new(),
        }
    }

    fn mutate(
        &self,
        op: &'static str,
        apply: impl FnOnce(&mut Vec<CartItem>) -> CartServiceResult<Outcome>,
    ) -> CartServiceResult<CartChange> {
        let mut state = self.lock_state();
        let mut next = state.products.clone();

        match apply(&mut next) {
            Ok(Outcome::Changed) => {}
            Ok(Outcome::Unchanged) => {
                debug!("event=cart_mutation module=cart status=noop op={op}");
                return Ok(CartChange {
                    revision: state.revision,
                    changed: false,
                    persisted: false,
                    products: next,
                });
            }
            Err(err) => {
                debug!("event=cart_mutation module=cart status=rejected op={op} error={err}");
                return Err(err);
            }
        }

        // Persist while still holding the lock so writes land in mutation order.
        let persisted = match self.repo.save_cart(&next) {
            Ok(()) => true,
            Err(err) => {
                warn!("event=cart_persist module=cart status=error op={op} error={err}");
                false
            }
        };

        state.products = next;
        state.revision += 1;
        debug!(
            "event=cart_mutation module=cart status=ok op={op} revision={} items={} persisted={}",
            state.revision,
            state.products.len(),
            persisted
        );

        Ok(CartChange {
            revision: state.revision,
            changed: true,
            persisted,
            products: state.products.clone(),
        })
    }

    fn lock_state(&self) -> MutexGuard<'_, CartState> {
        // The list is swapped in whole, so a poisoned guard still holds a
        // consistent value.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn find_line<'a>(products: &'a mut [CartItem], id: &str) -> CartServiceResult<&'a mut CartItem> {
    products
        .iter_mut()
        .find(|line| line.id == id)
        .ok_or_else(|| CartServiceError::ItemNotFound(id.to_string()))
}
