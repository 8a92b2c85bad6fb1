//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the cart persistence contract used by the cart store.
//! - Isolate the storage encoding from service orchestration.
//!
//! # Invariants
//! - Repository reads validate decoded data before returning it.

pub mod cart_repo;
