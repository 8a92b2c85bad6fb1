//! Cart domain model.
//!
//! # Responsibility
//! - Define canonical cart data structures used by core business logic.
//!
//! # Invariants
//! - Every cart line is identified by its catalog `ProductId`.
//! - A cart never holds two lines for the same product.

pub mod cart_item;
