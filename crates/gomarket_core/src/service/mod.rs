//! Core use-case services.
//!
//! # Responsibility
//! - Expose cart use-cases to FFI/CLI callers.
//! - Keep UI layers decoupled from storage details.

pub mod cart_service;
