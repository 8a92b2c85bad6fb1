//! Flutter bridge crate for the GoMarketplace cart core.

pub mod api;
