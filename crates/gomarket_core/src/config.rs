//! Cart runtime configuration.
//!
//! # Responsibility
//! - Hold the storage key and quantity policy the cart store runs with.
//! - Resolve overrides from process environment.
//!
//! # Invariants
//! - `storage_key` is never empty; blank overrides fall back to the default.
//! - Unknown policy names are rejected, not silently defaulted.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage slot used by the storefront app for the persisted cart.
pub const DEFAULT_CART_STORAGE_KEY: &str = "@GoMarketplace:cart";

pub const CART_KEY_ENV: &str = "GOMARKET_CART_KEY";
pub const DECREMENT_POLICY_ENV: &str = "GOMARKET_DECREMENT_POLICY";

/// What `decrement` does to a line whose quantity is already 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecrementPolicy {
    /// Keep the line at quantity 1 and skip persistence.
    #[default]
    FloorAtOne,
    /// Drop the line from the cart and persist.
    RemoveOnZero,
}

impl DecrementPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FloorAtOne => "floor_at_one",
            Self::RemoveOnZero => "remove_on_zero",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "floor_at_one" | "floor" => Ok(Self::FloorAtOne),
            "remove_on_zero" | "remove" => Ok(Self::RemoveOnZero),
            other => Err(ConfigError::UnknownDecrementPolicy(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownDecrementPolicy(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownDecrementPolicy(value) => write!(
                f,
                "unsupported decrement policy `{value}`; expected floor_at_one|remove_on_zero"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Cart store settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    pub storage_key: String,
    pub decrement_policy: DecrementPolicy,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_CART_STORAGE_KEY.to_string(),
            decrement_policy: DecrementPolicy::default(),
        }
    }
}

impl CartConfig {
    /// Builds config from `GOMARKET_CART_KEY` and `GOMARKET_DECREMENT_POLICY`.
    ///
    /// Unset or blank variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(key) = non_blank(lookup(CART_KEY_ENV)) {
            config.storage_key = key;
        }
        if let Some(policy) = non_blank(lookup(DECREMENT_POLICY_ENV)) {
            config.decrement_policy = DecrementPolicy::parse(&policy)?;
        }

        Ok(config)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{CartConfig, ConfigError, DecrementPolicy, DEFAULT_CART_STORAGE_KEY};

    #[test]
    fn defaults_match_storefront_slot_and_floor_policy() {
        let config = CartConfig::default();
        assert_eq!(config.storage_key, DEFAULT_CART_STORAGE_KEY);
        assert_eq!(config.decrement_policy, DecrementPolicy::FloorAtOne);
    }

    #[test]
    fn lookup_overrides_and_ignores_blank_values() {
        let config = CartConfig::from_lookup(|name| match name {
            "GOMARKET_CART_KEY" => Some("   ".to_string()),
            "GOMARKET_DECREMENT_POLICY" => Some(" Remove_On_Zero ".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.storage_key, DEFAULT_CART_STORAGE_KEY);
        assert_eq!(config.decrement_policy, DecrementPolicy::RemoveOnZero);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let err = CartConfig::from_lookup(|name| {
            (name == "GOMARKET_DECREMENT_POLICY").then(|| "sometimes".to_string())
        })
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownDecrementPolicy("sometimes".to_string())
        );
    }

    #[test]
    fn policy_names_round_trip() {
        for policy in [DecrementPolicy::FloorAtOne, DecrementPolicy::RemoveOnZero] {
            assert_eq!(DecrementPolicy::parse(policy.as_str()).unwrap(), policy);
        }
    }
}
