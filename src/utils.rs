//! Environment helpers
//!
//! Variables that are set but empty count as not set.

use std::str::FromStr;

use anyhow::Context;
use anyhow::Result;

/// Get the value of ENV var, when it is set and not empty
pub fn env_var(var_name: &str) -> Option<String> {
    std::env::var(var_name)
        .ok()
        .filter(|value| !value.is_empty())
}

/// Get the value of ENV var, or a default
pub fn env_var_or_else(var_name: &'static str, or_else: fn() -> String) -> String {
    env_var(var_name).unwrap_or_else(or_else)
}

/// Get the parsed value of ENV var, or a default
///
/// A value that does not parse is an error, not the default
pub fn env_var_parsed_or<T>(var_name: &'static str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env_var(var_name) {
        Some(value) => value
            .parse::<T>()
            .with_context(|| format!("Invalid `{var_name}`: {value}")),
        None => Ok(default),
    }
}
