//! Predicate validation for resolved settings.

use super::Settings;
use crate::error::{Result, SettingsError};
use config::Value;

/// Resolve `key` and require `predicate` to accept the value.
///
/// Returns the resolved value on success, or
/// [`SettingsError::ImproperlyConfigured`] naming the key and the rejected
/// value. Resolution errors (unknown key, loader failure) pass through.
///
/// # Examples
///
/// ```rust
/// use strata_config::prelude::*;
/// use strata_config::settings::validate_setting;
///
/// let settings = Settings::builder([("RETRIES", 3_i64)], "APP").build();
///
/// let retries = validate_setting(&settings, "RETRIES", |value| {
///     matches!(value.clone().into_int(), Ok(n) if n > 0)
/// })
/// .unwrap();
/// assert_eq!(retries.into_int().unwrap(), 3);
/// ```
pub fn validate_setting(
    settings: &Settings,
    key: &str,
    predicate: impl Fn(&Value) -> bool,
) -> Result<Value> {
    let value = settings.get(key)?;
    if !predicate(&value) {
        return Err(SettingsError::ImproperlyConfigured {
            key: key.to_string(),
            value: value.to_string(),
        });
    }
    Ok(value)
}
