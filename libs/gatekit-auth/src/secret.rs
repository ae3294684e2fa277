use std::fmt;

use serde::Deserialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Holder for credential material that must never leak through logs.
///
/// Formatting through `Debug` or `Display` always yields `[REDACTED]`;
/// the only way to read the value is [`expose`](Self::expose), which
/// keeps every access greppable. The wrapper deserializes transparently
/// from a plain string so secrets can live in config files, but it has
/// no `Serialize` impl: a loaded secret cannot round-trip back out.
///
/// The backing buffer is zeroed on drop via [`zeroize`].
#[derive(Zeroize, ZeroizeOnDrop, Deserialize)]
#[serde(transparent)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Read the raw secret. The slice must not be logged or stored.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_is_redacted() {
        let s = SecretString::new("hunter2");
        assert_eq!(format!("{s:?}"), "[REDACTED]");
        assert_eq!(format!("{s}"), "[REDACTED]");
    }

    #[test]
    fn expose_returns_original_value() {
        let s = SecretString::new("hunter2");
        assert_eq!(s.expose(), "hunter2");
    }

    #[test]
    fn deserializes_from_plain_string() {
        let s: SecretString = serde_json::from_str("\"top-secret\"").unwrap();
        assert_eq!(s.expose(), "top-secret");
    }
}
