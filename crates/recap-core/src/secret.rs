use std::fmt;

use serde::Deserialize;

const REDACTED: &str = "[redacted]";

/// Credential value that never renders its contents through `Debug` or `Display`.
///
/// The only way to read the value is [`Secret::expose`], which keeps every use of a
/// credential greppable.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub(crate) fn as_mut_string(&mut self) -> &mut String {
        &mut self.0
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Secret").field(&REDACTED).finish()
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

/// Field names whose values are dropped from structured log output.
pub const SENSITIVE_FIELD_NAMES: &[&str] = &[
    "api_key",
    "apikey",
    "password",
    "pass",
    "secret",
    "token",
    "authorization",
];

/// Returns true when a log field or config key name denotes a credential.
pub fn is_sensitive_field(name: &str) -> bool {
    let lowered = name.to_ascii_lowercase();
    SENSITIVE_FIELD_NAMES
        .iter()
        .any(|candidate| lowered == *candidate || lowered.ends_with(&format!("_{candidate}")))
}

pub(crate) fn redacted() -> &'static str {
    REDACTED
}
