//! Common type definitions and newtype wrappers for domain modeling.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error returned when an application name fails validation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidAppName {
    /// The name was empty.
    #[error("application name cannot be empty")]
    Empty,

    /// The name contained a path separator.
    #[error("application name cannot contain '/': {0:?}")]
    ContainsSlash(String),
}

/// A validated application name.
///
/// The name is used as a path segment under the toggle root, so it must be
/// non-empty and must not contain `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AppName(String);

impl AppName {
    /// Validates and wraps an application name.
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidAppName> {
        let name = name.into();
        if name.is_empty() {
            return Err(InvalidAppName::Empty);
        }
        if name.contains('/') {
            return Err(InvalidAppName::ContainsSlash(name));
        }
        Ok(Self(name))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for AppName {
    type Error = InvalidAppName;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::new(name)
    }
}

impl From<AppName> for String {
    fn from(name: AppName) -> Self {
        name.0
    }
}
