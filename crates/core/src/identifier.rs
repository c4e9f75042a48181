//! Namespaced identifiers (`minecraft:stone`).
//!
//! Blocks, fluids and items are compared by identifier, never by instance, so
//! two registries built from the same data agree on identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Namespace assumed when an identifier omits one.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Reasons an identifier string can be rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// Input was empty or whitespace.
    #[error("identifier cannot be empty")]
    Empty,
    /// Namespace part was empty or contained illegal characters.
    #[error("invalid identifier namespace `{0}` (allowed: a-z0-9_.-)")]
    Namespace(String),
    /// Path part was empty or contained illegal characters.
    #[error("invalid identifier path `{0}` (allowed: a-z0-9_./-)")]
    Path(String),
}

/// A `namespace:path` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identifier {
    namespace: String,
    path: String,
}

impl Identifier {
    /// Build an identifier from already-trusted parts.
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
        }
    }

    /// Shorthand for `minecraft:<path>`.
    pub fn minecraft(path: impl Into<String>) -> Self {
        Self::new(DEFAULT_NAMESPACE, path)
    }

    /// Parse `namespace:path` or a bare `path` in [`DEFAULT_NAMESPACE`].
    pub fn parse(input: &str) -> Result<Self, IdentifierError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(IdentifierError::Empty);
        }
        let (namespace, path) = input.split_once(':').unwrap_or((DEFAULT_NAMESPACE, input));

        let namespace_ok = !namespace.is_empty()
            && namespace
                .chars()
                .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.'));
        if !namespace_ok {
            return Err(IdentifierError::Namespace(namespace.to_string()));
        }
        let path_ok = !path.is_empty()
            && path
                .chars()
                .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.' | '/'));
        if !path_ok {
            return Err(IdentifierError::Path(path.to_string()));
        }

        Ok(Self::new(namespace, path))
    }

    /// Namespace part.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Path part.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
