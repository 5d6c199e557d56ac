//! Error handler for the provider.

use std::fmt;

use ldap3::LdapError;
use thiserror::Error;
use validator::ValidationErrors;

use crate::config::ConfigError;

pub type Result<T> = std::result::Result<T, Error>;

/// Directory request which failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Connect,
    Add,
    Search,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Connect => "connect to",
            Operation::Add => "add",
            Operation::Search => "search",
            Operation::Delete => "delete",
        })
    }
}

/// Enum representing provider-side errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error("validation error occurred")]
    Validation(#[from] ValidationErrors),

    #[error("failed to {operation} `{name}`: {source}")]
    Directory {
        operation: Operation,
        name: String,
        #[source]
        source: LdapError,
    },

    #[error("cannot find `{name}` on directory")]
    NotFound { name: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Wrap an [`LdapError`] with the request and entry it concerned.
    pub fn directory(
        operation: Operation,
        name: impl Into<String>,
        source: LdapError,
    ) -> Self {
        Self::Directory {
            operation,
            name: name.into(),
            source,
        }
    }

    /// Whether the error means the entry is not on the directory.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}
