//! Session configuration

use crate::security::{DEFAULT_MAX_PARAMETERS, DEFAULT_MAX_QUERY_LENGTH};
use chainql_core::query::BindMode;
use chainql_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Configuration for a [`RecordSet`](crate::RecordSet) session.
///
/// # Examples
///
/// ```rust
/// use chainql::QueryConfig;
///
/// let config = QueryConfig::default().with_strict(true).with_max_parameters(16);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Reject unknown WHERE conditions and placeholder/parameter count
    /// mismatches instead of tolerating them
    pub strict: bool,
    /// Maximum query length in bytes
    pub max_query_length: usize,
    /// Maximum number of positional parameters per query
    pub max_parameters: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            strict: false,
            max_query_length: DEFAULT_MAX_QUERY_LENGTH,
            max_parameters: DEFAULT_MAX_PARAMETERS,
        }
    }
}

impl QueryConfig {
    /// Strict configuration with default limits
    pub fn strict() -> Self {
        Self::default().with_strict(true)
    }

    /// Enable or disable strict binding
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set maximum query length
    pub fn with_max_query_length(mut self, max_query_length: usize) -> Self {
        self.max_query_length = max_query_length;
        self
    }

    /// Set maximum parameter count
    pub fn with_max_parameters(mut self, max_parameters: usize) -> Self {
        self.max_parameters = max_parameters;
        self
    }

    /// The binder mode this configuration selects
    pub fn bind_mode(&self) -> BindMode {
        if self.strict {
            BindMode::Strict
        } else {
            BindMode::Permissive
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_query_length == 0 {
            return Err(Error::Config(
                "max_query_length must be greater than 0".to_string(),
            ));
        }
        if self.max_parameters == 0 {
            return Err(Error::Config(
                "max_parameters must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
