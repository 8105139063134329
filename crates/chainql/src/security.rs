/// Input validation for queries
///
/// Bounds the size of query text and parameter lists before they reach the
/// compiler, so that hostile input cannot exhaust memory.
use chainql_core::error::{Error, Result};

/// Default maximum query length in bytes (1 MB)
pub const DEFAULT_MAX_QUERY_LENGTH: usize = 1024 * 1024;

/// Default maximum number of positional parameters
pub const DEFAULT_MAX_PARAMETERS: usize = 10_000;

/// Validates query text
///
/// # Security
///
/// - Prevents oversized queries
/// - Rejects NUL bytes
///
/// An empty query is valid: it leaves the working set unchanged.
///
/// # Errors
///
/// Returns Error::InvalidInput if validation fails
#[inline]
pub fn validate_query_length(query: &str, max_length: usize) -> Result<()> {
    if query.len() > max_length {
        return Err(Error::InvalidInput(format!(
            "Query length {} exceeds maximum {}",
            query.len(),
            max_length
        )));
    }

    if query.contains('\0') {
        return Err(Error::InvalidInput(
            "Query cannot contain null bytes".to_string(),
        ));
    }

    Ok(())
}

/// Validates the positional parameter list
///
/// # Errors
///
/// Returns Error::InvalidInput if more than `max_parameters` were supplied
#[inline]
pub fn validate_parameter_count(count: usize, max_parameters: usize) -> Result<()> {
    if count > max_parameters {
        return Err(Error::InvalidInput(format!(
            "Parameter count {} exceeds maximum {}",
            count, max_parameters
        )));
    }

    Ok(())
}

/// Validates a join key or projection field name
///
/// # Errors
///
/// Returns Error::InvalidInput for an empty name
#[inline]
pub fn validate_field_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidInput(
            "Field name cannot be empty".to_string(),
        ));
    }

    Ok(())
}
