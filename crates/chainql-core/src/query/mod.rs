//! Query engine module
//!
//! Compiles SQL-like query text plus positional parameters into a
//! [`QueryPlan`] and executes it over a record sequence.

/// Condition binder
#[allow(missing_docs)]
pub mod binder;
/// Clause parser
#[allow(missing_docs)]
pub mod clause;
/// Boolean composer
#[allow(missing_docs)]
pub mod composer;
/// Pipeline executor
#[allow(missing_docs)]
pub mod executor;
/// Query lexer
#[allow(missing_docs)]
pub mod lexer;
/// Query plan
#[allow(missing_docs)]
pub mod plan;

// Re-export main types
pub use binder::{BindMode, Binder};
pub use clause::{Clauses, OrderBy, OrderDirection, RawCondition, WhereClause};
pub use composer::{Condition, ConditionChain, Connective};
pub use executor::{project, sort_by_numeric_field, Executor};
pub use lexer::{Lexeme, Lexer, Token};
pub use plan::QueryPlan;
