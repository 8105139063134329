//! # chainql Core
//!
//! Value model, predicate library, query compiler, pipeline executor and
//! join engine behind the `chainql` record-set API.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
#[allow(missing_docs)]
pub mod join;
#[allow(missing_docs)]
pub mod predicate;
pub mod query;
#[allow(missing_docs)]
pub mod value;

pub use error::{Error, Result};
pub use join::{join, JoinType};
pub use predicate::{BinaryOperator, LikePattern, Predicate};
pub use query::{BindMode, QueryPlan};
pub use value::{Record, Value};
