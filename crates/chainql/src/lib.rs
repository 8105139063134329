//! # chainql
//!
//! An in-memory query engine over JSON-like records, with a chainable
//! transformation API and a small SQL-like query language.
//!
//! ## Quick Start
//!
//! ```rust
//! use chainql::{RecordSet, Value};
//! use serde_json::json;
//!
//! let mut users = RecordSet::from_value(Value::from(json!([
//!     {"id": 1, "name": "Ann", "age": 20},
//!     {"id": 2, "name": "Bob", "age": 30},
//!     {"id": 3, "name": "Cid", "age": 40}
//! ])));
//!
//! let result = users.query(
//!     "SELECT id WHERE age >= ? ORDER BY age DESC LIMIT 2",
//!     &[Value::from(25)],
//! )?;
//! assert_eq!(result, vec![Value::from(json!({"id": 3})), Value::from(json!({"id": 2}))]);
//! # Ok::<(), chainql::Error>(())
//! ```
//!
//! ## Query Language
//!
//! ```text
//! SELECT f1, f2 WHERE <cond> [AND|OR <cond>]... ORDER BY f [ASC|DESC] LIMIT n
//! ```
//!
//! Every clause is optional. Conditions are `f OP ?` (`= != < <= > >=`),
//! `f IN (?)`, `f NOT IN (?)`, `f BETWEEN ? AND ?` and `f LIKE ?`. AND and OR
//! are applied strictly left to right, without precedence.
//!
//! ## Chaining
//!
//! ```rust
//! use chainql::{RecordSet, Value};
//! use serde_json::json;
//!
//! let mut orders = RecordSet::from_json(r#"[
//!     {"item": "pen", "price": "1.50"},
//!     {"item": "ink", "price": 3},
//!     {"item": "pen", "price": 2}
//! ]"#)?;
//!
//! let total = orders.unique(Some("item")).sum("price").get().clone();
//! assert_eq!(total.into_value(), Value::from(4.5));
//!
//! // back to the original records
//! assert_eq!(orders.reset().len(), 3);
//! # Ok::<(), chainql::Error>(())
//! ```

#![warn(missing_docs)]

use std::cmp::Ordering;
use std::collections::HashSet;

use chainql_core::query::{project, sort_by_numeric_field, Executor};
use tracing::{instrument, warn};

pub mod config;
pub mod logging;
pub mod security;

// Re-export core types
pub use chainql_core::query::{BindMode, OrderDirection, QueryPlan};
pub use chainql_core::{BinaryOperator, Error, JoinType, LikePattern, Predicate, Record, Result, Value};
pub use config::QueryConfig;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The working set of a [`RecordSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    /// A record sequence
    Rows(Vec<Value>),
    /// The single value left by `find`, `group_by`, `sum` or `average`
    Single(Value),
}

impl Data {
    /// The record sequence, if the working set holds one
    pub fn as_rows(&self) -> Option<&[Value]> {
        match self {
            Data::Rows(rows) => Some(rows),
            Data::Single(_) => None,
        }
    }

    /// The working set as one value; a sequence becomes an array.
    pub fn into_value(self) -> Value {
        match self {
            Data::Rows(rows) => Value::Array(rows),
            Data::Single(value) => value,
        }
    }
}

/// A query session over a record sequence.
///
/// Holds an immutable snapshot of the records it was built from and a
/// working set. Chain operations transform the working set in place and
/// return the session. `find`, `group_by`, `sum` and `average` leave a single
/// value behind; sequence operations after them are ignored (with a warning)
/// until [`reset`](RecordSet::reset).
///
/// A session is single-owner and synchronous; share it across threads only
/// behind your own lock.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    original: Vec<Value>,
    data: Data,
    config: QueryConfig,
}

impl Default for Data {
    fn default() -> Self {
        Data::Rows(Vec::new())
    }
}

impl RecordSet {
    /// Creates a session over `records` with the default configuration.
    pub fn new(records: Vec<Value>) -> Self {
        Self {
            data: Data::Rows(records.clone()),
            original: records,
            config: QueryConfig::default(),
        }
    }

    /// Creates a session with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration is invalid.
    pub fn with_config(records: Vec<Value>, config: QueryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new(records)
        })
    }

    /// Creates a session from an array value. Any other value yields an
    /// empty session.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(records) => Self::new(records),
            _ => Self::default(),
        }
    }

    /// Creates a session from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Serialization` if the text is not valid JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::from_value(value))
    }

    /// The session configuration
    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    fn rows_mut(&mut self, operation: &'static str) -> Option<&mut Vec<Value>> {
        match &mut self.data {
            Data::Rows(rows) => Some(rows),
            Data::Single(_) => {
                warn!(operation, "ignored: working set holds a single value, call reset first");
                None
            }
        }
    }

    /// Keeps the records for which `predicate` holds.
    pub fn filter<F>(&mut self, predicate: F) -> &mut Self
    where
        F: Fn(&Value) -> bool,
    {
        if let Some(rows) = self.rows_mut("filter") {
            rows.retain(|row| predicate(row));
        }
        self
    }

    /// Replaces every record with `transform(record)`.
    pub fn map<F>(&mut self, transform: F) -> &mut Self
    where
        F: FnMut(Value) -> Value,
    {
        if let Some(rows) = self.rows_mut("map") {
            *rows = std::mem::take(rows).into_iter().map(transform).collect();
        }
        self
    }

    /// Stable sort with a caller-supplied comparator. The comparator must be
    /// a total order.
    pub fn sort<F>(&mut self, compare: F) -> &mut Self
    where
        F: FnMut(&Value, &Value) -> Ordering,
    {
        if let Some(rows) = self.rows_mut("sort") {
            rows.sort_by(compare);
        }
        self
    }

    /// Sorts by the numeric value of `field`, the way `ORDER BY` does.
    pub fn order_by(&mut self, field: &str, direction: OrderDirection) -> &mut Self {
        if let Some(rows) = self.rows_mut("order_by") {
            sort_by_numeric_field(rows, field, direction);
        }
        self
    }

    /// Keeps the first `n` records.
    pub fn limit(&mut self, n: usize) -> &mut Self {
        if let Some(rows) = self.rows_mut("limit") {
            rows.truncate(n);
        }
        self
    }

    /// Drops repeated records, keeping first occurrences.
    ///
    /// With a key, records are compared by that field's value; without one,
    /// by their JSON serialization.
    pub fn unique(&mut self, key: Option<&str>) -> &mut Self {
        if let Some(key) = key {
            check_field("unique", key);
        }
        if let Some(rows) = self.rows_mut("unique") {
            match key {
                Some(key) => {
                    let mut seen: Vec<Value> = Vec::new();
                    rows.retain(|row| {
                        let value = row.get(key);
                        if seen.iter().any(|s| s.same_value_zero(value)) {
                            false
                        } else {
                            seen.push(value.clone());
                            true
                        }
                    });
                }
                None => {
                    let mut seen: HashSet<String> = HashSet::new();
                    rows.retain(|row| match serde_json::to_string(row) {
                        Ok(serialized) => seen.insert(serialized),
                        Err(_) => true,
                    });
                }
            }
        }
        self
    }

    /// Groups records into an object keyed by the string form of `key`.
    ///
    /// Each group is an array in record order. Keys that look like array
    /// indices come first in ascending order, the rest in first-seen order.
    pub fn group_by(&mut self, key: &str) -> &mut Self {
        check_field("group_by", key);
        if let Some(rows) = self.rows_mut("group_by") {
            let mut groups: Vec<(String, Vec<Value>)> = Vec::new();
            for row in std::mem::take(rows) {
                let group_key = row.get(key).to_string_form();
                match groups.iter_mut().find(|(k, _)| *k == group_key) {
                    Some((_, members)) => members.push(row),
                    None => groups.push((group_key, vec![row])),
                }
            }

            let (mut indexed, named): (Vec<_>, Vec<_>) = groups
                .into_iter()
                .partition(|(k, _)| array_index(k).is_some());
            indexed.sort_by_key(|(k, _)| array_index(k));

            let record: Record = indexed
                .into_iter()
                .chain(named)
                .map(|(k, members)| (k, Value::Array(members)))
                .collect();
            self.data = Data::Single(Value::Object(record));
        }
        self
    }

    /// Replaces the working set with the first record satisfying
    /// `predicate`, or `Value::Undefined` when there is none.
    pub fn find<F>(&mut self, predicate: F) -> &mut Self
    where
        F: Fn(&Value) -> bool,
    {
        if let Some(rows) = self.rows_mut("find") {
            let found = rows.iter().find(|row| predicate(row)).cloned();
            self.data = Data::Single(found.unwrap_or_default());
        }
        self
    }

    /// Replaces every record with its `key` field.
    pub fn pluck(&mut self, key: &str) -> &mut Self {
        check_field("pluck", key);
        if let Some(rows) = self.rows_mut("pluck") {
            for row in rows.iter_mut() {
                *row = row.get(key).clone();
            }
        }
        self
    }

    /// Replaces every record with a record of exactly `keys`, in order.
    pub fn pluck_many<S: AsRef<str>>(&mut self, keys: &[S]) -> &mut Self {
        if let Some(rows) = self.rows_mut("pluck_many") {
            let fields: Vec<String> = keys.iter().map(|k| k.as_ref().to_string()).collect();
            for row in rows.iter_mut() {
                *row = project(row, &fields);
            }
        }
        self
    }

    /// Replaces the working set with the sum of `key` over all records.
    /// Values without a numeric prefix count as 0.
    pub fn sum(&mut self, key: &str) -> &mut Self {
        if let Some(rows) = self.rows_mut("sum") {
            let total = numeric_total(rows, key);
            self.data = Data::Single(Value::number(total));
        }
        self
    }

    /// Replaces the working set with the mean of `key`; 0 for no records.
    pub fn average(&mut self, key: &str) -> &mut Self {
        if let Some(rows) = self.rows_mut("average") {
            let mean = if rows.is_empty() {
                0.0
            } else {
                numeric_total(rows, key) / rows.len() as f64
            };
            self.data = Data::Single(Value::number(mean));
        }
        self
    }

    /// Equi-joins the working set (left) with `other` (right).
    pub fn join(
        &mut self,
        other: &[Value],
        left_key: &str,
        right_key: &str,
        join_type: JoinType,
    ) -> &mut Self {
        check_field("join", left_key);
        check_field("join", right_key);
        if let Some(rows) = self.rows_mut("join") {
            *rows = chainql_core::join(rows, other, left_key, right_key, join_type);
        }
        self
    }

    /// Runs a query over the working set, stores the result as the new
    /// working set and returns it.
    ///
    /// # Errors
    ///
    /// - `Error::NotASequence` if the working set holds a single value
    /// - `Error::InvalidInput` if the query or parameter list exceeds the
    ///   configured limits
    /// - `Error::ParameterCount` / `Error::UnrecognizedCondition` in strict
    ///   mode
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chainql::{RecordSet, Value};
    /// use serde_json::json;
    ///
    /// let mut people = RecordSet::from_value(Value::from(json!([
    ///     {"name": "John Doe"},
    ///     {"name": "Jane Roe"}
    /// ])));
    /// let found = people.query("WHERE name LIKE ?", &[Value::from("%doe")])?;
    /// assert_eq!(found.len(), 1);
    /// # Ok::<(), chainql::Error>(())
    /// ```
    #[instrument(skip(self, params), fields(params = params.len()))]
    pub fn query(&mut self, query: &str, params: &[Value]) -> Result<Vec<Value>> {
        security::validate_query_length(query, self.config.max_query_length)?;
        security::validate_parameter_count(params.len(), self.config.max_parameters)?;
        let mode = self.config.bind_mode();

        let rows = match &mut self.data {
            Data::Rows(rows) => rows,
            Data::Single(_) => return Err(Error::NotASequence("query")),
        };

        let plan = QueryPlan::compile(query, params, mode)?;
        if plan.is_identity() {
            return Ok(rows.clone());
        }
        let result = Executor::new(&plan).execute(std::mem::take(rows));
        *rows = result.clone();
        Ok(result)
    }

    /// The current working set
    pub fn get(&self) -> &Data {
        &self.data
    }

    /// The working records, if the working set is a sequence
    pub fn rows(&self) -> Option<&[Value]> {
        self.data.as_rows()
    }

    /// Number of working records; a single value counts as one.
    pub fn len(&self) -> usize {
        match &self.data {
            Data::Rows(rows) => rows.len(),
            Data::Single(_) => 1,
        }
    }

    /// Whether the working set is an empty sequence
    pub fn is_empty(&self) -> bool {
        matches!(&self.data, Data::Rows(rows) if rows.is_empty())
    }

    /// Restores the working set to the records the session was built from.
    pub fn reset(&mut self) -> &mut Self {
        self.data = Data::Rows(self.original.clone());
        self
    }

    /// Consumes the session, returning the working set
    pub fn into_data(self) -> Data {
        self.data
    }
}

impl From<Vec<Value>> for RecordSet {
    fn from(records: Vec<Value>) -> Self {
        Self::new(records)
    }
}

/// Empty field names are accepted, since records may carry an empty key, but
/// are almost always a caller bug.
fn check_field(operation: &'static str, name: &str) {
    if let Err(e) = security::validate_field_name(name) {
        warn!(operation, error = %e, "suspicious field name");
    }
}

fn numeric_total(rows: &[Value], key: &str) -> f64 {
    rows.iter()
        .map(|row| {
            let n = row.get(key).parse_float();
            if n.is_nan() {
                0.0
            } else {
                n
            }
        })
        .sum()
}

/// Canonical array index (`0`, `1`, ... below 2^32 - 1, no leading zeros)
fn array_index(key: &str) -> Option<u32> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse::<u32>().ok().filter(|&n| n != u32::MAX)
}
