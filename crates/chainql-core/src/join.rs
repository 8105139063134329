//! Join engine
//!
//! Nested-loop equi-join between two record sequences. Keys match under
//! strict equality, and every matching pair produces its own merged record.

use crate::error::{Error, Result};
use crate::value::{Record, Value};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Join types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinType::Inner => write!(f, "INNER"),
            JoinType::Left => write!(f, "LEFT"),
            JoinType::Right => write!(f, "RIGHT"),
        }
    }
}

impl FromStr for JoinType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INNER" => Ok(JoinType::Inner),
            "LEFT" => Ok(JoinType::Left),
            "RIGHT" => Ok(JoinType::Right),
            other => Err(Error::InvalidInput(format!("unknown join type '{}'", other))),
        }
    }
}

/// Join `left` with `right` where `left[left_key]` strictly equals
/// `right[right_key]`.
///
/// Merged records take the left fields first, then the right fields, so the
/// right side wins on collisions. Unmatched records of the preserved side
/// (left for LEFT, right for RIGHT) are emitted unchanged.
pub fn join(
    left: &[Value],
    right: &[Value],
    left_key: &str,
    right_key: &str,
    join_type: JoinType,
) -> Vec<Value> {
    let mut result = Vec::new();

    match join_type {
        JoinType::Inner | JoinType::Left => {
            for l_row in left {
                let key = l_row.get(left_key);
                let mut matched = false;
                for r_row in right {
                    if r_row.get(right_key).strict_eq(key) {
                        result.push(merge_rows(l_row, r_row));
                        matched = true;
                    }
                }
                if !matched && join_type == JoinType::Left {
                    result.push(l_row.clone());
                }
            }
        }
        JoinType::Right => {
            for r_row in right {
                let key = r_row.get(right_key);
                let mut matched = false;
                for l_row in left {
                    if l_row.get(left_key).strict_eq(key) {
                        result.push(merge_rows(l_row, r_row));
                        matched = true;
                    }
                }
                if !matched {
                    result.push(r_row.clone());
                }
            }
        }
    }

    debug!(
        join_type = %join_type,
        left = left.len(),
        right = right.len(),
        output = result.len(),
        "joined record sets"
    );
    result
}

fn merge_rows(left: &Value, right: &Value) -> Value {
    let mut merged = left.as_object().cloned().unwrap_or_else(Record::new);
    if let Some(fields) = right.as_object() {
        merged.merge(fields);
    }
    Value::Object(merged)
}
