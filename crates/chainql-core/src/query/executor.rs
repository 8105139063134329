/// Pipeline executor
///
/// Runs a compiled [`QueryPlan`] over a record sequence in fixed stage order:
/// filter, sort, limit, project. Each stage is skipped when its clause is
/// absent.
use super::clause::{OrderBy, OrderDirection};
use super::composer::ConditionChain;
use super::plan::QueryPlan;
use crate::value::{Record, Value};
use std::cmp::Ordering;
use tracing::debug;

/// Query executor
pub struct Executor<'a> {
    plan: &'a QueryPlan,
}

impl<'a> Executor<'a> {
    /// Create new executor
    pub fn new(plan: &'a QueryPlan) -> Self {
        Self { plan }
    }

    /// Execute the plan, consuming the input rows
    pub fn execute(&self, rows: Vec<Value>) -> Vec<Value> {
        let mut rows = rows;
        if let Some(predicate) = &self.plan.predicate {
            rows = self.execute_filter(rows, predicate);
        }
        if let Some(order) = &self.plan.order_by {
            rows = self.execute_sort(rows, order);
        }
        if let Some(count) = self.plan.limit {
            rows = self.execute_limit(rows, count);
        }
        if let Some(fields) = &self.plan.projection {
            rows = self.execute_project(rows, fields);
        }
        rows
    }

    fn execute_filter(&self, rows: Vec<Value>, predicate: &ConditionChain) -> Vec<Value> {
        let input = rows.len();
        let filtered: Vec<Value> = rows
            .into_iter()
            .filter(|row| predicate.evaluate(row))
            .collect();
        debug!(stage = "filter", input, output = filtered.len());
        filtered
    }

    fn execute_sort(&self, mut rows: Vec<Value>, order: &OrderBy) -> Vec<Value> {
        sort_by_numeric_field(&mut rows, &order.field, order.direction);
        debug!(stage = "sort", field = %order.field, direction = %order.direction);
        rows
    }

    fn execute_limit(&self, mut rows: Vec<Value>, count: usize) -> Vec<Value> {
        rows.truncate(count);
        rows
    }

    fn execute_project(&self, rows: Vec<Value>, fields: &[String]) -> Vec<Value> {
        rows.iter().map(|row| project(row, fields)).collect()
    }
}

/// Stable sort by the numeric value of `field`.
///
/// Records whose key is not a number keep their relative order and go after
/// every numeric key, whichever the direction.
pub fn sort_by_numeric_field(rows: &mut Vec<Value>, field: &str, direction: OrderDirection) {
    let mut keyed: Vec<(f64, Value)> = rows
        .drain(..)
        .map(|row| (row.get(field).to_number(), row))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ordering = a.partial_cmp(b).unwrap_or(Ordering::Equal);
            match direction {
                OrderDirection::Asc => ordering,
                OrderDirection::Desc => ordering.reverse(),
            }
        }
    });

    rows.extend(keyed.into_iter().map(|(_, row)| row));
}

/// Build a record holding exactly `fields`, in that order. Absent fields
/// are [`Value::Undefined`].
pub fn project(row: &Value, fields: &[String]) -> Value {
    let record: Record = fields
        .iter()
        .map(|field| (field.as_str(), row.get(field).clone()))
        .collect();
    Value::Object(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::binder::BindMode;
    use serde_json::json;

    fn rows(json: serde_json::Value) -> Vec<Value> {
        match Value::from(json) {
            Value::Array(items) => items,
            other => vec![other],
        }
    }

    fn run(query: &str, params: &[Value], input: Vec<Value>) -> Vec<Value> {
        let plan = QueryPlan::compile(query, params, BindMode::Permissive).unwrap();
        Executor::new(&plan).execute(input)
    }

    #[test]
    fn test_full_pipeline() {
        let input = rows(json!([
            {"id": 1, "age": 20},
            {"id": 2, "age": 30},
            {"id": 3, "age": 40}
        ]));
        let result = run(
            "SELECT id WHERE age >= ? ORDER BY age DESC LIMIT 2",
            &[Value::Integer(25)],
            input,
        );
        assert_eq!(result, rows(json!([{"id": 3}, {"id": 2}])));
    }

    #[test]
    fn test_empty_plan_returns_input() {
        let input = rows(json!([{"b": 2}, {"a": 1}]));
        assert_eq!(run("", &[], input.clone()), input);
    }

    #[test]
    fn test_limit_larger_than_input() {
        let input = rows(json!([{"a": 1}, {"a": 2}]));
        assert_eq!(run("LIMIT 10", &[], input.clone()), input);
        assert!(run("LIMIT 0", &[], input).is_empty());
    }

    #[test]
    fn test_limit_applies_before_projection() {
        let input = rows(json!([{"a": 3, "b": 1}, {"a": 1, "b": 2}, {"a": 2, "b": 3}]));
        let result = run("SELECT b ORDER BY a LIMIT 2", &[], input);
        assert_eq!(result, rows(json!([{"b": 2}, {"b": 3}])));
    }

    #[test]
    fn test_projection_keeps_requested_order_and_absent_fields() {
        let input = rows(json!([{"a": 1, "b": 2}]));
        let result = run("SELECT b, missing, a", &[], input);

        let record = result[0].as_object().unwrap();
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["b", "missing", "a"]);
        assert_eq!(record.get("missing"), &Value::Undefined);
    }

    #[test]
    fn test_sort_numeric_strings_and_non_numeric_keys() {
        let mut input = rows(json!([
            {"k": "10"},
            {"k": "x"},
            {"k": 2},
            {},
            {"k": -1}
        ]));
        sort_by_numeric_field(&mut input, "k", OrderDirection::Asc);
        assert_eq!(
            input,
            rows(json!([{"k": -1}, {"k": 2}, {"k": "10"}, {"k": "x"}, {}]))
        );

        sort_by_numeric_field(&mut input, "k", OrderDirection::Desc);
        assert_eq!(
            input,
            rows(json!([{"k": "10"}, {"k": 2}, {"k": -1}, {"k": "x"}, {}]))
        );
    }

    #[test]
    fn test_sort_is_stable() {
        let mut input = rows(json!([
            {"id": 1, "k": 5},
            {"id": 2, "k": 1},
            {"id": 3, "k": 5}
        ]));
        sort_by_numeric_field(&mut input, "k", OrderDirection::Desc);
        let ids: Vec<&Value> = input.iter().map(|r| r.get("id")).collect();
        assert_eq!(ids, vec![&Value::Integer(1), &Value::Integer(3), &Value::Integer(2)]);
    }

    #[test]
    fn test_project_non_object() {
        let projected = project(&Value::Integer(7), &["a".to_string()]);
        assert_eq!(projected.get("a"), &Value::Undefined);
        assert_eq!(projected.as_object().map(Record::len), Some(1));
    }
}
