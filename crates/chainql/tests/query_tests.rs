use chainql::{Error, QueryConfig, RecordSet, Value};
use serde_json::json;

fn people() -> RecordSet {
    RecordSet::from_value(Value::from(json!([
        {"id": 1, "name": "John Doe", "age": 20, "city": "Oslo"},
        {"id": 2, "name": "Jane Roe", "age": 30, "city": "Bergen"},
        {"id": 3, "name": "Max Doe", "age": 40, "city": "Oslo"},
        {"id": 4, "name": "Eve", "age": "35", "city": "Tromso"}
    ])))
}

fn ids(rows: &[Value]) -> Vec<i64> {
    rows.iter()
        .filter_map(|row| match row.get("id") {
            Value::Integer(id) => Some(*id),
            _ => None,
        })
        .collect()
}

fn v(json: serde_json::Value) -> Value {
    Value::from(json)
}

#[test]
fn test_select_where_order_limit() {
    let mut records = RecordSet::from_value(v(json!([
        {"id": 1, "age": 20},
        {"id": 2, "age": 30},
        {"id": 3, "age": 40}
    ])));

    let results = records
        .query(
            "SELECT id WHERE age >= ? ORDER BY age DESC LIMIT 2",
            &[Value::from(25)],
        )
        .unwrap();

    assert_eq!(results, vec![v(json!({"id": 3})), v(json!({"id": 2}))]);
}

#[test]
fn test_empty_query_returns_working_set() {
    let mut records = people();
    let before = records.rows().unwrap().to_vec();
    let results = records.query("", &[]).unwrap();
    assert_eq!(results, before);
}

#[test]
fn test_query_replaces_working_set() {
    let mut records = people();
    records.query("WHERE city = ?", &[Value::from("Oslo")]).unwrap();
    assert_eq!(records.len(), 2);

    // a second query runs over the previous result
    let results = records.query("WHERE age > ?", &[Value::from(25)]).unwrap();
    assert_eq!(ids(&results), vec![3]);

    records.reset();
    assert_eq!(records.len(), 4);
}

#[test]
fn test_loose_equality_against_numeric_strings() {
    let mut records = people();
    let results = records.query("WHERE age = ?", &[Value::from(35)]).unwrap();
    assert_eq!(ids(&results), vec![4]);
}

#[test]
fn test_in_and_not_in() {
    let mut records = people();
    let results = records
        .query("WHERE id IN (?)", &[v(json!([1, 3]))])
        .unwrap();
    assert_eq!(ids(&results), vec![1, 3]);

    records.reset();
    let results = records
        .query("WHERE id NOT IN (?)", &[v(json!([1, 3]))])
        .unwrap();
    assert_eq!(ids(&results), vec![2, 4]);
}

#[test]
fn test_in_with_non_array_parameter_matches_nothing() {
    let mut records = people();
    assert!(records
        .query("WHERE id IN (?)", &[Value::from(1)])
        .unwrap()
        .is_empty());

    records.reset();
    assert!(records
        .query("WHERE id NOT IN (?)", &[Value::from(1)])
        .unwrap()
        .is_empty());
}

#[test]
fn test_between_is_inclusive() {
    let mut records = people();
    let results = records
        .query("WHERE age BETWEEN ? AND ?", &[Value::from(20), Value::from(30)])
        .unwrap();
    assert_eq!(ids(&results), vec![1, 2]);
}

#[test]
fn test_like_is_case_insensitive_and_anchored() {
    let mut records = people();
    let results = records
        .query("WHERE name LIKE ?", &[Value::from("%doe")])
        .unwrap();
    assert_eq!(ids(&results), vec![1, 3]);

    records.reset();
    let results = records
        .query("WHERE name LIKE ?", &[Value::from("j___ %")])
        .unwrap();
    assert_eq!(ids(&results), vec![1, 2]);

    records.reset();
    assert!(records
        .query("WHERE name LIKE ?", &[Value::from("doe")])
        .unwrap()
        .is_empty());
}

#[test]
fn test_parameters_bind_in_order_across_between() {
    let mut records = RecordSet::from_value(v(json!([
        {"a": 1, "b": 2},
        {"a": 1, "b": 5},
        {"a": 2, "b": 3}
    ])));
    let results = records
        .query(
            "WHERE a = ? AND b BETWEEN ? AND ?",
            &[Value::from(1), Value::from(2), Value::from(3)],
        )
        .unwrap();
    assert_eq!(results, vec![v(json!({"a": 1, "b": 2}))]);
}

#[test]
fn test_connectives_fold_left_to_right() {
    let mut records = people();
    // (city = Oslo OR city = Bergen) AND age > 25
    let results = records
        .query(
            "WHERE city = ? OR city = ? AND age > ?",
            &[Value::from("Oslo"), Value::from("Bergen"), Value::from(25)],
        )
        .unwrap();
    assert_eq!(ids(&results), vec![2, 3]);
}

#[test]
fn test_unrecognized_condition_only_fails_its_branch() {
    let mut records = people();
    let results = records
        .query("WHERE age ~ ? OR id = ?", &[Value::from(1), Value::from(2)])
        .unwrap();
    assert_eq!(ids(&results), vec![2]);
}

#[test]
fn test_unrecognized_condition_keeps_later_parameters_aligned() {
    let mut records = RecordSet::from_value(v(json!([
        {"id": 1, "a": 0},
        {"id": 2, "a": 0}
    ])));
    let results = records
        .query("SELECT id WHERE a ~ ? OR id = ?", &[Value::from(1), Value::from(2)])
        .unwrap();
    assert_eq!(results, vec![v(json!({"id": 2}))]);
}

#[test]
fn test_where_accepts_punctuated_field_names() {
    let mut records = RecordSet::from_value(v(json!([
        {"first-name": "Ann"},
        {"first-name": "Bob"}
    ])));
    let results = records
        .query("WHERE first-name = ?", &[Value::from("Ann")])
        .unwrap();
    assert_eq!(results, vec![v(json!({"first-name": "Ann"}))]);
}

#[test]
fn test_keywords_are_case_insensitive() {
    let mut records = people();
    let results = records
        .query("select name where age < ? order by age desc", &[Value::from(35)])
        .unwrap();
    assert_eq!(
        results,
        vec![v(json!({"name": "Jane Roe"})), v(json!({"name": "John Doe"}))]
    );
}

#[test]
fn test_select_projects_absent_fields_as_undefined() {
    let mut records = people();
    let results = records.query("SELECT id, email LIMIT 1", &[]).unwrap();
    assert_eq!(results[0].get("email"), &Value::Undefined);
    assert_eq!(
        serde_json::to_string(&results[0]).unwrap(),
        r#"{"id":1}"#
    );
}

#[test]
fn test_order_by_numeric_strings() {
    let mut records = people();
    let results = records.query("ORDER BY age", &[]).unwrap();
    assert_eq!(ids(&results), vec![1, 2, 4, 3]);
}

#[test]
fn test_limit_is_idempotent() {
    let mut once = people();
    let first = once.query("LIMIT 2", &[]).unwrap();
    let second = once.query("LIMIT 2", &[]).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_malformed_clauses_are_skipped() {
    let mut records = people();
    let results = records.query("ORDER BY LIMIT many", &[]).unwrap();
    assert_eq!(ids(&results), vec![1, 2, 3, 4]);
}

#[test]
fn test_strict_mode_rejects_parameter_mismatch() {
    let rows = people().rows().unwrap().to_vec();
    let mut records = RecordSet::with_config(rows, QueryConfig::strict()).unwrap();

    let err = records
        .query("WHERE age > ? AND city = ?", &[Value::from(1)])
        .unwrap_err();
    assert!(matches!(
        err,
        Error::ParameterCount {
            expected: 2,
            supplied: 1
        }
    ));

    let err = records.query("WHERE age > 30", &[]).unwrap_err();
    assert!(matches!(err, Error::UnrecognizedCondition(_)));

    // failed queries leave the working set alone
    assert_eq!(records.len(), 4);
}

#[test]
fn test_query_limits() {
    let config = QueryConfig::default()
        .with_max_query_length(16)
        .with_max_parameters(1);
    let mut records = RecordSet::with_config(Vec::new(), config).unwrap();

    assert!(matches!(
        records.query("SELECT id WHERE id = ?", &[Value::from(1)]),
        Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
        records.query("LIMIT 1", &[Value::from(1), Value::from(2)]),
        Err(Error::InvalidInput(_))
    ));
}
