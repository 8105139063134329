/// Tests for INNER, LEFT and RIGHT joins through the session API
use chainql::{JoinType, RecordSet, Value};
use serde_json::json;

fn rows(json: serde_json::Value) -> Vec<Value> {
    match Value::from(json) {
        Value::Array(items) => items,
        other => vec![other],
    }
}

fn customers() -> RecordSet {
    RecordSet::new(rows(json!([
        {"id": 1, "name": "Ann"},
        {"id": 2, "name": "Bob"},
        {"id": 3, "name": "Cid"}
    ])))
}

fn orders() -> Vec<Value> {
    rows(json!([
        {"order": 10, "customer": 1, "total": 5},
        {"order": 11, "customer": 1, "total": 7},
        {"order": 12, "customer": 2, "total": 3},
        {"order": 13, "customer": 4, "total": 9}
    ]))
}

#[test]
fn test_inner_join() {
    let mut set = customers();
    set.join(&orders(), "id", "customer", JoinType::Inner);

    let joined = set.rows().unwrap();
    assert_eq!(joined.len(), 3);
    assert_eq!(
        joined[0],
        Value::from(json!({"id": 1, "name": "Ann", "order": 10, "customer": 1, "total": 5}))
    );
    assert_eq!(joined[2].get("name"), &Value::from("Bob"));
}

#[test]
fn test_left_join() {
    let mut set = customers();
    set.join(&orders(), "id", "customer", JoinType::Left);

    let joined = set.rows().unwrap();
    assert_eq!(joined.len(), 4);
    assert_eq!(joined[3], Value::from(json!({"id": 3, "name": "Cid"})));
}

#[test]
fn test_right_join() {
    let mut set = customers();
    set.join(&orders(), "id", "customer", JoinType::Right);

    let joined = set.rows().unwrap();
    assert_eq!(joined.len(), 4);
    assert_eq!(
        joined[3],
        Value::from(json!({"order": 13, "customer": 4, "total": 9}))
    );
    assert!(joined.iter().all(|row| row.get("name") != &Value::from("Cid")));
}

#[test]
fn test_join_cardinalities() {
    let inner = customers()
        .join(&orders(), "id", "customer", JoinType::Inner)
        .len();
    let left = customers()
        .join(&orders(), "id", "customer", JoinType::Left)
        .len();
    let right = customers()
        .join(&orders(), "id", "customer", JoinType::Right)
        .len();

    // one customer without orders, one order without a customer
    assert_eq!(left - inner, 1);
    assert_eq!(right - inner, 1);
}

#[test]
fn test_join_then_query() {
    let mut set = customers();
    set.join(&orders(), "id", "customer", JoinType::Inner);

    let results = set
        .query(
            "SELECT name, total WHERE total > ? ORDER BY total DESC",
            &[Value::from(4)],
        )
        .unwrap();
    assert_eq!(
        results,
        rows(json!([
            {"name": "Ann", "total": 7},
            {"name": "Ann", "total": 5}
        ]))
    );
}

#[test]
fn test_join_with_empty_sides() {
    let mut set = customers();
    set.join(&[], "id", "customer", JoinType::Left);
    assert_eq!(set.len(), 3);

    let mut empty = RecordSet::new(Vec::new());
    empty.join(&orders(), "id", "customer", JoinType::Right);
    assert_eq!(empty.len(), 4);

    let mut empty = RecordSet::new(Vec::new());
    empty.join(&orders(), "id", "customer", JoinType::Inner);
    assert!(empty.is_empty());
}

#[test]
fn test_join_type_parses_from_text() {
    let join_type: JoinType = "left".parse().unwrap();
    assert_eq!(join_type, JoinType::Left);
    assert_eq!(JoinType::Right.to_string(), "RIGHT");
}
