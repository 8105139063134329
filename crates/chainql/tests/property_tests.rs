use chainql::{JoinType, RecordSet, Record, Value};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Operation {
    Filter { min: i64 },
    Limit { count: usize },
    Unique,
    Pluck,
    OrderBy,
    Sum,
}

fn arb_field_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        (-50i64..50).prop_map(Value::Integer),
        (-50.0f64..50.0).prop_map(Value::Float),
        "[a-c]{0,2}".prop_map(Value::String),
        any::<bool>().prop_map(Value::Boolean),
        Just(Value::Null),
    ]
}

fn arb_record() -> impl Strategy<Value = Value> {
    (0i64..5, arb_field_value(), prop::option::of(arb_field_value())).prop_map(|(id, score, tag)| {
        let mut record = Record::new();
        record.insert("id", Value::Integer(id));
        record.insert("score", score);
        if let Some(tag) = tag {
            record.insert("tag", tag);
        }
        Value::Object(record)
    })
}

fn arb_records() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(arb_record(), 0..40)
}

fn arb_operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        (-50i64..50).prop_map(|min| Operation::Filter { min }),
        (0usize..10).prop_map(|count| Operation::Limit { count }),
        Just(Operation::Unique),
        Just(Operation::Pluck),
        Just(Operation::OrderBy),
        Just(Operation::Sum),
    ]
}

proptest! {
    #[test]
    fn prop_empty_query_is_identity(records in arb_records()) {
        let mut set = RecordSet::new(records.clone());
        let results = set.query("", &[]).unwrap();
        prop_assert_eq!(results, records);
    }

    #[test]
    fn prop_reset_restores_original(records in arb_records(), ops in prop::collection::vec(arb_operation(), 0..8)) {
        let mut set = RecordSet::new(records.clone());
        for op in ops {
            match op {
                Operation::Filter { min } => {
                    set.filter(|r| r.get("score").to_number() >= min as f64);
                }
                Operation::Limit { count } => {
                    set.limit(count);
                }
                Operation::Unique => {
                    set.unique(Some("id"));
                }
                Operation::Pluck => {
                    set.pluck("tag");
                }
                Operation::OrderBy => {
                    set.order_by("score", chainql::OrderDirection::Desc);
                }
                Operation::Sum => {
                    set.sum("score");
                }
            }
        }

        set.reset();
        prop_assert_eq!(set.rows().unwrap(), &records[..]);
    }

    #[test]
    fn prop_limit_is_idempotent(records in arb_records(), n in 0usize..50) {
        let query = format!("LIMIT {}", n);
        let mut once = RecordSet::new(records.clone());
        let first = once.query(&query, &[]).unwrap();
        let second = once.query(&query, &[]).unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), records.len().min(n));
    }

    #[test]
    fn prop_unique_keeps_first_occurrence_per_key(records in arb_records()) {
        let mut set = RecordSet::new(records.clone());
        set.unique(Some("id"));
        let unique = set.rows().unwrap();

        let mut expected: Vec<Value> = Vec::new();
        for record in &records {
            if !expected.iter().any(|e| e.get("id").strict_eq(record.get("id"))) {
                expected.push(record.clone());
            }
        }
        prop_assert_eq!(unique, &expected[..]);
    }

    #[test]
    fn prop_join_cardinality(left in arb_records(), right in arb_records()) {
        let matches = |l: &Value| right.iter().filter(|r| r.get("id").strict_eq(l.get("id"))).count();
        let expected_inner: usize = left.iter().map(matches).sum();
        let unmatched_left = left.iter().filter(|l| matches(l) == 0).count();
        let unmatched_right = right
            .iter()
            .filter(|r| !left.iter().any(|l| l.get("id").strict_eq(r.get("id"))))
            .count();

        let inner = RecordSet::new(left.clone()).join(&right, "id", "id", JoinType::Inner).len();
        let left_join = RecordSet::new(left.clone()).join(&right, "id", "id", JoinType::Left).len();
        let right_join = RecordSet::new(left.clone()).join(&right, "id", "id", JoinType::Right).len();

        prop_assert_eq!(inner, expected_inner);
        prop_assert_eq!(left_join, inner + unmatched_left);
        prop_assert_eq!(right_join, inner + unmatched_right);
    }

    #[test]
    fn prop_where_filter_matches_predicate(records in arb_records(), min in -50i64..50) {
        let mut set = RecordSet::new(records.clone());
        let results = set.query("WHERE score >= ?", &[Value::Integer(min)]).unwrap();

        let bound = Value::Integer(min);
        let expected: Vec<Value> = records
            .into_iter()
            .filter(|r| matches!(
                r.get("score").loose_cmp(&bound),
                Some(std::cmp::Ordering::Greater | std::cmp::Ordering::Equal)
            ))
            .collect();
        prop_assert_eq!(results, expected);
    }

    #[test]
    fn prop_compile_never_fails_in_permissive_mode(query in "[ -~]{0,80}", n in 0usize..4) {
        let params: Vec<Value> = (0..n as i64).map(Value::Integer).collect();
        let mut set = RecordSet::new(vec![Value::Object(Record::new())]);
        prop_assert!(set.query(&query, &params).is_ok());
    }
}
