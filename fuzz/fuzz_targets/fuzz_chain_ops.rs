#![no_main]

use arbitrary::Arbitrary;
use chainql::{JoinType, OrderDirection, RecordSet, Value};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum ChainOp {
    Query { text: String, params: Vec<i64> },
    Limit { n: u8 },
    OrderBy { field: String, desc: bool },
    Unique { field: Option<String> },
    GroupBy { field: String },
    Pluck { field: String },
    Sum { field: String },
    Average { field: String },
    Join { key: String, kind: u8 },
    Reset,
}

fuzz_target!(|input: (String, Vec<ChainOp>)| {
    let (json, ops) = input;
    let Ok(mut set) = RecordSet::from_json(&json) else {
        return;
    };
    let snapshot = set.clone().reset().get().clone();

    for op in ops.iter().take(50) { // Limit operations to prevent timeout
        match op {
            ChainOp::Query { text, params } => {
                let params: Vec<Value> = params.iter().copied().map(Value::Integer).collect();
                let _ = set.query(text, &params);
            }
            ChainOp::Limit { n } => {
                set.limit(*n as usize);
            }
            ChainOp::OrderBy { field, desc } => {
                let direction = if *desc { OrderDirection::Desc } else { OrderDirection::Asc };
                set.order_by(field, direction);
            }
            ChainOp::Unique { field } => {
                set.unique(field.as_deref());
            }
            ChainOp::GroupBy { field } => {
                set.group_by(field);
            }
            ChainOp::Pluck { field } => {
                set.pluck(field);
            }
            ChainOp::Sum { field } => {
                set.sum(field);
            }
            ChainOp::Average { field } => {
                set.average(field);
            }
            ChainOp::Join { key, kind } => {
                let join_type = match kind % 3 {
                    0 => JoinType::Inner,
                    1 => JoinType::Left,
                    _ => JoinType::Right,
                };
                let other = set.rows().map(<[Value]>::to_vec).unwrap_or_default();
                set.join(&other, key, key, join_type);
            }
            ChainOp::Reset => {
                set.reset();
            }
        }
    }

    assert_eq!(set.reset().get(), &snapshot);
});
