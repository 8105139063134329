/// Join Demo
///
/// Inner, left and right joins followed by a query over the merged records
use chainql::{JoinType, RecordSet, Value};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== chainql Join Demo ===\n");

    let customers = Value::from(json!([
        {"id": 1, "name": "Alice"},
        {"id": 2, "name": "Bob"},
        {"id": 3, "name": "Carol"}
    ]));
    let orders = vec![
        Value::from(json!({"order": 10, "customer": 1, "total": 40})),
        Value::from(json!({"order": 11, "customer": 1, "total": 15})),
        Value::from(json!({"order": 12, "customer": 3, "total": 99})),
        Value::from(json!({"order": 13, "customer": 4, "total": 5})),
    ];

    for join_type in [JoinType::Inner, JoinType::Left, JoinType::Right] {
        let mut set = RecordSet::from_value(customers.clone());
        set.join(&orders, "id", "customer", join_type);
        println!("{} JOIN: {} rows", join_type, set.len());
        if let Some(rows) = set.rows() {
            for row in rows {
                println!("   {}", row);
            }
        }
    }

    println!("\nBig spenders:");
    let mut set = RecordSet::from_value(customers);
    set.join(&orders, "id", "customer", JoinType::Inner);
    let rows = set.query("SELECT name, total WHERE total > ? ORDER BY total DESC", &[Value::from(20)])?;
    for row in rows {
        println!("   {}", row);
    }

    println!("\nSpend per customer:");
    let mut set = RecordSet::from_value(Value::from(json!([{"id": 1}])));
    let total = set.join(&orders, "id", "customer", JoinType::Inner).sum("total").get().clone();
    println!("   customer 1 spent {}", total.into_value());

    println!("\n=== Demo Complete ===");
    Ok(())
}
