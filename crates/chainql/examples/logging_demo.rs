use chainql::logging::LogConfig;
use chainql::{RecordSet, Value};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Debug level shows compiled plans and per-stage cardinalities
    let _guard = LogConfig::debug().init()?;

    println!("=== chainql Logging Demo ===\n");

    let mut orders = RecordSet::from_value(Value::from(json!([
        {"id": 1, "item": "pen", "qty": 3},
        {"id": 2, "item": "ink", "qty": 1},
        {"id": 3, "item": "pad", "qty": 7}
    ])));

    println!("\n1. Running a query...");
    orders.query("SELECT item WHERE qty > ? ORDER BY qty DESC", &[Value::from(2)])?;

    println!("\n2. Aggregating...");
    orders.reset().sum("qty");

    // Logged as a warning: the working set is a single number now
    println!("\n3. Sequence operation after an aggregate...");
    orders.limit(1);

    println!("\n=== Demo Complete ===");
    println!("Check the logs above to see tracing output!");

    Ok(())
}
