/// Query Engine Demo
///
/// Demonstrates the SQL-like query language over in-memory records
use chainql::{QueryPlan, RecordSet, Value};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== chainql Query Demo ===\n");

    let records = Value::from(json!([
        {"id": 1, "name": "Alice", "age": 30, "city": "NYC"},
        {"id": 2, "name": "Bob", "age": 25, "city": "SF"},
        {"id": 3, "name": "Charlie", "age": 35, "city": "NYC"},
        {"id": 4, "name": "Diana", "age": "28", "city": "LA"}
    ]));
    let mut users = RecordSet::from_value(records);

    // Example 1: projection
    println!("1. SELECT name, city");
    print_rows(&users.query("SELECT name, city", &[])?);
    users.reset();

    // Example 2: comparison with loose equality ("28" >= 28)
    println!("\n2. WHERE age >= ? ORDER BY age DESC");
    print_rows(&users.query("WHERE age >= ? ORDER BY age DESC", &[Value::from(28)])?);
    users.reset();

    // Example 3: IN and BETWEEN joined left to right
    println!("\n3. WHERE city IN (?) AND age BETWEEN ? AND ?");
    let params = [
        Value::from(json!(["NYC", "LA"])),
        Value::from(29),
        Value::from(40),
    ];
    print_rows(&users.query("WHERE city IN (?) AND age BETWEEN ? AND ?", &params)?);
    users.reset();

    // Example 4: LIKE pattern
    println!("\n4. SELECT name WHERE name LIKE ?");
    print_rows(&users.query("SELECT name WHERE name LIKE ?", &[Value::from("%li%")])?);
    users.reset();

    // Example 5: queries refine the working set
    println!("\n5. Two queries in sequence");
    users.query("WHERE city = ?", &[Value::from("NYC")])?;
    print_rows(&users.query("ORDER BY age DESC LIMIT 1", &[])?);

    // Example 6: inspect a compiled plan
    println!("\n6. Compiled plan");
    let plan = QueryPlan::compile(
        "SELECT id WHERE age > ? OR city = ? LIMIT 10",
        &[Value::from(30), Value::from("SF")],
        Default::default(),
    )?;
    println!("   {}", plan);

    println!("\n=== Demo Complete ===");
    Ok(())
}

fn print_rows(rows: &[Value]) {
    for row in rows {
        println!("   {}", row);
    }
}
