/// Chaining Demo
///
/// Sequence operations, aggregates and reset on a single record set
use chainql::{OrderDirection, RecordSet, Value};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== chainql Chaining Demo ===\n");

    let mut products = RecordSet::from_json(
        r#"[
            {"sku": "a1", "category": "tools", "price": 12.5, "stock": 3},
            {"sku": "b2", "category": "toys", "price": "4", "stock": 0},
            {"sku": "c3", "category": "tools", "price": 30, "stock": 9},
            {"sku": "d4", "category": "food", "price": 2.25, "stock": 40}
        ]"#,
    )?;

    products
        .filter(|p| p.get("stock").to_number() > 0.0)
        .order_by("price", OrderDirection::Desc)
        .pluck("sku");
    println!("In stock, priciest first: {}", products.get().clone().into_value());

    products.reset().unique(Some("category")).pluck("category");
    println!("Categories: {}", products.get().clone().into_value());

    products.reset().group_by("category");
    println!("Grouped: {}", products.get().clone().into_value());

    products.reset().average("price");
    println!("Average price: {}", products.get().clone().into_value());

    products.reset().find(|p| p.get("category").as_str() == Some("food"));
    println!("First food item: {}", products.get().clone().into_value());

    products.reset().map(|mut p| {
        if let Value::Object(record) = &mut p {
            record.remove("stock");
        }
        p
    });
    println!("Without stock: {}", products.get().clone().into_value());

    println!("\n=== Demo Complete ===");
    Ok(())
}
