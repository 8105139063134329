#![no_main]

use chainql_core::query::{BindMode, QueryPlan};
use chainql_core::Value;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to string (ignore invalid UTF-8)
    if let Ok(query) = std::str::from_utf8(data) {
        // Limit query length to prevent timeout
        if query.len() > 10_000 {
            return;
        }

        let params: Vec<Value> = (0..4).map(Value::Integer).collect();

        // Permissive compilation never fails
        assert!(QueryPlan::compile(query, &params, BindMode::Permissive).is_ok());

        // Strict compilation may fail but should never panic
        let _ = QueryPlan::compile(query, &params, BindMode::Strict);
    }
});
