#![no_main]

use libfuzzer_sys::fuzz_target;
use tablestore_core::{Column, ColumnType, Condition, TableSchema};

fuzz_target!(|data: &[u8]| {
    if let Ok(clause) = std::str::from_utf8(data) {
        let schema = TableSchema::new(
            "t",
            vec![
                Column::new("id", ColumnType::Int),
                Column::new("name", ColumnType::Char),
            ],
        );
        let predicate = Condition::parse(clause).bind(&schema);

        // Should never panic, whatever the record shape
        let _ = predicate.matches(&["1".to_string(), "x".to_string()]);
        let _ = predicate.matches(&[]);
    }
});
