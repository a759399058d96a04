#![no_main]

use libfuzzer_sys::fuzz_target;
use tablestore_core::{parse_column_defs, Column};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(columns) = parse_column_defs(text) {
            // Every parsed column survives the sidecar line format
            for column in columns {
                let line = column.to_sidecar_line();
                assert!(Column::from_sidecar_line(&line).is_some());
            }
        }
    }
});
