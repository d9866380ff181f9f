//! Fuzz target for the data parser.
//!
//! This fuzzer tests that the delimited text parser:
//! 1. Never panics on malformed input
//! 2. Handles all delimiter combinations
//! 3. Always returns a rectangular table

#![no_main]

use libfuzzer_sys::fuzz_target;
use prepline::Parser;

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    let parser = Parser::new();
    if let Ok(table) = parser.parse_reader(data) {
        for column in table.columns() {
            assert_eq!(column.len(), table.row_count());
        }
    }
});
