//! Fuzz target for cleaning and feature preprocessing.
//!
//! Any table the parser accepts must clean without error, and the transform
//! must either fail with a transform error or keep the row count.

#![no_main]

use libfuzzer_sys::fuzz_target;
use prepline::{Cleaner, FeatureTransformer, Parser};

fuzz_target!(|data: &[u8]| {
    if data.len() > 10_000 {
        return;
    }

    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(table) = Parser::new().parse_str(content) else {
        return;
    };

    let cleaned = Cleaner::new()
        .clean(Some(&table))
        .expect("cleaning a parsed table never fails");
    assert!(cleaned.row_count() <= table.row_count());

    if let Ok(output) = FeatureTransformer::new().transform(Some(&cleaned)) {
        assert_eq!(output.row_count(), cleaned.row_count());
    }
});
