//! Fuzz target for JSON repair.
//!
//! Repair must never panic, and whatever it accepts must be valid JSON.

#![no_main]

use libfuzzer_sys::fuzz_target;
use salience::llm::repair_json;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    if let Ok(raw) = std::str::from_utf8(data) {
        if let Ok(value) = repair_json(raw) {
            let text = value.to_string();
            assert!(serde_json::from_str::<serde_json::Value>(&text).is_ok());
        }
    }
});
