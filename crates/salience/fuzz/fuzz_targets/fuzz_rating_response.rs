//! Fuzz target for rating response validation.

#![no_main]

use libfuzzer_sys::fuzz_target;
use salience::rating::validate_response;

const QUESTIONS: [&str; 3] = [
    "What was the sample size?",
    "Which outcome was measured?",
    "Who funded the trial?",
];

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    if let Ok(raw) = std::str::from_utf8(data) {
        if let Ok(records) = validate_response(raw, &QUESTIONS) {
            assert_eq!(records.len(), QUESTIONS.len());
            for (k, record) in records.iter().enumerate() {
                assert_eq!(record.id, k + 1);
            }
        }
    }
});
