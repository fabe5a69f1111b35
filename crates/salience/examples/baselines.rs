//! Example: Summarize a document file with every extractive baseline.
//!
//! Usage:
//!   cargo run --example baselines -- <documents.json> [budget]
//!
//! The input is a JSON list of `{"doc_id": ..., "text": ...}` records.

use std::env;
use std::path::Path;

use salience::dataset;
use salience::summarize::{Baseline, ExtractiveSummarizer};

fn main() -> salience::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example baselines -- <documents.json> [budget]");
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    if !path.exists() {
        eprintln!("Error: File not found: {}", path.display());
        std::process::exit(1);
    }
    let budget: usize = args.get(2).and_then(|b| b.parse().ok()).unwrap_or(50);

    let documents = dataset::load_documents(path)?;
    let summarizer = ExtractiveSummarizer::new();
    let mut rng = fastrand::Rng::with_seed(0);

    for document in &documents {
        println!("=== {} ({} word budget) ===", document.doc_id, budget);
        for baseline in Baseline::ALL {
            let summary = summarizer.summarize(baseline, &document.text, budget, &mut rng)?;
            println!("[{}] {}", baseline, summary);
        }
        println!();
    }

    Ok(())
}
