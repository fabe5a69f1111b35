//! Baselines command - extractive summaries under word budgets.

use std::path::PathBuf;

use colored::Colorize;
use salience::dataset;
use salience::summarize::{Baseline, BaselineConfig, ExtractiveSummarizer, FallbackRule};

#[allow(clippy::too_many_arguments)]
pub fn run(
    input: PathBuf,
    output_dir: PathBuf,
    baselines: Vec<Baseline>,
    lengths: Vec<usize>,
    seeds: u64,
    fallback: FallbackRule,
    force: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !input.exists() {
        return Err(format!("File not found: {}", input.display()).into());
    }

    let documents = dataset::load_documents(&input)?;
    println!(
        "{} {} documents from {}",
        "Loaded".cyan().bold(),
        documents.len().to_string().white().bold(),
        input.display()
    );

    let baselines = if baselines.is_empty() {
        Baseline::ALL.to_vec()
    } else {
        baselines
    };
    let config = BaselineConfig::default()
        .with_lengths(lengths)
        .with_random_seeds(seeds);
    let summarizer = ExtractiveSummarizer::new().with_fallback(fallback);

    let mut written = 0;
    let mut skipped = 0;
    for baseline in baselines {
        println!("{} {}", "Running".cyan().bold(), baseline);

        for output in summarizer.run(baseline, &documents, &config)? {
            let path = output_dir.join(output.relative_path());
            if path.exists() && !force {
                skipped += 1;
                if verbose {
                    println!("  {} {} (exists)", "skip".yellow(), path.display());
                }
                continue;
            }

            dataset::write_records(&path, &output.records)?;
            written += 1;
            if verbose {
                println!("  {} {}", "wrote".green(), path.display());
            }
        }
    }

    println!();
    println!(
        "{} {} summary tables to {}",
        "Saved".green().bold(),
        written.to_string().white().bold(),
        output_dir.display()
    );
    if skipped > 0 {
        println!(
            "  {} existing table(s) kept; pass {} to overwrite",
            skipped.to_string().yellow(),
            "--force".cyan()
        );
    }

    Ok(())
}
