//! Summarize command - LLM summaries at several lengths.

use std::path::{Path, PathBuf};

use colored::Colorize;
use salience::dataset::{self, SummaryRecord};
use salience::summarize::{length_stats, LlmSummarizer, SummarizationConfig, SummaryPrompt};
use salience::Genre;

use crate::cli::LlmArgs;
use crate::provider;

#[allow(clippy::too_many_arguments)]
pub fn run(
    input: PathBuf,
    output_dir: PathBuf,
    genre: Genre,
    lengths: Vec<usize>,
    temperature: f64,
    samples: usize,
    force: bool,
    llm: LlmArgs,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !input.exists() {
        return Err(format!("File not found: {}", input.display()).into());
    }

    let generator = provider::build(&llm)?;
    let config = SummarizationConfig::default()
        .with_lengths(lengths.clone())
        .with_temperature(temperature)
        .with_samples(samples)
        .with_prompt(SummaryPrompt::for_genre(genre));

    let summaries_dir = output_dir
        .join(provider::model_dir(generator.model()))
        .join("summaries");
    let outputs: Vec<PathBuf> = (0..config.effective_samples())
        .map(|i| summaries_dir.join(config.output_name(i)))
        .collect();

    if !force && outputs.iter().all(|path| is_complete(path)) {
        println!(
            "{} all {} output(s) in {} are complete",
            "Skipping:".yellow().bold(),
            outputs.len(),
            summaries_dir.display()
        );
        return Ok(());
    }

    let documents = dataset::load_documents(&input)?;
    println!(
        "{} {} documents with {} ({} sample(s), temperature {})",
        "Summarizing".cyan().bold(),
        documents.len().to_string().white().bold(),
        generator.model().white(),
        outputs.len(),
        temperature
    );

    let tables = LlmSummarizer::new(generator.as_ref())
        .with_config(config)
        .summarize(&documents)?;

    for (table, path) in tables.iter().zip(&outputs) {
        dataset::write_records(path, table)?;
        println!("{} {}", "Saved to".green().bold(), path.display());
    }

    if let Some(first) = tables.first() {
        println!();
        println!("{}", "Summary lengths (first sample):".yellow().bold());
        for stats in length_stats(first, &lengths) {
            let line = format!(
                "  {:>4}w  mean {:6.1}  min {:4}  max {:4}",
                stats.length, stats.mean, stats.min, stats.max
            );
            if stats.empty > 0 {
                println!("{}  {} missing", line, stats.empty.to_string().red());
            } else {
                println!("{}", line);
            }
            if verbose {
                println!("         {} summaries", stats.count);
            }
        }
    }

    Ok(())
}

/// Whether `path` holds a table with every summary present.
fn is_complete(path: &Path) -> bool {
    path.exists()
        && dataset::load_records::<SummaryRecord>(path)
            .map(|records| records.iter().all(SummaryRecord::is_complete))
            .unwrap_or(false)
}
