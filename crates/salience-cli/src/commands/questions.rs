//! Questions command - questions per summary length.

use std::collections::BTreeMap;
use std::path::PathBuf;

use colored::Colorize;
use salience::dataset::{self, SummaryRecord};
use salience::questions::{QuestionConfig, QuestionGenerator};
use salience::Genre;

use crate::cli::LlmArgs;
use crate::provider;

pub fn run(
    input: PathBuf,
    output: PathBuf,
    genre: Genre,
    batch_size: usize,
    temperature: f64,
    llm: LlmArgs,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !input.exists() {
        return Err(format!("File not found: {}", input.display()).into());
    }

    let records: Vec<SummaryRecord> = dataset::load_records(&input)?;
    let generator = provider::build(&llm)?;
    println!(
        "{} questions for {} ({} summaries, {} per prompt)",
        "Generating".cyan().bold(),
        genre.to_string().white(),
        records.len().to_string().white().bold(),
        batch_size
    );

    let config = QuestionConfig::default()
        .with_batch_size(batch_size)
        .with_temperature(temperature);
    let questions = QuestionGenerator::new(generator.as_ref(), genre)
        .with_config(config)
        .generate(&records)?;

    dataset::write_records(&output, &questions)?;

    let mut per_length: BTreeMap<usize, usize> = BTreeMap::new();
    for q in &questions {
        *per_length.entry(q.length).or_default() += 1;
    }
    println!(
        "{} {} questions to {}",
        "Saved".green().bold(),
        questions.len().to_string().white().bold(),
        output.display()
    );
    for (length, count) in per_length {
        println!("  {:>4}w  {}", length, count);
    }

    if verbose {
        println!();
        for q in &questions {
            println!("  {} [{}w] {}", "•".dimmed(), q.length, q.question);
        }
    }

    Ok(())
}
