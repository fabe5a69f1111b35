//! Answer command - answer questions from source documents.

use std::path::PathBuf;

use colored::Colorize;
use salience::dataset::{self, Question};
use salience::facts::FactExtractor;
use salience::qa::{answer_facts, QuestionAnswerer};

use crate::cli::LlmArgs;
use crate::provider;

pub fn run(
    documents: PathBuf,
    questions: PathBuf,
    output: PathBuf,
    facts: Option<PathBuf>,
    llm: LlmArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    for path in [&documents, &questions] {
        if !path.exists() {
            return Err(format!("File not found: {}", path.display()).into());
        }
    }

    let documents = dataset::load_documents(&documents)?;
    let questions: Vec<Question> = dataset::load_records(&questions)?;
    let generator = provider::build(&llm)?;

    println!(
        "{} {} question(s) on {} document(s) with {}",
        "Answering".cyan().bold(),
        questions.len().to_string().white().bold(),
        documents.len().to_string().white().bold(),
        generator.model().white()
    );

    let answers = QuestionAnswerer::new(generator.as_ref()).answer(&documents, &questions)?;
    dataset::write_records(&output, &answers)?;

    let answered = answers.iter().filter(|a| a.is_answered()).count();
    println!(
        "{} {} answers to {} ({} answered, {} no answer)",
        "Saved".green().bold(),
        answers.len().to_string().white().bold(),
        output.display(),
        answered.to_string().green(),
        (answers.len() - answered).to_string().yellow()
    );

    if let Some(facts_path) = facts {
        let extractor = FactExtractor::new(generator.as_ref());
        let records = answer_facts(&extractor, &answers)?;
        dataset::write_records(&facts_path, &records)?;
        println!(
            "{} {} answer facts to {}",
            "Saved".green().bold(),
            records.len().to_string().white().bold(),
            facts_path.display()
        );
    }

    Ok(())
}
