//! Facts command - atomic facts of documents or summaries.

use std::path::PathBuf;

use colored::Colorize;
use salience::dataset::{self, Document, SummaryRecord};
use salience::facts::FactExtractor;

use crate::cli::LlmArgs;
use crate::provider;

pub fn run(
    input: PathBuf,
    output: PathBuf,
    length: Option<usize>,
    llm: LlmArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    if !input.exists() {
        return Err(format!("File not found: {}", input.display()).into());
    }

    let documents = match length {
        None => dataset::load_documents(&input)?,
        Some(length) => {
            let records: Vec<SummaryRecord> = dataset::load_records(&input)?;
            let total = records.len();
            let documents: Vec<Document> = records
                .iter()
                .filter_map(|r| Some(Document::new(r.doc_id.clone(), r.summary(length)?)))
                .collect();
            if documents.len() < total {
                println!(
                    "{} {} record(s) have no {}-word summary",
                    "Note:".yellow(),
                    total - documents.len(),
                    length
                );
            }
            documents
        }
    };

    let generator = provider::build(&llm)?;
    println!(
        "{} facts from {} text(s) with {}",
        "Extracting".cyan().bold(),
        documents.len().to_string().white().bold(),
        generator.model().white()
    );

    let facts = FactExtractor::new(generator.as_ref()).extract_documents(&documents)?;
    dataset::write_records(&output, &facts)?;

    println!(
        "{} {} facts to {}",
        "Saved".green().bold(),
        facts.len().to_string().white().bold(),
        output.display()
    );

    Ok(())
}
