//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use salience::summarize::{Baseline, FallbackRule, DEFAULT_LENGTHS};
use salience::{Genre, LengthConstraint};

/// Salience: what summaries keep, at every length
#[derive(Parser)]
#[command(name = "salience")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the extractive baselines over a document file
    Baselines {
        /// Documents as a JSON list of {doc_id, text}
        #[arg(value_name = "DOCUMENTS")]
        input: PathBuf,

        /// Directory that receives <baseline>/summaries/output*.json
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Baselines to run (default: all)
        #[arg(short, long, value_delimiter = ',')]
        baseline: Vec<Baseline>,

        /// Summary lengths in words
        #[arg(short, long, value_delimiter = ',', default_values_t = DEFAULT_LENGTHS)]
        lengths: Vec<usize>,

        /// Number of seeds for the random baseline
        #[arg(long, default_value = "5")]
        seeds: u64,

        /// Sentence used when no sentence fits the budget
        #[arg(long, default_value = "first-in-document")]
        fallback: FallbackChoice,

        /// Overwrite existing outputs
        #[arg(long)]
        force: bool,
    },

    /// Generate LLM summaries at several lengths
    Summarize {
        /// Documents as a JSON list of {doc_id, text}
        #[arg(value_name = "DOCUMENTS")]
        input: PathBuf,

        /// Directory that receives <model>/summaries/temperature*.json
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Dataset genre (pubmed-sample, astro-ph, cs-cl, qmsum-generic)
        #[arg(short, long, default_value = "pubmed-sample")]
        genre: Genre,

        /// Summary lengths in words
        #[arg(short, long, value_delimiter = ',', default_values_t = DEFAULT_LENGTHS)]
        lengths: Vec<usize>,

        /// Sampling temperature
        #[arg(short, long, default_value = "0.3")]
        temperature: f64,

        /// Summaries per document and length (forced to 1 at temperature 0)
        #[arg(short = 'n', long, default_value = "5")]
        samples: usize,

        /// Overwrite existing outputs
        #[arg(long)]
        force: bool,

        #[command(flatten)]
        llm: LlmArgs,
    },

    /// Split documents or summaries into atomic facts
    Facts {
        /// Documents ({doc_id, text}) or summary records
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output path for fact records
        #[arg(short, long)]
        output: PathBuf,

        /// Read summary records and use the summary of this length
        #[arg(short, long)]
        length: Option<usize>,

        #[command(flatten)]
        llm: LlmArgs,
    },

    /// Generate questions per summary length
    Questions {
        /// Summary records
        #[arg(value_name = "SUMMARIES")]
        input: PathBuf,

        /// Output path for generated questions
        #[arg(short, long)]
        output: PathBuf,

        /// Dataset genre
        #[arg(short, long, default_value = "pubmed-sample")]
        genre: Genre,

        /// Documents per prompt
        #[arg(long, default_value = "5")]
        batch_size: usize,

        /// Sampling temperature
        #[arg(short, long, default_value = "1.0")]
        temperature: f64,

        #[command(flatten)]
        llm: LlmArgs,
    },

    /// Rate question importance over repeated shuffled passes
    Rate {
        /// Questions as a JSON list of {cluster_id, question}
        #[arg(value_name = "QUESTIONS")]
        input: PathBuf,

        /// Output path for the rating table (JSON; CSV and metadata alongside)
        #[arg(short, long)]
        output: PathBuf,

        /// Dataset genre
        #[arg(short, long, default_value = "pubmed-sample")]
        genre: Genre,

        /// Length constraint: "<L>w" or "generic"
        #[arg(short, long, default_value = "generic")]
        length: LengthConstraint,

        /// Passes to collect
        #[arg(short, long, default_value = "5")]
        passes: usize,

        /// Rejected responses tolerated before giving up
        #[arg(long, default_value = "25")]
        max_retries: usize,

        /// Shuffle seed
        #[arg(long)]
        seed: Option<u64>,

        /// Ask for ratings without rationales
        #[arg(long)]
        no_rationale: bool,

        /// Overwrite an existing table
        #[arg(long)]
        force: bool,

        #[command(flatten)]
        llm: LlmArgs,
    },

    /// Answer every question from every document
    Answer {
        /// Documents as a JSON list of {doc_id, text}
        #[arg(value_name = "DOCUMENTS")]
        documents: PathBuf,

        /// Questions as a JSON list of {cluster_id, question}
        #[arg(short, long)]
        questions: PathBuf,

        /// Output path for answers
        #[arg(short, long)]
        output: PathBuf,

        /// Also split answers into atomic facts and write them here
        #[arg(long)]
        facts: Option<PathBuf>,

        #[command(flatten)]
        llm: LlmArgs,
    },
}

/// Generation backend options shared by the LLM commands.
#[derive(Args, Clone, Debug)]
pub struct LlmArgs {
    /// LLM provider to use
    #[arg(long, default_value = "openai")]
    pub llm: LlmProviderChoice,

    /// Model to use (provider-specific, e.g., "gpt-4o-mini", "llama3.1")
    #[arg(long)]
    pub model: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value = "120")]
    pub timeout: u64,
}

/// LLM provider choice
#[derive(Clone, Debug, Default)]
pub enum LlmProviderChoice {
    /// OpenAI-compatible chat API (requires OPENAI_API_KEY)
    #[default]
    OpenAI,
    /// Ollama local models (requires Ollama running)
    Ollama,
}

impl std::str::FromStr for LlmProviderChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" | "gpt" => Ok(LlmProviderChoice::OpenAI),
            "ollama" | "local" => Ok(LlmProviderChoice::Ollama),
            _ => Err(format!("Unknown provider: {}. Use: openai or ollama.", s)),
        }
    }
}

impl std::fmt::Display for LlmProviderChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmProviderChoice::OpenAI => write!(f, "openai"),
            LlmProviderChoice::Ollama => write!(f, "ollama"),
        }
    }
}

/// Fallback sentence for budgets no sentence fits
#[derive(Clone, Debug, Default)]
pub enum FallbackChoice {
    #[default]
    FirstInDocument,
    FirstInPriority,
}

impl std::str::FromStr for FallbackChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "first-in-document" | "document" => Ok(FallbackChoice::FirstInDocument),
            "first-in-priority" | "priority" => Ok(FallbackChoice::FirstInPriority),
            _ => Err(format!(
                "Unknown fallback: {}. Use: first-in-document or first-in-priority.",
                s
            )),
        }
    }
}

impl From<FallbackChoice> for FallbackRule {
    fn from(choice: FallbackChoice) -> Self {
        match choice {
            FallbackChoice::FirstInDocument => FallbackRule::FirstInDocument,
            FallbackChoice::FirstInPriority => FallbackRule::FirstInPriority,
        }
    }
}
