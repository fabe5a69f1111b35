//! Rate command - repeated importance ratings of questions.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use colored::Colorize;
use salience::dataset::{self, Question};
use salience::rating::{RatedItem, Rater, RatingConfig, RatingPrompt};
use salience::{Genre, LengthConstraint};

use crate::cli::LlmArgs;
use crate::provider;

/// Options of one rating run.
pub struct RateArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub genre: Genre,
    pub length: LengthConstraint,
    pub passes: usize,
    pub max_retries: usize,
    pub seed: Option<u64>,
    pub no_rationale: bool,
    pub force: bool,
}

pub fn run(args: RateArgs, llm: LlmArgs, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !args.input.exists() {
        return Err(format!("File not found: {}", args.input.display()).into());
    }
    if args.output.exists() && !args.force {
        println!(
            "{} {} exists; pass {} to overwrite",
            "Skipping:".yellow().bold(),
            args.output.display(),
            "--force".cyan()
        );
        return Ok(());
    }

    let questions: Vec<Question> = dataset::load_records(&args.input)?;
    let items: Vec<RatedItem> = questions.iter().map(RatedItem::from).collect();
    let generator = provider::build(&llm)?;

    let mut prompt = RatingPrompt::for_genre(args.genre, args.length);
    if args.no_rationale {
        prompt = prompt.without_rationale();
    }
    let mut config = RatingConfig::default()
        .with_passes(args.passes)
        .with_max_retries(args.max_retries);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    println!(
        "{} {} questions for {} at {} ({} passes)",
        "Rating".cyan().bold(),
        items.len().to_string().white().bold(),
        args.genre.to_string().white(),
        args.length.key().white(),
        args.passes
    );

    let outcome = Rater::new(generator.as_ref(), prompt)
        .with_config(config)
        .rate(&items)?;

    let (csv_path, meta_path) = sibling_paths(&args.output);
    outcome.table.write_json(&args.output)?;
    outcome.table.write_csv(&csv_path)?;

    let mut meta = outcome.meta(generator.model());
    meta.input_sha256 = Some(dataset::file_sha256(&args.input)?);
    dataset::write_json(&meta_path, &meta)?;

    let elapsed = outcome.finished_at - outcome.started_at;
    let status = format!("{}/{} passes", outcome.completed, args.passes);
    println!(
        "{} {} in {:.1}s with {} retries",
        if outcome.completed == args.passes {
            "Completed".green().bold()
        } else {
            "Incomplete".red().bold()
        },
        status,
        elapsed.num_milliseconds() as f64 / 1000.0,
        outcome.retries.to_string().yellow()
    );
    if verbose {
        for reason in &outcome.rejections {
            println!("  {} {}", "rejected:".dimmed(), reason);
        }
    }

    println!(
        "{} {}, {} and {}",
        "Saved to".green().bold(),
        args.output.display(),
        csv_path.display(),
        meta_path.display()
    );

    let mut ranked: Vec<(f64, &str)> = outcome
        .table
        .rows()
        .iter()
        .zip(outcome.table.mean_ratings())
        .filter_map(|(row, mean)| Some((mean?, row.question.as_str())))
        .collect();
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

    if !ranked.is_empty() {
        println!();
        println!("{}", "Highest rated:".yellow().bold());
        let shown = if verbose { ranked.len() } else { ranked.len().min(5) };
        for (mean, question) in &ranked[..shown] {
            println!("  {:.1}  {}", mean, question);
        }
    }

    Ok(())
}

/// CSV and metadata paths next to the JSON output. A `.json` extension is
/// replaced; any other name is kept whole and suffixed.
fn sibling_paths(output: &Path) -> (PathBuf, PathBuf) {
    let is_json = output
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let base = if is_json {
        output.with_extension("")
    } else {
        output.to_path_buf()
    };
    let with_suffix = |suffix: &str| {
        let mut name = OsString::from(base.as_os_str());
        name.push(suffix);
        PathBuf::from(name)
    };
    (with_suffix(".csv"), with_suffix(".meta.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sibling_paths_replace_json_extension() {
        let (csv, meta) = sibling_paths(Path::new("out/20w.json"));
        assert_eq!(csv, PathBuf::from("out/20w.csv"));
        assert_eq!(meta, PathBuf::from("out/20w.meta.json"));
    }

    #[test]
    fn test_sibling_paths_keep_dotted_names() {
        let (csv, meta) = sibling_paths(Path::new("out/llama-3.1"));
        assert_eq!(csv, PathBuf::from("out/llama-3.1.csv"));
        assert_eq!(meta, PathBuf::from("out/llama-3.1.meta.json"));

        let (csv, _) = sibling_paths(Path::new("out/ratings"));
        assert_eq!(csv, PathBuf::from("out/ratings.csv"));
    }
}
