//! Salience CLI - budgeted summaries and question salience ratings.

mod cli;
mod commands;
mod logging;
mod provider;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_tracing(cli.verbose) {
        eprintln!("Warning: could not initialize logging: {}", e);
    }

    let result = match cli.command {
        Commands::Baselines {
            input,
            output_dir,
            baseline,
            lengths,
            seeds,
            fallback,
            force,
        } => commands::baselines::run(
            input,
            output_dir,
            baseline,
            lengths,
            seeds,
            fallback.into(),
            force,
            cli.verbose,
        ),

        Commands::Summarize {
            input,
            output_dir,
            genre,
            lengths,
            temperature,
            samples,
            force,
            llm,
        } => commands::summarize::run(
            input,
            output_dir,
            genre,
            lengths,
            temperature,
            samples,
            force,
            llm,
            cli.verbose,
        ),

        Commands::Facts {
            input,
            output,
            length,
            llm,
        } => commands::facts::run(input, output, length, llm),

        Commands::Questions {
            input,
            output,
            genre,
            batch_size,
            temperature,
            llm,
        } => commands::questions::run(input, output, genre, batch_size, temperature, llm, cli.verbose),

        Commands::Rate {
            input,
            output,
            genre,
            length,
            passes,
            max_retries,
            seed,
            no_rationale,
            force,
            llm,
        } => commands::rate::run(
            commands::rate::RateArgs {
                input,
                output,
                genre,
                length,
                passes,
                max_retries,
                seed,
                no_rationale,
                force,
            },
            llm,
            cli.verbose,
        ),

        Commands::Answer {
            documents,
            questions,
            output,
            facts,
            llm,
        } => commands::answer::run(documents, questions, output, facts, llm),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
