//! Tracing setup for the CLI.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a fmt subscriber on stderr.
///
/// `RUST_LOG` takes precedence; otherwise library events are shown at `debug`
/// with `--verbose` and at `info` without it.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            if verbose {
                EnvFilter::try_new("salience=debug,warn")
            } else {
                EnvFilter::try_new("salience=info,warn")
            }
        })
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .with_thread_ids(false)
                .with_line_number(false)
                .with_file(false)
                .compact(),
        )
        .try_init()?;

    Ok(())
}
