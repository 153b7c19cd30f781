//! Log output for the binary, written to stderr.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` wins over everything else;
/// otherwise `-v` flags raise the configured level.
pub fn init(configured: &str, verbose: u8) {
    let level = match verbose {
        0 => configured_level(configured),
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));

    // A second init (tests, embedding) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn configured_level(configured: &str) -> Level {
    configured.parse::<Level>().unwrap_or(Level::WARN)
}
