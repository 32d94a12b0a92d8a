//! Tracing setup shared by the CLI and anything embedding the library.

use tracing_subscriber::EnvFilter;

pub const LOG_FORMAT_ENV: &str = "SAGE_LOG_FORMAT";

/// Install the global subscriber.
///
/// `RUST_LOG` controls the level (default: info). Output goes to stderr so
/// command output on stdout stays machine readable. Set `SAGE_LOG_FORMAT=json`
/// for one JSON object per event.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false);

    // A second call (tests, embedding hosts) keeps the first subscriber.
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        tracing::debug!("Tracing already initialised: {}", e);
    }
}
