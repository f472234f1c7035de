//! Logging of the harness: process runs, output lookups and parsed files are reported as `tracing` events.

use anyhow::Result;
use tracing::debug;
use tracing_subscriber::{EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FORMAT_VAR: &str = "LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(format) if format.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Installs the global subscriber.
///
/// Verbosity comes from `RUST_LOG` (default `info`) and `LOG_FORMAT=json` switches to one JSON object per
/// event. Events are written to stderr, leaving stdout to the scenario report.
///
/// Fails if a global subscriber has already been installed.
pub fn setup_logging() -> Result<()> {
    let format = LogFormat::parse(std::env::var(LOG_FORMAT_VAR).ok().as_deref());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let events = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let events: Box<dyn Layer<Registry> + Send + Sync> = match format {
        LogFormat::Json => events.json().boxed(),
        LogFormat::Pretty => events.pretty().boxed(),
    };

    tracing_subscriber::registry()
        .with(events)
        .with(filter)
        .try_init()?;
    debug!(?format, "logging set up, subprocess command lines are printed");
    Ok(())
}
