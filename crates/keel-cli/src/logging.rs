//! Tracing subscriber setup

use keel_core::LogFormat;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level; `verbose` forces debug for
/// keel's own crates.
pub fn init_logging(level: &str, format: LogFormat, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("keel=debug,keel_cli=debug,keel_core=debug,keel_store=debug,keel_vfs=debug,keel_exec=debug,tower_http=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "keel={level},keel_cli={level},keel_core={level},keel_store={level},keel_vfs={level},keel_exec={level},warn"
            ))
        })
    };

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(false))
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init(),
    }
}
