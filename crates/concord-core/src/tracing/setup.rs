//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::constants::LOG_ENV_VAR;

static INIT: Once = Once::new();

/// Filter used when `CONCORD_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "concord_core=info,concord_engine=info,concord_cli=info";

/// Initialize the Concord tracing/logging system.
///
/// Reads the `CONCORD_LOG` environment variable for per-crate log levels.
/// Format: `CONCORD_LOG=concord_engine=debug,concord_cli=info`
///
/// Events go to stderr; stdout is left to the CLI's ranking output. Per-run
/// mining summaries are emitted at `debug` by `concord_engine`.
///
/// Idempotent: only the first call installs a subscriber.
pub fn init_tracing() {
    INIT.call_once(|| {
        let directives = std::env::var(LOG_ENV_VAR).ok();
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(build_filter(directives.as_deref()))
            .init();
    });
}

/// Filter for the given directives, or [`DEFAULT_FILTER`] when they are
/// missing, blank, or unparsable.
fn build_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}
