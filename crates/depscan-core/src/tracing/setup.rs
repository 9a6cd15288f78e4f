//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::constants::LOG_ENV_VAR;

static INIT: Once = Once::new();

/// Default filter when `DEPSCAN_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "depscan=info";

/// Initialize the depscan tracing subscriber.
///
/// Reads `DEPSCAN_LOG` for per-subsystem levels, e.g.
/// `DEPSCAN_LOG=depscan_analysis::dispatcher=debug,depscan_analysis::cache=trace`.
/// Falls back to `depscan=info`.
///
/// Idempotent: only the first call installs a subscriber.
pub fn init_tracing() {
    init_tracing_with_default(DEFAULT_FILTER);
}

/// Same as [`init_tracing`] but with a caller-chosen fallback directive,
/// used by the CLI's `--verbose` flag.
pub fn init_tracing_with_default(default_directive: &str) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(default_directive));

        // A subscriber installed elsewhere (e.g. by a test harness) wins.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
