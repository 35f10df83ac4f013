//! Tracing setup for the binary

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Environment variable holding the log filter (e.g. `fundledger=debug`)
pub const LOG_ENV: &str = "FUNDLEDGER_LOG";

/// Filter used when `FUNDLEDGER_LOG` is unset
const DEFAULT_FILTER: &str = "fundledger=info";

/// Initializes the global tracing subscriber, writing to stderr.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        // A subscriber may already be installed (tests); keep it
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_tracing();
        init_tracing();
        tracing::info!("still fine");
    }
}
