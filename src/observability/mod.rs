//! Logging setup for the command-line binary
//!
//! `RUST_LOG` wins when set; otherwise the level passed on the command line
//! applies to this crate only. Logs go to stderr so stdout stays clean for
//! listings and JSON.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter directive used when `RUST_LOG` is not set
pub fn default_directive(log_level: &str) -> String {
    if log_level == "trace" {
        format!("iptv_catalog={log_level},reqwest=debug")
    } else {
        format!("iptv_catalog={log_level}")
    }
}

pub fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(log_level)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
