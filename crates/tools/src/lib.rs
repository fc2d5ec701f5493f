pub mod high_score_file;
pub mod run_config;

pub use high_score_file::JsonScoreStore;
pub use run_config::{ConfigError, RunConfig};

use std::io;

use tracing_subscriber::EnvFilter;

/// Installs the stderr subscriber the binaries share. `RUST_LOG` overrides
/// the given default directive.
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}
