//! Opt-in log output for C hosts.
//!
//! The core emits `tracing` events but never installs a subscriber. C hosts
//! that want them call `clientkit_init_logging` once; output goes to stderr
//! and is filtered by `RUST_LOG` (default `info`).

use std::panic::catch_unwind;

use tracing_subscriber::EnvFilter;

/// Install a stderr `fmt` subscriber. Returns false if a global subscriber
/// was already set or initialization panicked.
#[unsafe(no_mangle)]
pub extern "C" fn clientkit_init_logging() -> bool {
    catch_unwind(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let installed = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .try_init()
            .is_ok();
        if installed {
            tracing::info!("clientkit logging initialized");
        }
        installed
    })
    .unwrap_or(false)
}
