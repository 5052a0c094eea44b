//! Structured logging setup, mirroring the forest daemon's use of
//! `tracing` + `tracing-subscriber` with an `EnvFilter`.

use tracing_subscriber::{EnvFilter, fmt};

/// Initializes the global tracing subscriber. `verbosity` is the number of
/// times `-v` was passed on the command line; `override_level`, when set,
/// comes from the configuration file's `log_level` key and wins over both.
pub fn init(verbosity: u8, override_level: Option<&str>) {
    let default_directive = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = if let Some(level) = override_level {
        EnvFilter::try_new(level)
    } else {
        EnvFilter::try_from_env("RPTDIFF_LOG")
    }
    .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("tracing subscriber already initialized");
    }
}
