//! Logging setup for the fuse-chat binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose events are enabled at `default_log_level` when `RUST_LOG` is unset.
const APP_TARGETS: &[&str] = &["fuse_chat_server", "fuse_chat_shared", "tower_http"];

/// Build the default filter directive for `binary_name`.
///
/// Binary names may contain dashes, but tracing targets use the crate path
/// form, so dashes are turned into underscores.
pub fn default_directive(binary_name: &str, default_log_level: &str) -> String {
    let mut directives: Vec<String> = APP_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, default_log_level))
        .collect();

    let binary_target = binary_name.replace('-', "_");
    if !APP_TARGETS.contains(&binary_target.as_str()) {
        directives.push(format!("{}={}", binary_target, default_log_level));
    }

    directives.join(",")
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "fuse-chat-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use fuse_chat_shared::logger::setup_logger;
///
/// setup_logger("fuse-chat-server", "info");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
