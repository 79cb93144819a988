//! Logging initialization.
//!
//! Log output goes to stderr so it never interleaves with the prompt and
//! server responses on stdout.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when no level is configured.
pub const DEFAULT_FILTER: &str = "datastacks_shell=warn";

fn build_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize the logging system.
///
/// `directives` is either a bare level (`debug`) or an `EnvFilter`
/// directive string (`datastacks_shell=trace`). Unparseable input falls
/// back to [`DEFAULT_FILTER`].
///
/// # Panics
///
/// Panics if another tracing subscriber has already been set.
pub fn init(directives: &str) {
    tracing_subscriber::registry()
        .with(build_filter(directives))
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Try to initialize the logging system.
///
/// Returns `Err` if logging has already been initialized.
pub fn try_init(directives: &str) -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(build_filter(directives))
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .try_init()
}
