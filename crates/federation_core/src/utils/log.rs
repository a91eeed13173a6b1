use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs a fmt subscriber when `TRACE` is set, e.g. `TRACE=federation_core=trace`.
/// Calling it again, or after another subscriber was installed, does nothing.
pub fn enable_tracing_by_env() {
    let Ok(directives) = std::env::var("TRACE") else {
        return;
    };
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("trace"));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .try_init();
}
