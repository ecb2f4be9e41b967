use tracing_subscriber::EnvFilter;

/// Console logging, filtered by `RUST_LOG` (default: this crate at info).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("event_radar=info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
