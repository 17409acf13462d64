use tracing_subscriber::EnvFilter;

/// Initialise la journalisation ; `RUST_LOG` prime sur le niveau configuré
pub fn init_logger(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
