use octavian_config::LogSettings;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber. `RUST_LOG` wins over the configured filter.
/// Calling this again once a subscriber is set does nothing.
pub fn init_tracing(settings: &LogSettings) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.filter));

    let json = settings.json.then(|| fmt::layer().json().with_target(true));
    let compact = (!settings.json).then(|| fmt::layer().compact());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(compact)
        .try_init();
}
