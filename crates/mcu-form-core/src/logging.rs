//! Tracing subscriber setup for hosts that do not install their own.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when neither the caller nor `RUST_LOG` provides one.
pub const DEFAULT_FILTER: &str = "mcu_form_core=info";

/// Install a global fmt subscriber.
///
/// `filter` takes `EnvFilter` directives; when `None`, `RUST_LOG` is used, then
/// [`DEFAULT_FILTER`]. Returns `false` if a global subscriber was already set.
pub fn init_logging(filter: Option<&str>) -> bool {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
