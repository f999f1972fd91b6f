//! Log output setup.
//!
//! Plain `tracing-subscriber` fmt output with an `EnvFilter`; set
//! `RUST_LOG` to adjust verbosity (defaults to `info`).

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
