//! Logging setup
//!
//! The library only emits `tracing` events. Applications that do not
//! already install a subscriber can call [`init`].

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter used when `RUST_LOG` is not set
#[must_use]
pub const fn default_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "info,admin_fields=debug"
    } else {
        "info"
    }
}

/// Initialize structured logging
///
/// Pretty output in debug builds, JSON in release builds, filtered by
/// `RUST_LOG` or [`default_filter`].
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
///
/// # Example
///
/// ```rust,no_run
/// use admin_fields::observability;
///
/// # fn main() -> anyhow::Result<()> {
/// observability::init()?;
/// tracing::info!("Admin started");
/// # Ok(())
/// # }
/// ```
pub fn init() -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter()));

    #[cfg(debug_assertions)]
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init()?;
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    }

    Ok(())
}
