//! Logging setup.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt, reload};

/// Filter directive for a `[daemon] verbose` level.
pub fn level_for_verbosity(verbose: u32) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Handle to the installed subscriber's level filter.
pub struct Telemetry {
    /// `None` when `RUST_LOG` chose the filter; verbosity is then ignored.
    filter: Option<reload::Handle<EnvFilter, Registry>>,
}

impl Telemetry {
    /// Switch the level to match `verbose` unless `RUST_LOG` is in charge.
    pub fn apply_verbosity(&self, verbose: u32) {
        let Some(handle) = &self.filter else {
            return;
        };
        if let Err(e) = handle.reload(EnvFilter::new(level_for_verbosity(verbose))) {
            tracing::warn!(error = %e, "Failed to update log level");
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// Called before the configuration is loaded so loader events are visible
/// under `RUST_LOG`. Without `RUST_LOG` the level starts at `info` and
/// follows `[daemon] verbose` once [`Telemetry::apply_verbosity`] is called.
/// Must be called once, at startup.
pub fn init() -> Telemetry {
    let from_env = EnvFilter::try_from_default_env().ok();
    let follows_verbosity = from_env.is_none();
    let (filter, handle) = reload::Layer::new(
        from_env.unwrap_or_else(|| EnvFilter::new(level_for_verbosity(0))),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();

    Telemetry {
        filter: follows_verbosity.then_some(handle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels_are_valid_filters() {
        for verbose in 0..4 {
            let level = level_for_verbosity(verbose);
            assert!(EnvFilter::try_new(level).is_ok(), "{level} should be a valid filter");
        }
    }

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_for_verbosity(0), "info");
        assert_eq!(level_for_verbosity(1), "debug");
        assert_eq!(level_for_verbosity(7), "trace");
    }

    #[test]
    fn apply_verbosity_updates_a_reloadable_filter() {
        let (filter, handle) = reload::Layer::<EnvFilter, Registry>::new(EnvFilter::new("info"));
        let _subscriber = tracing_subscriber::registry().with(filter);
        let telemetry = Telemetry {
            filter: Some(handle.clone()),
        };

        telemetry.apply_verbosity(2);
        let current = handle.with_current(|f| f.to_string()).unwrap();
        assert_eq!(current, "trace");
    }
}
