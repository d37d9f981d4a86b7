use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

const APP_TARGET: &str = env!("CARGO_CRATE_NAME");

fn app_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::OFF
    }
}

/// Installs the global subscriber on stderr, keeping stdout for command output.
///
/// Only events from this crate pass, at debug level when `verbose` is set.
/// `RUST_LOG` narrows them further.
pub fn init_logging(verbose: bool) {
    let level = app_level(verbose);
    let app_filter = Targets::new().with_target(APP_TARGET, level);
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let initialized = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .pretty()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(app_filter)
        .with(env_filter)
        .try_init();
    if initialized.is_err() {
        tracing::debug!("Logging already initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_level() {
        assert_eq!(app_level(true), LevelFilter::DEBUG);
        assert_eq!(app_level(false), LevelFilter::OFF);
        assert_eq!(APP_TARGET, "fintechora");
    }
}
