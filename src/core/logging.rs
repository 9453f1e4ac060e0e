//! Logging setup for the cutsim binaries

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info";

/// Install `env_logger` as the `log` backend, with millisecond timestamps.
///
/// Filtering follows `RUST_LOG`, falling back to [`DEFAULT_FILTER`]. The
/// library itself only emits through the `log` macros and never calls this.
/// Calling it twice panics, as `env_logger` refuses a second logger.
///
/// # Example
/// ```
/// cutsim::core::logging::init();
/// log::info!("stock ready");
/// ```
pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_FILTER))
        .format_timestamp_millis()
        .init();
}
