use env_logger::Env;

/// Initialize logging using env_logger.
/// The RUST_LOG environment variable overrides the default `info` filter,
/// e.g. `RUST_LOG=remote_connect=debug remote-shell tcp:127.0.0.1:7878`
pub fn init_logging() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}
