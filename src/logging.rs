use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` applies unless `-v` was given.
pub fn init(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("info,sesame=debug,sesame_ledger=debug,sesame_john=debug,sesame_store=debug"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
