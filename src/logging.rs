use tracing_subscriber::EnvFilter;

/// Crates whose spans and events reach the subscriber.
const CRATE_TARGETS: &[&str] = &[
    "palmer",
    "palmer_calendar",
    "palmer_index",
    "palmer_pet",
    "palmer_stats",
    "palmer_water_balance",
];

/// Filter directives for a `-v` count: none shows warnings only, each extra
/// `v` adds one level down to `trace`.
fn default_filter(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    CRATE_TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Installs the global subscriber. Logs go to stderr because `run` may
/// print its JSON results on stdout. A set `RUST_LOG` takes precedence
/// over `-v`.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
