use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, registry, EnvFilter};

/// Install the global subscriber writing to stderr.
///
/// `RUST_LOG` wins when set; otherwise warnings only, or info with `--debug`.
pub fn init_tracing(debug: bool) {
    let default_level = if debug {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    };

    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    // A second call (tests, embedding) keeps the first subscriber.
    let _ = registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}
