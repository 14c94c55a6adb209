use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::{self, format::FmtSpan};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber on stderr, leaving stdout for `--json`.
///
/// `RUST_LOG` takes precedence; otherwise `verbose` picks debug over info.
/// Per-file spans report their duration when debug output is on.
pub fn init(verbose: bool) {
    let fallback = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(fallback.into())
        .from_env_lossy();

    let span_events = match filter.max_level_hint() {
        Some(level) if level >= LevelFilter::DEBUG => FmtSpan::CLOSE,
        _ => FmtSpan::NONE,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_timer(fmt::time::uptime())
                .with_span_events(span_events),
        )
        .init();
}
