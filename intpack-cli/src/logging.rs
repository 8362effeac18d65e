//! Structured logging setup for the binary.

use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` takes precedence over
/// `directives`. Logs always go to stderr; stdout carries command output.
pub fn setup_logging(directives: &str, pretty: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    if pretty {
        let main_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_timer(UtcTime::rfc_3339());

        tracing_subscriber::registry()
            .with(filter)
            .with(main_layer)
            .init()
    } else {
        let main_layer = tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_current_span(true)
            .with_span_list(true)
            .with_line_number(true)
            .with_file(true)
            .with_timer(UtcTime::rfc_3339());

        tracing_subscriber::registry()
            .with(filter)
            .with(main_layer)
            .init()
    }
}
