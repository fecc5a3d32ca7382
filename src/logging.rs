//! Logging setup
//!
//! `RUST_LOG` takes precedence; otherwise the configured level applies to
//! this crate and HTTP tracing.

use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::config::LoggingConfig;

/// Build the filter used when `RUST_LOG` is unset
pub fn default_filter(config: &LoggingConfig) -> String {
    format!("meterboard={level},tower_http={level}", level = config.level)
}

/// Formatting layer for the configured format, writing to `writer`
pub fn fmt_layer<S, W>(config: &LoggingConfig, writer: W) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    if config.format == "json" {
        fmt::layer().json().with_writer(writer).boxed()
    } else {
        fmt::layer().with_writer(writer).boxed()
    }
}

/// Install the global tracing subscriber
///
/// Logs go to stderr so that stdout carries only command output. Safe to
/// call more than once; later calls are ignored.
pub fn init(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(config)));

    let result = tracing_subscriber::registry()
        .with(fmt_layer::<Registry, _>(config, std::io::stderr))
        .with(filter)
        .try_init();

    if let Err(e) = result {
        tracing::debug!(error = %e, "Tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_default_filter() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        };
        assert_eq!(default_filter(&config), "meterboard=debug,tower_http=debug");
    }

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn emit_with(config: &LoggingConfig) -> String {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber =
            tracing_subscriber::registry().with(fmt_layer::<Registry, _>(config, move || writer.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(players = 3, "Simulated population initialized");
        });
        capture.contents()
    }

    #[test]
    fn test_json_layer_writes_to_given_writer() {
        let config = LoggingConfig {
            level: "info".to_string(),
            format: "json".to_string(),
        };
        let output = emit_with(&config);

        let line: serde_json::Value = serde_json::from_str(output.trim()).unwrap();
        assert_eq!(line["fields"]["message"], "Simulated population initialized");
        assert_eq!(line["fields"]["players"], 3);
    }

    #[test]
    fn test_pretty_layer_writes_to_given_writer() {
        let output = emit_with(&LoggingConfig::default());
        assert!(output.contains("Simulated population initialized"));
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        let config = LoggingConfig::default();
        init(&config);
        init(&config);
    }
}
