use tracing_subscriber::EnvFilter;

/// Initialise the tracing subscriber. The default level is `info`; passing
/// `debug = true` raises it to `debug` and lets `RUST_LOG` override the
/// filter. With debug logging off, `RUST_LOG` is deliberately ignored so a
/// stray environment variable cannot flood the host's output.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init(debug: bool) {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
