use tracing_subscriber::EnvFilter;

/// Default filter for the given verbosity flags; `RUST_LOG` takes precedence.
pub fn default_filter(verbose: u8, debug: bool, quiet: bool) -> &'static str {
    if quiet {
        "aptdeps=error"
    } else if debug || verbose >= 2 {
        "aptdeps=debug"
    } else if verbose == 1 {
        "aptdeps=info"
    } else {
        "aptdeps=warn"
    }
}

pub fn init(verbose: u8, debug: bool, quiet: bool, color: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose, debug, quiet)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(color)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}
