//! Tracing subscriber setup for the binary

use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter; `RUST_LOG` is the fallback
pub const LOG_ENV: &str = "CLIPGATE_LOG";

fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "clipgate=warn",
        1 => "clipgate=debug",
        _ => "clipgate=trace,debug",
    }
}

/// Install a stderr subscriber. An explicit filter in the environment wins
/// over `-v`.
pub fn setup_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose > 1)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_default_level() {
        assert_eq!(default_directive(0), "clipgate=warn");
        assert_eq!(default_directive(1), "clipgate=debug");
        assert_eq!(default_directive(5), "clipgate=trace,debug");
    }
}
