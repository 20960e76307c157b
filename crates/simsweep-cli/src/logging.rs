//! Diagnostic logging setup
//!
//! Diagnostics go to stderr; stdout carries the console summary or JSON.

use crate::config::Config;
use tracing_subscriber::EnvFilter;

/// Filter used when RUST_LOG is unset
fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "simsweep=info,simsweep_core=info,simsweep_config=info"
    } else {
        "simsweep=warn,simsweep_core=warn,simsweep_config=warn"
    }
}

/// Install the global subscriber; later calls are ignored
pub fn init(verbose: bool, config: &Config) {
    let filter = match &config.log_filter {
        Some(directives) => EnvFilter::try_new(directives)
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose))),
        None => EnvFilter::new(default_directive(verbose)),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!config.no_color)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_levels() {
        assert!(default_directive(false).contains("simsweep_core=warn"));
        assert!(default_directive(true).contains("simsweep_core=info"));
    }

    #[test]
    fn test_init_twice_is_harmless() {
        let config = Config {
            no_color: true,
            log_filter: Some("not a [valid filter".to_string()),
        };
        init(false, &config);
        init(true, &config);
    }
}
