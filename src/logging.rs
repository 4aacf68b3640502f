use std::env;
use std::io;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "warn";

fn filter_directive(verbose: bool, dja_log: Option<String>, rust_log: Option<String>) -> String {
    if verbose {
        return "debug".to_string();
    }
    dja_log
        .or(rust_log)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Install the process-wide subscriber. Records go to stderr so stdout stays
/// reserved for command output.
pub fn init(verbose: bool) {
    let directive = filter_directive(verbose, env::var("DJA_LOG").ok(), env::var("RUST_LOG").ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::filter_directive;

    #[test]
    fn verbose_forces_debug() {
        assert_eq!(filter_directive(true, Some("error".into()), None), "debug");
    }

    #[test]
    fn dedicated_variable_wins() {
        assert_eq!(
            filter_directive(false, Some("info".into()), Some("trace".into())),
            "info"
        );
        assert_eq!(filter_directive(false, None, Some("trace".into())), "trace");
    }

    #[test]
    fn falls_back_to_warn() {
        assert_eq!(filter_directive(false, None, None), "warn");
        assert_eq!(filter_directive(false, Some("  ".into()), None), "warn");
    }
}
