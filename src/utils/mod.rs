pub mod build_info;

use std::{env, sync::Once};

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

/// Verbosity used when `RUST_LOG` is unset or blank.
const DEFAULT_DIRECTIVE: &str = "expense_tracker=info";

/// Installs the global subscriber, writing to stderr so script output on
/// stdout stays machine readable. Returns `true` only on the first call.
pub fn init_tracing() -> bool {
    let mut first = false;
    TRACING_INIT.call_once(|| {
        first = true;
        let _ = fmt()
            .with_env_filter(env_filter(env::var(EnvFilter::DEFAULT_ENV).ok()))
            .with_writer(std::io::stderr)
            .try_init();
    });
    first
}

/// Filter built from `RUST_LOG`, falling back to [`DEFAULT_DIRECTIVE`] when
/// the variable is missing, blank or unparsable.
fn env_filter(rust_log: Option<String>) -> EnvFilter {
    rust_log
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rust_log_overrides_the_default_level() {
        let filter = env_filter(Some("expense_tracker=debug".into()));
        assert_eq!(filter.to_string(), "expense_tracker=debug");
    }

    #[test]
    fn missing_or_blank_rust_log_uses_the_default() {
        assert_eq!(env_filter(None).to_string(), DEFAULT_DIRECTIVE);
        assert_eq!(env_filter(Some("  ".into())).to_string(), DEFAULT_DIRECTIVE);
    }
}
