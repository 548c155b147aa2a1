//! Logging and tracing initialization.

use crate::config::LoggingConfig;

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the tracing subscriber with the given configuration.
///
/// `RUST_LOG` wins when set; otherwise the configured level is widened
/// into per-crate directives via [`filter_directives`].
pub fn init_logging(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(&config.level)));

    if config.json {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
}

/// Expand a bare level ("info", "debug") into directives scoped to the
/// digitlens crates, keeping dependencies at warn. A value already
/// carrying its own directives (commas or `=`) passes through untouched.
fn filter_directives(level: &str) -> String {
    if level.contains(',') || level.contains('=') {
        return level.to_string();
    }
    let crates = [
        "digitlens_common",
        "digitlens_frame_model",
        "digitlens_processing_core",
        "digitlens_infer_engine",
        "digitlens_capture_engine",
        "digitlens_cli",
    ];
    let mut directives = String::from("warn");
    for name in crates {
        directives.push_str(&format!(",{name}={level}"));
    }
    directives
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_level_is_scoped_to_workspace_crates() {
        let directives = filter_directives("debug");
        assert!(directives.starts_with("warn,"));
        assert!(directives.contains("digitlens_processing_core=debug"));
        assert!(directives.contains("digitlens_cli=debug"));
        assert!(!directives.contains("=warn,"));
    }

    #[test]
    fn explicit_directives_pass_through() {
        assert_eq!(
            filter_directives("digitlens_common=trace,info"),
            "digitlens_common=trace,info"
        );
        assert_eq!(filter_directives("info,hyper=off"), "info,hyper=off");
    }
}
