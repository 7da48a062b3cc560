use crate::config::TelemetryConfig;
use std::env;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    Directive {
        directive: String,
        source: ParseError,
    },
    AlreadyInstalled(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::Directive { directive, .. } => {
                write!(f, "log filter '{directive}' is not a valid tracing directive")
            }
            TelemetryError::AlreadyInstalled(err) => {
                write!(f, "global subscriber could not be installed: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::Directive { source, .. } => Some(source),
            TelemetryError::AlreadyInstalled(err) => Some(&**err),
        }
    }
}

/// Install the global subscriber. A non-empty `RUST_LOG` wins over the configured level.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let directive = select_directive(env::var("RUST_LOG").ok(), &config.log_level);
    let filter = EnvFilter::try_new(&directive).map_err(|source| TelemetryError::Directive {
        directive: directive.clone(),
        source,
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::AlreadyInstalled)
}

fn select_directive(rust_log: Option<String>, configured: &str) -> String {
    rust_log
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| configured.trim().to_string())
}
