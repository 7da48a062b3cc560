use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_BATCH_RESOLVE_ATTEMPTS: u8 = 3;

/// Deployment stage the service runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppEnvironment {
    #[default]
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the onboarding service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub onboarding: OnboardingConfig,
}

impl AppConfig {
    /// Read `.env` (when present) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("APP_ENV")
            .map(|raw| AppEnvironment::parse(&raw))
            .unwrap_or_default();

        let port = match lookup("APP_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { value: raw })?,
            None => DEFAULT_PORT,
        };

        let batch_resolve_attempts = match lookup("BATCH_RESOLVE_ATTEMPTS") {
            Some(raw) => match raw.trim().parse::<u8>() {
                Ok(attempts) if attempts > 0 => attempts,
                _ => return Err(ConfigError::InvalidResolveAttempts { value: raw }),
            },
            None => DEFAULT_BATCH_RESOLVE_ATTEMPTS,
        };

        Ok(Self {
            environment,
            server: ServerConfig {
                host: lookup("APP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port,
            },
            telemetry: TelemetryConfig {
                log_level: lookup("APP_LOG_LEVEL")
                    .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            },
            onboarding: OnboardingConfig {
                batch_resolve_attempts,
            },
        })
    }
}

/// HTTP listener binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            self.host
                .parse::<IpAddr>()
                .map_err(|source| ConfigError::InvalidHost {
                    host: self.host.clone(),
                    source,
                })?
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_level: String,
}

/// Knobs for registration and batch assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnboardingConfig {
    /// Lookups attempted before a contended batch insert is reported as an error.
    pub batch_resolve_attempts: u8,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            batch_resolve_attempts: DEFAULT_BATCH_RESOLVE_ATTEMPTS,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort {
        value: String,
    },
    InvalidHost {
        host: String,
        source: std::net::AddrParseError,
    },
    InvalidResolveAttempts {
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort { value } => {
                write!(f, "APP_PORT must be a port number (found '{value}')")
            }
            ConfigError::InvalidHost { host, .. } => {
                write!(f, "APP_HOST '{host}' is neither localhost nor an IP address")
            }
            ConfigError::InvalidResolveAttempts { value } => write!(
                f,
                "BATCH_RESOLVE_ATTEMPTS must be an integer between 1 and 255 (found '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source, .. } => Some(source),
            ConfigError::InvalidPort { .. } | ConfigError::InvalidResolveAttempts { .. } => None,
        }
    }
}
