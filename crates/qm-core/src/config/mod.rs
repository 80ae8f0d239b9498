use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Deployment stage of the evaluation service, read from `QM_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Staging,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "staging" | "stage" => Self::Staging,
            _ => Self::Development,
        }
    }

    /// Default log filter for the stage when `QM_LOG_LEVEL` is unset.
    /// Development runs chatty; the deployed stages start at info.
    fn default_log_level(self) -> &'static str {
        match self {
            Self::Development => "debug",
            Self::Staging | Self::Production => "info",
        }
    }
}

/// Runtime configuration of the evaluation service, assembled from
/// `QM_*` environment variables (a `.env` file is honored in
/// development).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
}

fn env_or(key: &str, fallback: &str) -> String {
    env::var(key).unwrap_or_else(|_| fallback.to_string())
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::parse(&env_or("QM_ENV", "development"));

        let raw_port = env_or("QM_PORT", "8080");
        let port = raw_port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::Port { raw: raw_port })?;

        let server = ServerConfig {
            host: env_or("QM_HOST", "127.0.0.1"),
            port,
        };

        let telemetry = TelemetryConfig {
            log_level: env_or("QM_LOG_LEVEL", environment.default_log_level()),
        };

        Ok(Self {
            environment,
            server,
            telemetry,
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
        let ip: IpAddr = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::from([127, 0, 0, 1])
        } else {
            self.host.parse().map_err(|source| ConfigError::Host {
                raw: self.host.clone(),
                source,
            })?
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Log filter configuration consumed by the telemetry init.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    Port {
        raw: String,
    },
    Host {
        raw: String,
        source: std::net::AddrParseError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Port { raw } => {
                write!(f, "QM_PORT '{raw}' is not a valid port number")
            }
            ConfigError::Host { raw, .. } => {
                write!(f, "QM_HOST '{raw}' is neither 'localhost' nor an IP address")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Port { .. } => None,
            ConfigError::Host { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    // Env vars are process-global; serialize every test that touches them.
    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in ["QM_ENV", "QM_HOST", "QM_PORT", "QM_LOG_LEVEL"] {
            env::remove_var(key);
        }
    }

    #[test]
    fn defaults_describe_a_development_instance() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.telemetry.log_level, "debug");
    }

    #[test]
    fn production_stage_quietens_the_default_log_level() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("QM_ENV", "production");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.telemetry.log_level, "info");
        reset_env();
    }

    #[test]
    fn explicit_log_level_wins_over_the_stage_default() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("QM_ENV", "production");
        env::set_var("QM_LOG_LEVEL", "qm_core=trace,info");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.telemetry.log_level, "qm_core=trace,info");
        reset_env();
    }

    #[test]
    fn localhost_binds_to_the_loopback_address() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("QM_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 8080));
        reset_env();
    }

    #[test]
    fn non_numeric_port_is_rejected_with_the_raw_value() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("QM_PORT", "acht-tausend");
        let err = AppConfig::load().expect_err("invalid port rejected");
        assert!(matches!(err, ConfigError::Port { ref raw } if raw == "acht-tausend"));
        reset_env();
    }

    #[test]
    fn unresolvable_host_is_rejected() {
        let config = ServerConfig {
            host: "nicht-eine-adresse".to_string(),
            port: 8080,
        };
        let err = config.socket_addr().expect_err("bad host rejected");
        assert!(matches!(err, ConfigError::Host { .. }));
    }
}
