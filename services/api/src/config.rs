use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    /// Reported by `/health`, e.g. `development` or `production`.
    pub environment: String,
    pub static_dir: PathBuf,
    /// JSON persona catalog. The built-in personas are used when unset.
    pub personas_path: Option<PathBuf>,
    /// Pause between accepting an operator message and delivering the reply.
    pub thinking_delay: Duration,
    /// Sessions untouched for this long are evicted, ended or not.
    pub session_idle_ttl: Duration,
    /// Ended sessions are kept this long after their last request so the
    /// transcript can still be summarized and exported.
    pub ended_session_ttl: Duration,
}

fn duration_var(
    name: &str,
    default: Duration,
    unit: &str,
    from: fn(u64) -> Duration,
) -> Result<Duration, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse::<u64>().map(from).map_err(|_| {
            ConfigError::InvalidValue(
                name.to_string(),
                format!("'{}' is not a number of {}", raw, unit),
            )
        }),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let environment = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let static_dir = std::env::var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./public"));

        let personas_path = std::env::var("PERSONAS_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let thinking_delay = duration_var(
            "THINKING_DELAY_MS",
            Duration::from_millis(1000),
            "milliseconds",
            Duration::from_millis,
        )?;
        let session_idle_ttl = duration_var(
            "SESSION_IDLE_TTL_SECS",
            Duration::from_secs(30 * 60),
            "seconds",
            Duration::from_secs,
        )?;
        let ended_session_ttl = duration_var(
            "ENDED_SESSION_TTL_SECS",
            Duration::from_secs(5 * 60),
            "seconds",
            Duration::from_secs,
        )?;

        Ok(Self {
            bind_address,
            log_level,
            environment,
            static_dir,
            personas_path,
            thinking_delay,
            session_idle_ttl,
            ended_session_ttl,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use tracing::Level;

    fn clear_env_vars() {
        unsafe {
            env::remove_var("BIND_ADDRESS");
            env::remove_var("RUST_LOG");
            env::remove_var("APP_ENV");
            env::remove_var("STATIC_DIR");
            env::remove_var("PERSONAS_PATH");
            env::remove_var("THINKING_DELAY_MS");
            env::remove_var("SESSION_IDLE_TTL_SECS");
            env::remove_var("ENDED_SESSION_TTL_SECS");
        }
    }

    #[test]
    fn test_config_error_display() {
        let invalid_value =
            ConfigError::InvalidValue("TEST_VAR".to_string(), "bad_value".to_string());
        assert_eq!(
            format!("{}", invalid_value),
            "Invalid value for environment variable TEST_VAR: bad_value"
        );
    }

    #[test]
    #[serial]
    fn test_config_from_env_defaults() {
        clear_env_vars();

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.bind_address.to_string(), "0.0.0.0:3000");
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.environment, "development");
        assert_eq!(config.static_dir, PathBuf::from("./public"));
        assert_eq!(config.personas_path, None);
        assert_eq!(config.thinking_delay, Duration::from_millis(1000));
        assert_eq!(config.session_idle_ttl, Duration::from_secs(1800));
        assert_eq!(config.ended_session_ttl, Duration::from_secs(300));
    }

    #[test]
    #[serial]
    fn test_config_from_env_custom_values() {
        clear_env_vars();
        unsafe {
            env::set_var("BIND_ADDRESS", "127.0.0.1:8080");
            env::set_var("RUST_LOG", "debug");
            env::set_var("APP_ENV", "production");
            env::set_var("STATIC_DIR", "/srv/synthetic-patients");
            env::set_var("PERSONAS_PATH", "/etc/personas.json");
            env::set_var("THINKING_DELAY_MS", "250");
            env::set_var("SESSION_IDLE_TTL_SECS", "600");
            env::set_var("ENDED_SESSION_TTL_SECS", "60");
        }

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.bind_address.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.environment, "production");
        assert_eq!(config.static_dir, PathBuf::from("/srv/synthetic-patients"));
        assert_eq!(
            config.personas_path,
            Some(PathBuf::from("/etc/personas.json"))
        );
        assert_eq!(config.thinking_delay, Duration::from_millis(250));
        assert_eq!(config.session_idle_ttl, Duration::from_secs(600));
        assert_eq!(config.ended_session_ttl, Duration::from_secs(60));
        clear_env_vars();
    }

    #[test]
    #[serial]
    fn test_config_blank_personas_path_is_ignored() {
        clear_env_vars();
        unsafe {
            env::set_var("PERSONAS_PATH", "  ");
        }

        let config = Config::from_env().expect("Config should load successfully");
        assert_eq!(config.personas_path, None);
        clear_env_vars();
    }

    #[test]
    #[serial]
    fn test_config_invalid_bind_address() {
        clear_env_vars();
        unsafe {
            env::set_var("BIND_ADDRESS", "not-a-valid-address");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "BIND_ADDRESS"),
        }
        clear_env_vars();
    }

    #[test]
    #[serial]
    fn test_config_invalid_log_level() {
        clear_env_vars();
        unsafe {
            env::set_var("RUST_LOG", "not-a-level");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "RUST_LOG"),
        }
        clear_env_vars();
    }

    #[test]
    #[serial]
    fn test_config_invalid_thinking_delay() {
        clear_env_vars();
        unsafe {
            env::set_var("THINKING_DELAY_MS", "-5");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, msg) => {
                assert_eq!(var, "THINKING_DELAY_MS");
                assert!(msg.contains("-5"));
            }
        }
        clear_env_vars();
    }

    #[test]
    #[serial]
    fn test_config_invalid_session_ttl() {
        clear_env_vars();
        unsafe {
            env::set_var("ENDED_SESSION_TTL_SECS", "soon");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, msg) => {
                assert_eq!(var, "ENDED_SESSION_TTL_SECS");
                assert!(msg.contains("seconds"));
            }
        }
        clear_env_vars();
    }
}
