use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup, so parsing can be
    /// exercised without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database_path = PathBuf::from(env_or("DATABASE_PATH", "./data.db"));
        if database_path.as_os_str().is_empty() {
            return Err("Invalid DATABASE_PATH: must not be empty".to_string());
        }

        let host: IpAddr = env_or("COLLECTOR_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid COLLECTOR_HOST: {e}"))?;

        let port: u16 = env_or("PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid PORT: {e}"))?;

        let max_body_size: usize = env_or("COLLECTOR_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid COLLECTOR_MAX_BODY_SIZE: {e}"))?;

        let log_level = env_or("COLLECTOR_LOG_LEVEL", "info");

        Ok(Config {
            database_path,
            host,
            port,
            max_body_size,
            log_level,
        })
    }
}
