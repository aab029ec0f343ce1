use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

const DEFAULT_JWT_SECRET: &str = "dev-secret-change-me";

pub struct Config {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub admin_password: String,
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| {
            lookup(key).unwrap_or_else(|| {
                info!("{} not set, using default: {}", key, default);
                default.to_string()
            })
        };

        let host = var("PORTFOLIO_HOST", "0.0.0.0");
        let port: u16 = var("PORTFOLIO_PORT", "8000")
            .parse()
            .context("PORTFOLIO_PORT must be a port number")?;
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", host, port))?;

        let jwt_secret = lookup("PORTFOLIO_JWT_SECRET").unwrap_or_else(|| {
            warn!("PORTFOLIO_JWT_SECRET not set, using the development secret");
            DEFAULT_JWT_SECRET.to_string()
        });

        let admin_password = lookup("PORTFOLIO_ADMIN_PASSWORD").unwrap_or_default();
        if admin_password.is_empty() {
            bail!("PORTFOLIO_ADMIN_PASSWORD must be set");
        }

        let allowed_origins = var("PORTFOLIO_ALLOWED_ORIGINS", "*")
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty() && *origin != "*")
            .map(str::to_string)
            .collect();

        Ok(Self {
            addr,
            db_path: PathBuf::from(var("PORTFOLIO_DB_PATH", "portfolio.db")),
            jwt_secret,
            admin_password,
            allowed_origins,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_password_is_set() {
        let config = load(&[("PORTFOLIO_ADMIN_PASSWORD", "pw")]).unwrap();
        assert_eq!(config.addr, "0.0.0.0:8000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.db_path, PathBuf::from("portfolio.db"));
        assert_eq!(config.jwt_secret, DEFAULT_JWT_SECRET);
        assert!(config.allowed_origins.is_empty());
    }

    #[test]
    fn missing_password_is_fatal() {
        assert!(load(&[]).is_err());
        assert!(load(&[("PORTFOLIO_ADMIN_PASSWORD", "")]).is_err());
    }

    #[test]
    fn origins_are_split_and_trimmed() {
        let config = load(&[
            ("PORTFOLIO_ADMIN_PASSWORD", "pw"),
            ("PORTFOLIO_ALLOWED_ORIGINS", "http://localhost:3000, https://example.com ,"),
        ])
        .unwrap();
        assert_eq!(config.allowed_origins, ["http://localhost:3000", "https://example.com"]);
    }

    #[test]
    fn bad_port_is_an_error() {
        assert!(load(&[("PORTFOLIO_ADMIN_PASSWORD", "pw"), ("PORTFOLIO_PORT", "http")]).is_err());
    }
}
