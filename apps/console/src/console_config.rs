use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use rbac_console_core::AppError;
use tracing_subscriber::EnvFilter;
use url::Url;

const DEFAULT_LOCAL_API_URL: &str = "http://127.0.0.1:5000";

/// Where the console sends RBAC service calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RbacBackendConfig {
    /// Remote REST service at the given base URL.
    Http(Url),
    /// In-process demo service.
    Memory,
}

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub environment: String,
    pub backend: RbacBackendConfig,
    pub console_host: String,
    pub console_port: u16,
}

impl ConsoleConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("CONSOLE_ENV").unwrap_or_else(|| "development".to_owned());

        let backend = match lookup("RBAC_API_BACKEND")
            .unwrap_or_else(|| "http".to_owned())
            .as_str()
        {
            "http" => RbacBackendConfig::Http(api_base_url(&environment, &lookup)?),
            "memory" => RbacBackendConfig::Memory,
            other => {
                return Err(AppError::Validation(format!(
                    "RBAC_API_BACKEND must be either 'http' or 'memory', got '{other}'"
                )));
            }
        };

        let console_host = lookup("CONSOLE_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let console_port = match lookup("CONSOLE_PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|error| AppError::Validation(format!("invalid CONSOLE_PORT: {error}")))?,
            None => 3000,
        };

        Ok(Self {
            environment,
            backend,
            console_host,
            console_port,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.console_host).map_err(|error| {
            AppError::Internal(format!(
                "invalid CONSOLE_HOST '{}': {error}",
                self.console_host
            ))
        })?;
        Ok(SocketAddr::from((host, self.console_port)))
    }
}

fn api_base_url<F>(environment: &str, lookup: &F) -> Result<Url, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let (name, raw) = if environment == "production" {
        ("RBAC_API_PROD_URL", required_env(lookup, "RBAC_API_PROD_URL")?)
    } else {
        (
            "RBAC_API_LOCAL_URL",
            lookup("RBAC_API_LOCAL_URL").unwrap_or_else(|| DEFAULT_LOCAL_API_URL.to_owned()),
        )
    };

    Url::parse(raw.trim().trim_end_matches('/'))
        .map_err(|error| AppError::Validation(format!("invalid {name}: {error}")))
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env<F>(lookup: &F, name: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}
