use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::auth::jwt_secret_from_env;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_STATIC_DIR: &str = "./static";
const DEFAULT_ALLOWED_ORIGINS: [&str; 3] = [
    "http://localhost:5173",
    "http://localhost:3000",
    "http://127.0.0.1:8080",
];

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: String,
    pub port: u16,
    /// Base URL of the upstream REST services
    pub remote_api_base_url: String,
    pub jwt_secret: String,
    pub allowed_origins: Vec<String>,
    pub static_dir: PathBuf,
}

impl AppConfig {
    /// Reads the environment; `.env` is loaded by the caller.
    pub fn from_env() -> Result<Self> {
        let remote_api_base_url = env::var("REMOTE_API_BASE_URL")
            .context("REMOTE_API_BASE_URL must be set")?;
        let port = match env::var("PORT") {
            Ok(value) => value
                .trim()
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {}", value))?,
            Err(_) => DEFAULT_PORT,
        };
        let allowed_origins = match env::var("ALLOWED_ORIGINS") {
            Ok(value) => parse_origins(&value),
            Err(_) => DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Ok(Self {
            bind_address: env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string()),
            port,
            remote_api_base_url,
            jwt_secret: jwt_secret_from_env(),
            allowed_origins,
            static_dir: env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATIC_DIR)),
        })
    }

    /// Defaults around a given upstream URL and secret.
    pub fn for_remote(remote_api_base_url: impl Into<String>, jwt_secret: impl Into<String>) -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            remote_api_base_url: remote_api_base_url.into(),
            jwt_secret: jwt_secret.into(),
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

pub fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|origin| origin.trim().trim_end_matches('/').to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}
