use anyhow::{Context, Result};
use std::env;

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:4173";
const DEFAULT_JWT_AUDIENCE: &str = "authenticated";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub bind_addr: String,
    pub mongodb_uri: String,
    pub database_name: String,
    pub jwt_secret: String,
    /// Expected `aud` claim; `None` when `JWT_AUDIENCE` is set empty.
    pub jwt_audience: Option<String>,
    /// Prefix for dynamic redirect links, e.g. `https://qr.example` -> `https://qr.example/r/<id>`.
    pub public_base_url: String,
    pub ip_hash_salt: String,
    pub cors_origins: Vec<String>,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .context("PORT not set")?
            .parse::<u16>()
            .context("PORT is not a valid port number")?;

        Ok(Self {
            port,
            bind_addr: var_or("BIND_ADDR", "127.0.0.1"),
            mongodb_uri: env::var("MONGODB_URI").context("MONGODB_URI not set")?,
            database_name: var_or("DATABASE_NAME", "qrforge"),
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET not set")?,
            jwt_audience: parse_audience(&var_or("JWT_AUDIENCE", DEFAULT_JWT_AUDIENCE)),
            public_base_url: var_or("PUBLIC_BASE_URL", "http://localhost:8080"),
            ip_hash_salt: var_or("IP_HASH_SALT", "qrforge_salt"),
            cors_origins: parse_origins(&var_or("CORS_ORIGINS", DEFAULT_CORS_ORIGINS)),
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

fn parse_audience(raw: &str) -> Option<String> {
    Some(raw.trim()).filter(|aud| !aud.is_empty()).map(String::from)
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            port: 8080,
            bind_addr: "127.0.0.1".into(),
            mongodb_uri: "mongodb://localhost:27017".into(),
            database_name: "qrforge_test".into(),
            jwt_secret: "test-secret".into(),
            jwt_audience: parse_audience(DEFAULT_JWT_AUDIENCE),
            public_base_url: "https://qr.example".into(),
            ip_hash_salt: "test-salt".into(),
            cors_origins: parse_origins(DEFAULT_CORS_ORIGINS),
        }
    }
}
