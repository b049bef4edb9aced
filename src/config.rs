//! Environment configuration

use anyhow::{Context, Result};

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    /// Token verification endpoint of the external identity provider.
    pub identity_url: String,
    pub nats_url: Option<String>,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is required")?;
        let identity_url = std::env::var("IDENTITY_URL").context("IDENTITY_URL is required")?;
        let nats_url = std::env::var("NATS_URL").ok();
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().context("PORT must be a valid port number")?,
            Err(_) => 8083,
        };
        Ok(Self { database_url, identity_url, nats_url, port })
    }
}
