use std::env;

use anyhow::{bail, Result};

/// Backend selection for the medicine catalog repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MedicineStore {
    D1,
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Full D1 REST query endpoint, e.g.
    /// `https://api.cloudflare.com/client/v4/accounts/<acct>/d1/database/<db>/query`.
    pub d1_database_url: String,
    pub d1_auth_token: String,
    pub jwt_secret: String,
    pub port: u16,
    pub medicine_store: MedicineStore,
}

impl AppConfig {
    /// Loads configuration from the environment. Missing store credentials or
    /// JWT secret fail here, at startup, rather than on the first request.
    pub fn from_env() -> Result<Self> {
        let d1_database_url = match env::var("D1_DATABASE_URL") {
            Ok(url) if !url.is_empty() => url,
            _ => bail!("D1_DATABASE_URL is not set; expected the full D1 REST query endpoint"),
        };

        // CF_API_TOKEN is the legacy name for the same credential.
        let d1_auth_token = env::var("D1_AUTH_TOKEN")
            .or_else(|_| env::var("CF_API_TOKEN"))
            .ok()
            .filter(|t| !t.is_empty());
        let Some(d1_auth_token) = d1_auth_token else {
            bail!("D1_AUTH_TOKEN (or CF_API_TOKEN) is not set; cannot reach the database");
        };

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => bail!("JWT_SECRET is not set; refusing to issue unsigned tokens"),
        };

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("PORT is not a valid port number: {raw}"))?,
            Err(_) => 5002,
        };

        let medicine_store = match env::var("MEDICINE_STORE").as_deref() {
            Ok("memory") => MedicineStore::Memory,
            _ => MedicineStore::D1,
        };

        Ok(Self {
            d1_database_url,
            d1_auth_token,
            jwt_secret,
            port,
            medicine_store,
        })
    }
}
