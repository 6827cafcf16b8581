use std::env;

use anyhow::Context;

/// Where the HTTP server listens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Interface to bind (default: 0.0.0.0)
    pub bind_address: String,
    /// TCP port (default: 4000)
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 4000,
        }
    }
}

impl ServerSettings {
    /// Reads `BIND_ADDRESS` and `PORT`, falling back to the defaults
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let bind_address = env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address);
        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {}", raw))?,
            Err(_) => defaults.port,
        };

        Ok(Self { bind_address, port })
    }
}
