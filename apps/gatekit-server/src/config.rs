use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use gatekit_auth::{AuthConfig, UserRecord};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;

fn default_bind_addr() -> String {
    "127.0.0.1:8087".to_owned()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

/// Seed data for the in-memory user directory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectorySection {
    #[serde(default)]
    pub users: Vec<UserRecord>,
}

/// Top-level application configuration.
///
/// Secrets never round-trip back out: the config deserializes but is
/// deliberately not serializable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub directory: DirectorySection,
}

impl AppConfig {
    /// Layered load: serde defaults -> YAML file (if given) -> `GATEKIT__*` env.
    ///
    /// # Errors
    ///
    /// Fails when the YAML file or environment overrides do not
    /// deserialize into the config shape.
    pub fn load(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new();

        if let Some(path) = config_path {
            if !path.is_file() {
                anyhow::bail!("config file does not exist: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }

        let config = figment
            .merge(Env::prefixed("GATEKIT__").split("__"))
            .extract()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Fails when `server.bind_addr` is not a valid socket address.
    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        self.server
            .bind_addr
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid bind address '{}': {e}", self.server.bind_addr))
    }
}
