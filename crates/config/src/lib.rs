//! Configuration for toshokan.
//!
//! Values are layered, later layers winning:
//!
//! 1. built-in defaults,
//! 2. `config.toml`, `config.yaml` or `config.json` in the platform
//!    configuration directory, or a single explicitly given file,
//! 3. `TOSHOKAN_*` environment variables (`TOSHOKAN_TIMEOUT_SECS=30`).

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Toml, Yaml};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use toshokan_extract::Source;
use toshokan_reconcile::Policy;
use tracing::{debug, instrument};

const ENV_PREFIX: &str = "TOSHOKAN_";
/// Other `TOSHOKAN_*` variables are left alone.
const ENV_KEYS: [&str; 6] = ["database", "sources", "policy", "timeout_secs", "user_agent", "log_level"];
const DATABASE_FILE: &str = "catalog.db";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Path of the SQLite catalog.
    pub database: PathBuf,
    /// Sources to query, in order.
    pub sources: Vec<Source>,
    /// How conflicts between sources are resolved.
    pub policy: Policy,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Default log filter when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        let database = project_dirs()
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE))
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE));
        Self {
            database,
            sources: Source::ALL.to_vec(),
            policy: Policy::default(),
            timeout_secs: 10,
            user_agent: concat!("toshokan/", env!("CARGO_PKG_VERSION")).to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load from the default locations, or from `path` instead of the
    /// platform configuration directory.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::from_figment(Self::figment(path)?)
    }

    /// The layered providers, before extraction.
    pub fn figment(path: Option<&Path>) -> Result<Figment> {
        let figment = Figment::new();
        let figment = match path {
            Some(path) => figment.merge(file(path)?),
            None => match project_dirs() {
                Some(dirs) => {
                    let dir = dirs.config_dir();
                    debug!(dir = %dir.display(), "looking for configuration files");
                    figment
                        .merge(Toml::file(dir.join("config.toml")))
                        .merge(Yaml::file(dir.join("config.yaml")))
                        .merge(Json::file(dir.join("config.json")))
                },
                None => figment,
            },
        };
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).only(&ENV_KEYS)))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            exn::bail!(ErrorKind::Invalid("at least one source must be enabled"));
        }
        if self.timeout_secs == 0 {
            exn::bail!(ErrorKind::Invalid("timeout_secs must be greater than zero"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "toshokan")
}

fn file(path: &Path) -> Result<Figment> {
    if !path.is_file() {
        exn::bail!(ErrorKind::Missing(path.display().to_string()));
    }
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
    Ok(match extension.to_ascii_lowercase().as_str() {
        "toml" => Figment::from(Toml::file(path)),
        "yaml" | "yml" => Figment::from(Yaml::file(path)),
        "json" => Figment::from(Json::file(path)),
        _ => exn::bail!(ErrorKind::UnsupportedFormat(path.display().to_string())),
    })
}
