//! Database settings from the layered YAML configuration
//!
//! Two files are read: a defaults file and an environment file. Both hold a
//! top-level `config:` mapping; the environment file is deep-merged over the
//! defaults and one section (usually `db`) is selected:
//!
//! ```yaml
//! config:
//!   db:
//!     driver: postgres
//!     user: app
//!     password: secret
//!     address:
//!       host: localhost
//!       port: 5432
//!     name: app
//!     migration_dir: db/migrations
//! ```

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use url::Url;

/// Default location of the defaults file
pub const DEFAULT_DEF_PATH: &str = "env/default.yml";

/// Default location of the environment file
pub const DEFAULT_ENV_PATH: &str = "env/docker.yml";

/// Default section under `config:`
pub const DEFAULT_SECTION: &str = "db";

/// Network address of a database server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Host name or IP
    pub host: String,
    /// TCP port; the driver's well-known port when absent
    #[serde(default)]
    pub port: Option<u16>,
}

/// Resolved settings for one database section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Driver identifier (postgres, mysql, duckdb, sqlite3, bash)
    #[serde(default)]
    pub driver: Option<String>,

    /// User name for network drivers
    #[serde(default)]
    pub user: Option<String>,

    /// Password; empty when absent
    #[serde(default)]
    pub password: Option<String>,

    /// Server address for network drivers
    #[serde(default)]
    pub address: Option<Address>,

    /// Database name, or the database/state file path for file drivers
    #[serde(default)]
    pub name: Option<String>,

    /// Directory holding the migration files
    #[serde(default)]
    pub migration_dir: Option<String>,

    /// Extra query parameters appended to network URLs
    #[serde(default, deserialize_with = "null_as_empty")]
    pub params: BTreeMap<String, String>,

    /// Full connection URL; bypasses URL construction when set
    #[serde(default)]
    pub url: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

/// How a driver expects its connection target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Network { default_port: u16 },
    File,
}

fn target_for(driver: &str) -> Option<Target> {
    match driver {
        "postgres" | "postgresql" => Some(Target::Network { default_port: 5432 }),
        "mysql" => Some(Target::Network { default_port: 3306 }),
        "duckdb" | "sqlite3" | "sqlite" | "bash" => Some(Target::File),
        _ => None,
    }
}

fn missing(field: &str) -> CoreError {
    CoreError::ConfigInvalid {
        message: format!("please set '{field}' parameter in DB config"),
    }
}

impl DatabaseSettings {
    /// Load and validate a section from the defaults and environment files.
    pub fn load(def_path: &Path, env_path: &Path, section: &str) -> CoreResult<Self> {
        let defaults = read_config_file(def_path)?;
        let overrides = read_config_file(env_path)?;
        log::debug!(
            "Merging config {} over {} (section '{}')",
            env_path.display(),
            def_path.display(),
            section
        );
        Self::from_yaml_sources(&defaults, &overrides, section)
    }

    /// Merge two YAML documents and extract `config.<section>`.
    pub fn from_yaml_sources(defaults: &str, overrides: &str, section: &str) -> CoreResult<Self> {
        let mut root = parse_document(defaults)?;
        let overlay = parse_document(overrides)?;
        if !overlay.is_null() {
            merge(&mut root, overlay);
        }

        let section_value = root
            .get("config")
            .and_then(|c| c.get(section))
            .ok_or_else(|| CoreError::ConfigInvalid {
                message: format!("section 'config.{section}' is undefined"),
            })?;

        let settings: DatabaseSettings = serde_yaml::from_value(section_value.clone())
            .map_err(|e| CoreError::ConfigParseError {
                message: format!("section '{section}': {e}"),
            })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check that every field the driver needs is present.
    pub fn validate(&self) -> CoreResult<()> {
        if self.migration_dir.as_deref().unwrap_or("").is_empty() {
            return Err(missing("migration_dir"));
        }
        let driver = self.driver()?;
        if self.url.is_some() {
            return Ok(());
        }

        match target_for(driver) {
            Some(Target::Network { .. }) => {
                if self.user.is_none() {
                    return Err(missing("user"));
                }
                if self.address.is_none() {
                    return Err(missing("address"));
                }
                if self.name.is_none() {
                    return Err(missing("name"));
                }
            }
            Some(Target::File) => {
                if self.name.is_none() {
                    return Err(missing("name"));
                }
            }
            None => {
                return Err(CoreError::ConfigInvalid {
                    message: format!("unknown driver '{driver}'"),
                })
            }
        }
        Ok(())
    }

    /// Driver identifier
    pub fn driver(&self) -> CoreResult<&str> {
        match self.driver.as_deref() {
            Some(d) if !d.is_empty() => Ok(d),
            _ => Err(missing("driver")),
        }
    }

    /// Migration directory as a path
    pub fn migration_dir(&self) -> CoreResult<PathBuf> {
        match self.migration_dir.as_deref() {
            Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
            _ => Err(missing("migration_dir")),
        }
    }

    /// Build the connection URL for the configured driver.
    pub fn connection_url(&self) -> CoreResult<String> {
        if let Some(url) = &self.url {
            return Ok(url.clone());
        }
        let driver = self.driver()?;
        let name = self.name.as_deref().ok_or_else(|| missing("name"))?;

        match target_for(driver) {
            Some(Target::Network { default_port }) => {
                let user = self.user.as_deref().ok_or_else(|| missing("user"))?;
                let address = self.address.as_ref().ok_or_else(|| missing("address"))?;
                let password = self.password.as_deref().unwrap_or("");
                let mut params = self.params.clone();
                if matches!(driver, "postgres" | "postgresql") {
                    params
                        .entry("sslmode".to_string())
                        .or_insert_with(|| "disable".to_string());
                }
                network_url(
                    driver,
                    user,
                    password,
                    &address.host,
                    address.port.unwrap_or(default_port),
                    name,
                    &params,
                )
            }
            Some(Target::File) => Ok(format!("{driver}://{name}")),
            None => Err(CoreError::ConfigInvalid {
                message: format!("unknown driver '{driver}'"),
            }),
        }
    }
}

fn invalid_url(what: &str, value: &str) -> CoreError {
    CoreError::ConfigInvalid {
        message: format!("cannot use {what} '{value}' in a connection URL"),
    }
}

fn network_url(
    scheme: &str,
    user: &str,
    password: &str,
    host: &str,
    port: u16,
    name: &str,
    params: &BTreeMap<String, String>,
) -> CoreResult<String> {
    let mut url =
        Url::parse(&format!("{scheme}://{host}")).map_err(|_| invalid_url("host", host))?;
    url.set_port(Some(port))
        .map_err(|_| invalid_url("port", &port.to_string()))?;
    url.set_username(user).map_err(|_| invalid_url("user", user))?;
    if !password.is_empty() {
        url.set_password(Some(password))
            .map_err(|_| invalid_url("password", "***"))?;
    }
    url.set_path(&format!("/{name}"));
    if !params.is_empty() {
        let mut query = url.query_pairs_mut();
        for (key, value) in params {
            query.append_pair(key, value);
        }
    }
    Ok(url.to_string())
}

fn parse_document(source: &str) -> CoreResult<Value> {
    if source.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_yaml::from_str(source)?)
}

fn read_config_file(path: &Path) -> CoreResult<String> {
    if !path.exists() {
        return Err(CoreError::ConfigNotFound {
            path: path.display().to_string(),
        });
    }
    std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })
}

/// Deep-merge `overlay` into `base`: mappings merge key by key, anything else
/// replaces. An explicit null clears the value it lands on.
fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base), Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
