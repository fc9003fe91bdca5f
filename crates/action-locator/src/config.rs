//! Loading [`HealPolicy`] from JSON or YAML files.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::policy::HealPolicy;

/// Overrides `store_path` when set and non-empty.
pub const STORE_PATH_ENV: &str = "HEAL_LOCATOR_STORE";

/// Errors surfaced while loading policy configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to deserialize policy: {0}")]
    Deserialize(String),
}

pub fn load_policy_from_reader<R: Read>(mut reader: R) -> Result<HealPolicy, ConfigError> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf)?;
    parse_policy_str(&buf)
}

pub fn load_policy_from_path(path: impl AsRef<Path>) -> Result<HealPolicy, ConfigError> {
    let file = File::open(path.as_ref())?;
    let policy = apply_env_overrides(load_policy_from_reader(file)?);
    debug!(path = %path.as_ref().display(), ?policy, "loaded heal policy");
    Ok(policy)
}

pub fn parse_policy_str(raw: &str) -> Result<HealPolicy, ConfigError> {
    match serde_json::from_str(raw) {
        Ok(policy) => Ok(policy),
        Err(json_err) => serde_yaml::from_str(raw).map_err(|yaml_err| {
            ConfigError::Deserialize(format!(
                "json error: {}; yaml error: {}",
                json_err, yaml_err
            ))
        }),
    }
}

/// Default policy with environment overrides applied.
pub fn policy_from_env() -> HealPolicy {
    apply_env_overrides(HealPolicy::default())
}

fn apply_env_overrides(mut policy: HealPolicy) -> HealPolicy {
    match std::env::var(STORE_PATH_ENV) {
        Ok(value) if !value.trim().is_empty() => {
            policy.store_path = PathBuf::from(value.trim());
        }
        _ => {}
    }
    policy
}
