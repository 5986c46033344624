use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DistPublishError, Result};

pub const CONFIG_FILE_NAME: &str = "distpublish.toml";

/// Represents the complete configuration for git-dist-publish.
///
/// Built once at start-up and passed explicitly to the workflow.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Root under which the distribution repository is cloned
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,

    /// Remote whose branch the development branch must match
    #[serde(default = "default_remote")]
    pub tracking_remote: String,

    /// Remote of the distribution clone that tags are pushed to
    #[serde(default = "default_remote")]
    pub push_remote: String,

    #[serde(default = "default_scratch_branch_base")]
    pub scratch_branch_base: String,

    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    #[serde(default)]
    pub dist: DistConfig,
}

/// Where the distribution repository lives and how its content is produced
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct DistConfig {
    /// Overrides `distRepository` from the package descriptor
    #[serde(default)]
    pub repository: Option<String>,

    /// Shell command that writes the package content into
    /// `$DIST_PUBLISH_TARGET`; content is copied when unset
    #[serde(default)]
    pub command: Option<String>,
}

fn default_temp_dir() -> PathBuf {
    std::env::temp_dir().join("git-dist-publish")
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_scratch_branch_base() -> String {
    "dist-publish".to_string()
}

fn default_commit_message() -> String {
    "Publish package contents (git-dist-publish)".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            temp_dir: default_temp_dir(),
            tracking_remote: default_remote(),
            push_remote: default_remote(),
            scratch_branch_base: default_scratch_branch_base(),
            commit_message: default_commit_message(),
            dist: DistConfig::default(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `distpublish.toml` in `base_dir`
/// 3. `.distpublish.toml` in the user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&Path>, base_dir: &Path) -> Result<Config> {
    let local = base_dir.join(CONFIG_FILE_NAME);
    let path = if let Some(path) = config_path {
        path.to_path_buf()
    } else if local.exists() {
        local
    } else if let Some(config_dir) = dirs::config_dir() {
        let user = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if user.exists() {
            user
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config_str = fs::read_to_string(&path).map_err(|e| {
        DistPublishError::config(format!("cannot read {}: {}", path.display(), e))
    })?;
    let config: Config = toml::from_str(&config_str)
        .map_err(|e| DistPublishError::config(format!("{}: {}", path.display(), e)))?;
    tracing::debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tracking_remote, "origin");
        assert_eq!(config.push_remote, "origin");
        assert_eq!(config.scratch_branch_base, "dist-publish");
        assert!(config.temp_dir.ends_with("git-dist-publish"));
        assert!(config.dist.repository.is_none());
        assert!(config.dist.command.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
tracking_remote = "upstream"

[dist]
repository = "acme/widget-dist"
"#,
        )
        .unwrap();
        assert_eq!(config.tracking_remote, "upstream");
        assert_eq!(config.push_remote, "origin");
        assert_eq!(config.dist.repository.as_deref(), Some("acme/widget-dist"));
    }
}
