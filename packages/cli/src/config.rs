use anyhow::{anyhow, Context};
use dmn_manager::ManagerOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "dmn.config.json";

/// `dmn.config.json`: manager options at the top level, CLI options under `cli`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(flatten)]
    pub manager: ManagerOptions,

    #[serde(default)]
    pub cli: CliOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliOptions {
    /// Colored terminal output
    #[serde(default = "default_color")]
    pub color: bool,
}

fn default_color() -> bool {
    true
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            color: default_color(),
        }
    }
}

impl Config {
    /// Load `explicit` if given, otherwise `dmn.config.json` in `cwd` when it
    /// exists, otherwise defaults
    pub fn load(cwd: &Path, explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) if !path.exists() => {
                return Err(anyhow!("Config file does not exist: {}", path.display()));
            }
            Some(path) => path.to_path_buf(),
            None => {
                let path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);
                if !path.exists() {
                    return Ok(Config::default());
                }
                path
            }
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "common": { "settings": { "showIds": true } },
            "providers": { "decisionTable": { "additionalModules": ["hit-policy"] } },
            "viewsChangedDebounceMs": 300,
            "container": { "id": "terminal" },
            "cli": { "color": false }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert!(!config.cli.color);
        assert_eq!(config.manager.views_changed_debounce_ms, 300);
        assert_eq!(config.manager.container.id, "terminal");
        assert_eq!(
            config.manager.renderer_options("decisionTable").additional_modules,
            vec!["hit-policy"]
        );
    }

    #[test]
    fn test_default_config() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.cli.color);
        assert_eq!(config.manager.views_changed_debounce_ms, 100);
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load(dir.path(), None).unwrap(), Config::default());

        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            r#"{ "cli": { "color": false } }"#,
        )
        .unwrap();
        assert!(!Config::load(dir.path(), None).unwrap().cli.color);

        let missing = dir.path().join("missing.json");
        assert!(Config::load(dir.path(), Some(&missing)).is_err());
    }
}
