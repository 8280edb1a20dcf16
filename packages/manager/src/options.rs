use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_DEBOUNCE_MS: u64 = 100;
pub const DEFAULT_CONTAINER_ID: &str = "dmn-container";

/// Manager configuration, usually read from the host's config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerOptions {
    /// Options handed to every renderer
    #[serde(default)]
    pub common: RendererOptions,

    /// Options for a single renderer, keyed by provider id
    #[serde(default)]
    pub providers: HashMap<String, RendererOptions>,

    /// Quiet period before `views.changed` fires
    #[serde(default = "default_debounce_ms")]
    pub views_changed_debounce_ms: u64,

    #[serde(default)]
    pub container: ContainerOptions,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            common: RendererOptions::default(),
            providers: HashMap::new(),
            views_changed_debounce_ms: DEFAULT_DEBOUNCE_MS,
            container: ContainerOptions::default(),
        }
    }
}

impl ManagerOptions {
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.views_changed_debounce_ms)
    }

    /// Common options overlaid with the provider's own; provider keys win,
    /// module lists are concatenated (common first)
    pub fn renderer_options(&self, provider_id: &str) -> RendererOptions {
        let mut merged = self.common.clone();
        if let Some(specific) = self.providers.get(provider_id) {
            for (key, value) in &specific.settings {
                merged.settings.insert(key.clone(), value.clone());
            }
            merged
                .additional_modules
                .extend(specific.additional_modules.iter().cloned());
        }
        merged
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RendererOptions {
    /// Free-form renderer settings
    #[serde(default)]
    pub settings: Map<String, Value>,

    /// Names of extension modules the renderer should load
    #[serde(default)]
    pub additional_modules: Vec<String>,
}

/// Surface the renderers attach to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerOptions {
    #[serde(default = "default_container_id")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
}

fn default_container_id() -> String {
    DEFAULT_CONTAINER_ID.to_string()
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            id: default_container_id(),
            width: None,
            height: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_options() {
        let json = r#"{
            "common": { "settings": { "keyboard": true }, "additionalModules": ["logging"] },
            "providers": {
                "decisionTable": { "settings": { "keyboard": false, "columns": 3 }, "additionalModules": ["hit-policy"] }
            },
            "viewsChangedDebounceMs": 250,
            "container": { "id": "editor", "width": "100%" }
        }"#;

        let options: ManagerOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.debounce_window(), Duration::from_millis(250));
        assert_eq!(options.container.id, "editor");
        assert_eq!(options.container.width.as_deref(), Some("100%"));
        assert_eq!(options.container.height, None);

        let merged = options.renderer_options("decisionTable");
        assert_eq!(merged.settings.get("keyboard"), Some(&json!(false)));
        assert_eq!(merged.settings.get("columns"), Some(&json!(3)));
        assert_eq!(merged.additional_modules, vec!["logging", "hit-policy"]);

        let drd = options.renderer_options("drd");
        assert_eq!(drd.settings.get("keyboard"), Some(&json!(true)));
        assert_eq!(drd.additional_modules, vec!["logging"]);
    }

    #[test]
    fn test_default_options() {
        let options: ManagerOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, ManagerOptions::default());
        assert_eq!(options.views_changed_debounce_ms, 100);
        assert_eq!(options.container.id, "dmn-container");
    }
}
