//! Stagehand configuration types and loading
//!
//! Per-type scheduling policies are resolved into strongly typed
//! [`TypeSchedulingPolicy`] values once, at load time. The pipeline never
//! looks settings up by string key.

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use nodestore::ScheduleAction;

/// Main Stagehand configuration as read from file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Whether cron runs emit start/completion log entries
    #[serde(rename = "log")]
    pub log: Option<bool>,

    /// Node store location
    pub store: StoreConfig,

    /// Default policy flags applied to types without explicit settings
    pub defaults: TypeSchedulingPolicy,

    /// Per content-type policy overrides
    pub types: BTreeMap<String, PolicyOverride>,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .stagehand.yml
        let local_config = PathBuf::from(".stagehand.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/stagehand/stagehand.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("stagehand").join("stagehand.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Resolve the file representation into runtime settings
    pub fn settings(&self) -> SchedulerSettings {
        let mut settings = SchedulerSettings::new(self.log.unwrap_or(true), self.defaults.clone());
        for (node_type, overrides) in &self.types {
            settings.set_type(node_type.clone(), overrides.resolve(&self.defaults));
        }
        settings
    }
}

/// Node store location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to the SQLite database file
    #[serde(rename = "db-path")]
    pub db_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(nodestore::DEFAULT_DB_PATH),
        }
    }
}

/// Per content-type scheduling policy.
///
/// All flags default to off; enabling scheduling for a type is an explicit
/// configuration decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TypeSchedulingPolicy {
    /// Allow scheduled publishing for this type
    pub publish_enable: bool,

    /// Allow scheduled unpublishing for this type
    pub unpublish_enable: bool,

    /// Rewrite the creation date to the publish date on publish
    pub publish_touch: bool,

    /// Rewrite the creation date when it is later than the publish date
    pub publish_past_date_created: bool,

    /// Create a new revision when publishing
    pub publish_revision: bool,

    /// Create a new revision when unpublishing
    pub unpublish_revision: bool,

    /// Editors must supply a revision log message (enforced by the editing
    /// workflow, not by the scheduler)
    pub require_revision_log: bool,
}

impl TypeSchedulingPolicy {
    /// Whether the action is enabled for this type
    pub fn enabled_for(&self, action: ScheduleAction) -> bool {
        match action {
            ScheduleAction::Publish => self.publish_enable,
            ScheduleAction::Unpublish => self.unpublish_enable,
        }
    }

    /// Whether the action creates a new revision for this type
    pub fn revision_for(&self, action: ScheduleAction) -> bool {
        match action {
            ScheduleAction::Publish => self.publish_revision,
            ScheduleAction::Unpublish => self.unpublish_revision,
        }
    }
}

/// Partial per-type policy; unset flags fall back to the global defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PolicyOverride {
    pub publish_enable: Option<bool>,
    pub unpublish_enable: Option<bool>,
    pub publish_touch: Option<bool>,
    pub publish_past_date_created: Option<bool>,
    pub publish_revision: Option<bool>,
    pub unpublish_revision: Option<bool>,
    pub require_revision_log: Option<bool>,
}

impl PolicyOverride {
    /// Fill unset flags from the defaults
    pub fn resolve(&self, defaults: &TypeSchedulingPolicy) -> TypeSchedulingPolicy {
        TypeSchedulingPolicy {
            publish_enable: self.publish_enable.unwrap_or(defaults.publish_enable),
            unpublish_enable: self.unpublish_enable.unwrap_or(defaults.unpublish_enable),
            publish_touch: self.publish_touch.unwrap_or(defaults.publish_touch),
            publish_past_date_created: self
                .publish_past_date_created
                .unwrap_or(defaults.publish_past_date_created),
            publish_revision: self.publish_revision.unwrap_or(defaults.publish_revision),
            unpublish_revision: self.unpublish_revision.unwrap_or(defaults.unpublish_revision),
            require_revision_log: self.require_revision_log.unwrap_or(defaults.require_revision_log),
        }
    }
}

/// Resolved runtime settings consumed by the scheduler manager
#[derive(Debug, Clone)]
pub struct SchedulerSettings {
    /// Whether cron runs emit start/completion log entries
    pub log: bool,
    defaults: TypeSchedulingPolicy,
    types: BTreeMap<String, TypeSchedulingPolicy>,
}

impl SchedulerSettings {
    pub fn new(log: bool, defaults: TypeSchedulingPolicy) -> Self {
        Self {
            log,
            defaults,
            types: BTreeMap::new(),
        }
    }

    /// Install the resolved policy for a content type
    pub fn set_type(&mut self, node_type: String, policy: TypeSchedulingPolicy) {
        self.types.insert(node_type, policy);
    }

    /// The policy for a content type; unknown types use the defaults
    pub fn policy(&self, node_type: &str) -> &TypeSchedulingPolicy {
        self.types.get(node_type).unwrap_or(&self.defaults)
    }

    /// Configured content types with the action enabled, for the candidate
    /// selection query
    pub fn enabled_types(&self, action: ScheduleAction) -> Vec<String> {
        self.types
            .iter()
            .filter(|(_, policy)| policy.enabled_for(action))
            .map(|(node_type, _)| node_type.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_all_off() {
        let policy = TypeSchedulingPolicy::default();
        assert!(!policy.publish_enable);
        assert!(!policy.unpublish_enable);
        assert!(!policy.publish_revision);
        assert!(!policy.enabled_for(ScheduleAction::Publish));
        assert!(!policy.revision_for(ScheduleAction::Unpublish));
    }

    #[test]
    fn test_override_resolution_falls_back_to_defaults() {
        let defaults = TypeSchedulingPolicy {
            publish_enable: true,
            publish_revision: true,
            ..Default::default()
        };
        let overrides = PolicyOverride {
            publish_revision: Some(false),
            unpublish_enable: Some(true),
            ..Default::default()
        };
        let resolved = overrides.resolve(&defaults);
        assert!(resolved.publish_enable);
        assert!(!resolved.publish_revision);
        assert!(resolved.unpublish_enable);
    }

    #[test]
    fn test_settings_policy_lookup_and_enabled_types() {
        let mut settings = SchedulerSettings::new(true, TypeSchedulingPolicy::default());
        settings.set_type(
            "article".to_string(),
            TypeSchedulingPolicy {
                publish_enable: true,
                unpublish_enable: true,
                ..Default::default()
            },
        );
        settings.set_type(
            "page".to_string(),
            TypeSchedulingPolicy {
                publish_enable: true,
                ..Default::default()
            },
        );

        assert!(settings.policy("article").publish_enable);
        // Unknown types use the defaults
        assert!(!settings.policy("event").publish_enable);

        assert_eq!(
            settings.enabled_types(ScheduleAction::Publish),
            vec!["article".to_string(), "page".to_string()]
        );
        assert_eq!(settings.enabled_types(ScheduleAction::Unpublish), vec!["article".to_string()]);
    }

    #[test]
    fn test_parse_yaml_config() {
        let yaml = "
log: false
store:
  db-path: /tmp/content.db
defaults:
  publish-enable: true
types:
  article:
    publish-revision: true
  page:
    publish-enable: false
";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.log, Some(false));
        assert_eq!(config.store.db_path, PathBuf::from("/tmp/content.db"));

        let settings = config.settings();
        assert!(!settings.log);
        assert!(settings.policy("article").publish_enable);
        assert!(settings.policy("article").publish_revision);
        assert!(!settings.policy("page").publish_enable);
        assert_eq!(settings.enabled_types(ScheduleAction::Publish), vec!["article".to_string()]);
    }

    #[test]
    fn test_log_defaults_to_enabled() {
        let config = Config::default();
        assert!(config.settings().log);
    }
}
