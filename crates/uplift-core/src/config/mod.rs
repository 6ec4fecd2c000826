//! Configuration system for uplift.
//!
//! The raw, user-facing form is [`UpgradeConfig`]: either a boolean or an
//! [`UpgradeOptions`] object. [`UpgradeConfig::prepare`] validates it once,
//! before any batch is processed, into a [`PreparedConfig`].

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;
use strum::{Display, EnumString};
use tracing::warn;

use crate::error::{ErrorCode, UpliftError, UpliftResult};
use crate::grouping::IdentifiedBy;
use crate::quality::Requirement;

/// What to do with items that are not the best of their group.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OnLower {
    Accept,
    Reject,
    Fail,
    /// Leave lower items alone.
    #[default]
    Skip,
}

/// Upgrade options object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpgradeOptions {
    /// `false` disables the upgrade stages. Lets formats whose top level
    /// must be a table, like TOML, turn them off.
    pub enabled: bool,
    /// `"auto"` to use each item's native id, otherwise a `{{ field }}` template.
    pub identified_by: String,
    /// Record accepted items so later runs can compare against them.
    pub tracking: bool,
    /// Quality requirement an identifier is upgraded towards.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Action applied to items that are not the best of their group.
    pub on_lower: OnLower,
}

impl Default for UpgradeOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            identified_by: "auto".to_string(),
            tracking: true,
            target: None,
            on_lower: OnLower::Skip,
        }
    }
}

impl UpgradeOptions {
    /// Load options from environment variables on top of the defaults.
    ///
    /// Reads `UPLIFT_IDENTIFIED_BY`, `UPLIFT_TRACKING`, `UPLIFT_TARGET` and
    /// `UPLIFT_ON_LOWER`.
    pub fn from_env() -> UpliftResult<Self> {
        let mut options = Self::default();

        if let Ok(identified_by) = std::env::var("UPLIFT_IDENTIFIED_BY") {
            options.identified_by = identified_by;
        }
        if let Ok(tracking) = std::env::var("UPLIFT_TRACKING") {
            options.tracking = match tracking.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => {
                    return Err(UpliftError::configuration_with_suggestion(
                        format!("UPLIFT_TRACKING has invalid value `{other}`"),
                        "Use true or false",
                    ))
                }
            };
        }
        if let Ok(target) = std::env::var("UPLIFT_TARGET") {
            if target.trim().is_empty() {
                warn!("UPLIFT_TARGET is empty, ignoring it");
            } else {
                options.target = Some(target);
            }
        }
        if let Ok(on_lower) = std::env::var("UPLIFT_ON_LOWER") {
            options.on_lower = on_lower.parse().map_err(|_| {
                UpliftError::configuration_with_suggestion(
                    format!("UPLIFT_ON_LOWER has invalid value `{on_lower}`"),
                    "Use one of accept, reject, fail, skip",
                )
            })?;
        }

        Ok(options)
    }

    /// Build options using builder pattern.
    pub fn builder() -> UpgradeOptionsBuilder {
        UpgradeOptionsBuilder::default()
    }
}

/// Builder for UpgradeOptions.
#[derive(Default)]
pub struct UpgradeOptionsBuilder {
    options: UpgradeOptions,
}

impl UpgradeOptionsBuilder {
    /// Enable or disable the upgrade stages.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.options.enabled = enabled;
        self
    }

    /// Set the identifier template, or `"auto"`.
    pub fn identified_by(mut self, identified_by: impl Into<String>) -> Self {
        self.options.identified_by = identified_by.into();
        self
    }

    /// Enable or disable tracking.
    pub fn tracking(mut self, tracking: bool) -> Self {
        self.options.tracking = tracking;
        self
    }

    /// Set the target requirement.
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.options.target = Some(target.into());
        self
    }

    /// Set the action for lower items.
    pub fn on_lower(mut self, on_lower: OnLower) -> Self {
        self.options.on_lower = on_lower;
        self
    }

    /// Build the options.
    pub fn build(self) -> UpgradeOptions {
        self.options
    }
}

/// Upgrade configuration as written by the operator.
///
/// `false` disables the upgrade stages, `true` runs them with default
/// options. An options table is checked field by field, so an unknown key
/// is reported by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum UpgradeConfig {
    Enabled(bool),
    Options(UpgradeOptions),
}

impl<'de> Deserialize<'de> for UpgradeConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ConfigVisitor;

        impl<'de> Visitor<'de> for ConfigVisitor {
            type Value = UpgradeConfig;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a boolean or an upgrade options table")
            }

            fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
                Ok(UpgradeConfig::Enabled(value))
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
                UpgradeOptions::deserialize(de::value::MapAccessDeserializer::new(map))
                    .map(UpgradeConfig::Options)
            }
        }

        deserializer.deserialize_any(ConfigVisitor)
    }
}

impl Default for UpgradeConfig {
    fn default() -> Self {
        Self::Enabled(true)
    }
}

impl From<UpgradeOptions> for UpgradeConfig {
    fn from(options: UpgradeOptions) -> Self {
        Self::Options(options)
    }
}

impl UpgradeConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<Path>) -> UpliftResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => toml::from_str(&content)
                .map_err(|e| UpliftError::configuration(e.to_string())),
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| UpliftError::configuration(e.to_string())),
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| UpliftError::configuration(e.to_string())),
            _ => Err(UpliftError::Configuration {
                message: "Unsupported config file format".to_string(),
                code: ErrorCode::CfgUnsupportedFormat,
                suggestion: Some("Use .toml, .json, or .yaml".to_string()),
            }),
        }
    }

    /// Whether the upgrade stages run at all.
    pub fn is_enabled(&self) -> bool {
        match self {
            Self::Enabled(enabled) => *enabled,
            Self::Options(options) => options.enabled,
        }
    }

    /// Validate into a [`PreparedConfig`].
    ///
    /// Returns `Ok(None)` when disabled. A malformed `target` or an empty
    /// `identified_by` fails here, before any batch runs.
    pub fn prepare(&self) -> UpliftResult<Option<PreparedConfig>> {
        let options = match self {
            Self::Enabled(false) => return Ok(None),
            Self::Enabled(true) => UpgradeOptions::default(),
            Self::Options(options) if !options.enabled => return Ok(None),
            Self::Options(options) => options.clone(),
        };
        PreparedConfig::from_options(&options).map(Some)
    }
}

/// Validated configuration for one run.
#[derive(Debug, Clone)]
pub struct PreparedConfig {
    pub identified_by: IdentifiedBy,
    pub tracking: bool,
    pub target: Option<Requirement>,
    pub on_lower: OnLower,
}

impl PreparedConfig {
    /// Validate options.
    pub fn from_options(options: &UpgradeOptions) -> UpliftResult<Self> {
        let identified_by = IdentifiedBy::parse(&options.identified_by)?;
        let target = options
            .target
            .as_deref()
            .map(Requirement::parse)
            .transpose()?;

        Ok(Self {
            identified_by,
            tracking: options.tracking,
            target,
            on_lower: options.on_lower,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_bool_forms() {
        let enabled: UpgradeConfig = serde_json::from_str("true").unwrap();
        let prepared = enabled.prepare().unwrap().unwrap();
        assert_eq!(prepared.identified_by, IdentifiedBy::Auto);
        assert!(prepared.tracking);
        assert!(prepared.target.is_none());
        assert_eq!(prepared.on_lower, OnLower::Skip);

        let disabled: UpgradeConfig = serde_json::from_str("false").unwrap();
        assert!(!disabled.is_enabled());
        assert!(disabled.prepare().unwrap().is_none());
    }

    #[test]
    fn test_object_defaults() {
        let config: UpgradeConfig = serde_json::from_str(r#"{"on_lower": "reject"}"#).unwrap();
        let UpgradeConfig::Options(options) = &config else {
            panic!("expected options, got {config:?}");
        };
        assert_eq!(options.identified_by, "auto");
        assert!(options.tracking);
        assert_eq!(options.on_lower, OnLower::Reject);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = serde_json::from_str::<UpgradeConfig>(r#"{"propers": true}"#).unwrap_err();
        assert!(err.to_string().contains("unknown field `propers`"), "{err}");

        let err = toml::from_str::<UpgradeConfig>("on_lowr = \"reject\"\n").unwrap_err();
        assert!(err.to_string().contains("unknown field `on_lowr`"), "{err}");

        let result: Result<UpgradeConfig, _> = serde_json::from_str("\"yes\"");
        assert!(result.is_err());

        let result: Result<UpgradeConfig, _> = serde_json::from_str(r#"{"on_lower": "delete"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_prepare_rejects_bad_target() {
        let config: UpgradeConfig = UpgradeOptions::builder().target(">=720z").build().into();
        let err = config.prepare().unwrap_err();
        assert_eq!(err.code(), ErrorCode::SpecUnknownToken);
    }

    #[test]
    fn test_prepare_template() {
        let config: UpgradeConfig = UpgradeOptions::builder()
            .identified_by("{{series_name}} {{series_id}}")
            .target("720p+")
            .on_lower(OnLower::Fail)
            .tracking(false)
            .build()
            .into();
        let prepared = config.prepare().unwrap().unwrap();
        assert_eq!(
            prepared.identified_by,
            IdentifiedBy::Template("{{series_name}} {{series_id}}".to_string())
        );
        assert_eq!(prepared.target.as_ref().map(|t| t.spec()), Some("720p+"));
        assert!(!prepared.tracking);
    }

    #[test]
    fn test_from_toml_and_yaml_files() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("upgrade.toml");
        let mut file = std::fs::File::create(&toml_path).unwrap();
        writeln!(file, "target = \">=1080p\"\non_lower = \"fail\"").unwrap();
        let config = UpgradeConfig::from_file(&toml_path).unwrap();
        assert_eq!(
            config,
            UpgradeConfig::Options(
                UpgradeOptions::builder()
                    .target(">=1080p")
                    .on_lower(OnLower::Fail)
                    .build()
            )
        );

        let yaml_path = dir.path().join("upgrade.yml");
        std::fs::write(&yaml_path, "false\n").unwrap();
        assert_eq!(
            UpgradeConfig::from_file(&yaml_path).unwrap(),
            UpgradeConfig::Enabled(false)
        );

        let disabled_path = dir.path().join("disabled.toml");
        std::fs::write(&disabled_path, "enabled = false\n").unwrap();
        let disabled = UpgradeConfig::from_file(&disabled_path).unwrap();
        assert!(!disabled.is_enabled());
        assert!(disabled.prepare().unwrap().is_none());

        let ini_path = dir.path().join("upgrade.ini");
        std::fs::write(&ini_path, "").unwrap();
        let err = UpgradeConfig::from_file(&ini_path).unwrap_err();
        assert_eq!(err.code(), ErrorCode::CfgUnsupportedFormat);
    }
}
