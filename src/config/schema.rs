//! KDL schema for config.kdl.
//!
//! This module provides:
//! - The Rust struct representing the KDL schema
//! - Serialization/deserialization to/from KDL format
//! - Validation and per-key updates used by `dt config set`

use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use serde::{Deserialize, Serialize};

use crate::models::Points;

/// Keys accepted in config.kdl.
pub const CONFIG_KEYS: &[&str] = &["owner", "output-format", "default-points", "default-category"];

/// Output format preference for CLI commands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output (default, machine-readable)
    #[default]
    Json,
    /// Human-readable output
    Human,
}

impl OutputFormat {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "human" => Some(OutputFormat::Human),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Human => "human",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User preferences stored in config.kdl.
///
/// # KDL Schema
///
/// ```kdl
/// owner "alice"
/// output-format "human"  // or "json"
/// default-points 2
/// default-category "Health"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaytallyConfig {
    /// Owner that tasks are scoped to
    pub owner: Option<String>,

    /// Default output format for CLI commands
    pub output_format: Option<OutputFormat>,

    /// Points given to new tasks (1-3)
    pub default_points: Option<u8>,

    /// Category given to new tasks
    pub default_category: Option<String>,
}

impl DaytallyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the config values.
    ///
    /// Returns an error message if any value is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(points) = self.default_points {
            if Points::new(points).is_err() {
                return Err(format!(
                    "default-points must be {}-{}, got {}",
                    Points::MIN,
                    Points::MAX,
                    points
                ));
            }
        }
        if self.owner.as_deref().is_some_and(|o| o.trim().is_empty()) {
            return Err("owner must not be empty".to_string());
        }
        if self
            .default_category
            .as_deref()
            .is_some_and(|c| c.trim().is_empty())
        {
            return Err("default-category must not be empty".to_string());
        }
        Ok(())
    }

    /// Parse config from a KDL document.
    ///
    /// Unknown nodes and values of the wrong type are ignored.
    pub fn from_kdl(doc: &KdlDocument) -> Self {
        let mut config = Self::new();

        config.owner = first_string(doc, "owner");
        config.output_format = first_string(doc, "output-format")
            .as_deref()
            .and_then(OutputFormat::parse);
        config.default_category = first_string(doc, "default-category");

        config.default_points = doc
            .get("default-points")
            .and_then(|node| node.entries().first())
            .and_then(|entry| entry.value().as_integer())
            .filter(|i| (Points::MIN as i128..=Points::MAX as i128).contains(i))
            .map(|i| i as u8);

        config
    }

    /// Convert config to a KDL document.
    pub fn to_kdl(&self) -> KdlDocument {
        let mut doc = KdlDocument::new();

        if let Some(ref owner) = self.owner {
            push_node(&mut doc, "owner", KdlValue::String(owner.clone()));
        }
        if let Some(ref format) = self.output_format {
            push_node(
                &mut doc,
                "output-format",
                KdlValue::String(format.as_str().to_string()),
            );
        }
        if let Some(points) = self.default_points {
            push_node(&mut doc, "default-points", KdlValue::Integer(points as i128));
        }
        if let Some(ref category) = self.default_category {
            push_node(&mut doc, "default-category", KdlValue::String(category.clone()));
        }

        doc
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` if they are Some.
    pub fn merge(&mut self, other: &DaytallyConfig) {
        if other.owner.is_some() {
            self.owner = other.owner.clone();
        }
        if other.output_format.is_some() {
            self.output_format = other.output_format.clone();
        }
        if other.default_points.is_some() {
            self.default_points = other.default_points;
        }
        if other.default_category.is_some() {
            self.default_category = other.default_category.clone();
        }
    }

    /// Set one key from its textual form, as given to `dt config set`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "owner" => self.owner = Some(value.trim().to_string()),
            "output-format" => {
                self.output_format = Some(OutputFormat::parse(value).ok_or_else(|| {
                    format!("output-format must be 'json' or 'human', got '{}'", value)
                })?)
            }
            "default-points" => {
                let points = value
                    .parse::<u8>()
                    .map_err(|_| format!("default-points must be a number, got '{}'", value))?;
                self.default_points = Some(points);
            }
            "default-category" => self.default_category = Some(value.trim().to_string()),
            other => {
                return Err(format!(
                    "Unknown config key '{}'. Valid keys: {}",
                    other,
                    CONFIG_KEYS.join(", ")
                ));
            }
        }
        self.validate()
    }
}

fn first_string(doc: &KdlDocument, name: &str) -> Option<String> {
    doc.get(name)
        .and_then(|node| node.entries().first())
        .and_then(|entry| entry.value().as_string())
        .map(|s| s.to_string())
}

fn push_node(doc: &mut KdlDocument, name: &str, value: KdlValue) {
    let mut node = KdlNode::new(name);
    node.push(KdlEntry::new(value));
    doc.nodes_mut().push(node);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::parse("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("human"), Some(OutputFormat::Human));
        assert_eq!(OutputFormat::parse("invalid"), None);
    }

    #[test]
    fn test_config_default() {
        let config = DaytallyConfig::default();
        assert_eq!(config.owner, None);
        assert_eq!(config.output_format, None);
        assert_eq!(config.default_points, None);
        assert_eq!(config.default_category, None);
    }

    #[test]
    fn test_config_validate_invalid_points() {
        let config = DaytallyConfig {
            default_points: Some(4),
            ..Default::default()
        };
        let result = config.validate();
        assert!(result.unwrap_err().contains("default-points must be 1-3"));
    }

    #[test]
    fn test_config_from_kdl_full() {
        let kdl = r#"
            owner "alice"
            output-format "human"
            default-points 2
            default-category "Health"
        "#;
        let doc: KdlDocument = kdl.parse().unwrap();
        let config = DaytallyConfig::from_kdl(&doc);

        assert_eq!(config.owner.as_deref(), Some("alice"));
        assert_eq!(config.output_format, Some(OutputFormat::Human));
        assert_eq!(config.default_points, Some(2));
        assert_eq!(config.default_category.as_deref(), Some("Health"));
    }

    #[test]
    fn test_config_from_kdl_ignores_out_of_range_points() {
        let doc: KdlDocument = "default-points 7".parse().unwrap();
        assert_eq!(DaytallyConfig::from_kdl(&doc).default_points, None);
    }

    #[test]
    fn test_config_to_kdl_roundtrip() {
        let config = DaytallyConfig {
            owner: Some("bob".to_string()),
            output_format: Some(OutputFormat::Json),
            default_points: Some(3),
            default_category: Some("Work".to_string()),
        };

        let text = config.to_kdl().to_string();
        let parsed = DaytallyConfig::from_kdl(&text.parse().unwrap());
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_config_merge() {
        let mut base = DaytallyConfig {
            owner: Some("alice".to_string()),
            output_format: Some(OutputFormat::Json),
            default_points: Some(3),
            default_category: None,
        };
        let other = DaytallyConfig {
            output_format: Some(OutputFormat::Human),
            default_category: Some("Errands".to_string()),
            ..Default::default()
        };

        base.merge(&other);

        assert_eq!(base.owner.as_deref(), Some("alice")); // Not overridden
        assert_eq!(base.output_format, Some(OutputFormat::Human));
        assert_eq!(base.default_points, Some(3));
        assert_eq!(base.default_category.as_deref(), Some("Errands"));
    }

    #[test]
    fn test_config_set_keys() {
        let mut config = DaytallyConfig::new();
        config.set("default-points", "2").unwrap();
        config.set("output-format", "HUMAN").unwrap();
        config.set("owner", " carol ").unwrap();

        assert_eq!(config.default_points, Some(2));
        assert_eq!(config.output_format, Some(OutputFormat::Human));
        assert_eq!(config.owner.as_deref(), Some("carol"));

        assert!(config.set("default-points", "9").is_err());
        assert!(config.set("default-points", "two").is_err());
        assert!(config.set("editor", "vim").is_err());
        assert!(config.set("owner", "  ").is_err());
    }
}
