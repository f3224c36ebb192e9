//! Precedence resolution for configuration.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags and environment variables (passed at runtime)
//! 2. Data-dir config.kdl (`<data-dir>/config.kdl`)
//! 3. System config.kdl (`~/.config/daytally/config.kdl`)
//! 4. Built-in defaults

use std::path::Path;

use serde::Serialize;

use crate::Result;
use crate::config::{DaytallyConfig, OutputFormat, read_config, system_config_path};
use crate::models::Points;

/// Owner used when nothing else names one.
pub const DEFAULT_OWNER: &str = "local";

/// Category used for new tasks when nothing else names one.
pub const DEFAULT_CATEGORY: &str = "General";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from environment variable
    EnvVar(String),
    /// Value from the data directory's config.kdl
    DataDir,
    /// Value from system-level config
    System,
    /// Value from CLI flag
    CliFlag,
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::EnvVar(name) => write!(f, "env:{}", name),
            ValueSource::DataDir => write!(f, "data-dir"),
            ValueSource::System => write!(f, "system"),
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

impl Serialize for ValueSource {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone, Serialize)]
pub struct Resolved<T> {
    /// The resolved value
    pub value: T,
    /// Where the value came from
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Fully resolved configuration with source tracking.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    pub owner: Resolved<String>,
    pub output_format: Resolved<OutputFormat>,
    pub default_points: Resolved<Points>,
    pub default_category: Resolved<String>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            owner: Resolved::new(DEFAULT_OWNER.to_string(), ValueSource::Default),
            output_format: Resolved::new(OutputFormat::Json, ValueSource::Default),
            default_points: Resolved::new(Points::default(), ValueSource::Default),
            default_category: Resolved::new(DEFAULT_CATEGORY.to_string(), ValueSource::Default),
        }
    }
}

impl ResolvedConfig {
    pub fn owner(&self) -> &str {
        &self.owner.value
    }

    pub fn output_format(&self) -> &OutputFormat {
        &self.output_format.value
    }

    pub fn default_points(&self) -> Points {
        self.default_points.value
    }

    pub fn default_category(&self) -> &str {
        &self.default_category.value
    }

    pub fn is_human(&self) -> bool {
        self.output_format.value == OutputFormat::Human
    }
}

/// Runtime overrides for configuration resolution.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Owner override and where it came from (flag or env var)
    pub owner: Option<Resolved<String>>,
    /// Output format override from CLI flag
    pub output_format: Option<OutputFormat>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set owner override.
    pub fn with_owner(mut self, owner: impl Into<String>, source: ValueSource) -> Self {
        self.owner = Some(Resolved::new(owner.into(), source));
        self
    }

    /// Set output format override.
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }
}

/// Resolve configuration for `data_dir` with full precedence chain.
///
/// A missing config file resolves as empty.
pub fn resolve_config(data_dir: &Path, overrides: &ConfigOverrides) -> Result<ResolvedConfig> {
    let system_config = match system_config_path() {
        Some(path) => read_config(&path)?,
        None => DaytallyConfig::default(),
    };
    let data_config = read_config(&crate::config::data_config_path(data_dir))?;
    Ok(resolve_layers(&system_config, &data_config, overrides))
}

/// Resolve from already loaded layers.
pub fn resolve_layers(
    system_config: &DaytallyConfig,
    data_config: &DaytallyConfig,
    overrides: &ConfigOverrides,
) -> ResolvedConfig {
    let mut result = ResolvedConfig::default();

    if let Some(ref owner) = overrides.owner {
        result.owner = owner.clone();
    } else if let Some(ref owner) = data_config.owner {
        result.owner = Resolved::new(owner.clone(), ValueSource::DataDir);
    } else if let Some(ref owner) = system_config.owner {
        result.owner = Resolved::new(owner.clone(), ValueSource::System);
    }

    if let Some(ref format) = overrides.output_format {
        result.output_format = Resolved::new(format.clone(), ValueSource::CliFlag);
    } else if let Some(ref format) = data_config.output_format {
        result.output_format = Resolved::new(format.clone(), ValueSource::DataDir);
    } else if let Some(ref format) = system_config.output_format {
        result.output_format = Resolved::new(format.clone(), ValueSource::System);
    }

    // Out-of-range values never reach here; from_kdl drops them
    let points = |value: u8| Points::new(value).unwrap_or_default();
    if let Some(value) = data_config.default_points {
        result.default_points = Resolved::new(points(value), ValueSource::DataDir);
    } else if let Some(value) = system_config.default_points {
        result.default_points = Resolved::new(points(value), ValueSource::System);
    }

    if let Some(ref category) = data_config.default_category {
        result.default_category = Resolved::new(category.clone(), ValueSource::DataDir);
    } else if let Some(ref category) = system_config.default_category {
        result.default_category = Resolved::new(category.clone(), ValueSource::System);
    }

    result
}
