//! System, category and configuration commands.

use serde::Serialize;
use std::path::{Path, PathBuf};

use super::{Context, Output, json};
use crate::config::{
    ResolvedConfig, data_config_path, read_config, system_config_path, write_config,
};
use crate::models::Category;
use crate::storage::{DB_FILE, Storage, TaskStore};
use crate::{Error, Result};

#[derive(Serialize)]
pub struct InitResult {
    /// False when the data directory already held a database
    pub initialized: bool,
    pub data_dir: PathBuf,
    pub schema_version: u32,
}

impl Output for InitResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.initialized {
            format!("Initialized daytally in {}", self.data_dir.display())
        } else {
            format!(
                "Already initialized in {} (schema v{})",
                self.data_dir.display(),
                self.schema_version
            )
        }
    }
}

/// Create the database in `data_dir`, or upgrade an existing one.
pub fn init(data_dir: &Path) -> Result<InitResult> {
    let existed = Storage::exists(data_dir);
    let storage = Storage::init(data_dir)?;
    tracing::info!(data_dir = %data_dir.display(), existed, "initialized storage");
    Ok(InitResult {
        initialized: !existed,
        data_dir: data_dir.to_path_buf(),
        schema_version: storage.schema_version()?,
    })
}

#[derive(Serialize)]
pub struct InfoResult {
    pub version: &'static str,
    pub commit: &'static str,
    pub built_at: &'static str,
    pub data_dir: PathBuf,
    pub database: PathBuf,
    pub initialized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<u32>,
    pub owner: String,
}

impl Output for InfoResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let schema = match self.schema_version {
            Some(v) => format!("v{}", v),
            None => "not initialized".to_string(),
        };
        format!(
            "daytally {} ({}, built {})\n  Data dir: {}\n  Database: {}\n  Schema:   {}\n  Owner:    {}",
            self.version,
            self.commit,
            self.built_at,
            self.data_dir.display(),
            self.database.display(),
            schema,
            self.owner
        )
    }
}

pub fn info(ctx: &Context) -> Result<InfoResult> {
    let initialized = Storage::exists(&ctx.data_dir);
    let schema_version = if initialized {
        Some(ctx.open_storage()?.schema_version()?)
    } else {
        None
    };
    Ok(InfoResult {
        version: env!("CARGO_PKG_VERSION"),
        commit: env!("DT_GIT_COMMIT"),
        built_at: env!("DT_BUILD_TIMESTAMP"),
        data_dir: ctx.data_dir.clone(),
        database: ctx.data_dir.join(DB_FILE),
        initialized,
        schema_version,
        owner: ctx.owner().to_string(),
    })
}

#[derive(Serialize)]
pub struct CategoryListResult {
    pub categories: Vec<Category>,
    pub count: usize,
}

impl Output for CategoryListResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.categories.is_empty() {
            return "No categories.".to_string();
        }
        self.categories
            .iter()
            .map(|c| match c.color {
                Some(ref color) => format!("{} ({})", c.name, color),
                None => c.name.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn category_list<S: TaskStore>(store: &S, owner_id: &str) -> Result<CategoryListResult> {
    let categories = store.list_categories(owner_id)?;
    Ok(CategoryListResult {
        count: categories.len(),
        categories,
    })
}

#[derive(Serialize)]
pub struct CategoryAddResult {
    #[serde(flatten)]
    pub category: Category,
    pub created: bool,
}

impl Output for CategoryAddResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.created {
            format!("Added category {}", self.category.name)
        } else {
            format!("Category {} already exists", self.category.name)
        }
    }
}

pub fn category_add<S: TaskStore>(
    store: &mut S,
    owner_id: &str,
    name: &str,
    color: Option<&str>,
) -> Result<CategoryAddResult> {
    let (category, created) = store.add_category(owner_id, name, color)?;
    Ok(CategoryAddResult { category, created })
}

#[derive(Serialize)]
pub struct ConfigShowResult {
    #[serde(flatten)]
    pub config: ResolvedConfig,
    pub system_config: Option<PathBuf>,
    pub data_config: PathBuf,
}

impl Output for ConfigShowResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let c = &self.config;
        let system = self
            .system_config
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string());
        [
            format!("owner            = {} ({})", c.owner.value, c.owner.source),
            format!(
                "output-format    = {} ({})",
                c.output_format.value, c.output_format.source
            ),
            format!(
                "default-points   = {} ({})",
                c.default_points.value, c.default_points.source
            ),
            format!(
                "default-category = {} ({})",
                c.default_category.value, c.default_category.source
            ),
            format!("System config: {}", system),
            format!("Data config:   {}", self.data_config.display()),
        ]
        .join("\n")
    }
}

pub fn config_show(ctx: &Context) -> Result<ConfigShowResult> {
    Ok(ConfigShowResult {
        config: ctx.config.clone(),
        system_config: system_config_path(),
        data_config: data_config_path(&ctx.data_dir),
    })
}

#[derive(Serialize)]
pub struct ConfigSetResult {
    pub key: String,
    pub value: String,
    pub path: PathBuf,
}

impl Output for ConfigSetResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!("Set {} = {} in {}", self.key, self.value, self.path.display())
    }
}

/// Set one key in the data directory's config.kdl, keeping the other keys.
pub fn config_set(data_dir: &Path, key: &str, value: &str) -> Result<ConfigSetResult> {
    let path = data_config_path(data_dir);
    let mut config = read_config(&path)?;
    config.set(key, value).map_err(Error::Config)?;
    write_config(&path, &config)?;
    Ok(ConfigSetResult {
        key: key.to_string(),
        value: value.trim().to_string(),
        path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::context;
    use crate::config::{ConfigOverrides, ValueSource, resolve_config};
    use crate::test_utils::TestEnv;

    #[test]
    fn test_init_twice_reports_existing() {
        let env = TestEnv::new();
        let first = init(env.data_path()).unwrap();
        assert!(first.initialized);
        assert_eq!(first.schema_version, Storage::latest_schema_version());

        let second = init(env.data_path()).unwrap();
        assert!(!second.initialized);
    }

    #[test]
    fn test_info_before_init() {
        let env = TestEnv::new();
        let ctx = Context::new(
            env.data_path().join("fresh"),
            ResolvedConfig::default(),
            crate::commands::test_support::day("2024-01-03"),
        );
        let info = info(&ctx).unwrap();
        assert!(!info.initialized);
        assert!(info.schema_version.is_none());
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_category_add_and_list() {
        let env = TestEnv::new();
        let ctx = context(&env);
        let mut store = ctx.open_storage().unwrap();

        let added = category_add(&mut store, "local", "Fitness", Some("#F59E0B")).unwrap();
        assert!(added.created);
        let again = category_add(&mut store, "local", "FITNESS", None).unwrap();
        assert!(!again.created);
        assert_eq!(again.category.name, "Fitness");

        let list = category_list(&store, "local").unwrap();
        assert_eq!(list.count, 1);
    }

    #[test]
    fn test_config_set_persists_and_resolves() {
        let env = TestEnv::new();
        config_set(env.data_path(), "default-category", "Health").unwrap();
        config_set(env.data_path(), "default-points", "3").unwrap();

        let resolved = resolve_config(env.data_path(), &ConfigOverrides::default()).unwrap();
        assert_eq!(resolved.default_category(), "Health");
        assert_eq!(resolved.default_points().get(), 3);
        assert_eq!(resolved.default_category.source, ValueSource::DataDir);
    }

    #[test]
    fn test_config_set_rejects_bad_values() {
        let env = TestEnv::new();
        assert!(matches!(
            config_set(env.data_path(), "default-points", "0"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            config_set(env.data_path(), "colour", "blue"),
            Err(Error::Config(_))
        ));
        assert!(!data_config_path(env.data_path()).exists());
    }
}
