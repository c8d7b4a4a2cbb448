//! Configuration loading for expanse.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. Project config (`.expanse/config.toml`)
//! 3. User config (`~/.expanse/config.toml`)
//! 4. Defaults (lowest priority)
//!
//! All configuration is optional. The defaults search the production
//! listing fields with the built-in vocabulary.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::core::fields::{FieldSet, DEFAULT_FIELDS};
use crate::error::{ExpanseError, Result};
use crate::util::read_to_string_limited;

/// Main configuration struct for expanse.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Which fields the compiler searches.
    pub search: SearchConfig,
    /// Which vocabulary the compiler expands with.
    pub vocabulary: VocabularyConfig,
    /// Catalog search behavior.
    pub catalog: CatalogConfig,
}

/// Searchable field configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    /// Ordered field identifiers. Dotted names address nested values.
    pub fields: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fields: DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl SearchConfig {
    /// A field list is valid when it names at least one non-blank field.
    pub fn is_valid_fields(fields: &[String]) -> bool {
        fields.iter().any(|f| !f.trim().is_empty())
    }
}

/// Vocabulary configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VocabularyConfig {
    /// Start from the built-in vocabulary.
    pub include_defaults: bool,
    /// Optional TOML file whose entries replace or extend the defaults.
    pub path: Option<PathBuf>,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            include_defaults: true,
            path: None,
        }
    }
}

/// Catalog search configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    /// Result limit when the caller does not give one.
    pub max_results: usize,
    /// Default catalog file for `expanse search`.
    pub path: Option<PathBuf>,
}

/// Smallest accepted `max_results`.
pub const MIN_MAX_RESULTS: usize = 1;

impl CatalogConfig {
    /// Check if max_results is valid (must be >= 1).
    pub fn is_valid_max_results(value: usize) -> bool {
        value >= MIN_MAX_RESULTS
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            max_results: 20,
            path: None,
        }
    }
}

impl Config {
    /// Load configuration with full precedence chain.
    pub fn load() -> Self {
        match env::current_dir() {
            Ok(cwd) => Self::load_from_cwd(&cwd),
            Err(_) => {
                let mut config = Config::default();
                if let Some(user_config) = Self::load_user_config() {
                    config = config.merge(user_config);
                }
                config.apply_env_overrides();
                config
            }
        }
    }

    /// Load configuration with a specific working directory.
    pub fn load_from_cwd(cwd: &Path) -> Self {
        let mut config = Config::default();

        if let Some(user_config) = Self::load_user_config() {
            config = config.merge(user_config);
        }

        if let Some(project_config) = Self::load_project_config(cwd) {
            config = config.merge(project_config);
        }

        config.apply_env_overrides();

        config
    }

    /// Load user config from `~/.expanse/config.toml`.
    fn load_user_config() -> Option<Config> {
        let path = expanse_home()?.join("config.toml");
        Self::load_optional(&path)
    }

    /// Load project config from `.expanse/config.toml` in the given directory.
    fn load_project_config(cwd: &Path) -> Option<Config> {
        Self::load_optional(&project_config_path(cwd))
    }

    /// A missing file is silent; an unreadable or invalid one is logged and
    /// skipped so search keeps working.
    fn load_optional(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        match Self::load_from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring config file");
                None
            }
        }
    }

    /// Load config from a specific file path.
    ///
    /// Relative vocabulary and catalog paths are resolved against the
    /// directory containing the file.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = read_to_string_limited(path)?;
        let mut config: Config =
            toml::from_str(&content).map_err(|e| ExpanseError::config(e.to_string()))?;

        if !SearchConfig::is_valid_fields(&config.search.fields) {
            return Err(ExpanseError::config(format!(
                "{}: search.fields must name at least one field",
                path.display()
            )));
        }
        if !CatalogConfig::is_valid_max_results(config.catalog.max_results) {
            return Err(ExpanseError::config(format!(
                "{}: catalog.max_results must be >= {}",
                path.display(),
                MIN_MAX_RESULTS
            )));
        }

        if let Some(base) = path.parent() {
            config.vocabulary.path = config.vocabulary.path.map(|p| base.join(p));
            config.catalog.path = config.catalog.path.map(|p| base.join(p));
        }

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // EXPANSE_FIELDS
        if let Ok(val) = env::var("EXPANSE_FIELDS") {
            let fields = FieldSet::parse_list(&val);
            if fields.is_empty() {
                eprintln!(
                    "Warning: Invalid EXPANSE_FIELDS value '{}'. \
                    Expected a comma-separated field list. Using '{}'.",
                    val,
                    self.search.fields.join(",")
                );
            } else {
                self.search.fields = fields.as_slice().to_vec();
            }
        }

        // EXPANSE_VOCABULARY
        if let Ok(val) = env::var("EXPANSE_VOCABULARY") {
            if val.trim().is_empty() {
                self.vocabulary.path = None;
            } else {
                self.vocabulary.path = Some(PathBuf::from(val));
            }
        }

        // EXPANSE_DEFAULT_VOCABULARY
        if let Ok(val) = env::var("EXPANSE_DEFAULT_VOCABULARY") {
            match val.as_str() {
                "true" | "1" => self.vocabulary.include_defaults = true,
                "false" | "0" => self.vocabulary.include_defaults = false,
                _ => eprintln!(
                    "Warning: Invalid EXPANSE_DEFAULT_VOCABULARY value '{}'. \
                    Expected true, false, 1 or 0. Using '{}'.",
                    val, self.vocabulary.include_defaults
                ),
            }
        }

        // EXPANSE_MAX_RESULTS
        if let Ok(val) = env::var("EXPANSE_MAX_RESULTS") {
            match val.parse::<usize>() {
                Ok(n) if CatalogConfig::is_valid_max_results(n) => self.catalog.max_results = n,
                _ => eprintln!(
                    "Warning: Invalid EXPANSE_MAX_RESULTS value '{}'. \
                    Expected a positive integer. Using '{}'.",
                    val, self.catalog.max_results
                ),
            }
        }
    }

    /// Merge another config into this one, field by field.
    ///
    /// Values in `other` that differ from the defaults win. A layer cannot
    /// reset a lower layer's customization back to the default value.
    fn merge(mut self, other: Config) -> Self {
        let default_search = SearchConfig::default();
        if other.search.fields != default_search.fields {
            self.search.fields = other.search.fields;
        }

        let default_vocabulary = VocabularyConfig::default();
        if other.vocabulary.include_defaults != default_vocabulary.include_defaults {
            self.vocabulary.include_defaults = other.vocabulary.include_defaults;
        }
        if other.vocabulary.path.is_some() {
            self.vocabulary.path = other.vocabulary.path;
        }

        let default_catalog = CatalogConfig::default();
        if other.catalog.max_results != default_catalog.max_results {
            self.catalog.max_results = other.catalog.max_results;
        }
        if other.catalog.path.is_some() {
            self.catalog.path = other.catalog.path;
        }

        self
    }

    /// The configured fields as a [`FieldSet`].
    pub fn field_set(&self) -> FieldSet {
        FieldSet::new(self.search.fields.iter().map(|f| f.trim()).filter(|f| !f.is_empty()))
    }
}

/// Get the expanse home directory.
///
/// Checks `EXPANSE_HOME` first, then falls back to `~/.expanse`. Returns
/// `None` when neither is available.
pub fn expanse_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("EXPANSE_HOME") {
        if home.is_empty() {
            tracing::warn!("EXPANSE_HOME is empty, using default");
        } else {
            return Some(PathBuf::from(home));
        }
    }

    dirs::home_dir().map(|home| home.join(".expanse"))
}

/// Path of the project config file for `cwd`.
pub fn project_config_path(cwd: &Path) -> PathBuf {
    cwd.join(".expanse").join("config.toml")
}
