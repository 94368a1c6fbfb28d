//! Configuration module for the metadata search index.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file
//! - Environment variable overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `DATALINK_` and use double
//! underscores to separate nested levels:
//! - `DATALINK_EMBEDDING__MODEL_DIR=/var/models` sets `embedding.model_dir`
//! - `DATALINK_INDEX__LSH_TABLES=16` sets `index.lsh_tables`
//! - `DATALINK_DEBUG=true` sets `debug`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::vector::LshParams;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Global debug mode
    #[serde(default = "default_false")]
    pub debug: bool,

    /// Embedding source settings
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Similarity index settings
    #[serde(default)]
    pub index: IndexConfig,
}

/// Settings for the embedding model that backs vector lookups.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EmbeddingConfig {
    /// Model to use for embeddings
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Directory holding (or caching) the embedding model files.
    ///
    /// Required before any embedding work can start; there is no usable
    /// default because model files are large and live outside the
    /// workspace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_dir: Option<PathBuf>,
}

/// Which similarity backend an index is built on.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// Approximate cosine similarity via locality-sensitive hashing.
    Cosine,
    /// Exact inner-product ranking over a flat vector table.
    InnerProduct,
}

/// Construction-time parameters for the similarity index.
///
/// Passed explicitly to the builder; the hashing parameters are fixed
/// for the whole lifetime of an index built from them.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct IndexConfig {
    /// Backend selected at construction
    #[serde(default = "default_backend")]
    pub backend: BackendKind,

    /// Number of LSH hash tables (cosine backend only)
    #[serde(default = "default_lsh_tables")]
    pub lsh_tables: usize,

    /// Hyperplane hashes per table, at most 64 (cosine backend only)
    #[serde(default = "default_lsh_hashes_per_table")]
    pub lsh_hashes_per_table: usize,

    /// Seed for hyperplane generation; two builds with the same seed and
    /// data produce identical tables
    #[serde(default = "default_lsh_seed")]
    pub lsh_seed: u64,
}

impl IndexConfig {
    /// The LSH parameter block handed to the cosine backend.
    #[must_use]
    pub fn lsh_params(&self) -> LshParams {
        LshParams {
            tables: self.lsh_tables,
            hashes_per_table: self.lsh_hashes_per_table,
            seed: self.lsh_seed,
        }
    }
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_false() -> bool {
    false
}
fn default_embedding_model() -> String {
    "AllMiniLML6V2".to_string()
}
fn default_backend() -> BackendKind {
    BackendKind::Cosine
}
fn default_lsh_tables() -> usize {
    8
}
fn default_lsh_hashes_per_table() -> usize {
    16
}
fn default_lsh_seed() -> u64 {
    42
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            debug: false,
            embedding: EmbeddingConfig::default(),
            index: IndexConfig::default(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            model_dir: None,
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            lsh_tables: default_lsh_tables(),
            lsh_hashes_per_table: default_lsh_hashes_per_table(),
            lsh_seed: default_lsh_seed(),
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(".datalink/settings.toml"));

        Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(Settings::default()))
            // Layer in config file if it exists
            .merge(Toml::file(config_path))
            // Layer in environment variables with DATALINK_ prefix
            // Use double underscore (__) to separate nested levels
            .merge(Env::prefixed("DATALINK_").map(|key| {
                key.as_str()
                    .to_lowercase()
                    .replace("__", ".") // Double underscore becomes dot
                    .into()
            }))
            .extract()
            .map_err(Box::new)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Result<Self, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("DATALINK_").map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
            .extract()
            .map_err(Box::new)
    }

    /// Find the workspace config by looking for a .datalink directory,
    /// searching from the current directory up to the filesystem root
    fn find_workspace_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        for ancestor in current.ancestors() {
            let config_dir = ancestor.join(".datalink");
            if config_dir.exists() && config_dir.is_dir() {
                return Some(config_dir.join("settings.toml"));
            }
        }

        None
    }

    /// Save current configuration to file
    pub fn save(
        &self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let parent = path.as_ref().parent().ok_or("Invalid path")?;
        std::fs::create_dir_all(parent)?;

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Create a default settings file with helpful comments
    pub fn init_config_file(force: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_path = PathBuf::from(".datalink/settings.toml");

        if !force && config_path.exists() {
            return Err("Configuration file already exists. Use force to overwrite".into());
        }

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template = r#"# Datalink Configuration File

# Version of the configuration schema
version = 1

# Global debug mode
debug = false

[embedding]
# Model to use for embeddings
model = "AllMiniLML6V2"

# Directory holding (or caching) the embedding model files.
# REQUIRED before building an index; uncomment and point at a real path.
# model_dir = "/var/lib/datalink/models"

[index]
# Backend selected at construction: "cosine" or "inner-product"
backend = "cosine"

# Number of LSH hash tables (cosine backend only)
lsh_tables = 8

# Hyperplane hashes per table, at most 64 (cosine backend only)
lsh_hashes_per_table = 16

# Seed for hyperplane generation
lsh_seed = 42
"#;

        std::fs::write(&config_path, template)?;
        Ok(config_path)
    }
}
