//! Configuration types for catalog building.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from an
//! external TOML file; every section and field has a default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`CatalogConfig`] - How the catalog is built.
//! - [`SourceConfig`] - Where versioned schema snapshots are found locally.
//!
//! # Example
//!
//! ```
//! # use nxschema::config::AppConfig;
//! # use nxschema_core::FlattenMode;
//! let config = AppConfig::default();
//! assert_eq!(config.catalog().flatten(), FlattenMode::SingleHop);
//! assert_eq!(config.source().document(), "nxdl.xsd");
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use nxschema_core::FlattenMode;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Catalog build section.
    #[serde(default)]
    catalog: CatalogConfig,

    /// Schema source section.
    #[serde(default)]
    source: SourceConfig,
}

impl AppConfig {
    pub fn new(catalog: CatalogConfig, source: SourceConfig) -> Self {
        Self { catalog, source }
    }

    /// Returns the catalog configuration.
    pub fn catalog(&self) -> &CatalogConfig {
        &self.catalog
    }

    /// Returns the schema source configuration.
    pub fn source(&self) -> &SourceConfig {
        &self.source
    }
}

/// Catalog build options.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
    /// [`FlattenMode`] for named simple types.
    #[serde(default)]
    flatten: FlattenMode,
}

impl CatalogConfig {
    pub fn new(flatten: FlattenMode) -> Self {
        Self { flatten }
    }

    pub fn flatten(&self) -> FlattenMode {
        self.flatten
    }
}

/// Local lookup of versioned schema snapshots.
///
/// A snapshot for version `v` lives at `<cache_dir>/<v>/<document>`.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Directory holding one subdirectory per version reference.
    #[serde(default)]
    cache_dir: Option<PathBuf>,

    /// File name of the schema document inside a snapshot.
    #[serde(default = "default_document")]
    document: String,
}

fn default_document() -> String {
    "nxdl.xsd".to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            document: default_document(),
        }
    }
}

impl SourceConfig {
    pub fn new(cache_dir: Option<PathBuf>, document: impl Into<String>) -> Self {
        Self {
            cache_dir,
            document: document.into(),
        }
    }

    /// Returns the snapshot cache directory, if one is configured.
    pub fn cache_dir(&self) -> Option<&Path> {
        self.cache_dir.as_deref()
    }

    /// Returns the schema document file name.
    pub fn document(&self) -> &str {
        &self.document
    }
}
