//! NxSchema - Read a NeXus definition-language XML Schema into a catalog.
//!
//! Parsing and cross-referencing of the NXDL schema document (`nxdl.xsd`).
//! The result is an immutable [`Catalog`] holding every simple type,
//! attribute, attribute group, element, group and complex type of the
//! document, addressable by source position and by declared name, plus the
//! resolved definition root element.

pub mod config;
pub mod report;
pub mod source;

mod error;

pub use nxschema_core::{
    Attribute, AttributeGroup, Catalog, ComplexType, ConstructKind, Element, FlattenMode, Group,
    Name, Node, NodeId, NodeKey, Occurs, SchemaNode, SimpleType,
};

pub use error::NxSchemaError;

use std::{fs, path::Path};

use log::{debug, info, trace};

use nxschema_parser::BuildConfig;

use config::AppConfig;
use source::{LocalCache, SchemaSource};

/// Builder for reading NXDL schema documents into catalogs.
///
/// # Examples
///
/// ```rust,no_run
/// use nxschema::{SchemaBuilder, config::AppConfig};
///
/// let builder = SchemaBuilder::new(AppConfig::default());
///
/// // Build from a file on disk
/// let catalog = builder.load("nxdl.xsd")
///     .expect("Failed to build catalog");
/// println!("{} constructs", catalog.len());
///
/// // Or from a cached snapshot of a released version
/// let catalog = builder.load_version("v3.2");
/// ```
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    config: AppConfig,
}

impl SchemaBuilder {
    /// Create a new schema builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration this builder was created with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Build a catalog from schema source text.
    ///
    /// # Errors
    ///
    /// Returns `NxSchemaError::Parse` when the document is malformed or does
    /// not satisfy the structural and reference rules of the catalog.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nxschema::SchemaBuilder;
    ///
    /// let source = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
    ///   <xs:complexType name="definitionType"/>
    ///   <xs:element name="definition" type="definitionType"/>
    /// </xs:schema>"#;
    ///
    /// let catalog = SchemaBuilder::default().parse(source)
    ///     .expect("Failed to build catalog");
    /// assert_eq!(catalog.definition_children().count(), 0);
    /// ```
    pub fn parse(&self, source: &str) -> Result<Catalog, NxSchemaError> {
        info!("Building schema catalog");

        let build_config = BuildConfig::new(self.config.catalog().flatten());

        let catalog = nxschema_parser::parse(source, build_config)
            .map_err(|err| NxSchemaError::new_parse_error(err, source))?;

        debug!(
            nodes = catalog.len(),
            root = report::describe(catalog.node(catalog.definition_root_id()));
            "Catalog built successfully"
        );
        trace!(children = catalog.definition_children().count(); "Definition root resolved");

        Ok(catalog)
    }

    /// Read a schema document from `path` and build its catalog.
    ///
    /// # Errors
    ///
    /// Returns `NxSchemaError::Io` if the file cannot be read, or any error
    /// of [`SchemaBuilder::parse`].
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Catalog, NxSchemaError> {
        let path = path.as_ref();
        info!(path:? = path; "Reading schema document");
        let source = fs::read_to_string(path)?;
        self.parse(&source)
    }

    /// Build the catalog of a version reference from the local snapshot
    /// cache.
    ///
    /// # Errors
    ///
    /// Returns `NxSchemaError::Config` when no cache directory is configured
    /// and `NxSchemaError::Source` when the version cannot be resolved.
    pub fn load_version(&self, version: &str) -> Result<Catalog, NxSchemaError> {
        let cache = LocalCache::from_config(self.config.source()).ok_or_else(|| {
            NxSchemaError::Config(
                "no snapshot cache directory configured (set `source.cache_dir`)".to_string(),
            )
        })?;
        self.load_from(&cache, version)
    }

    /// Build the catalog of a version reference resolved by `source`.
    ///
    /// # Errors
    ///
    /// Returns `NxSchemaError::Source` when `source` cannot resolve
    /// `version`, or any error of [`SchemaBuilder::load`].
    pub fn load_from(
        &self,
        source: &impl SchemaSource,
        version: &str,
    ) -> Result<Catalog, NxSchemaError> {
        info!(version; "Resolving schema version");
        let path = source.resolve(version)?;
        self.load(path)
    }
}
