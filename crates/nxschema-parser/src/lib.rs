//! # NxSchema Parser
//!
//! Builds a cross-referenced [`Catalog`] from an XML Schema document that
//! describes a NeXus-style definition language.
//!
//! ## Usage
//!
//! ```
//! # use nxschema_parser::{parse, BuildConfig, ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"
//!         <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:nx="urn:nx">
//!           <xs:complexType name="definitionType">
//!             <xs:attribute name="name" use="required"/>
//!           </xs:complexType>
//!           <xs:element name="definition" type="nx:definitionType"/>
//!         </xs:schema>
//!     "#;
//!
//!     let catalog = parse(source, BuildConfig::default())?;
//!     assert_eq!(catalog.definition_root().children().len(), 1);
//!     Ok(())
//! }
//! ```

mod assemble;
mod context;
mod document;
pub mod error;
mod flatten;
mod nodes;
mod passes;
mod root;
mod span;
mod tag;

pub use error::ParseError;
pub use span::Span;

use log::info;

use nxschema_core::{Catalog, FlattenMode};

use document::SchemaDocument;

/// Options for one catalog build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildConfig {
    /// How named simple types fold their bases.
    pub flatten: FlattenMode,
}

impl BuildConfig {
    pub fn new(flatten: FlattenMode) -> Self {
        Self { flatten }
    }
}

/// Parse a schema document into a catalog.
///
/// This is the main entry point. The build runs a fixed sequence of passes:
///
/// 1. **Load** - Parse the XML and check for an `xs:schema` root
/// 2. **SimpleType** - Catalog named simple types, then flatten their bases
/// 3. **Attribute**, **AttributeGroup**, **Element**, **Group** - Catalog the
///    constructs complex types are assembled from
/// 4. **ComplexType** - Assemble named complex types, bases first
/// 5. **Definition root** - Bind the top-level element to its type and run
///    one substitution pass
///
/// # Errors
///
/// Returns a [`ParseError`] carrying the diagnostic of the first failure.
/// No partial catalog is ever returned.
///
/// # Example
///
/// ```
/// # use nxschema_parser::{parse, BuildConfig};
/// let err = parse("<not-a-schema/>", BuildConfig::default()).unwrap_err();
/// assert_eq!(err.diagnostics()[0].code().map(|code| code.as_str()), Some("E002"));
/// ```
pub fn parse(source: &str, config: BuildConfig) -> Result<Catalog, ParseError> {
    let doc = SchemaDocument::parse(source)?;
    let catalog = passes::build_catalog(&doc, config)?;

    info!(
        nodes = catalog.len(),
        names = catalog.names().count(),
        flatten:? = config.flatten;
        "Catalog built"
    );
    Ok(catalog)
}
