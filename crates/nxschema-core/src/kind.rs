//! The fixed vocabulary of schema constructs a catalog understands.

use std::fmt;

/// One of the six construct kinds the catalog stores.
///
/// The declaration order of the variants is the order in which catalog
/// passes run: every pass may look up constructs produced by earlier passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConstructKind {
    SimpleType,
    Attribute,
    AttributeGroup,
    Element,
    Group,
    ComplexType,
}

impl ConstructKind {
    /// All kinds in pass order.
    pub const ALL: [ConstructKind; 6] = [
        ConstructKind::SimpleType,
        ConstructKind::Attribute,
        ConstructKind::AttributeGroup,
        ConstructKind::Element,
        ConstructKind::Group,
        ConstructKind::ComplexType,
    ];

    /// The XML Schema local tag name of this kind (e.g. `"attributeGroup"`).
    pub fn tag_name(&self) -> &'static str {
        match self {
            ConstructKind::SimpleType => "simpleType",
            ConstructKind::Attribute => "attribute",
            ConstructKind::AttributeGroup => "attributeGroup",
            ConstructKind::Element => "element",
            ConstructKind::Group => "group",
            ConstructKind::ComplexType => "complexType",
        }
    }
}

impl fmt::Display for ConstructKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "xs:{}", self.tag_name())
    }
}
