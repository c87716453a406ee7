//! Classification of XML Schema elements.
//!
//! Every element of the schema document is classified once into a [`Tag`];
//! the per-kind parsers dispatch on it instead of comparing tag strings.

use std::fmt;

use roxmltree::Node;

use nxschema_core::ConstructKind;

/// Namespace of the XML Schema vocabulary.
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// A recognized XML Schema element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Schema,
    SimpleType,
    Attribute,
    AttributeGroup,
    Element,
    Group,
    ComplexType,
    Annotation,
    Sequence,
    Choice,
    All,
    ComplexContent,
    SimpleContent,
    Extension,
    Restriction,
    Pattern,
    MaxLength,
    Enumeration,
    Union,
    List,
    Any,
    AnyAttribute,
    Unique,
    Key,
    KeyRef,
    Import,
    Include,
    /// An XML Schema element this builder has no handler for.
    Other,
}

impl Tag {
    /// Classifies an element node.
    ///
    /// Returns `None` for non-element nodes (comments, text, processing
    /// instructions). Elements outside the XML Schema namespace classify as
    /// [`Tag::Other`].
    pub fn of(node: Node<'_, '_>) -> Option<Tag> {
        if !node.is_element() {
            return None;
        }
        let tag_name = node.tag_name();
        if tag_name.namespace() != Some(XSD_NAMESPACE) {
            return Some(Tag::Other);
        }
        let tag = match tag_name.name() {
            "schema" => Tag::Schema,
            "simpleType" => Tag::SimpleType,
            "attribute" => Tag::Attribute,
            "attributeGroup" => Tag::AttributeGroup,
            "element" => Tag::Element,
            "group" => Tag::Group,
            "complexType" => Tag::ComplexType,
            "annotation" => Tag::Annotation,
            "sequence" => Tag::Sequence,
            "choice" => Tag::Choice,
            "all" => Tag::All,
            "complexContent" => Tag::ComplexContent,
            "simpleContent" => Tag::SimpleContent,
            "extension" => Tag::Extension,
            "restriction" => Tag::Restriction,
            "pattern" => Tag::Pattern,
            "maxLength" => Tag::MaxLength,
            "enumeration" => Tag::Enumeration,
            "union" => Tag::Union,
            "list" => Tag::List,
            "any" => Tag::Any,
            "anyAttribute" => Tag::AnyAttribute,
            "unique" => Tag::Unique,
            "key" => Tag::Key,
            "keyref" => Tag::KeyRef,
            "import" => Tag::Import,
            "include" => Tag::Include,
            _ => Tag::Other,
        };
        Some(tag)
    }

    /// Whether the tag is an annotation or wildcard that never affects a
    /// catalog.
    pub fn is_ignorable(&self) -> bool {
        matches!(self, Tag::Annotation | Tag::Any | Tag::AnyAttribute)
    }
}

impl From<ConstructKind> for Tag {
    fn from(kind: ConstructKind) -> Self {
        match kind {
            ConstructKind::SimpleType => Tag::SimpleType,
            ConstructKind::Attribute => Tag::Attribute,
            ConstructKind::AttributeGroup => Tag::AttributeGroup,
            ConstructKind::Element => Tag::Element,
            ConstructKind::Group => Tag::Group,
            ConstructKind::ComplexType => Tag::ComplexType,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tag::Schema => "xs:schema",
            Tag::SimpleType => "xs:simpleType",
            Tag::Attribute => "xs:attribute",
            Tag::AttributeGroup => "xs:attributeGroup",
            Tag::Element => "xs:element",
            Tag::Group => "xs:group",
            Tag::ComplexType => "xs:complexType",
            Tag::Annotation => "xs:annotation",
            Tag::Sequence => "xs:sequence",
            Tag::Choice => "xs:choice",
            Tag::All => "xs:all",
            Tag::ComplexContent => "xs:complexContent",
            Tag::SimpleContent => "xs:simpleContent",
            Tag::Extension => "xs:extension",
            Tag::Restriction => "xs:restriction",
            Tag::Pattern => "xs:pattern",
            Tag::MaxLength => "xs:maxLength",
            Tag::Enumeration => "xs:enumeration",
            Tag::Union => "xs:union",
            Tag::List => "xs:list",
            Tag::Any => "xs:any",
            Tag::AnyAttribute => "xs:anyAttribute",
            Tag::Unique => "xs:unique",
            Tag::Key => "xs:key",
            Tag::KeyRef => "xs:keyref",
            Tag::Import => "xs:import",
            Tag::Include => "xs:include",
            Tag::Other => "unknown element",
        };
        f.write_str(name)
    }
}
