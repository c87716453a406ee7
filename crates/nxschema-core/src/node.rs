//! Parsed schema constructs.
//!
//! Each construct kind has its own value type capturing the facets declared on
//! it. Children lists never own other constructs: they hold [`NodeId`]s into
//! the catalog arena, so two constructs referring to the same declaration
//! observe the same identity.

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::{kind::ConstructKind, name::Name};

/// Stable identifier of a node inside one catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Creates an identifier from an arena index.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// The arena index of this node.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Structural key of a construct: its kind plus where it starts in the source.
///
/// Two distinct constructs of the same kind in one document never share a
/// key, because no two elements start at the same byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeKey {
    kind: ConstructKind,
    offset: usize,
    line: u32,
}

impl NodeKey {
    /// Creates a key for a construct of `kind` starting at byte `offset` on
    /// 1-based `line`.
    pub fn new(kind: ConstructKind, offset: usize, line: u32) -> Self {
        Self { kind, offset, line }
    }

    pub fn kind(&self) -> ConstructKind {
        self.kind
    }

    /// Byte offset of the construct's start tag.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// 1-based source line of the construct's start tag.
    pub fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (line {})", self.kind, self.line)
    }
}

/// Error returned when an occurrence bound is neither an integer nor
/// `unbounded`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid occurrence bound `{0}`, expected a non-negative integer or `unbounded`")]
pub struct InvalidOccurs(String);

/// A `minOccurs`/`maxOccurs` bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurs {
    Bounded(u32),
    Unbounded,
}

impl FromStr for Occurs {
    type Err = InvalidOccurs;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed == "unbounded" {
            return Ok(Occurs::Unbounded);
        }
        trimmed
            .parse()
            .map(Occurs::Bounded)
            .map_err(|_| InvalidOccurs(s.to_string()))
    }
}

impl fmt::Display for Occurs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Occurs::Bounded(n) => write!(f, "{n}"),
            Occurs::Unbounded => f.write_str("unbounded"),
        }
    }
}

/// Capability shared by every parsed construct.
///
/// At most one of [`type_name`](Self::type_name), [`base_name`](Self::base_name)
/// and [`ref_name`](Self::ref_name) is meaningful for a given kind; together
/// they are the pointer that substitution follows.
pub trait SchemaNode {
    fn kind(&self) -> ConstructKind;

    /// The declared name, if the construct is named.
    fn name(&self) -> Option<Name>;

    fn type_name(&self) -> Option<Name> {
        None
    }

    fn base_name(&self) -> Option<Name> {
        None
    }

    fn ref_name(&self) -> Option<Name> {
        None
    }

    /// The children list, or `None` for kinds that cannot hold children.
    fn children(&self) -> Option<&[NodeId]> {
        None
    }

    /// The first available of type, base and ref name, in that order.
    fn reference_name(&self) -> Option<Name> {
        self.type_name()
            .or_else(|| self.base_name())
            .or_else(|| self.ref_name())
    }
}

/// A named top-level `xs:simpleType`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleType {
    name: Name,
    base: Option<Name>,
    patterns: Vec<String>,
    enumerations: Vec<String>,
    max_length: Option<u32>,
    union_members: Vec<Name>,
}

impl SimpleType {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            base: None,
            patterns: Vec::new(),
            enumerations: Vec::new(),
            max_length: None,
            union_members: Vec::new(),
        }
    }

    pub fn name(&self) -> Name {
        self.name
    }

    /// The restriction base, prefix stripped.
    pub fn base(&self) -> Option<Name> {
        self.base
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn enumerations(&self) -> &[String] {
        &self.enumerations
    }

    pub fn max_length(&self) -> Option<u32> {
        self.max_length
    }

    /// Member type names of an `xs:union` declaration.
    pub fn union_members(&self) -> &[Name] {
        &self.union_members
    }

    pub fn set_base(&mut self, base: Option<Name>) {
        self.base = base;
    }

    pub fn push_pattern(&mut self, pattern: impl Into<String>) {
        self.patterns.push(pattern.into());
    }

    pub fn push_enumeration(&mut self, value: impl Into<String>) {
        self.enumerations.push(value.into());
    }

    pub fn set_max_length(&mut self, max_length: Option<u32>) {
        self.max_length = max_length;
    }

    pub fn set_union_members(&mut self, members: Vec<Name>) {
        self.union_members = members;
    }

    /// Folds one level of `base`'s facets into this type.
    ///
    /// `max_length` is overwritten, patterns are appended and this type's own
    /// base is rewritten to the base's base.
    pub fn fold_base(&mut self, base: &SimpleType) {
        self.max_length = base.max_length;
        self.patterns.extend(base.patterns.iter().cloned());
        self.base = base.base;
    }
}

impl SchemaNode for SimpleType {
    fn kind(&self) -> ConstructKind {
        ConstructKind::SimpleType
    }

    fn name(&self) -> Option<Name> {
        Some(self.name)
    }

    fn base_name(&self) -> Option<Name> {
        self.base
    }
}

/// Default value type of an attribute declared without `type`.
pub const DEFAULT_ATTRIBUTE_TYPE: &str = "NX_CHAR";

/// An `xs:attribute` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    name: Option<Name>,
    type_name: Name,
    required: bool,
    default_value: Option<String>,
    patterns: Vec<String>,
    enumerations: Vec<String>,
}

impl Attribute {
    pub fn new(name: Option<Name>, type_name: Name) -> Self {
        Self {
            name,
            type_name,
            required: false,
            default_value: None,
            patterns: Vec::new(),
            enumerations: Vec::new(),
        }
    }

    pub fn name(&self) -> Option<Name> {
        self.name
    }

    pub fn type_name(&self) -> Name {
        self.type_name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn enumerations(&self) -> &[String] {
        &self.enumerations
    }

    pub fn set_required(&mut self, required: bool) {
        self.required = required;
    }

    pub fn set_default_value(&mut self, value: Option<String>) {
        self.default_value = value;
    }

    pub fn push_pattern(&mut self, pattern: impl Into<String>) {
        self.patterns.push(pattern.into());
    }

    pub fn push_enumeration(&mut self, value: impl Into<String>) {
        self.enumerations.push(value.into());
    }
}

impl SchemaNode for Attribute {
    fn kind(&self) -> ConstructKind {
        ConstructKind::Attribute
    }

    fn name(&self) -> Option<Name> {
        self.name
    }

    fn type_name(&self) -> Option<Name> {
        Some(self.type_name)
    }
}

/// A named, reusable bundle of attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeGroup {
    name: Name,
    children: Vec<NodeId>,
}

impl AttributeGroup {
    pub fn new(name: Name, children: Vec<NodeId>) -> Self {
        Self { name, children }
    }

    pub fn name(&self) -> Name {
        self.name
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

impl SchemaNode for AttributeGroup {
    fn kind(&self) -> ConstructKind {
        ConstructKind::AttributeGroup
    }

    fn name(&self) -> Option<Name> {
        Some(self.name)
    }

    fn children(&self) -> Option<&[NodeId]> {
        Some(&self.children)
    }
}

/// An `xs:element` declaration.
///
/// Its children list is empty after parsing and is only filled by
/// substitution.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: Option<Name>,
    type_name: Option<Name>,
    min_occurs: Option<Occurs>,
    max_occurs: Option<Occurs>,
    children: Vec<NodeId>,
}

impl Element {
    pub fn new(name: Option<Name>, type_name: Option<Name>) -> Self {
        Self {
            name,
            type_name,
            min_occurs: None,
            max_occurs: None,
            children: Vec::new(),
        }
    }

    /// Sets the occurrence bounds.
    pub fn with_occurs(mut self, min: Option<Occurs>, max: Option<Occurs>) -> Self {
        self.min_occurs = min;
        self.max_occurs = max;
        self
    }

    pub fn name(&self) -> Option<Name> {
        self.name
    }

    pub fn type_name(&self) -> Option<Name> {
        self.type_name
    }

    pub fn min_occurs(&self) -> Option<Occurs> {
        self.min_occurs
    }

    pub fn max_occurs(&self) -> Option<Occurs> {
        self.max_occurs
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn extend_children(&mut self, children: &[NodeId]) {
        self.children.extend_from_slice(children);
    }
}

impl SchemaNode for Element {
    fn kind(&self) -> ConstructKind {
        ConstructKind::Element
    }

    fn name(&self) -> Option<Name> {
        self.name
    }

    fn type_name(&self) -> Option<Name> {
        self.type_name
    }

    fn children(&self) -> Option<&[NodeId]> {
        Some(&self.children)
    }
}

/// An `xs:group`: either a named model group or a reference to one.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    name: Option<Name>,
    ref_name: Option<Name>,
    min_occurs: Option<Occurs>,
    max_occurs: Option<Occurs>,
    children: Vec<NodeId>,
}

impl Group {
    pub fn new(name: Option<Name>, ref_name: Option<Name>) -> Self {
        Self {
            name,
            ref_name,
            min_occurs: None,
            max_occurs: None,
            children: Vec::new(),
        }
    }

    /// Sets the occurrence bounds.
    pub fn with_occurs(mut self, min: Option<Occurs>, max: Option<Occurs>) -> Self {
        self.min_occurs = min;
        self.max_occurs = max;
        self
    }

    pub fn name(&self) -> Option<Name> {
        self.name
    }

    pub fn ref_name(&self) -> Option<Name> {
        self.ref_name
    }

    pub fn min_occurs(&self) -> Option<Occurs> {
        self.min_occurs
    }

    pub fn max_occurs(&self) -> Option<Occurs> {
        self.max_occurs
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn extend_children(&mut self, children: &[NodeId]) {
        self.children.extend_from_slice(children);
    }
}

impl SchemaNode for Group {
    fn kind(&self) -> ConstructKind {
        ConstructKind::Group
    }

    fn name(&self) -> Option<Name> {
        self.name
    }

    fn ref_name(&self) -> Option<Name> {
        self.ref_name
    }

    fn children(&self) -> Option<&[NodeId]> {
        Some(&self.children)
    }
}

/// A named top-level `xs:complexType` with its assembled children.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexType {
    name: Name,
    extends: Option<Name>,
    children: Vec<NodeId>,
}

impl ComplexType {
    pub fn new(name: Name, extends: Option<Name>, children: Vec<NodeId>) -> Self {
        Self {
            name,
            extends,
            children,
        }
    }

    pub fn name(&self) -> Name {
        self.name
    }

    /// The base type named by a `complexContent/extension`, if any.
    ///
    /// This is informational: the base's children are already spliced into
    /// [`children`](Self::children), so it is not exposed as a substitution
    /// pointer.
    pub fn extends(&self) -> Option<Name> {
        self.extends
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

impl SchemaNode for ComplexType {
    fn kind(&self) -> ConstructKind {
        ConstructKind::ComplexType
    }

    fn name(&self) -> Option<Name> {
        Some(self.name)
    }

    fn children(&self) -> Option<&[NodeId]> {
        Some(&self.children)
    }
}

/// Any cataloged construct.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    SimpleType(SimpleType),
    Attribute(Attribute),
    AttributeGroup(AttributeGroup),
    Element(Element),
    Group(Group),
    ComplexType(ComplexType),
}

impl Node {
    fn as_schema_node(&self) -> &dyn SchemaNode {
        match self {
            Node::SimpleType(node) => node,
            Node::Attribute(node) => node,
            Node::AttributeGroup(node) => node,
            Node::Element(node) => node,
            Node::Group(node) => node,
            Node::ComplexType(node) => node,
        }
    }

    pub fn as_simple_type(&self) -> Option<&SimpleType> {
        match self {
            Node::SimpleType(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_attribute(&self) -> Option<&Attribute> {
        match self {
            Node::Attribute(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_attribute_group(&self) -> Option<&AttributeGroup> {
        match self {
            Node::AttributeGroup(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Node::Group(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_complex_type(&self) -> Option<&ComplexType> {
        match self {
            Node::ComplexType(node) => Some(node),
            _ => None,
        }
    }

    /// Returns a copy of this node with `extra` appended to its children.
    ///
    /// Only elements and groups accept substituted children; `None` is
    /// returned for every other kind.
    pub fn with_children_appended(&self, extra: &[NodeId]) -> Option<Node> {
        match self {
            Node::Element(element) => {
                let mut element = element.clone();
                element.extend_children(extra);
                Some(Node::Element(element))
            }
            Node::Group(group) => {
                let mut group = group.clone();
                group.extend_children(extra);
                Some(Node::Group(group))
            }
            _ => None,
        }
    }
}

impl SchemaNode for Node {
    fn kind(&self) -> ConstructKind {
        self.as_schema_node().kind()
    }

    fn name(&self) -> Option<Name> {
        self.as_schema_node().name()
    }

    fn type_name(&self) -> Option<Name> {
        self.as_schema_node().type_name()
    }

    fn base_name(&self) -> Option<Name> {
        self.as_schema_node().base_name()
    }

    fn ref_name(&self) -> Option<Name> {
        self.as_schema_node().ref_name()
    }

    fn children(&self) -> Option<&[NodeId]> {
        self.as_schema_node().children()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::SimpleType(st) => {
                write!(f, "SimpleType(name={}", st.name)?;
                if let Some(base) = st.base {
                    write!(f, ", base={base}")?;
                }
                if let Some(max_length) = st.max_length {
                    write!(f, ", maxLength={max_length}")?;
                }
                write!(f, ", patterns={:?})", st.patterns)
            }
            Node::Attribute(attr) => {
                write!(f, "Attribute(name={}", display_opt(attr.name))?;
                write!(f, ", type={}, required={}", attr.type_name, attr.required)?;
                if let Some(default) = &attr.default_value {
                    write!(f, ", default={default:?}")?;
                }
                write!(f, ", patterns={:?})", attr.patterns)
            }
            Node::AttributeGroup(group) => write!(
                f,
                "AttributeGroup(name={}, children={})",
                group.name,
                group.children.len()
            ),
            Node::Element(element) => write!(
                f,
                "Element(name={}, type={}, minOccurs={}, maxOccurs={}, children={})",
                display_opt(element.name),
                display_opt(element.type_name),
                display_opt(element.min_occurs),
                display_opt(element.max_occurs),
                element.children.len()
            ),
            Node::Group(group) => write!(
                f,
                "Group(name={}, ref={}, minOccurs={}, maxOccurs={})",
                display_opt(group.name),
                display_opt(group.ref_name),
                display_opt(group.min_occurs),
                display_opt(group.max_occurs)
            ),
            Node::ComplexType(ct) => {
                write!(f, "ComplexType(name={}", ct.name)?;
                if let Some(base) = ct.extends {
                    write!(f, ", extends={base}")?;
                }
                write!(f, ", children={})", ct.children.len())
            }
        }
    }
}

fn display_opt<T: fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "None".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occurs_from_str() {
        assert_eq!("0".parse::<Occurs>(), Ok(Occurs::Bounded(0)));
        assert_eq!(" 3 ".parse::<Occurs>(), Ok(Occurs::Bounded(3)));
        assert_eq!("unbounded".parse::<Occurs>(), Ok(Occurs::Unbounded));
        assert!("many".parse::<Occurs>().is_err());
        assert!("-1".parse::<Occurs>().is_err());
    }

    #[test]
    fn test_occurs_display() {
        assert_eq!(Occurs::Bounded(2).to_string(), "2");
        assert_eq!(Occurs::Unbounded.to_string(), "unbounded");
    }

    #[test]
    fn test_reference_name_per_kind() {
        let attr = Node::Attribute(Attribute::new(Some(Name::new("flag")), Name::new("NX_BOOLEAN")));
        assert_eq!(attr.reference_name(), Some(Name::new("NX_BOOLEAN")));
        assert!(attr.children().is_none());

        let group = Node::Group(Group::new(None, Some(Name::new("groupGroup"))));
        assert_eq!(group.reference_name(), Some(Name::new("groupGroup")));

        let mut simple = SimpleType::new(Name::new("NX_POSINT"));
        simple.set_base(Some(Name::new("NX_INT")));
        assert_eq!(Node::SimpleType(simple).reference_name(), Some(Name::new("NX_INT")));

        let element = Node::Element(Element::new(Some(Name::new("doc")), None));
        assert_eq!(element.reference_name(), None);

        let complex = Node::ComplexType(ComplexType::new(
            Name::new("fieldType"),
            Some(Name::new("basicComponent")),
            Vec::new(),
        ));
        assert_eq!(complex.reference_name(), None);
    }

    #[test]
    fn test_fold_base() {
        let mut base = SimpleType::new(Name::new("B"));
        base.set_base(Some(Name::new("string")));
        base.set_max_length(Some(8));
        base.push_pattern("p1");

        let mut derived = SimpleType::new(Name::new("A"));
        derived.set_base(Some(Name::new("B")));
        derived.push_pattern("p0");
        derived.fold_base(&base);

        assert_eq!(derived.max_length(), Some(8));
        assert_eq!(derived.patterns(), ["p0", "p1"]);
        assert_eq!(derived.base(), base.base());
    }

    #[test]
    fn test_with_children_appended() {
        let element = Node::Element(Element::new(Some(Name::new("entry")), None));
        let extended = element
            .with_children_appended(&[NodeId::new(3), NodeId::new(4)])
            .unwrap();

        assert_eq!(extended.children(), Some(&[NodeId::new(3), NodeId::new(4)][..]));
        assert_eq!(element.children(), Some(&[][..]));

        let attr = Node::Attribute(Attribute::new(None, Name::new(DEFAULT_ATTRIBUTE_TYPE)));
        assert!(attr.with_children_appended(&[NodeId::new(1)]).is_none());
    }

    #[test]
    fn test_node_key_display() {
        let key = NodeKey::new(ConstructKind::Attribute, 120, 7);
        assert_eq!(key.to_string(), "xs:attribute (line 7)");
        assert_eq!(key.line(), 7);
        assert_eq!(key.offset(), 120);
    }
}
