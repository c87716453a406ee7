//! Loading the schema document and locating its constructs.
//!
//! [`SchemaDocument`] wraps the parsed XML tree together with the source
//! text, and knows how to turn tree positions into [`NodeKey`]s, line
//! numbers, [`Span`]s and the standard structural diagnostics.

use log::{debug, trace};
use roxmltree::{Document, Node};

use nxschema_core::{ConstructKind, NodeKey};

use crate::{
    error::{Diagnostic, ErrorCode, Result},
    span::Span,
    tag::{Tag, XSD_NAMESPACE},
};

/// A parsed schema document.
pub struct SchemaDocument<'input> {
    source: &'input str,
    doc: Document<'input>,
}

impl<'input> SchemaDocument<'input> {
    /// Parses `source` as XML and checks that its document element is an XML
    /// Schema `schema` element.
    ///
    /// # Errors
    ///
    /// Returns an `E001` diagnostic for malformed XML and `E002` when the
    /// document element is something else.
    pub fn parse(source: &'input str) -> Result<Self> {
        let doc = Document::parse(source).map_err(|err| {
            let pos = err.pos();
            let offset = offset_of(source, pos.row, pos.col);
            Diagnostic::error(format!("malformed schema document: {err}"))
                .with_code(ErrorCode::E001)
                .with_label(Span::new(offset..offset), "parsing stopped here")
        })?;

        let schema = Self { source, doc };
        let root = schema.root();
        if Tag::of(root) != Some(Tag::Schema) {
            return Err(Diagnostic::error(format!(
                "document element `{}` (line {}) is not an XML Schema `schema` element",
                display_tag(root),
                schema.line(root)
            ))
            .with_code(ErrorCode::E002)
            .with_label(schema.span(root), "expected xs:schema")
            .with_help(format!(
                "the document element must be `schema` in the `{XSD_NAMESPACE}` namespace"
            )));
        }

        debug!(bytes = source.len(); "Schema document loaded");
        Ok(schema)
    }

    /// The `xs:schema` document element.
    pub fn root(&self) -> Node<'_, 'input> {
        self.doc.root_element()
    }

    /// Direct children of the schema element classified as `tag`, in
    /// document order.
    pub fn top_level(&self, tag: Tag) -> impl Iterator<Item = Node<'_, 'input>> {
        self.root()
            .children()
            .filter(move |node| Tag::of(*node) == Some(tag))
    }

    /// All elements classified as `tag` at any depth, in document order.
    pub fn descendants(&self, tag: Tag) -> impl Iterator<Item = Node<'_, 'input>> {
        self.root()
            .descendants()
            .filter(move |node| Tag::of(*node) == Some(tag))
    }

    /// 1-based line of the node's start tag.
    pub fn line(&self, node: Node<'_, '_>) -> u32 {
        self.doc.text_pos_at(node.range().start).row
    }

    /// Span of the node's start tag.
    pub fn span(&self, node: Node<'_, '_>) -> Span {
        self.span_at(node.range().start)
    }

    /// Span of the start tag beginning at byte `offset`.
    pub fn span_at(&self, offset: usize) -> Span {
        let end = self.source[offset..]
            .find('>')
            .map_or(self.source.len(), |idx| offset + idx + 1);
        Span::new(offset..end)
    }

    /// Positional key of a construct node.
    pub fn key(&self, node: Node<'_, '_>, kind: ConstructKind) -> NodeKey {
        NodeKey::new(kind, node.range().start, self.line(node))
    }

    /// Name of the closest named ancestor-or-self, or `schema` when none is
    /// named.
    pub fn context_name(&self, node: Node<'_, '_>) -> String {
        node.ancestors()
            .filter(|n| n.is_element())
            .find_map(|n| n.attribute("name"))
            .unwrap_or("schema")
            .to_string()
    }

    /// Checks that `node` is the construct kind a parser was handed.
    ///
    /// A mismatch is an internal defect and fails the build with `E300`.
    pub fn expect_tag(&self, node: Node<'_, '_>, expected: Tag) -> Result<()> {
        let actual = Tag::of(node);
        if actual == Some(expected) {
            return Ok(());
        }
        Err(Diagnostic::error(format!(
            "{} (line {}): {expected} parser was handed `{}`",
            self.context_name(node),
            self.line(node),
            display_tag(node)
        ))
        .with_code(ErrorCode::E300)
        .with_label(self.span(node), format!("expected {expected}")))
    }

    /// Diagnostic for a child construct outside the parent's permitted set.
    pub fn unexpected_child(&self, parent: Node<'_, '_>, child: Node<'_, '_>) -> Diagnostic {
        let parent_tag = Tag::of(parent).unwrap_or(Tag::Other);
        trace!(parent:% = parent_tag, child = display_tag(child); "Rejecting child construct");
        Diagnostic::error(format!(
            "{} (line {}): unexpected {parent_tag} child node `{}`",
            self.context_name(parent),
            self.line(child),
            display_tag(child)
        ))
        .with_code(ErrorCode::E100)
        .with_label(self.span(child), "unsupported construct")
        .with_secondary_label(self.span(parent), format!("inside this {parent_tag}"))
    }

    /// Diagnostic for a construct missing an attribute it cannot do without.
    pub fn missing_attribute(&self, node: Node<'_, '_>, attribute: &str) -> Diagnostic {
        let tag = Tag::of(node).unwrap_or(Tag::Other);
        Diagnostic::error(format!(
            "{} (line {}): {tag} is missing the `{attribute}` attribute",
            self.context_name(node),
            self.line(node)
        ))
        .with_code(ErrorCode::E103)
        .with_label(self.span(node), format!("no `{attribute}` here"))
    }

    /// Diagnostic for an unparsable facet or bound value.
    pub fn invalid_facet(&self, node: Node<'_, '_>, detail: impl std::fmt::Display) -> Diagnostic {
        Diagnostic::error(format!(
            "{} (line {}): {detail}",
            self.context_name(node),
            self.line(node)
        ))
        .with_code(ErrorCode::E102)
        .with_label(self.span(node), "invalid value")
    }
}

/// Human-readable tag of an element, `xs:`-prefixed for XML Schema elements.
pub fn display_tag(node: Node<'_, '_>) -> String {
    let tag_name = node.tag_name();
    match tag_name.namespace() {
        Some(XSD_NAMESPACE) => format!("xs:{}", tag_name.name()),
        Some(ns) => format!("{{{ns}}}{}", tag_name.name()),
        None => tag_name.name().to_string(),
    }
}

/// Byte offset of a 1-based row/column position.
fn offset_of(source: &str, row: u32, col: u32) -> usize {
    let line_start: usize = source
        .split_inclusive('\n')
        .take(row.saturating_sub(1) as usize)
        .map(str::len)
        .sum();
    let column = source[line_start..]
        .char_indices()
        .nth(col.saturating_sub(1) as usize)
        .map_or(source.len() - line_start, |(idx, _)| idx);
    line_start + column
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;

    const SOURCE: &str = r#"<?xml version="1.0"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:complexType name="groupType">
    <xs:sequence>
      <xs:element name="doc"/>
    </xs:sequence>
  </xs:complexType>
  <xs:element name="definition" type="groupType"/>
</xs:schema>
"#;

    #[test]
    fn test_parse_and_locate() {
        let doc = SchemaDocument::parse(SOURCE).unwrap();

        assert_eq!(doc.top_level(Tag::ComplexType).count(), 1);
        assert_eq!(doc.top_level(Tag::Element).count(), 1);
        assert_eq!(doc.descendants(Tag::Element).count(), 2);

        let inner = doc.descendants(Tag::Element).next().unwrap();
        assert_eq!(doc.line(inner), 5);
        assert_eq!(&SOURCE[doc.span(inner).start()..doc.span(inner).end()], r#"<xs:element name="doc"/>"#);
        assert_eq!(doc.context_name(inner), "doc");

        let sequence = inner.parent_element().unwrap();
        assert_eq!(doc.context_name(sequence), "groupType");
        assert_eq!(doc.context_name(doc.root()), "schema");
    }

    #[test]
    fn test_keys_are_unique_per_node() {
        let doc = SchemaDocument::parse(SOURCE).unwrap();
        let keys: Vec<_> = doc
            .descendants(Tag::Element)
            .map(|node| doc.key(node, ConstructKind::Element))
            .collect();

        assert_eq!(keys.len(), 2);
        assert_ne!(keys[0], keys[1]);
        assert_eq!(keys[0].line(), 5);
        assert_eq!(keys[1].line(), 8);
    }

    #[test]
    fn test_malformed_xml() {
        let err = SchemaDocument::parse("<xs:schema><oops></xs:schema>").err().unwrap();
        assert_eq!(err.code(), Some(ErrorCode::E001));
        assert_eq!(err.class(), Some(ErrorClass::Document));
    }

    #[test]
    fn test_not_a_schema() {
        let err = SchemaDocument::parse("<definition/>").err().unwrap();
        assert_eq!(err.code(), Some(ErrorCode::E002));
        assert!(err.message().contains("definition"));
    }

    #[test]
    fn test_expect_tag() {
        let doc = SchemaDocument::parse(SOURCE).unwrap();
        let element = doc.top_level(Tag::Element).next().unwrap();

        assert!(doc.expect_tag(element, Tag::Element).is_ok());
        let err = doc.expect_tag(element, Tag::Attribute).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E300));
        assert_eq!(err.class(), Some(ErrorClass::Invariant));
    }

    #[test]
    fn test_offset_of() {
        let source = "ab\ncde\nf";
        assert_eq!(offset_of(source, 1, 1), 0);
        assert_eq!(offset_of(source, 2, 2), 4);
        assert_eq!(offset_of(source, 3, 1), 7);
        assert_eq!(offset_of(source, 3, 5), 8);
    }
}
