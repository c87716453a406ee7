//! Mutable state of one catalog build.
//!
//! A [`BuildContext`] owns the node arena, the positional map and the name
//! cross-reference while the passes run. It is threaded by `&mut` through
//! every pass and converted into an immutable [`Catalog`] once all of them
//! succeeded.

use indexmap::{IndexMap, map::Entry};
use log::{trace, warn};
use roxmltree::Node as XmlNode;

use nxschema_core::{
    Catalog, ConstructKind, FlattenMode, Name, Node, NodeId, NodeKey, SchemaNode,
};

use crate::{
    document::SchemaDocument,
    error::{Diagnostic, ErrorCode, Result},
};

#[derive(Debug, Default)]
pub struct BuildContext {
    nodes: Vec<Node>,
    origins: Vec<NodeKey>,
    positions: IndexMap<NodeKey, NodeId>,
    names: IndexMap<Name, NodeId>,
}

impl BuildContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// The key a node was parsed or derived from.
    pub fn origin(&self, id: NodeId) -> NodeKey {
        self.origins[id.index()]
    }

    /// Adds a node to the arena without making it addressable.
    ///
    /// Used for nodes derived during substitution; `origin` is the key of
    /// the declaration they were derived from.
    pub fn publish(&mut self, origin: NodeKey, node: Node) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        self.origins.push(origin);
        id
    }

    /// Adds a parsed construct under its positional key.
    ///
    /// # Panics
    ///
    /// Panics if the key is already taken. Keys derive from byte offsets,
    /// so a collision means a pass visited the same XML node twice.
    pub fn insert_positional(&mut self, key: NodeKey, node: Node) -> NodeId {
        debug_assert_eq!(key.kind(), node.kind());
        let id = self.publish(key, node);
        trace!(key:% = key, id:% = id; "Cataloged construct");
        let previous = self.positions.insert(key, id);
        assert!(previous.is_none(), "positional key {key} inserted twice");
        id
    }

    /// Enters `id` into the cross-reference under `name`.
    ///
    /// A name already present is overwritten.
    pub fn insert_named(&mut self, name: Name, id: NodeId) {
        match self.names.entry(name) {
            Entry::Occupied(mut entry) => {
                let previous = *entry.get();
                warn!(
                    name:% = name,
                    previous:% = self.origins[previous.index()],
                    current:% = self.origins[id.index()];
                    "Name redeclared, last declaration wins"
                );
                entry.insert(id);
            }
            Entry::Vacant(entry) => {
                entry.insert(id);
            }
        }
    }

    /// Replaces a node that has not been referenced by any other node yet.
    pub fn replace(&mut self, id: NodeId, node: Node) {
        debug_assert_eq!(self.nodes[id.index()].kind(), node.kind());
        self.nodes[id.index()] = node;
    }

    /// Looks a name up in the cross-reference without failing.
    pub fn lookup_name(&self, name: Name) -> Option<NodeId> {
        self.names.get(&name).copied()
    }

    /// Cross-reference entries whose node has `kind`, in insertion order.
    pub fn named(&self, kind: ConstructKind) -> Vec<(Name, NodeId)> {
        self.names
            .iter()
            .filter(|(_, id)| self.node(**id).kind() == kind)
            .map(|(name, id)| (*name, *id))
            .collect()
    }

    /// Resolves the construct of `kind` parsed from `xml` in an earlier pass.
    ///
    /// # Errors
    ///
    /// `E201` when no construct of that kind was cataloged at the node's
    /// position.
    pub fn resolve_key(
        &self,
        doc: &SchemaDocument<'_>,
        xml: XmlNode<'_, '_>,
        kind: ConstructKind,
    ) -> Result<NodeId> {
        let key = doc.key(xml, kind);
        self.positions.get(&key).copied().ok_or_else(|| {
            Diagnostic::error(format!(
                "{} (line {}): no cataloged {kind} at this position",
                doc.context_name(xml),
                key.line()
            ))
            .with_code(ErrorCode::E201)
            .with_label(doc.span(xml), "not found in the catalog")
        })
    }

    /// Resolves a `type`/`base`/`ref` pointer read from `xml`.
    ///
    /// # Errors
    ///
    /// `E200` when the name is absent from the cross-reference.
    pub fn resolve_name(
        &self,
        doc: &SchemaDocument<'_>,
        xml: XmlNode<'_, '_>,
        name: Name,
    ) -> Result<NodeId> {
        self.lookup_name(name).ok_or_else(|| {
            Diagnostic::error(format!(
                "{} (line {}): unresolved reference `{name}`",
                doc.context_name(xml),
                doc.line(xml)
            ))
            .with_code(ErrorCode::E200)
            .with_label(doc.span(xml), format!("`{name}` is not declared"))
        })
    }

    /// Resolves a pointer that must name a construct of `kind`.
    ///
    /// # Errors
    ///
    /// `E200` when the name is absent, `E202` when it names another kind.
    pub fn resolve_name_of_kind(
        &self,
        doc: &SchemaDocument<'_>,
        xml: XmlNode<'_, '_>,
        name: Name,
        kind: ConstructKind,
    ) -> Result<NodeId> {
        let id = self.resolve_name(doc, xml, name)?;
        let actual = self.node(id).kind();
        if actual != kind {
            return Err(Diagnostic::error(format!(
                "{} (line {}): `{name}` names a {actual}, expected a {kind}",
                doc.context_name(xml),
                doc.line(xml)
            ))
            .with_code(ErrorCode::E202)
            .with_label(doc.span(xml), format!("expected a {kind}"))
            .with_secondary_label(
                doc.span_at(self.origin(id).offset()),
                format!("`{name}` declared here"),
            ));
        }
        Ok(id)
    }

    /// Freezes the build into a catalog.
    pub fn into_catalog(self, definition_root: NodeId, flatten_mode: FlattenMode) -> Catalog {
        Catalog::new(
            self.nodes,
            self.origins,
            self.positions,
            self.names,
            definition_root,
            flatten_mode,
        )
    }
}

#[cfg(test)]
mod tests {
    use nxschema_core::{Attribute, ComplexType, SimpleType};

    use super::*;
    use crate::tag::Tag;

    const SOURCE: &str = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:simpleType name="NX_BOOLEAN"/>
  <xs:attribute name="flag" type="NX_BOOLEAN"/>
</xs:schema>"#;

    #[test]
    fn test_insert_and_resolve() {
        let doc = SchemaDocument::parse(SOURCE).unwrap();
        let simple = doc.top_level(Tag::SimpleType).next().unwrap();
        let attribute = doc.top_level(Tag::Attribute).next().unwrap();

        let mut ctx = BuildContext::new();
        let key = doc.key(simple, ConstructKind::SimpleType);
        let id = ctx.insert_positional(key, Node::SimpleType(SimpleType::new(Name::new("NX_BOOLEAN"))));
        ctx.insert_named(Name::new("NX_BOOLEAN"), id);

        assert_eq!(ctx.resolve_key(&doc, simple, ConstructKind::SimpleType).unwrap(), id);
        assert_eq!(ctx.resolve_name(&doc, attribute, Name::new("NX_BOOLEAN")).unwrap(), id);
        assert_eq!(ctx.named(ConstructKind::SimpleType), vec![(Name::new("NX_BOOLEAN"), id)]);
        assert!(ctx.named(ConstructKind::ComplexType).is_empty());
    }

    #[test]
    fn test_missing_position_and_name() {
        let doc = SchemaDocument::parse(SOURCE).unwrap();
        let attribute = doc.top_level(Tag::Attribute).next().unwrap();
        let ctx = BuildContext::new();

        let err = ctx.resolve_key(&doc, attribute, ConstructKind::Attribute).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E201));
        assert!(err.message().starts_with("flag (line 3)"));

        let err = ctx.resolve_name(&doc, attribute, Name::new("NX_MISSING")).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E200));
        assert!(err.message().contains("NX_MISSING"));
    }

    #[test]
    fn test_wrong_kind() {
        let doc = SchemaDocument::parse(SOURCE).unwrap();
        let simple = doc.top_level(Tag::SimpleType).next().unwrap();
        let attribute = doc.top_level(Tag::Attribute).next().unwrap();

        let mut ctx = BuildContext::new();
        let id = ctx.insert_positional(
            doc.key(simple, ConstructKind::SimpleType),
            Node::SimpleType(SimpleType::new(Name::new("NX_BOOLEAN"))),
        );
        ctx.insert_named(Name::new("NX_BOOLEAN"), id);

        let err = ctx
            .resolve_name_of_kind(&doc, attribute, Name::new("NX_BOOLEAN"), ConstructKind::ComplexType)
            .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E202));
        assert_eq!(err.labels().len(), 2);
    }

    #[test]
    fn test_last_write_wins() {
        let mut ctx = BuildContext::new();
        let first = ctx.insert_positional(
            NodeKey::new(ConstructKind::ComplexType, 10, 2),
            Node::ComplexType(ComplexType::new(Name::new("dup"), None, Vec::new())),
        );
        let second = ctx.insert_positional(
            NodeKey::new(ConstructKind::ComplexType, 90, 5),
            Node::ComplexType(ComplexType::new(Name::new("dup"), None, Vec::new())),
        );
        ctx.insert_named(Name::new("dup"), first);
        ctx.insert_named(Name::new("dup"), second);

        assert_eq!(ctx.lookup_name(Name::new("dup")), Some(second));
        assert_eq!(ctx.node(first), ctx.node(second));
    }

    #[test]
    #[should_panic(expected = "inserted twice")]
    fn test_duplicate_position_panics() {
        let mut ctx = BuildContext::new();
        let key = NodeKey::new(ConstructKind::Attribute, 10, 2);
        let attribute = Node::Attribute(Attribute::new(None, Name::new("NX_CHAR")));
        ctx.insert_positional(key, attribute.clone());
        ctx.insert_positional(key, attribute);
    }
}
