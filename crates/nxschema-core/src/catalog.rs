//! The published, immutable catalog of one schema document.
//!
//! A [`Catalog`] owns every parsed node in an arena and exposes two lookup
//! structures over the same nodes:
//!
//! - a positional map keyed by [`NodeKey`], unique per document;
//! - a name cross-reference mapping declared names to nodes.
//!
//! Both maps store [`NodeId`]s, so resolving the same name twice yields the
//! same node identity.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::{
    kind::ConstructKind,
    name::Name,
    node::{Element, Node, NodeId, NodeKey, SchemaNode},
};

/// How named simple types fold their base types' facets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlattenMode {
    /// One pass in declaration order, removing a single level of indirection
    /// per type.
    #[default]
    SingleHop,
    /// Repeat the pass until no type's base names another named simple type.
    Fixpoint,
}

/// A fully resolved schema catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    nodes: Vec<Node>,
    origins: Vec<NodeKey>,
    positions: IndexMap<NodeKey, NodeId>,
    names: IndexMap<Name, NodeId>,
    definition_root: NodeId,
    flatten_mode: FlattenMode,
}

impl Catalog {
    /// Assembles a catalog from the parts produced by a completed build.
    ///
    /// `origins[i]` is the source key of `nodes[i]`; for nodes derived during
    /// substitution it is the key of the declaration they were derived from.
    ///
    /// # Panics
    ///
    /// Panics if `nodes` and `origins` differ in length or `definition_root`
    /// is not an element in the arena.
    pub fn new(
        nodes: Vec<Node>,
        origins: Vec<NodeKey>,
        positions: IndexMap<NodeKey, NodeId>,
        names: IndexMap<Name, NodeId>,
        definition_root: NodeId,
        flatten_mode: FlattenMode,
    ) -> Self {
        assert_eq!(nodes.len(), origins.len(), "every node needs an origin");
        assert!(
            matches!(nodes.get(definition_root.index()), Some(Node::Element(_))),
            "definition root must be an element"
        );
        Self {
            nodes,
            origins,
            positions,
            names,
            definition_root,
            flatten_mode,
        }
    }

    /// Number of nodes in the arena, including substituted copies.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node with the given identifier.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this catalog.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// The source key a node was parsed from (or derived from).
    pub fn origin(&self, id: NodeId) -> NodeKey {
        self.origins[id.index()]
    }

    /// Looks up the construct at an exact positional key.
    pub fn get(&self, key: &NodeKey) -> Option<NodeId> {
        self.positions.get(key).copied()
    }

    /// Looks up the construct of `kind` starting at byte `offset`.
    pub fn lookup(&self, kind: ConstructKind, offset: usize) -> Option<NodeId> {
        self.positions
            .iter()
            .find(|(key, _)| key.kind() == kind && key.offset() == offset)
            .map(|(_, id)| *id)
    }

    /// All constructs of `kind` whose start tag is on 1-based `line`, in
    /// document order.
    pub fn at_line(&self, kind: ConstructKind, line: u32) -> impl Iterator<Item = NodeId> + '_ {
        self.positions
            .iter()
            .filter(move |(key, _)| key.kind() == kind && key.line() == line)
            .map(|(_, id)| *id)
    }

    /// Resolves a declared name through the cross-reference.
    ///
    /// A namespace prefix on `name` is ignored.
    pub fn resolve(&self, name: &str) -> Option<NodeId> {
        self.names.get(&Name::local(name)).copied()
    }

    /// Resolves a declared name and returns the node only if it has `kind`.
    pub fn resolve_kind(&self, name: &str, kind: ConstructKind) -> Option<&Node> {
        self.resolve(name)
            .map(|id| self.node(id))
            .filter(|node| node.kind() == kind)
    }

    /// Iterates the positional map in insertion (pass) order.
    pub fn positions(&self) -> impl Iterator<Item = (&NodeKey, NodeId)> {
        self.positions.iter().map(|(key, id)| (key, *id))
    }

    /// Iterates the name cross-reference in insertion order.
    pub fn names(&self) -> impl Iterator<Item = (Name, NodeId)> + '_ {
        self.names.iter().map(|(name, id)| (*name, *id))
    }

    /// Identifier of the resolved definition root element.
    pub fn definition_root_id(&self) -> NodeId {
        self.definition_root
    }

    /// The resolved definition root element.
    pub fn definition_root(&self) -> &Element {
        match self.node(self.definition_root) {
            Node::Element(element) => element,
            // `new` rejects any other kind.
            _ => unreachable!("definition root is always an element"),
        }
    }

    /// The definition root's children with their nodes, in order.
    pub fn definition_children(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.definition_root()
            .children()
            .iter()
            .map(|id| (*id, self.node(*id)))
    }

    /// The flattening mode this catalog was built with.
    pub fn flatten_mode(&self) -> FlattenMode {
        self.flatten_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Attribute, ComplexType};

    fn sample() -> Catalog {
        let flag_key = NodeKey::new(ConstructKind::Attribute, 40, 3);
        let type_key = NodeKey::new(ConstructKind::ComplexType, 20, 2);
        let root_key = NodeKey::new(ConstructKind::Element, 80, 6);

        let flag = Node::Attribute(Attribute::new(Some(Name::new("flag")), Name::new("NX_BOOLEAN")));
        let group_type = Node::ComplexType(ComplexType::new(
            Name::new("groupType"),
            None,
            vec![NodeId::new(0)],
        ));
        let declared = Element::new(Some(Name::new("definition")), Some(Name::new("groupType")));
        let mut root = declared.clone();
        root.extend_children(&[NodeId::new(0)]);

        let nodes = vec![
            flag,
            group_type,
            Node::Element(declared),
            Node::Element(root),
        ];
        let origins = vec![flag_key, type_key, root_key, root_key];
        let positions = IndexMap::from([
            (flag_key, NodeId::new(0)),
            (type_key, NodeId::new(1)),
            (root_key, NodeId::new(2)),
        ]);
        let names = IndexMap::from([(Name::new("groupType"), NodeId::new(1))]);

        Catalog::new(
            nodes,
            origins,
            positions,
            names,
            NodeId::new(3),
            FlattenMode::default(),
        )
    }

    #[test]
    fn test_lookups() {
        let catalog = sample();

        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.lookup(ConstructKind::Attribute, 40), Some(NodeId::new(0)));
        assert_eq!(catalog.lookup(ConstructKind::Element, 40), None);
        assert_eq!(
            catalog.at_line(ConstructKind::ComplexType, 2).collect::<Vec<_>>(),
            vec![NodeId::new(1)]
        );
        assert_eq!(catalog.resolve("nx:groupType"), Some(NodeId::new(1)));
        assert!(catalog.resolve_kind("groupType", ConstructKind::SimpleType).is_none());
        assert!(catalog.resolve_kind("groupType", ConstructKind::ComplexType).is_some());
    }

    #[test]
    fn test_resolve_identity() {
        let catalog = sample();
        assert_eq!(catalog.resolve("groupType"), catalog.resolve("groupType"));
    }

    #[test]
    fn test_definition_root() {
        let catalog = sample();
        let root = catalog.definition_root();

        assert_eq!(root.name(), Some(Name::new("definition")));
        assert_eq!(root.children(), [NodeId::new(0)]);
        assert_eq!(catalog.origin(catalog.definition_root_id()).line(), 6);
        let children: Vec<_> = catalog.definition_children().map(|(id, _)| id).collect();
        assert_eq!(children, vec![NodeId::new(0)]);
    }

    #[test]
    #[should_panic(expected = "definition root must be an element")]
    fn test_new_rejects_non_element_root() {
        let key = NodeKey::new(ConstructKind::Attribute, 0, 1);
        Catalog::new(
            vec![Node::Attribute(Attribute::new(None, Name::new("NX_CHAR")))],
            vec![key],
            IndexMap::new(),
            IndexMap::new(),
            NodeId::new(0),
            FlattenMode::SingleHop,
        );
    }
}
