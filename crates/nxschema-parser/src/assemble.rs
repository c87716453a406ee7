//! ComplexType assembly.
//!
//! Named top-level complex types are assembled after every other construct
//! kind has been cataloged. Each type's children list is built from the
//! cataloged attributes, elements and groups it mentions:
//!
//! - `sequence` (and nested `choice`/`sequence`/`all`) appends elements and
//!   group references in document order;
//! - `complexContent/extension` splices in the base type's complete children
//!   list before the extension's own declarations;
//! - `attribute` appends the cataloged attribute;
//! - `attributeGroup ref` appends all of the referenced group's attributes.
//!
//! Bases are assembled before the types extending them. The order is a
//! topological sort of the extension graph that otherwise keeps document
//! order.

use std::{cmp::Reverse, collections::BinaryHeap};

use indexmap::IndexMap;
use log::{debug, trace};
use petgraph::{
    Direction,
    algo::tarjan_scc,
    graph::{DiGraph, NodeIndex},
};
use roxmltree::Node as XmlNode;

use nxschema_core::{ComplexType, ConstructKind, Name, Node, NodeId};

use crate::{
    context::BuildContext,
    document::SchemaDocument,
    error::{Diagnostic, ErrorCode, Result},
    nodes::{reference, required_name},
    tag::Tag,
};

/// A named top-level complex type declaration.
#[derive(Clone, Copy)]
struct Declaration<'a, 'input> {
    name: Name,
    xml: XmlNode<'a, 'input>,
}

/// Assembles and catalogs every named top-level complex type.
///
/// Returns the number of types assembled.
pub(crate) fn assemble_complex_types(
    doc: &SchemaDocument<'_>,
    ctx: &mut BuildContext,
) -> Result<usize> {
    let declarations = doc
        .top_level(Tag::ComplexType)
        .map(|xml| required_name(doc, xml).map(|name| Declaration { name, xml }))
        .collect::<Result<Vec<_>>>()?;

    let order = extension_order(doc, &declarations)?;
    for index in order {
        let declaration = declarations[index];
        let complex_type = assemble(doc, ctx, declaration)?;
        trace!(
            name:% = declaration.name,
            children = complex_type.children().len();
            "Assembled complex type"
        );
        let id = ctx.insert_positional(
            doc.key(declaration.xml, ConstructKind::ComplexType),
            Node::ComplexType(complex_type),
        );
        ctx.insert_named(declaration.name, id);
    }

    debug!(complex_types = declarations.len(); "ComplexType pass complete");
    Ok(declarations.len())
}

/// Base type named by a declaration's `complexContent/extension`, if any.
fn extension_base(xml: XmlNode<'_, '_>) -> Option<Name> {
    xml.children()
        .filter(|child| Tag::of(*child) == Some(Tag::ComplexContent))
        .flat_map(|content| content.children())
        .find(|child| Tag::of(*child) == Some(Tag::Extension))
        .and_then(|extension| reference(extension, "base"))
}

/// Orders declarations so that every base precedes the types extending it.
///
/// Among declarations with no ordering constraint, document order is kept.
fn extension_order(
    doc: &SchemaDocument<'_>,
    declarations: &[Declaration<'_, '_>],
) -> Result<Vec<usize>> {
    let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(declarations.len(), 0);
    let indices: Vec<NodeIndex> = (0..declarations.len())
        .map(|index| graph.add_node(index))
        .collect();

    // Later declarations of a name shadow earlier ones, as in the cross-reference.
    let by_name: IndexMap<Name, NodeIndex> = declarations
        .iter()
        .zip(&indices)
        .map(|(declaration, index)| (declaration.name, *index))
        .collect();

    for (declaration, derived) in declarations.iter().zip(&indices) {
        if let Some(base) = extension_base(declaration.xml).and_then(|base| by_name.get(&base)) {
            graph.add_edge(*base, *derived, ());
        }
    }

    let mut in_degree: Vec<usize> = indices
        .iter()
        .map(|index| graph.neighbors_directed(*index, Direction::Incoming).count())
        .collect();
    let mut ready: BinaryHeap<Reverse<usize>> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, degree)| **degree == 0)
        .map(|(index, _)| Reverse(index))
        .collect();

    let mut order = Vec::with_capacity(declarations.len());
    while let Some(Reverse(index)) = ready.pop() {
        order.push(index);
        for next in graph.neighbors_directed(indices[index], Direction::Outgoing) {
            let next = graph[next];
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                ready.push(Reverse(next));
            }
        }
    }

    if order.len() < declarations.len() {
        return Err(cycle_error(doc, declarations, &graph));
    }
    Ok(order)
}

fn cycle_error(
    doc: &SchemaDocument<'_>,
    declarations: &[Declaration<'_, '_>],
    graph: &DiGraph<usize, ()>,
) -> Diagnostic {
    let mut cycle: Vec<usize> = tarjan_scc(graph)
        .into_iter()
        .find(|component| {
            component.len() > 1 || graph.contains_edge(component[0], component[0])
        })
        .map(|component| component.into_iter().map(|index| graph[index]).collect())
        .unwrap_or_default();
    cycle.sort_unstable();

    let Some(first) = cycle.first().map(|index| declarations[*index]) else {
        return Diagnostic::error("complex type extensions form a cycle").with_code(ErrorCode::E104);
    };
    let members = cycle
        .iter()
        .map(|index| declarations[*index].name.to_string())
        .collect::<Vec<_>>()
        .join(" -> ");

    let mut diagnostic = Diagnostic::error(format!(
        "{} (line {}): complex type extensions form a cycle",
        first.name,
        doc.line(first.xml)
    ))
    .with_code(ErrorCode::E104)
    .with_label(doc.span(first.xml), "extension cycle starts here")
    .with_help(format!("types in the cycle: {members}"));
    for index in cycle.iter().skip(1) {
        diagnostic = diagnostic.with_secondary_label(
            doc.span(declarations[*index].xml),
            "part of the cycle",
        );
    }
    diagnostic
}

/// Builds one complex type's children list.
fn assemble(
    doc: &SchemaDocument<'_>,
    ctx: &BuildContext,
    declaration: Declaration<'_, '_>,
) -> Result<ComplexType> {
    let xml = declaration.xml;
    doc.expect_tag(xml, Tag::ComplexType)?;

    let mut children = Vec::new();
    let mut extends = None;
    for child in xml.children() {
        let Some(tag) = Tag::of(child) else {
            continue;
        };
        match tag {
            Tag::Sequence => content_model(doc, ctx, child, &mut children)?,
            Tag::ComplexContent => extends = complex_content(doc, ctx, child, &mut children)?,
            Tag::Group => children.push(ctx.resolve_key(doc, child, ConstructKind::Group)?),
            Tag::Attribute => children.push(ctx.resolve_key(doc, child, ConstructKind::Attribute)?),
            Tag::AttributeGroup => attribute_group_ref(doc, ctx, child, &mut children)?,
            tag if tag.is_ignorable() => {}
            _ => return Err(doc.unexpected_child(xml, child)),
        }
    }

    Ok(ComplexType::new(declaration.name, extends, children))
}

/// Appends the elements and group references of a `sequence`, `choice` or
/// `all`, descending into nested compositors.
fn content_model(
    doc: &SchemaDocument<'_>,
    ctx: &BuildContext,
    xml: XmlNode<'_, '_>,
    children: &mut Vec<NodeId>,
) -> Result<()> {
    for child in xml.children() {
        let Some(tag) = Tag::of(child) else {
            continue;
        };
        match tag {
            Tag::Element => children.push(ctx.resolve_key(doc, child, ConstructKind::Element)?),
            Tag::Group => children.push(ctx.resolve_key(doc, child, ConstructKind::Group)?),
            Tag::Sequence | Tag::Choice | Tag::All => content_model(doc, ctx, child, children)?,
            Tag::Annotation | Tag::Any => {}
            _ => return Err(doc.unexpected_child(xml, child)),
        }
    }
    Ok(())
}

/// Handles `complexContent`, returning the extension base.
fn complex_content(
    doc: &SchemaDocument<'_>,
    ctx: &BuildContext,
    xml: XmlNode<'_, '_>,
    children: &mut Vec<NodeId>,
) -> Result<Option<Name>> {
    let mut base = None;
    for child in xml.children() {
        let Some(tag) = Tag::of(child) else {
            continue;
        };
        match tag {
            Tag::Annotation => {}
            Tag::Extension => base = Some(extension(doc, ctx, child, children)?),
            _ => return Err(doc.unexpected_child(xml, child)),
        }
    }
    Ok(base)
}

/// Splices the base's children, then appends the extension's own.
fn extension(
    doc: &SchemaDocument<'_>,
    ctx: &BuildContext,
    xml: XmlNode<'_, '_>,
    children: &mut Vec<NodeId>,
) -> Result<Name> {
    let base = reference(xml, "base").ok_or_else(|| doc.missing_attribute(xml, "base"))?;
    let base_id = ctx.resolve_name_of_kind(doc, xml, base, ConstructKind::ComplexType)?;
    if let Some(base_type) = ctx.node(base_id).as_complex_type() {
        children.extend_from_slice(base_type.children());
    }

    for child in xml.children() {
        let Some(tag) = Tag::of(child) else {
            continue;
        };
        match tag {
            Tag::Sequence | Tag::Choice | Tag::All => content_model(doc, ctx, child, children)?,
            Tag::Group => children.push(ctx.resolve_key(doc, child, ConstructKind::Group)?),
            Tag::Attribute => children.push(ctx.resolve_key(doc, child, ConstructKind::Attribute)?),
            Tag::AttributeGroup => attribute_group_ref(doc, ctx, child, children)?,
            tag if tag.is_ignorable() => {}
            _ => return Err(doc.unexpected_child(xml, child)),
        }
    }
    Ok(base)
}

/// Appends every attribute of a referenced attribute group.
fn attribute_group_ref(
    doc: &SchemaDocument<'_>,
    ctx: &BuildContext,
    xml: XmlNode<'_, '_>,
    children: &mut Vec<NodeId>,
) -> Result<()> {
    let name = reference(xml, "ref").ok_or_else(|| doc.missing_attribute(xml, "ref"))?;
    let id = ctx.resolve_name_of_kind(doc, xml, name, ConstructKind::AttributeGroup)?;
    if let Some(group) = ctx.node(id).as_attribute_group() {
        children.extend_from_slice(group.children());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::test_utils::schema;

    fn order_of(body: &str) -> Result<Vec<String>> {
        let source = schema(body);
        let doc = SchemaDocument::parse(&source).unwrap();
        let declarations: Vec<_> = doc
            .top_level(Tag::ComplexType)
            .map(|xml| Declaration {
                name: required_name(&doc, xml).unwrap(),
                xml,
            })
            .collect();
        let order = extension_order(&doc, &declarations)?;
        Ok(order
            .into_iter()
            .map(|index| declarations[index].name.to_string())
            .collect())
    }

    fn extending(name: &str, base: &str) -> String {
        format!(
            r#"<xs:complexType name="{name}"><xs:complexContent><xs:extension base="nx:{base}"/></xs:complexContent></xs:complexType>"#
        )
    }

    #[test]
    fn test_document_order_without_extensions() {
        let body = r#"<xs:complexType name="a"/>
<xs:complexType name="b"/>
<xs:complexType name="c"/>"#;
        assert_eq!(order_of(body).unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_base_declared_after_derived() {
        let body = format!(
            "{}\n<xs:complexType name=\"other\"/>\n{}\n<xs:complexType name=\"basicComponent\"/>",
            extending("fieldType", "basicComponent"),
            extending("groupType", "fieldType"),
        );
        assert_eq!(
            order_of(&body).unwrap(),
            vec!["other", "basicComponent", "fieldType", "groupType"]
        );
    }

    #[test]
    fn test_unknown_base_does_not_constrain_order() {
        let body = format!("{}\n<xs:complexType name=\"a\"/>", extending("d", "missing"));
        assert_eq!(order_of(&body).unwrap(), vec!["d", "a"]);
    }

    #[test]
    fn test_extension_cycle() {
        let body = format!(
            "<xs:complexType name=\"free\"/>\n{}\n{}",
            extending("a", "b"),
            extending("b", "a"),
        );
        let err = order_of(&body).unwrap_err();

        assert_eq!(err.code(), Some(ErrorCode::E104));
        assert_eq!(err.message(), "a (line 3): complex type extensions form a cycle");
        assert_eq!(err.help(), Some("types in the cycle: a -> b"));
    }

    #[test]
    fn test_self_extension_is_a_cycle() {
        let err = order_of(&extending("loop", "loop")).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E104));
    }
}
