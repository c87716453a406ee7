//! Definition root resolution.
//!
//! The schema's single top-level `xs:element` is bound to its named complex
//! type and adopts that type's children. One substitution pass then gives
//! every child whose type/base/ref pointer resolves a copy of the referenced
//! construct's children. Substitution is single level, and it never mutates
//! a cataloged node: substituted children and the root itself are published
//! as new nodes.

use std::collections::HashMap;

use log::{debug, info, trace};

use nxschema_core::{ConstructKind, NodeId, SchemaNode};

use crate::{
    context::BuildContext,
    document::SchemaDocument,
    error::{Diagnostic, ErrorCode, Result},
    tag::Tag,
};

/// Resolves the definition root and returns its identifier.
///
/// # Errors
///
/// - `E101` unless exactly one top-level `xs:element` is declared;
/// - `E103` when that element has no `type`;
/// - `E200`/`E202` when the type is undeclared or not a complex type.
pub(crate) fn build_definition_root(
    doc: &SchemaDocument<'_>,
    ctx: &mut BuildContext,
) -> Result<NodeId> {
    let declarations: Vec<_> = doc.top_level(Tag::Element).collect();
    let xml = match declarations.as_slice() {
        [xml] => *xml,
        [] => {
            return Err(Diagnostic::error("schema declares no top-level xs:element")
                .with_code(ErrorCode::E101)
                .with_label(doc.span(doc.root()), "expected one definition element in here"));
        }
        [first, rest @ ..] => {
            let mut diagnostic = Diagnostic::error(format!(
                "schema declares {} top-level xs:element declarations, expected exactly one",
                declarations.len()
            ))
            .with_code(ErrorCode::E101)
            .with_label(doc.span(*first), "first declaration");
            for extra in rest {
                diagnostic = diagnostic.with_secondary_label(
                    doc.span(*extra),
                    format!("also declared here (line {})", doc.line(*extra)),
                );
            }
            return Err(diagnostic);
        }
    };

    let declared_id = ctx.resolve_key(doc, xml, ConstructKind::Element)?;
    let declared = ctx.node(declared_id).clone();
    let type_name = declared
        .type_name()
        .ok_or_else(|| doc.missing_attribute(xml, "type"))?;
    let type_id = ctx.resolve_name_of_kind(doc, xml, type_name, ConstructKind::ComplexType)?;
    let adopted: Vec<NodeId> = ctx
        .node(type_id)
        .children()
        .map(<[NodeId]>::to_vec)
        .unwrap_or_default();

    let children = substitute(ctx, &adopted);
    let root = declared.with_children_appended(&children).ok_or_else(|| {
        Diagnostic::error(format!(
            "{} (line {}): definition declaration is not an element",
            doc.context_name(xml),
            doc.line(xml)
        ))
        .with_code(ErrorCode::E300)
        .with_label(doc.span(xml), "expected xs:element")
    })?;
    let root_id = ctx.publish(ctx.origin(declared_id), root);

    info!(
        root:% = doc.context_name(xml),
        type_name:% = type_name,
        children = children.len();
        "Definition root resolved"
    );
    Ok(root_id)
}

/// Runs one substitution pass over `children`.
///
/// A child is replaced by a copy extended with its referenced construct's
/// children when the pointer resolves, the child can hold children and the
/// referenced construct has some. Repeated children share one copy.
fn substitute(ctx: &mut BuildContext, children: &[NodeId]) -> Vec<NodeId> {
    let mut copies: HashMap<NodeId, NodeId> = HashMap::new();
    let mut substituted = Vec::with_capacity(children.len());

    for &child in children {
        if let Some(copy) = copies.get(&child) {
            substituted.push(*copy);
            continue;
        }

        let node = ctx.node(child);
        let extended = node
            .reference_name()
            .and_then(|name| ctx.lookup_name(name))
            .and_then(|target| ctx.node(target).children())
            .filter(|extra| !extra.is_empty())
            .and_then(|extra| node.with_children_appended(extra));

        match extended {
            Some(extended) => {
                trace!(
                    child:% = child,
                    reference:? = node.reference_name();
                    "Substituted referenced children"
                );
                let copy = ctx.publish(ctx.origin(child), extended);
                copies.insert(child, copy);
                substituted.push(copy);
            }
            None => substituted.push(child),
        }
    }

    debug!(children = children.len(), substituted = copies.len(); "Substitution pass complete");
    substituted
}
