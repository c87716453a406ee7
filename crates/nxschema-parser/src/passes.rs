//! The fixed sequence of catalog passes.

use log::debug;

use nxschema_core::{Catalog, ConstructKind, Node};

use crate::{
    BuildConfig,
    assemble::assemble_complex_types,
    context::BuildContext,
    document::SchemaDocument,
    error::Result,
    flatten::flatten_simple_types,
    nodes,
    root::build_definition_root,
    tag::Tag,
};

/// Runs every pass over a loaded document and publishes the catalog.
pub(crate) fn build_catalog(doc: &SchemaDocument<'_>, config: BuildConfig) -> Result<Catalog> {
    let mut ctx = BuildContext::new();

    simple_type_pass(doc, &mut ctx)?;
    flatten_simple_types(doc, &mut ctx, config.flatten)?;
    attribute_pass(doc, &mut ctx)?;
    attribute_group_pass(doc, &mut ctx)?;
    element_pass(doc, &mut ctx)?;
    group_pass(doc, &mut ctx)?;
    assemble_complex_types(doc, &mut ctx)?;
    let root = build_definition_root(doc, &mut ctx)?;

    Ok(ctx.into_catalog(root, config.flatten))
}

/// Named top-level simple types.
fn simple_type_pass(doc: &SchemaDocument<'_>, ctx: &mut BuildContext) -> Result<()> {
    let mut count = 0;
    for xml in doc.top_level(Tag::SimpleType) {
        let simple_type = nodes::parse_simple_type(doc, xml)?;
        let name = simple_type.name();
        let id = ctx.insert_positional(
            doc.key(xml, ConstructKind::SimpleType),
            Node::SimpleType(simple_type),
        );
        ctx.insert_named(name, id);
        count += 1;
    }
    debug!(simple_types = count; "SimpleType pass complete");
    Ok(())
}

/// Attributes at any depth, addressable by position only.
fn attribute_pass(doc: &SchemaDocument<'_>, ctx: &mut BuildContext) -> Result<()> {
    let mut count = 0;
    for xml in doc.descendants(Tag::Attribute) {
        let attribute = nodes::parse_attribute(doc, xml)?;
        ctx.insert_positional(
            doc.key(xml, ConstructKind::Attribute),
            Node::Attribute(attribute),
        );
        count += 1;
    }
    debug!(attributes = count; "Attribute pass complete");
    Ok(())
}

/// Named top-level attribute groups.
fn attribute_group_pass(doc: &SchemaDocument<'_>, ctx: &mut BuildContext) -> Result<()> {
    let mut count = 0;
    for xml in doc.top_level(Tag::AttributeGroup) {
        let group = nodes::parse_attribute_group(doc, ctx, xml)?;
        let name = group.name();
        let id = ctx.insert_positional(
            doc.key(xml, ConstructKind::AttributeGroup),
            Node::AttributeGroup(group),
        );
        ctx.insert_named(name, id);
        count += 1;
    }
    debug!(attribute_groups = count; "AttributeGroup pass complete");
    Ok(())
}

/// Elements at any depth, addressable by position only.
fn element_pass(doc: &SchemaDocument<'_>, ctx: &mut BuildContext) -> Result<()> {
    let mut count = 0;
    for xml in doc.descendants(Tag::Element) {
        let element = nodes::parse_element(doc, xml)?;
        ctx.insert_positional(doc.key(xml, ConstructKind::Element), Node::Element(element));
        count += 1;
    }
    debug!(elements = count; "Element pass complete");
    Ok(())
}

/// Group definitions and references at any depth; definitions are named.
fn group_pass(doc: &SchemaDocument<'_>, ctx: &mut BuildContext) -> Result<()> {
    let mut count = 0;
    for xml in doc.descendants(Tag::Group) {
        let group = nodes::parse_group(doc, xml)?;
        let name = group.name();
        let id = ctx.insert_positional(doc.key(xml, ConstructKind::Group), Node::Group(group));
        if let Some(name) = name {
            ctx.insert_named(name, id);
        }
        count += 1;
    }
    debug!(groups = count; "Group pass complete");
    Ok(())
}
