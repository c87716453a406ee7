use log::trace;
use roxmltree::Node as XmlNode;

use nxschema_core::{AttributeGroup, ConstructKind};

use crate::{
    context::BuildContext,
    document::SchemaDocument,
    error::Result,
    nodes::required_name,
    tag::Tag,
};

/// Parses a named top-level `xs:attributeGroup`.
///
/// Its attributes were cataloged by the attribute pass and are picked up by
/// position, so the group shares their identity.
pub(crate) fn parse_attribute_group(
    doc: &SchemaDocument<'_>,
    ctx: &BuildContext,
    xml: XmlNode<'_, '_>,
) -> Result<AttributeGroup> {
    doc.expect_tag(xml, Tag::AttributeGroup)?;

    let name = required_name(doc, xml)?;
    let mut children = Vec::new();
    for child in xml.children() {
        let Some(tag) = Tag::of(child) else {
            continue;
        };
        match tag {
            Tag::Attribute => children.push(ctx.resolve_key(doc, child, ConstructKind::Attribute)?),
            tag if tag.is_ignorable() => {}
            _ => return Err(doc.unexpected_child(xml, child)),
        }
    }

    trace!(name:% = name, attributes = children.len(); "Parsed attribute group");
    Ok(AttributeGroup::new(name, children))
}
