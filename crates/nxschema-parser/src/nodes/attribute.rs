use log::trace;
use roxmltree::Node as XmlNode;

use nxschema_core::{Attribute, DEFAULT_ATTRIBUTE_TYPE, Name};

use crate::{
    document::SchemaDocument,
    error::Result,
    nodes::{facets::parse_inline_simple_type, reference},
    tag::Tag,
};

/// Parses an `xs:attribute` at any depth.
///
/// A missing `type` defaults to `NX_CHAR`. Patterns and enumerations come
/// from an inline restricted `xs:simpleType`; `annotation` is skipped.
pub(crate) fn parse_attribute(doc: &SchemaDocument<'_>, xml: XmlNode<'_, '_>) -> Result<Attribute> {
    doc.expect_tag(xml, Tag::Attribute)?;

    let type_name = reference(xml, "type").unwrap_or_else(|| Name::new(DEFAULT_ATTRIBUTE_TYPE));
    let mut attribute = Attribute::new(xml.attribute("name").map(Name::new), type_name);
    attribute.set_required(xml.attribute("use") == Some("required"));
    attribute.set_default_value(xml.attribute("default").map(str::to_string));

    for child in xml.children() {
        let Some(tag) = Tag::of(child) else {
            continue;
        };
        match tag {
            Tag::Annotation => {}
            Tag::SimpleType => {
                parse_inline_simple_type(doc, child)?.apply_to_attribute(&mut attribute);
            }
            _ => return Err(doc.unexpected_child(xml, child)),
        }
    }

    trace!(attribute:? = attribute; "Parsed attribute");
    Ok(attribute)
}
