use log::trace;
use roxmltree::Node as XmlNode;

use nxschema_core::{Element, Name};

use crate::{
    document::SchemaDocument,
    error::Result,
    nodes::{occurs, reference},
    tag::Tag,
};

/// Parses an `xs:element` at any depth.
///
/// Inline type definitions and identity constraints are accepted but do not
/// contribute children; an element's children come only from substitution.
pub(crate) fn parse_element(doc: &SchemaDocument<'_>, xml: XmlNode<'_, '_>) -> Result<Element> {
    doc.expect_tag(xml, Tag::Element)?;

    let (min, max) = occurs(doc, xml)?;
    let element = Element::new(xml.attribute("name").map(Name::new), reference(xml, "type"))
        .with_occurs(min, max);

    for child in xml.children() {
        let Some(tag) = Tag::of(child) else {
            continue;
        };
        match tag {
            Tag::Annotation
            | Tag::ComplexType
            | Tag::SimpleType
            | Tag::Unique
            | Tag::Key
            | Tag::KeyRef => {}
            _ => return Err(doc.unexpected_child(xml, child)),
        }
    }

    trace!(element:? = element; "Parsed element");
    Ok(element)
}
