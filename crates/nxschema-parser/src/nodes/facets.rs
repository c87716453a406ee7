//! `xs:restriction` facets shared by simple types and inline attribute types.

use roxmltree::Node as XmlNode;

use nxschema_core::{Attribute, Name, SimpleType};

use crate::{document::SchemaDocument, error::Result, nodes::reference, tag::Tag};

/// Facets collected from one `xs:restriction`.
#[derive(Debug, Default, PartialEq)]
pub(super) struct Restriction {
    pub base: Option<Name>,
    pub patterns: Vec<String>,
    pub enumerations: Vec<String>,
    pub max_length: Option<u32>,
}

impl Restriction {
    pub fn apply_to_simple_type(self, simple_type: &mut SimpleType) {
        simple_type.set_base(self.base);
        for pattern in self.patterns {
            simple_type.push_pattern(pattern);
        }
        for value in self.enumerations {
            simple_type.push_enumeration(value);
        }
        simple_type.set_max_length(self.max_length);
    }

    pub fn apply_to_attribute(self, attribute: &mut Attribute) {
        for pattern in self.patterns {
            attribute.push_pattern(pattern);
        }
        for value in self.enumerations {
            attribute.push_enumeration(value);
        }
    }
}

/// Parses an `xs:restriction` element.
///
/// Permitted children are `pattern`, `enumeration`, `maxLength` and
/// `annotation`.
pub(super) fn parse_restriction(
    doc: &SchemaDocument<'_>,
    xml: XmlNode<'_, '_>,
) -> Result<Restriction> {
    doc.expect_tag(xml, Tag::Restriction)?;

    let mut restriction = Restriction {
        base: reference(xml, "base"),
        ..Restriction::default()
    };

    for child in xml.children() {
        let Some(tag) = Tag::of(child) else {
            continue;
        };
        match tag {
            Tag::Annotation => {}
            Tag::Pattern => restriction.patterns.push(facet_value(doc, child)?.to_string()),
            Tag::Enumeration => restriction
                .enumerations
                .push(facet_value(doc, child)?.to_string()),
            Tag::MaxLength => {
                let value = facet_value(doc, child)?;
                let max_length = value.trim().parse::<u32>().map_err(|_| {
                    doc.invalid_facet(
                        child,
                        format!("maxLength `{value}` is not a non-negative integer"),
                    )
                })?;
                restriction.max_length = Some(max_length);
            }
            _ => return Err(doc.unexpected_child(xml, child)),
        }
    }

    Ok(restriction)
}

/// Parses an inline anonymous `xs:simpleType`, which may only restrict.
pub(super) fn parse_inline_simple_type(
    doc: &SchemaDocument<'_>,
    xml: XmlNode<'_, '_>,
) -> Result<Restriction> {
    doc.expect_tag(xml, Tag::SimpleType)?;

    let mut restriction = Restriction::default();
    for child in xml.children() {
        let Some(tag) = Tag::of(child) else {
            continue;
        };
        match tag {
            Tag::Annotation => {}
            Tag::Restriction => restriction = parse_restriction(doc, child)?,
            _ => return Err(doc.unexpected_child(xml, child)),
        }
    }
    Ok(restriction)
}

fn facet_value<'a>(doc: &SchemaDocument<'_>, xml: XmlNode<'a, '_>) -> Result<&'a str> {
    xml.attribute("value")
        .ok_or_else(|| doc.missing_attribute(xml, "value"))
}
