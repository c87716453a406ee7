//! Node parsers, one per construct kind.
//!
//! Each parser turns a single XML Schema element of its kind into the
//! matching value type from `nxschema_core`. Parsers walk a fixed set of
//! permitted child elements and reject everything else with `E100`, so an
//! unsupported schema shape is never silently dropped.

mod attribute;
mod attribute_group;
mod element;
mod facets;
mod group;
mod simple_type;

pub(crate) use attribute::parse_attribute;
pub(crate) use attribute_group::parse_attribute_group;
pub(crate) use element::parse_element;
pub(crate) use group::parse_group;
pub(crate) use simple_type::parse_simple_type;

use roxmltree::Node as XmlNode;

use nxschema_core::{Name, Occurs};

use crate::{document::SchemaDocument, error::Result, tag::XSD_NAMESPACE};

/// Reads a `type`/`base`/`ref` pointer as a [`qualified_name`].
pub(crate) fn reference(xml: XmlNode<'_, '_>, attribute: &str) -> Option<Name> {
    xml.attribute(attribute)
        .map(|value| qualified_name(xml, value))
}

/// Resolves a QName value in the scope of `xml`.
///
/// Names in the XML Schema namespace are built-in types and keep a canonical
/// `xs:` prefix, so they never resolve against declared names. Any other
/// prefix is removed.
pub(crate) fn qualified_name(xml: XmlNode<'_, '_>, value: &str) -> Name {
    let (prefix, local) = match value.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, value),
    };
    if xml.lookup_namespace_uri(prefix) == Some(XSD_NAMESPACE) {
        Name::new(&format!("xs:{local}"))
    } else {
        Name::new(local)
    }
}

/// Reads the `name` attribute of a construct that must be named.
///
/// # Errors
///
/// `E103` when the attribute is absent.
pub(crate) fn required_name(doc: &SchemaDocument<'_>, xml: XmlNode<'_, '_>) -> Result<Name> {
    xml.attribute("name")
        .map(Name::new)
        .ok_or_else(|| doc.missing_attribute(xml, "name"))
}

/// Reads the `minOccurs`/`maxOccurs` bounds of an element or group.
fn occurs(
    doc: &SchemaDocument<'_>,
    xml: XmlNode<'_, '_>,
) -> Result<(Option<Occurs>, Option<Occurs>)> {
    let bound = |attribute: &str| {
        xml.attribute(attribute)
            .map(|value| {
                value
                    .parse::<Occurs>()
                    .map_err(|err| doc.invalid_facet(xml, format!("{attribute}: {err}")))
            })
            .transpose()
    };
    Ok((bound("minOccurs")?, bound("maxOccurs")?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_name() {
        let source = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:nx="urn:nx">
  <xs:attribute name="a" type="nx:NX_CHAR"/>
  <xs:attribute name="b" type="xs:string"/>
  <xs:attribute name="c" type="NX_INT"/>
  <xsd:attribute xmlns:xsd="http://www.w3.org/2001/XMLSchema" name="d" type="xsd:token"/>
</xs:schema>"#;
        let doc = roxmltree::Document::parse(source).unwrap();
        let types: Vec<_> = doc
            .root_element()
            .children()
            .filter(|child| child.is_element())
            .filter_map(|child| reference(child, "type"))
            .collect();

        assert_eq!(
            types,
            [
                Name::new("NX_CHAR"),
                Name::new("xs:string"),
                Name::new("NX_INT"),
                Name::new("xs:token"),
            ]
        );
    }
}
