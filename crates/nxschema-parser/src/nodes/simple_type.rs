use log::trace;
use roxmltree::Node as XmlNode;

use nxschema_core::SimpleType;

use crate::{
    document::SchemaDocument,
    error::Result,
    nodes::{facets::parse_restriction, qualified_name, required_name},
    tag::Tag,
};

/// Parses a named top-level `xs:simpleType`.
///
/// Either a `restriction` (base, patterns, enumerations, maxLength) or a
/// `union` (member type names only) is read; `annotation` is skipped.
pub(crate) fn parse_simple_type(doc: &SchemaDocument<'_>, xml: XmlNode<'_, '_>) -> Result<SimpleType> {
    doc.expect_tag(xml, Tag::SimpleType)?;

    let mut simple_type = SimpleType::new(required_name(doc, xml)?);
    for child in xml.children() {
        let Some(tag) = Tag::of(child) else {
            continue;
        };
        match tag {
            Tag::Annotation => {}
            Tag::Restriction => parse_restriction(doc, child)?.apply_to_simple_type(&mut simple_type),
            Tag::Union => {
                let members = child
                    .attribute("memberTypes")
                    .unwrap_or_default()
                    .split_whitespace()
                    .map(|member| qualified_name(child, member))
                    .collect();
                simple_type.set_union_members(members);
            }
            _ => return Err(doc.unexpected_child(xml, child)),
        }
    }

    trace!(simple_type:? = simple_type; "Parsed simple type");
    Ok(simple_type)
}

#[cfg(test)]
mod tests {
    use nxschema_core::Name;

    use super::*;
    use crate::{error::ErrorCode, nodes::test_utils::schema};

    fn parse_first(body: &str) -> Result<SimpleType> {
        let source = schema(body);
        let doc = SchemaDocument::parse(&source).unwrap();
        let xml = doc.top_level(Tag::SimpleType).next().unwrap();
        parse_simple_type(&doc, xml)
    }

    #[test]
    fn test_restricted_simple_type() {
        let simple_type = parse_first(
            r#"<xs:simpleType name="NX_BOOLEAN">
  <xs:annotation><xs:documentation>boolean</xs:documentation></xs:annotation>
  <xs:restriction base="xs:string">
    <xs:pattern value="(true|false)"/>
  </xs:restriction>
</xs:simpleType>"#,
        )
        .unwrap();

        assert_eq!(simple_type.name(), Name::new("NX_BOOLEAN"));
        assert_eq!(simple_type.base(), Some(Name::new("xs:string")));
        assert_eq!(simple_type.patterns(), ["(true|false)"]);
        assert_eq!(simple_type.max_length(), None);
    }

    #[test]
    fn test_union_members() {
        let simple_type = parse_first(
            r#"<xs:simpleType name="NX_NUMBER">
  <xs:union memberTypes="nx:NX_INT nx:NX_FLOAT xs:nonNegativeInteger"/>
</xs:simpleType>"#,
        )
        .unwrap();

        assert_eq!(
            simple_type.union_members(),
            [
                Name::new("NX_INT"),
                Name::new("NX_FLOAT"),
                Name::new("xs:nonNegativeInteger"),
            ]
        );
        assert_eq!(simple_type.base(), None);
    }

    #[test]
    fn test_missing_name() {
        let err = parse_first(r#"<xs:simpleType><xs:restriction base="xs:string"/></xs:simpleType>"#)
            .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E103));
    }

    #[test]
    fn test_list_is_rejected() {
        let err = parse_first(
            r#"<xs:simpleType name="NX_DIMS">
  <xs:list itemType="xs:int"/>
</xs:simpleType>"#,
        )
        .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E100));
        assert_eq!(
            err.message(),
            "NX_DIMS (line 3): unexpected xs:simpleType child node `xs:list`"
        );
    }
}
