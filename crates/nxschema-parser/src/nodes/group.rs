use log::trace;
use roxmltree::Node as XmlNode;

use nxschema_core::{Group, Name};

use crate::{
    document::SchemaDocument,
    error::Result,
    nodes::{occurs, reference},
    tag::Tag,
};

/// Parses an `xs:group` definition or reference at any depth.
pub(crate) fn parse_group(doc: &SchemaDocument<'_>, xml: XmlNode<'_, '_>) -> Result<Group> {
    doc.expect_tag(xml, Tag::Group)?;

    let (min, max) = occurs(doc, xml)?;
    let group =
        Group::new(xml.attribute("name").map(Name::new), reference(xml, "ref")).with_occurs(min, max);

    for child in xml.children() {
        let Some(tag) = Tag::of(child) else {
            continue;
        };
        match tag {
            Tag::Annotation | Tag::Sequence | Tag::Choice | Tag::All => {}
            _ => return Err(doc.unexpected_child(xml, child)),
        }
    }

    trace!(group:? = group; "Parsed group");
    Ok(group)
}

#[cfg(test)]
mod tests {
    use nxschema_core::Occurs;

    use super::*;
    use crate::{error::ErrorCode, nodes::test_utils::schema};

    fn parse_all(body: &str) -> Vec<Result<Group>> {
        let source = schema(body);
        let doc = SchemaDocument::parse(&source).unwrap();
        doc.descendants(Tag::Group)
            .map(|xml| parse_group(&doc, xml))
            .collect()
    }

    #[test]
    fn test_definition_and_reference() {
        let groups = parse_all(
            r#"<xs:group name="groupGroup">
  <xs:sequence><xs:element name="group" type="nx:groupType"/></xs:sequence>
</xs:group>
<xs:complexType name="groupType">
  <xs:sequence><xs:group ref="nx:groupGroup" minOccurs="0" maxOccurs="unbounded"/></xs:sequence>
</xs:complexType>"#,
        );

        let definition = groups[0].as_ref().unwrap();
        assert_eq!(definition.name(), Some(Name::new("groupGroup")));
        assert_eq!(definition.ref_name(), None);

        let reference = groups[1].as_ref().unwrap();
        assert_eq!(reference.name(), None);
        assert_eq!(reference.ref_name(), Some(Name::new("groupGroup")));
        assert_eq!(reference.min_occurs(), Some(Occurs::Bounded(0)));
        assert_eq!(reference.max_occurs(), Some(Occurs::Unbounded));
    }

    #[test]
    fn test_unexpected_child() {
        let groups = parse_all(
            r#"<xs:group name="g">
  <xs:attribute name="stray"/>
</xs:group>"#,
        );

        let err = groups[0].as_ref().unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E100));
        assert!(err.message().starts_with("g (line 3)"));
    }
}
