//! Example: Walking a catalog built from the bundled NXDL schema
//!
//! This example builds the catalog of `schemas/nxdl.xsd`, prints the
//! definition root's children, and resolves a few names through the
//! cross-reference.

use std::path::PathBuf;

use nxschema::{ConstructKind, Node, SchemaBuilder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../schemas/nxdl.xsd");

    let catalog = SchemaBuilder::default().load(&path)?;
    println!("{} constructs cataloged\n", catalog.len());

    let root = catalog.definition_root();
    println!("definition root: {}", catalog.node(catalog.definition_root_id()));
    println!("children ({}):", root.children().len());
    for (id, child) in catalog.definition_children() {
        let origin = catalog.origin(id);
        match child {
            Node::Attribute(attribute) => println!(
                "  line {:>3}  attribute {} : {}{}",
                origin.line(),
                attribute.name().map(|n| n.to_string()).unwrap_or_default(),
                attribute.type_name(),
                if attribute.is_required() { " (required)" } else { "" }
            ),
            other => println!("  line {:>3}  {other}", origin.line()),
        }
    }

    println!("\nnamed simple types:");
    for name in ["validItemName", "validNXClassName", "NX_CHAR"] {
        if let Some(node) = catalog.resolve_kind(name, ConstructKind::SimpleType) {
            println!("  {name}: {node}");
        }
    }

    Ok(())
}
