//! Plain-text catalog reports.
//!
//! The report lists every cataloged construct grouped by kind in pass order,
//! then the cross-reference names in sorted order, then the definition
//! root's children. Output is deterministic for a given document.

use std::fmt::{self, Write};

use nxschema_core::{Catalog, ConstructKind, Node, SchemaNode};

/// Writes the full catalog report.
pub fn catalog_report(catalog: &Catalog) -> String {
    let mut out = String::new();
    write_catalog(&mut out, catalog).expect("Writing to String buffer is infallible");
    out
}

/// Writes only the definition root and its children.
pub fn root_report(catalog: &Catalog) -> String {
    let mut out = String::new();
    write_root(&mut out, catalog).expect("Writing to String buffer is infallible");
    out
}

fn write_catalog(out: &mut String, catalog: &Catalog) -> fmt::Result {
    for kind in ConstructKind::ALL {
        let mut entries: Vec<_> = catalog
            .positions()
            .filter(|(key, _)| key.kind() == kind)
            .collect();
        if entries.is_empty() {
            continue;
        }
        entries.sort_by_key(|(key, _)| key.offset());

        writeln!(out, "[{kind}] {}", entries.len())?;
        for (key, id) in entries {
            writeln!(out, "  line {:>5}  {}", key.line(), catalog.node(id))?;
        }
        writeln!(out)?;
    }

    let mut names: Vec<_> = catalog
        .names()
        .map(|(name, id)| (name.to_string(), id))
        .collect();
    names.sort();
    writeln!(out, "[names] {}", names.len())?;
    for (name, id) in names {
        writeln!(out, "  {name} -> {}", catalog.node(id).kind())?;
    }
    writeln!(out)?;

    write_root(out, catalog)
}

fn write_root(out: &mut String, catalog: &Catalog) -> fmt::Result {
    let root_id = catalog.definition_root_id();
    writeln!(
        out,
        "[definition] {} (line {})",
        catalog.node(root_id),
        catalog.origin(root_id).line()
    )?;
    for (_, child) in catalog.definition_children() {
        writeln!(out, "  {child}")?;
        if let Some(grandchildren) = child.children() {
            for grandchild in grandchildren {
                writeln!(out, "    {}", catalog.node(*grandchild))?;
            }
        }
    }
    Ok(())
}

/// Short label of a node for log output.
pub fn describe(node: &Node) -> String {
    match node.name() {
        Some(name) => format!("{} `{name}`", node.kind()),
        None => node.kind().to_string(),
    }
}
