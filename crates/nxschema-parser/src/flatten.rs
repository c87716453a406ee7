//! SimpleType flattening.
//!
//! A named simple type whose `base` names another named simple type takes
//! over that base's `maxLength` and patterns, and its own base is rewritten
//! to the base's base. [`FlattenMode::SingleHop`] makes one pass over the
//! cross-reference in declaration order; [`FlattenMode::Fixpoint`] repeats
//! the pass until no base names a named simple type.

use log::{debug, trace};

use nxschema_core::{ConstructKind, FlattenMode, Name, Node, NodeId, SimpleType};

use crate::{
    context::BuildContext,
    document::SchemaDocument,
    error::{Diagnostic, ErrorCode, Result},
};

/// Flattens every named simple type in the cross-reference.
///
/// Returns the number of folds performed.
///
/// # Errors
///
/// `E105` when a simple type ends up derived from itself.
pub(crate) fn flatten_simple_types(
    doc: &SchemaDocument<'_>,
    ctx: &mut BuildContext,
    mode: FlattenMode,
) -> Result<usize> {
    let named = ctx.named(ConstructKind::SimpleType);
    let mut folds = 0;
    let mut rounds = 0;

    loop {
        let folded = flatten_pass(doc, ctx, &named)?;
        folds += folded;
        rounds += 1;
        if mode == FlattenMode::SingleHop || folded == 0 {
            break;
        }
        // Each fold shortens an acyclic chain by one, and cycles collapse
        // into a self-derivation, so this only trips on a defect.
        if rounds > named.len() {
            let (name, id) = named
                .iter()
                .copied()
                .find(|(_, id)| base_type(ctx, *id).is_some())
                .unwrap_or(named[0]);
            return Err(self_derived(doc, ctx, name, id));
        }
    }

    debug!(mode:? = mode, rounds, folds; "SimpleType flattening complete");
    Ok(folds)
}

/// The named simple type a simple type's base resolves to.
fn base_type(ctx: &BuildContext, id: NodeId) -> Option<NodeId> {
    let base = ctx.node(id).as_simple_type()?.base()?;
    ctx.lookup_name(base)
        .filter(|base_id| ctx.node(*base_id).as_simple_type().is_some())
}

fn flatten_pass(
    doc: &SchemaDocument<'_>,
    ctx: &mut BuildContext,
    named: &[(Name, NodeId)],
) -> Result<usize> {
    let mut folded = 0;
    for &(name, id) in named {
        let Some(derived) = ctx.node(id).as_simple_type() else {
            continue;
        };
        if derives_from(ctx, derived, id) {
            return Err(self_derived(doc, ctx, name, id));
        }
        let Some(base_id) = base_type(ctx, id) else {
            continue;
        };
        let Some(base) = ctx.node(base_id).as_simple_type() else {
            continue;
        };

        let mut flattened = derived.clone();
        flattened.fold_base(base);
        trace!(name:% = name, base:% = base.name(); "Folded simple type base");
        if derives_from(ctx, &flattened, id) {
            return Err(self_derived(doc, ctx, name, id));
        }
        ctx.replace(id, Node::SimpleType(flattened));
        folded += 1;
    }
    Ok(folded)
}

/// Whether the base of `simple_type` resolves to the declaration `id`.
fn derives_from(ctx: &BuildContext, simple_type: &SimpleType, id: NodeId) -> bool {
    simple_type
        .base()
        .and_then(|base| ctx.lookup_name(base))
        == Some(id)
}

fn self_derived(doc: &SchemaDocument<'_>, ctx: &BuildContext, name: Name, id: NodeId) -> Diagnostic {
    let origin = ctx.origin(id);
    Diagnostic::error(format!(
        "{name} (line {}): simple type is derived from itself",
        origin.line()
    ))
    .with_code(ErrorCode::E105)
    .with_label(doc.span_at(origin.offset()), "declared here")
    .with_help("a chain of restriction bases must end in a type that is not a named simple type")
}
