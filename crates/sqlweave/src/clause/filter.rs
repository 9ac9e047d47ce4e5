//! WHERE clauses.

use super::{ClauseData, ClauseKind, ClauseName, Fragment};
use crate::dialect::Feature;
use crate::qb::expr::{Expr, render_conjunction};
use crate::render::RenderContext;

impl Fragment for Expr {
    fn features(&self, out: &mut Vec<Feature>) {
        self.collect_features(out);
    }
}

/// A WHERE clause; all conditions are AND-ed.
///
/// `MANDATORY` is set for UPDATE and DELETE, which must either filter or say
/// `unconditionally()` explicitly. An attached clause without conditions
/// renders nothing.
#[derive(Debug, Clone, Copy)]
pub struct Where<const MANDATORY: bool>;

impl<const MANDATORY: bool> ClauseKind for Where<MANDATORY> {
    type Fragment = Expr;

    const NAME: ClauseName = ClauseName::Where;
    const FRAGMENT: &'static str = "condition";
    const REQUIRED: Option<&'static str> = if MANDATORY {
        Some("filter(...) or unconditionally()")
    } else {
        None
    };

    fn render(data: &ClauseData<Expr>, ctx: &mut RenderContext<'_>) {
        if data.is_empty() {
            return;
        }
        ctx.push(" WHERE ");
        render_conjunction(data.iter(), ctx);
    }
}
