//! SELECT flags (`DISTINCT`, `ALL`, ...).

use super::check::first_duplicate;
use super::{ClauseData, ClauseKind, ClauseName, Fragment, Scope, Step};
use crate::dialect::Feature;
use crate::error::{BuildError, BuildResult};
use crate::render::{Render, RenderContext, render_list};
use crate::schema::{RequiredTables, TableSet};
use std::fmt;

/// A keyword between `SELECT` and the column list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    Distinct,
    All,
    /// MySQL only.
    StraightJoin,
    /// MySQL only.
    SqlNoCache,
}

impl Flag {
    pub fn as_sql(self) -> &'static str {
        match self {
            Flag::Distinct => "DISTINCT",
            Flag::All => "ALL",
            Flag::StraightJoin => "STRAIGHT_JOIN",
            Flag::SqlNoCache => "SQL_NO_CACHE",
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl Render for Flag {
    fn render(&self, ctx: &mut RenderContext<'_>) {
        ctx.push(self.as_sql());
    }
}

impl RequiredTables for Flag {
    fn collect_tables(&self, _out: &mut TableSet) {}
}

impl Fragment for Flag {
    fn features(&self, out: &mut Vec<Feature>) {
        match self {
            Flag::StraightJoin => out.push(Feature::StraightJoin),
            Flag::SqlNoCache => out.push(Feature::SqlNoCache),
            Flag::Distinct | Flag::All => {}
        }
    }
}

/// The SELECT flag list. An empty list is valid and renders nothing.
#[derive(Debug, Clone, Copy)]
pub struct SelectFlags;

impl ClauseKind for SelectFlags {
    type Fragment = Flag;

    const NAME: ClauseName = ClauseName::Flags;
    const FRAGMENT: &'static str = "flag";
    const ALLOW_EMPTY: bool = true;

    fn check_rules(
        _existing: &ClauseData<Flag>,
        items: &[Flag],
        _scope: &Scope,
        step: Step,
    ) -> BuildResult<()> {
        // Flags added later are not compared against the static ones.
        if let Step::Attach { .. } = step {
            if let Some(dup) = first_duplicate(&[], items, |f| *f) {
                return Err(BuildError::DuplicateFragment {
                    clause: Self::NAME,
                    fragment: dup.to_string(),
                });
            }
        }
        Ok(())
    }

    fn render(data: &ClauseData<Flag>, ctx: &mut RenderContext<'_>) {
        let statics = data.static_items();
        render_list(statics, " ", ctx);
        if !statics.is_empty() {
            ctx.push_char(' ');
        }
        let dynamics = data.dynamic_items();
        render_list(dynamics.iter(), ",", ctx);
        if !dynamics.is_empty() {
            ctx.push_char(' ');
        }
    }
}
