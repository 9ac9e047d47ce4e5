//! FROM lists and joins.
//!
//! A FROM clause is the only clause that provides tables. Its first item is a
//! plain table; later items either add another table (`, t`) or join one
//! (`JOIN t ON ...`). A join condition may only read tables provided by the
//! items before it, including the joined table itself.

use super::{ClauseData, ClauseKind, ClauseName, Clause, Fragment, Scope, Step};
use crate::dialect::Feature;
use crate::error::{BuildError, BuildResult};
use crate::qb::expr::Expr;
use crate::render::{Render, RenderContext};
use crate::schema::{RequiredTables, Table, TableSet, unknown_tables};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinKind {
    fn as_sql(self) -> &'static str {
        match self {
            JoinKind::Inner => " INNER JOIN ",
            JoinKind::Left => " LEFT OUTER JOIN ",
            JoinKind::Right => " RIGHT OUTER JOIN ",
            JoinKind::Full => " FULL OUTER JOIN ",
            JoinKind::Cross => " CROSS JOIN ",
        }
    }
}

/// One entry of a FROM list.
#[derive(Debug, Clone)]
pub enum FromItem {
    Table(Table),
    Join {
        kind: JoinKind,
        table: Table,
        on: Option<Expr>,
    },
}

impl FromItem {
    /// The table this item makes visible.
    pub fn table(&self) -> &Table {
        match self {
            FromItem::Table(table) | FromItem::Join { table, .. } => table,
        }
    }

    fn is_join(&self) -> bool {
        matches!(self, FromItem::Join { .. })
    }
}

/// `INNER JOIN table ON on`
pub fn join(table: &Table, on: Expr) -> FromItem {
    FromItem::Join {
        kind: JoinKind::Inner,
        table: table.clone(),
        on: Some(on),
    }
}

/// `LEFT OUTER JOIN table ON on`
pub fn left_join(table: &Table, on: Expr) -> FromItem {
    FromItem::Join {
        kind: JoinKind::Left,
        table: table.clone(),
        on: Some(on),
    }
}

/// `RIGHT OUTER JOIN table ON on`
pub fn right_join(table: &Table, on: Expr) -> FromItem {
    FromItem::Join {
        kind: JoinKind::Right,
        table: table.clone(),
        on: Some(on),
    }
}

/// `FULL OUTER JOIN table ON on` (not available on MySQL)
pub fn full_join(table: &Table, on: Expr) -> FromItem {
    FromItem::Join {
        kind: JoinKind::Full,
        table: table.clone(),
        on: Some(on),
    }
}

/// `CROSS JOIN table`
pub fn cross_join(table: &Table) -> FromItem {
    FromItem::Join {
        kind: JoinKind::Cross,
        table: table.clone(),
        on: None,
    }
}

impl From<Table> for FromItem {
    fn from(table: Table) -> Self {
        FromItem::Table(table)
    }
}

impl From<&Table> for FromItem {
    fn from(table: &Table) -> Self {
        FromItem::Table(table.clone())
    }
}

/// `name [AS alias]`
pub(crate) fn render_table(table: &Table, ctx: &mut RenderContext<'_>) {
    ctx.push_ident(table.name());
    if let Some(alias) = table.alias_name() {
        ctx.push(" AS ").push_ident(alias);
    }
}

impl Render for FromItem {
    fn render(&self, ctx: &mut RenderContext<'_>) {
        match self {
            FromItem::Table(table) => render_table(table, ctx),
            FromItem::Join { kind, table, on } => {
                ctx.push(kind.as_sql());
                render_table(table, ctx);
                if let Some(on) = on {
                    ctx.push(" ON ");
                    on.render(ctx);
                }
            }
        }
    }
}

/// Tables read by the join condition.
impl RequiredTables for FromItem {
    fn collect_tables(&self, out: &mut TableSet) {
        if let FromItem::Join { on: Some(on), .. } = self {
            on.collect_tables(out);
        }
    }
}

impl Fragment for FromItem {
    fn features(&self, out: &mut Vec<Feature>) {
        if let FromItem::Join { kind, on, .. } = self {
            if *kind == JoinKind::Full {
                out.push(Feature::FullJoin);
            }
            if let Some(on) = on {
                on.collect_features(out);
            }
        }
    }
}

/// The FROM clause of SELECT and UPDATE.
#[derive(Debug, Clone, Copy)]
pub struct FromTables;

impl ClauseKind for FromTables {
    type Fragment = FromItem;

    const NAME: ClauseName = ClauseName::From;
    const FRAGMENT: &'static str = "table";

    /// Joins may only read tables listed before them (or the joined table).
    fn check_visibility(
        existing: &ClauseData<FromItem>,
        items: &[FromItem],
        _scope: &Scope,
    ) -> BuildResult<()> {
        let mut provided: TableSet = existing.iter().map(|item| item.table().clone()).collect();
        for item in items {
            provided.insert(item.table().clone());
            let unknown = unknown_tables(&item.required_tables(), &provided);
            if !unknown.is_empty() {
                return Err(BuildError::UnknownTables {
                    clause: Self::NAME,
                    tables: unknown,
                });
            }
        }
        Ok(())
    }

    /// Checked item by item at attach time.
    fn check_final(_data: &ClauseData<FromItem>, _provided: &TableSet) -> BuildResult<()> {
        Ok(())
    }

    fn check_rules(
        existing: &ClauseData<FromItem>,
        items: &[FromItem],
        scope: &Scope,
        _step: Step,
    ) -> BuildResult<()> {
        if existing.is_empty() {
            if let Some(first) = items.first().filter(|item| item.is_join()) {
                return Err(BuildError::validation(format!(
                    "from list must start with a table, not a join of {}",
                    first.table()
                )));
            }
        }

        let mut seen: Vec<&Table> = scope.target.iter().collect();
        seen.extend(existing.iter().map(FromItem::table));
        for item in items {
            let table = item.table();
            if seen.contains(&table) {
                return Err(BuildError::DuplicateFragment {
                    clause: Self::NAME,
                    fragment: format!("table {}", table),
                });
            }
            seen.push(table);
        }
        Ok(())
    }

    fn render(data: &ClauseData<FromItem>, ctx: &mut RenderContext<'_>) {
        if data.is_empty() {
            return;
        }
        ctx.push(" FROM ");
        for (i, item) in data.iter().enumerate() {
            if i > 0 && !item.is_join() {
                ctx.push_char(',');
            }
            item.render(ctx);
        }
    }
}

/// Tables a FROM clause makes visible.
pub(crate) fn provided_tables(from: &Clause<FromTables>) -> TableSet {
    from.data()
        .map(|data| data.iter().map(|item| item.table().clone()).collect())
        .unwrap_or_default()
}
