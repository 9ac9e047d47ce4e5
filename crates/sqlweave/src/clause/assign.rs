//! Column assignments for UPDATE ... SET and INSERT ... VALUES.

use super::check::first_duplicate;
use super::{ClauseData, ClauseKind, ClauseName, Fragment, Scope, Step};
use crate::dialect::Feature;
use crate::error::{BuildError, BuildResult};
use crate::qb::expr::Value;
use crate::render::{Render, RenderContext, render_list};
use crate::schema::{Column, RequiredTables, Table, TableSet};
use serde::Serialize;

/// `column = value`
#[derive(Debug, Clone)]
pub struct Assignment {
    column: Column,
    value: Value,
}

impl Assignment {
    pub fn new(column: Column, value: impl Into<Value>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }

    pub fn column(&self) -> &Column {
        &self.column
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Assignment constructors on columns.
impl Column {
    /// `column = value`
    pub fn to(&self, value: impl Into<Value>) -> Assignment {
        Assignment::new(self.clone(), value)
    }

    /// `column = '<json>'`, serializing `value` with serde.
    pub fn to_json<T: Serialize + ?Sized>(&self, value: &T) -> BuildResult<Assignment> {
        let json = serde_json::to_value(value).map_err(|e| {
            BuildError::validation(format!("cannot serialize value for {}: {}", self.qualified_name(), e))
        })?;
        Ok(self.to(Value::Json(json)))
    }

    /// `column = NULL`
    pub fn to_null(&self) -> Assignment {
        self.to(Value::Null)
    }

    /// `column = DEFAULT`
    pub fn to_default(&self) -> Assignment {
        self.to(Value::Default)
    }
}

/// Assignment targets render unqualified; they always belong to the
/// statement's own table.
impl Render for Assignment {
    fn render(&self, ctx: &mut RenderContext<'_>) {
        ctx.push_ident(self.column.name()).push_char('=');
        self.value.render(ctx);
    }
}

impl RequiredTables for Assignment {
    fn collect_tables(&self, out: &mut TableSet) {
        self.column.collect_tables(out);
        self.value.collect_tables(out);
    }
}

impl Fragment for Assignment {
    fn features(&self, out: &mut Vec<Feature>) {
        self.value.collect_features(out);
    }
}

/// Rules shared by UPDATE and INSERT assignment lists, in order: duplicate
/// target, prohibited target, single table.
fn check_assignments(
    clause: ClauseName,
    existing: &ClauseData<Assignment>,
    items: &[Assignment],
    scope: &Scope,
    step: Step,
    prohibited: fn(&Column) -> Option<BuildError>,
) -> BuildResult<()> {
    let existing: Vec<&Assignment> = existing.iter().collect();
    let added: Vec<&Assignment> = items.iter().collect();
    if let Some(dup) = first_duplicate(&existing, &added, |a| a.column.key()) {
        return Err(BuildError::DuplicateColumn {
            clause,
            column: dup.column.qualified_name(),
        });
    }

    if let Some(err) = items.iter().find_map(|a| prohibited(&a.column)) {
        return Err(err);
    }

    if step.checks_tables() {
        let mut tables: TableSet = items.iter().map(|a| a.column.table().clone()).collect();
        tables.extend(scope.target.clone());
        if tables.len() > 1 {
            return Err(BuildError::MultipleTables {
                clause,
                tables: tables.iter().map(ToString::to_string).collect(),
            });
        }
    }
    Ok(())
}

/// UPDATE ... SET. Mandatory; at least one assignment.
#[derive(Debug, Clone, Copy)]
pub struct UpdateAssignments;

impl ClauseKind for UpdateAssignments {
    type Fragment = Assignment;

    const NAME: ClauseName = ClauseName::Assignments;
    const FRAGMENT: &'static str = "assignment";
    const REQUIRED: Option<&'static str> = Some("set(...)");

    fn check_rules(
        existing: &ClauseData<Assignment>,
        items: &[Assignment],
        scope: &Scope,
        step: Step,
    ) -> BuildResult<()> {
        check_assignments(Self::NAME, existing, items, scope, step, |col| {
            col.is_must_not_update().then(|| BuildError::NotUpdatable {
                column: col.qualified_name(),
            })
        })
    }

    fn render(data: &ClauseData<Assignment>, ctx: &mut RenderContext<'_>) {
        ctx.push(" SET ");
        let statics = data.static_items();
        let dynamics = data.dynamic_items();
        render_list(statics, ",", ctx);
        if !statics.is_empty() && !dynamics.is_empty() {
            ctx.push_char(',');
        }
        render_list(dynamics.iter(), ",", ctx);
    }
}

/// Every column `target` declares with [`Table::require_insert`] must be
/// assigned by one of `values`.
///
/// [`Table::require_insert`]: crate::schema::Table::require_insert
pub(crate) fn check_required_inserts<'a>(
    target: &Table,
    values: impl IntoIterator<Item = &'a Assignment>,
) -> BuildResult<()> {
    let values: Vec<&Assignment> = values.into_iter().collect();
    let missing: Vec<String> = target
        .required_inserts()
        .iter()
        .filter(|name| !values.iter().any(|a| a.column.name() == *name))
        .map(ToString::to_string)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(BuildError::MissingRequiredColumns {
            clause: ClauseName::InsertValues,
            columns: missing,
        })
    }
}

/// INSERT ... VALUES. Mandatory; `default_values()` attaches it empty.
#[derive(Debug, Clone, Copy)]
pub struct InsertValues;

impl ClauseKind for InsertValues {
    type Fragment = Assignment;

    const NAME: ClauseName = ClauseName::InsertValues;
    const FRAGMENT: &'static str = "assignment";
    const REQUIRED: Option<&'static str> = Some("set(...) or default_values()");

    fn check_rules(
        existing: &ClauseData<Assignment>,
        items: &[Assignment],
        scope: &Scope,
        step: Step,
    ) -> BuildResult<()> {
        check_assignments(Self::NAME, existing, items, scope, step, |col| {
            col.is_must_not_insert().then(|| BuildError::NotInsertable {
                column: col.qualified_name(),
            })
        })?;

        // A dynamic list may still grow; it is checked when the statement is finalized.
        match (&scope.target, step) {
            (Some(target), Step::Attach { dynamic: false }) => check_required_inserts(target, items),
            _ => Ok(()),
        }
    }

    fn render(data: &ClauseData<Assignment>, ctx: &mut RenderContext<'_>) {
        if data.is_empty() {
            ctx.push(" DEFAULT VALUES");
            return;
        }
        ctx.push(" (");
        for (i, a) in data.iter().enumerate() {
            if i > 0 {
                ctx.push_char(',');
            }
            ctx.push_ident(a.column.name());
        }
        ctx.push(") VALUES (");
        for (i, a) in data.iter().enumerate() {
            if i > 0 {
                ctx.push_char(',');
            }
            a.value.render(ctx);
        }
        ctx.push_char(')');
    }
}
