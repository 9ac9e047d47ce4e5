//! The SELECT column list.

use super::check::first_duplicate;
use super::{ClauseData, ClauseKind, ClauseName, Fragment, Scope, Step};
use crate::dialect::Feature;
use crate::error::{BuildError, BuildResult};
use crate::ident::Ident;
use crate::qb::expr::Value;
use crate::render::{Render, RenderContext, render_list};
use crate::schema::{Column, RequiredTables, TableSet};

/// One selected expression with an optional output alias.
#[derive(Debug, Clone)]
pub struct SelectColumn {
    value: Value,
    alias: Option<Ident>,
}

impl SelectColumn {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            alias: None,
        }
    }

    /// Rename the output column (`expr AS alias`).
    pub fn alias(mut self, alias: &str) -> BuildResult<Self> {
        self.alias = Some(Ident::parse_simple(alias)?);
        Ok(self)
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Name of the output column, when it has one.
    pub fn output_name(&self) -> Option<&Ident> {
        match (&self.alias, &self.value) {
            (Some(alias), _) => Some(alias),
            (None, Value::Column(col)) => Some(col.name()),
            (None, _) => None,
        }
    }
}

impl From<Column> for SelectColumn {
    fn from(col: Column) -> Self {
        Self::new(col)
    }
}

impl From<&Column> for SelectColumn {
    fn from(col: &Column) -> Self {
        Self::new(col)
    }
}

impl From<Value> for SelectColumn {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

impl Render for SelectColumn {
    fn render(&self, ctx: &mut RenderContext<'_>) {
        self.value.render(ctx);
        if let Some(alias) = &self.alias {
            ctx.push(" AS ").push_ident(alias);
        }
    }
}

impl RequiredTables for SelectColumn {
    fn collect_tables(&self, out: &mut TableSet) {
        self.value.collect_tables(out);
    }
}

impl Fragment for SelectColumn {
    fn features(&self, out: &mut Vec<Feature>) {
        self.value.collect_features(out);
    }
}

/// The selected columns. Mandatory on every SELECT.
#[derive(Debug, Clone, Copy)]
pub struct SelectColumns;

impl ClauseKind for SelectColumns {
    type Fragment = SelectColumn;

    const NAME: ClauseName = ClauseName::Columns;
    const FRAGMENT: &'static str = "column";
    const REQUIRED: Option<&'static str> = Some("columns(...)");

    fn check_rules(
        existing: &ClauseData<SelectColumn>,
        items: &[SelectColumn],
        _scope: &Scope,
        _step: Step,
    ) -> BuildResult<()> {
        // Result rows are addressed by name, so output names must be unique.
        let existing: Vec<&Ident> = existing.iter().filter_map(SelectColumn::output_name).collect();
        let named: Vec<&Ident> = items.iter().filter_map(SelectColumn::output_name).collect();
        if let Some(dup) = first_duplicate(&existing, &named, |name| *name) {
            return Err(BuildError::DuplicateFragment {
                clause: Self::NAME,
                fragment: format!("column name {}", dup),
            });
        }
        Ok(())
    }

    fn render(data: &ClauseData<SelectColumn>, ctx: &mut RenderContext<'_>) {
        render_list(data.iter(), ",", ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::dialect::Backend;
    use crate::schema::Table;

    #[test]
    fn test_render_with_alias() {
        let users = Table::new("users").unwrap();
        let mut data = ClauseData::new(vec![
            SelectColumn::from(users.column("id").unwrap()),
            SelectColumn::from(users.column("name").unwrap()).alias("username").unwrap(),
        ]);
        data.dynamic_items_mut()
            .append(SelectColumn::new(Value::Int(1)).alias("one").unwrap());

        let backend = Backend::postgres();
        let config = RenderConfig::default();
        let mut ctx = RenderContext::new(&backend, &config);
        SelectColumns::render(&data, &mut ctx);
        assert_eq!(ctx.sql(), "users.id,users.name AS username,1 AS one");
    }

    #[test]
    fn test_duplicate_output_names() {
        let users = Table::new("users").unwrap();
        let orders = Table::new("orders").unwrap();
        let scope = Scope::new(TableSet::new());
        let existing = ClauseData::new(vec![SelectColumn::from(users.column("id").unwrap())]);

        let err = SelectColumns::check_rules(
            &existing,
            &[SelectColumn::from(orders.column("id").unwrap())],
            &scope,
            Step::Attach { dynamic: false },
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::DuplicateFragment { .. }));

        let renamed = SelectColumn::from(orders.column("id").unwrap())
            .alias("order_id")
            .unwrap();
        assert!(
            SelectColumns::check_rules(&existing, &[renamed], &scope, Step::Attach { dynamic: false })
                .is_ok()
        );
    }
}
