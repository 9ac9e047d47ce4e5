//! DELETE statements.

use crate::clause::{Clause, Scope, TableCheck, Where, render_table};
use crate::dialect::Backend;
use crate::error::BuildResult;
use crate::qb::expr::Expr;
use crate::qb::traits::Statement;
use crate::render::RenderContext;
use crate::schema::{Table, TableSet};

/// DELETE statement builder.
///
/// The WHERE clause is mandatory; use [`DeleteStatement::unconditionally`]
/// to delete every row on purpose.
#[derive(Clone, Debug)]
pub struct DeleteStatement {
    backend: Option<Backend>,
    table: Table,
    filter: Clause<Where<true>>,
}

impl DeleteStatement {
    pub fn new(table: &Table) -> Self {
        Self {
            backend: None,
            table: table.clone(),
            filter: Clause::Absent,
        }
    }

    pub fn with_backend(backend: &Backend, table: &Table) -> Self {
        Self {
            backend: Some(backend.clone()),
            ..Self::new(table)
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    fn provided(&self) -> TableSet {
        [self.table.clone()].into_iter().collect()
    }

    fn scope(&self) -> Scope {
        Scope::new(self.provided()).with_target(&self.table)
    }

    // ==================== WHERE ====================

    pub fn filter(&self, condition: Expr) -> BuildResult<Self> {
        let filter = self.filter.attach(
            "filter",
            vec![condition],
            false,
            self.backend.as_ref(),
            &self.scope(),
        )?;
        Ok(Self {
            filter,
            ..self.clone()
        })
    }

    /// Delete every row.
    pub fn unconditionally(&self) -> BuildResult<Self> {
        let filter = self.filter.attach_empty("unconditionally")?;
        Ok(Self {
            filter,
            ..self.clone()
        })
    }

    pub fn dynamic_filter<I>(&self, conditions: I) -> BuildResult<Self>
    where
        I: IntoIterator<Item = Expr>,
    {
        let filter = self.filter.attach(
            "dynamic_filter",
            conditions.into_iter().collect(),
            true,
            self.backend.as_ref(),
            &self.scope(),
        )?;
        Ok(Self {
            filter,
            ..self.clone()
        })
    }

    pub fn add_filter(&mut self, condition: Expr) -> BuildResult<()> {
        let scope = self.scope();
        self.filter.add(
            "add_filter",
            vec![condition],
            TableCheck::Required,
            self.backend.as_ref(),
            &scope,
        )
    }

    pub fn add_filter_ntc(&mut self, condition: Expr) -> BuildResult<()> {
        let scope = self.scope();
        self.filter.add(
            "add_filter_ntc",
            vec![condition],
            TableCheck::Skip,
            self.backend.as_ref(),
            &scope,
        )
    }
}

impl Statement for DeleteStatement {
    const KIND: &'static str = "DELETE";

    fn backend(&self) -> Option<&Backend> {
        self.backend.as_ref()
    }

    fn check_consistency(&self) -> BuildResult<()> {
        self.filter.verdict(&self.provided())
    }

    fn check_support(&self, backend: &Backend) -> BuildResult<()> {
        self.filter.check_support(backend)
    }

    fn render(&self, ctx: &mut RenderContext<'_>) {
        ctx.push("DELETE FROM ");
        render_table(&self.table, ctx);
        self.filter.render(ctx);
    }
}
