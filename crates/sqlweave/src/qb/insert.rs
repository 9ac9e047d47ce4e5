//! INSERT statements.

use crate::clause::{
    Assignment, Clause, InsertValues, Scope, TableCheck, check_required_inserts, render_table,
};
use crate::dialect::Backend;
use crate::error::BuildResult;
use crate::qb::traits::Statement;
use crate::render::RenderContext;
use crate::schema::{Table, TableSet};

/// INSERT statement builder (single row).
///
/// Values are given as assignments (`col.to(value)`) and rendered as a column
/// list plus a VALUES row. The row must cover every column the table declares
/// with [`Table::require_insert`]: a static `set` and `default_values` are
/// checked when called, a dynamic row when the statement is finalized.
#[derive(Clone, Debug)]
pub struct InsertStatement {
    backend: Option<Backend>,
    table: Table,
    values: Clause<InsertValues>,
}

impl InsertStatement {
    pub fn new(table: &Table) -> Self {
        Self {
            backend: None,
            table: table.clone(),
            values: Clause::Absent,
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

    pub fn set<I>(&self, assignments: I) -> BuildResult<Self>
    where
        I: IntoIterator<Item = Assignment>,
    {
        self.with_values("set", assignments.into_iter().collect(), false)
    }

    pub fn dynamic_set<I>(&self, assignments: I) -> BuildResult<Self>
    where
        I: IntoIterator<Item = Assignment>,
    {
        self.with_values("dynamic_set", assignments.into_iter().collect(), true)
    }

    /// `INSERT INTO t DEFAULT VALUES`; rejected when the table has required columns.
    pub fn default_values(&self) -> BuildResult<Self> {
        let values = self.values.attach_empty("default_values")?;
        check_required_inserts(&self.table, std::iter::empty())?;
        Ok(Self {
            values,
            ..self.clone()
        })
    }

    fn with_values(
        &self,
        method: &'static str,
        assignments: Vec<Assignment>,
        dynamic: bool,
    ) -> BuildResult<Self> {
        let values = self.values.attach(
            method,
            assignments,
            dynamic,
            self.backend.as_ref(),
            &self.scope(),
        )?;
        Ok(Self {
            values,
            ..self.clone()
        })
    }

    pub fn add_assignment(&mut self, assignment: Assignment) -> BuildResult<()> {
        self.add_with("add_assignment", vec![assignment], TableCheck::Required)
    }

    pub fn add_assignment_ntc(&mut self, assignment: Assignment) -> BuildResult<()> {
        self.add_with("add_assignment_ntc", vec![assignment], TableCheck::Skip)
    }

    /// Add several values at once; either all are added or none.
    pub fn add_assignments<I>(&mut self, assignments: I) -> BuildResult<()>
    where
        I: IntoIterator<Item = Assignment>,
    {
        self.add_with(
            "add_assignments",
            assignments.into_iter().collect(),
            TableCheck::Required,
        )
    }

    fn add_with(
        &mut self,
        method: &'static str,
        assignments: Vec<Assignment>,
        table_check: TableCheck,
    ) -> BuildResult<()> {
        let scope = self.scope();
        self.values
            .add(method, assignments, table_check, self.backend.as_ref(), &scope)
    }
}

impl Statement for InsertStatement {
    const KIND: &'static str = "INSERT";

    fn backend(&self) -> Option<&Backend> {
        self.backend.as_ref()
    }

    fn check_consistency(&self) -> BuildResult<()> {
        self.values.verdict(&self.provided())?;
        match self.values.data() {
            Some(data) => check_required_inserts(&self.table, data.iter()),
            None => Ok(()),
        }
    }

    fn check_support(&self, backend: &Backend) -> BuildResult<()> {
        self.values.check_support(backend)
    }

    fn render(&self, ctx: &mut RenderContext<'_>) {
        ctx.push("INSERT INTO ");
        render_table(&self.table, ctx);
        self.values.render(ctx);
    }
}
