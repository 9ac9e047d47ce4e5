//! UPDATE statements.

use crate::clause::{
    Assignment, Clause, FromItem, FromTables, Scope, TableCheck, UpdateAssignments, Where, check,
    provided_tables, render_table,
};
use crate::dialect::{Backend, Feature};
use crate::error::BuildResult;
use crate::qb::expr::Expr;
use crate::qb::fragments;
use crate::qb::traits::Statement;
use crate::render::RenderContext;
use crate::schema::{Table, TableSet};

/// UPDATE statement builder.
///
/// Both the assignments and the WHERE clause are mandatory; use
/// [`UpdateStatement::unconditionally`] to update every row on purpose.
#[derive(Clone, Debug)]
pub struct UpdateStatement {
    backend: Option<Backend>,
    table: Table,
    assignments: Clause<UpdateAssignments>,
    from: Clause<FromTables>,
    filter: Clause<Where<true>>,
}

impl UpdateStatement {
    /// Create a static UPDATE of `table`.
    pub fn new(table: &Table) -> Self {
        Self {
            backend: None,
            table: table.clone(),
            assignments: Clause::Absent,
            from: Clause::Absent,
            filter: Clause::Absent,
        }
    }

    /// Create an UPDATE of `table` bound to `backend`.
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
        let mut tables = provided_tables(&self.from);
        tables.insert(self.table.clone());
        tables
    }

    fn scope(&self) -> Scope {
        Scope::new(self.provided())
            .with_target(&self.table)
            .deferred(self.from.is_absent())
    }

    fn add_scope(&self) -> Scope {
        Scope::new(self.provided()).with_target(&self.table)
    }

    // ==================== SET ====================

    /// Set the assignments. At least one is required, all for columns of the
    /// updated table, none repeated or declared `must_not_update`.
    pub fn set<I>(&self, assignments: I) -> BuildResult<Self>
    where
        I: IntoIterator<Item = Assignment>,
    {
        let assignments = self.assignments.attach(
            "set",
            assignments.into_iter().collect(),
            false,
            self.backend.as_ref(),
            &self.scope(),
        )?;
        Ok(Self {
            assignments,
            ..self.clone()
        })
    }

    /// Set the assignments (possibly none) and allow more to be added with
    /// [`Self::add_assignment`]. Requires a backend-bound statement.
    pub fn dynamic_set<I>(&self, assignments: I) -> BuildResult<Self>
    where
        I: IntoIterator<Item = Assignment>,
    {
        let assignments = self.assignments.attach(
            "dynamic_set",
            assignments.into_iter().collect(),
            true,
            self.backend.as_ref(),
            &self.scope(),
        )?;
        Ok(Self {
            assignments,
            ..self.clone()
        })
    }

    pub fn add_assignment(&mut self, assignment: Assignment) -> BuildResult<()> {
        self.add_assignments_with("add_assignment", vec![assignment], TableCheck::Required)
    }

    /// Add an assignment without the table checks.
    pub fn add_assignment_ntc(&mut self, assignment: Assignment) -> BuildResult<()> {
        self.add_assignments_with("add_assignment_ntc", vec![assignment], TableCheck::Skip)
    }

    /// Add several assignments at once; either all are added or none.
    pub fn add_assignments<I>(&mut self, assignments: I) -> BuildResult<()>
    where
        I: IntoIterator<Item = Assignment>,
    {
        self.add_assignments_with(
            "add_assignments",
            assignments.into_iter().collect(),
            TableCheck::Required,
        )
    }

    fn add_assignments_with(
        &mut self,
        method: &'static str,
        assignments: Vec<Assignment>,
        table_check: TableCheck,
    ) -> BuildResult<()> {
        let scope = self.add_scope();
        self.assignments
            .add(method, assignments, table_check, self.backend.as_ref(), &scope)
    }

    // ==================== FROM ====================

    /// `UPDATE t SET ... FROM others`; not available on MySQL.
    pub fn from<I>(&self, items: I) -> BuildResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<FromItem>,
    {
        let from_scope = Scope::new(TableSet::new()).with_target(&self.table);
        let from = self.from.attach(
            "from",
            fragments(items),
            false,
            self.backend.as_ref(),
            &from_scope,
        )?;
        if let Some(backend) = &self.backend {
            check::supports(&[Feature::UpdateFrom], backend)?;
        }
        Ok(Self {
            from,
            ..self.clone()
        })
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

    /// Update every row.
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
        let scope = self.add_scope();
        self.filter.add(
            "add_filter",
            vec![condition],
            TableCheck::Required,
            self.backend.as_ref(),
            &scope,
        )
    }

    pub fn add_filter_ntc(&mut self, condition: Expr) -> BuildResult<()> {
        let scope = self.add_scope();
        self.filter.add(
            "add_filter_ntc",
            vec![condition],
            TableCheck::Skip,
            self.backend.as_ref(),
            &scope,
        )
    }
}

impl Statement for UpdateStatement {
    const KIND: &'static str = "UPDATE";

    fn backend(&self) -> Option<&Backend> {
        self.backend.as_ref()
    }

    fn check_consistency(&self) -> BuildResult<()> {
        let provided = self.provided();
        self.assignments.verdict(&provided)?;
        self.from.verdict(&provided)?;
        self.filter.verdict(&provided)
    }

    fn check_support(&self, backend: &Backend) -> BuildResult<()> {
        self.assignments.check_support(backend)?;
        if !self.from.is_absent() {
            check::supports(&[Feature::UpdateFrom], backend)?;
        }
        self.from.check_support(backend)?;
        self.filter.check_support(backend)
    }

    fn render(&self, ctx: &mut RenderContext<'_>) {
        ctx.push("UPDATE ");
        render_table(&self.table, ctx);
        self.assignments.render(ctx);
        self.from.render(ctx);
        self.filter.render(ctx);
    }
}
