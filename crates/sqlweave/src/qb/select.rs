//! SELECT statements.

use crate::clause::{
    Clause, ClauseName, Flag, FromItem, FromTables, OrderBy, OrderByList, Scope, SelectColumn,
    SelectColumns, SelectFlags, TableCheck, Where, provided_tables,
};
use crate::dialect::Backend;
use crate::error::{BuildError, BuildResult};
use crate::qb::expr::Expr;
use crate::qb::fragments;
use crate::qb::traits::Statement;
use crate::render::RenderContext;

/// SELECT statement builder.
///
/// Clause order in the builder chain is free; the statement renders in
/// grammar order. Static columns, conditions and sort keys attached before
/// `from()` are checked against the FROM tables when the statement is built.
#[derive(Clone, Debug, Default)]
pub struct SelectStatement {
    backend: Option<Backend>,
    flags: Clause<SelectFlags>,
    columns: Clause<SelectColumns>,
    from: Clause<FromTables>,
    filter: Clause<Where<false>>,
    order_by: Clause<OrderByList>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl SelectStatement {
    /// Create a static SELECT statement.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a SELECT statement bound to `backend`, enabling `dynamic_*` clauses.
    pub fn with_backend(backend: &Backend) -> Self {
        Self {
            backend: Some(backend.clone()),
            ..Self::default()
        }
    }

    /// Scope for attaching a clause that reads tables.
    fn scope(&self) -> Scope {
        Scope::new(provided_tables(&self.from)).deferred(self.from.is_absent())
    }

    /// Scope for dynamic additions, which are always checked immediately.
    fn add_scope(&self) -> Scope {
        Scope::new(provided_tables(&self.from))
    }

    // ==================== flags ====================

    /// Set the flags (`DISTINCT`, ...). An empty list is allowed.
    pub fn flags<I>(&self, flags: I) -> BuildResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<Flag>,
    {
        let flags = self.flags.attach(
            "flags",
            fragments(flags),
            false,
            self.backend.as_ref(),
            &self.scope(),
        )?;
        Ok(Self {
            flags,
            ..self.clone()
        })
    }

    /// Set the flags and allow more to be added with [`Self::add_flag`].
    pub fn dynamic_flags<I>(&self, flags: I) -> BuildResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<Flag>,
    {
        let flags = self.flags.attach(
            "dynamic_flags",
            fragments(flags),
            true,
            self.backend.as_ref(),
            &self.scope(),
        )?;
        Ok(Self {
            flags,
            ..self.clone()
        })
    }

    pub fn add_flag(&mut self, flag: impl Into<Flag>) -> BuildResult<()> {
        let scope = self.add_scope();
        self.flags.add(
            "add_flag",
            vec![flag.into()],
            TableCheck::Required,
            self.backend.as_ref(),
            &scope,
        )
    }

    pub fn add_flag_ntc(&mut self, flag: impl Into<Flag>) -> BuildResult<()> {
        let scope = self.add_scope();
        self.flags.add(
            "add_flag_ntc",
            vec![flag.into()],
            TableCheck::Skip,
            self.backend.as_ref(),
            &scope,
        )
    }

    // ==================== columns ====================

    /// Set the selected columns. At least one is required.
    pub fn columns<I>(&self, columns: I) -> BuildResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<SelectColumn>,
    {
        let columns = self.columns.attach(
            "columns",
            fragments(columns),
            false,
            self.backend.as_ref(),
            &self.scope(),
        )?;
        Ok(Self {
            columns,
            ..self.clone()
        })
    }

    /// Set the selected columns and allow more to be added with [`Self::add_column`].
    pub fn dynamic_columns<I>(&self, columns: I) -> BuildResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<SelectColumn>,
    {
        let columns = self.columns.attach(
            "dynamic_columns",
            fragments(columns),
            true,
            self.backend.as_ref(),
            &self.scope(),
        )?;
        Ok(Self {
            columns,
            ..self.clone()
        })
    }

    pub fn add_column(&mut self, column: impl Into<SelectColumn>) -> BuildResult<()> {
        let scope = self.add_scope();
        self.columns.add(
            "add_column",
            vec![column.into()],
            TableCheck::Required,
            self.backend.as_ref(),
            &scope,
        )
    }

    /// Add a column without checking that its tables are in FROM.
    pub fn add_column_ntc(&mut self, column: impl Into<SelectColumn>) -> BuildResult<()> {
        let scope = self.add_scope();
        self.columns.add(
            "add_column_ntc",
            vec![column.into()],
            TableCheck::Skip,
            self.backend.as_ref(),
            &scope,
        )
    }

    // ==================== FROM ====================

    /// Set the FROM list: a table, then more tables or joins.
    pub fn from<I>(&self, items: I) -> BuildResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<FromItem>,
    {
        let from = self.from.attach(
            "from",
            fragments(items),
            false,
            self.backend.as_ref(),
            &self.add_scope(),
        )?;
        Ok(Self {
            from,
            ..self.clone()
        })
    }

    /// Set the FROM list and allow tables or joins to be added with [`Self::add_from`].
    pub fn dynamic_from<I>(&self, items: I) -> BuildResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<FromItem>,
    {
        let from = self.from.attach(
            "dynamic_from",
            fragments(items),
            true,
            self.backend.as_ref(),
            &self.add_scope(),
        )?;
        Ok(Self {
            from,
            ..self.clone()
        })
    }

    pub fn add_from(&mut self, item: impl Into<FromItem>) -> BuildResult<()> {
        let scope = self.add_scope();
        self.from.add(
            "add_from",
            vec![item.into()],
            TableCheck::Required,
            self.backend.as_ref(),
            &scope,
        )
    }

    // ==================== WHERE ====================

    /// Set the WHERE condition.
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

    /// Set the WHERE conditions (possibly none) and allow more to be added
    /// with [`Self::add_filter`]. All conditions are AND-ed.
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

    /// Add a condition that may read tables outside this statement.
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

    // ==================== ORDER BY ====================

    pub fn order_by<I>(&self, keys: I) -> BuildResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<OrderBy>,
    {
        let order_by = self.order_by.attach(
            "order_by",
            fragments(keys),
            false,
            self.backend.as_ref(),
            &self.scope(),
        )?;
        Ok(Self {
            order_by,
            ..self.clone()
        })
    }

    pub fn dynamic_order_by<I>(&self, keys: I) -> BuildResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<OrderBy>,
    {
        let order_by = self.order_by.attach(
            "dynamic_order_by",
            fragments(keys),
            true,
            self.backend.as_ref(),
            &self.scope(),
        )?;
        Ok(Self {
            order_by,
            ..self.clone()
        })
    }

    pub fn add_order_by(&mut self, key: impl Into<OrderBy>) -> BuildResult<()> {
        let scope = self.add_scope();
        self.order_by.add(
            "add_order_by",
            vec![key.into()],
            TableCheck::Required,
            self.backend.as_ref(),
            &scope,
        )
    }

    pub fn add_order_by_ntc(&mut self, key: impl Into<OrderBy>) -> BuildResult<()> {
        let scope = self.add_scope();
        self.order_by.add(
            "add_order_by_ntc",
            vec![key.into()],
            TableCheck::Skip,
            self.backend.as_ref(),
            &scope,
        )
    }

    // ==================== LIMIT / OFFSET ====================

    pub fn limit(&self, limit: u64) -> BuildResult<Self> {
        if self.limit.is_some() {
            return Err(BuildError::ClauseAlreadySet {
                clause: ClauseName::Limit,
                method: "limit",
            });
        }
        Ok(Self {
            limit: Some(limit),
            ..self.clone()
        })
    }

    pub fn offset(&self, offset: u64) -> BuildResult<Self> {
        if self.offset.is_some() {
            return Err(BuildError::ClauseAlreadySet {
                clause: ClauseName::Offset,
                method: "offset",
            });
        }
        Ok(Self {
            offset: Some(offset),
            ..self.clone()
        })
    }
}

impl Statement for SelectStatement {
    const KIND: &'static str = "SELECT";

    fn backend(&self) -> Option<&Backend> {
        self.backend.as_ref()
    }

    fn check_consistency(&self) -> BuildResult<()> {
        let provided = provided_tables(&self.from);
        self.flags.verdict(&provided)?;
        self.columns.verdict(&provided)?;
        self.from.verdict(&provided)?;
        self.filter.verdict(&provided)?;
        self.order_by.verdict(&provided)
    }

    fn check_support(&self, backend: &Backend) -> BuildResult<()> {
        self.flags.check_support(backend)?;
        self.columns.check_support(backend)?;
        self.from.check_support(backend)?;
        self.filter.check_support(backend)?;
        self.order_by.check_support(backend)
    }

    fn render(&self, ctx: &mut RenderContext<'_>) {
        ctx.push("SELECT ");
        self.flags.render(ctx);
        self.columns.render(ctx);
        self.from.render(ctx);
        self.filter.render(ctx);
        self.order_by.render(ctx);
        if let Some(limit) = self.limit {
            ctx.push(" LIMIT ").push(&limit.to_string());
        }
        if let Some(offset) = self.offset {
            ctx.push(" OFFSET ").push(&offset.to_string());
        }
    }
}
