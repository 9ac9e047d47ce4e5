//! Statement builders.
//!
//! Statements accrete clauses through builder methods that take `&self`; every
//! call validates its input against what the statement already contains and
//! either returns an extended copy or a [`BuildError`](crate::BuildError). The
//! receiver is never modified, so a rejected call leaves it usable.
//!
//! # Features
//!
//! - **Eager validation**: unknown tables, duplicate or prohibited assignment
//!   targets and constructs the backend cannot render are rejected at the call
//! - **Static and dynamic clauses**: a statement bound to a backend may attach
//!   clauses with `dynamic_*` and keep appending to them with `add_*`
//! - **Consistency on build**: missing mandatory clauses are reported by
//!   [`Statement::build`], never silently rendered
//! - **Arc-based parameters**: clone-friendly, placeholders numbered per backend
//!
//! # Usage
//!
//! ```ignore
//! use sqlweave::prelude::*;
//!
//! let users = Table::new("users")?;
//! let id = users.column("id")?;
//! let name = users.column("name")?;
//! let status = users.column("status")?;
//!
//! // Static statements
//! let q = qb::select()
//!     .columns([&id, &name])?
//!     .from([&users])?
//!     .filter(status.eq("active"))?
//!     .build(&Backend::postgres())?;
//! assert_eq!(q.sql, "SELECT users.id,users.name FROM users WHERE users.status='active'");
//!
//! // Dynamic statements
//! let pg = Backend::postgres();
//! let mut stmt = qb::dynamic_update(&pg, &users)
//!     .dynamic_set([name.to("alice")])?
//!     .filter(id.eq(1))?;
//! stmt.add_assignment(status.to("active"))?;
//! assert_eq!(
//!     stmt.to_sql(&pg)?,
//!     "UPDATE users SET name='alice',status='active' WHERE users.id=1"
//! );
//! ```

mod delete;
pub(crate) mod expr;
mod insert;
pub(crate) mod param;
mod select;
pub(crate) mod traits;
mod update;

pub use delete::DeleteStatement;
pub use expr::{CmpOp, Expr, Value};
pub use insert::InsertStatement;
pub use param::{Param, ParamList};
pub use select::SelectStatement;
pub use traits::{BuiltQuery, Statement};
pub use update::UpdateStatement;

use crate::dialect::Backend;
use crate::schema::Table;

/// Convert every item of `items` into a fragment.
pub(crate) fn fragments<F, I>(items: I) -> Vec<F>
where
    I: IntoIterator,
    I::Item: Into<F>,
{
    items.into_iter().map(Into::into).collect()
}

/// Create a static SELECT statement.
///
/// # Example
/// ```ignore
/// let q = sqlweave::qb::select().columns([&id])?.from([&users])?;
/// ```
pub fn select() -> SelectStatement {
    SelectStatement::new()
}

/// Create a SELECT statement bound to `backend`.
pub fn dynamic_select(backend: &Backend) -> SelectStatement {
    SelectStatement::with_backend(backend)
}

/// Create a static UPDATE statement for `table`.
///
/// # Example
/// ```ignore
/// let q = sqlweave::qb::update(&users).set([name.to("bob")])?.filter(id.eq(1))?;
/// ```
pub fn update(table: &Table) -> UpdateStatement {
    UpdateStatement::new(table)
}

/// Create an UPDATE statement for `table` bound to `backend`.
pub fn dynamic_update(backend: &Backend, table: &Table) -> UpdateStatement {
    UpdateStatement::with_backend(backend, table)
}

/// Create a static DELETE statement for `table`.
///
/// # Safety
/// A DELETE without WHERE is never rendered. Call `unconditionally()` to
/// delete all rows.
pub fn delete_from(table: &Table) -> DeleteStatement {
    DeleteStatement::new(table)
}

/// Create a DELETE statement for `table` bound to `backend`.
pub fn dynamic_delete_from(backend: &Backend, table: &Table) -> DeleteStatement {
    DeleteStatement::with_backend(backend, table)
}

/// Create a static INSERT statement for `table`.
pub fn insert_into(table: &Table) -> InsertStatement {
    InsertStatement::new(table)
}

/// Create an INSERT statement for `table` bound to `backend`.
pub fn dynamic_insert_into(backend: &Backend, table: &Table) -> InsertStatement {
    InsertStatement::with_backend(backend, table)
}
