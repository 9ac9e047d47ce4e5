//! # sqlweave
//!
//! A statement builder that refuses to produce SQL it knows is wrong.
//!
//! ## Features
//!
//! - **Eager checks**: unknown tables, duplicate or prohibited assignment
//!   targets and constructs the backend cannot render are rejected by the
//!   builder call that introduces them
//! - **No half-built statements**: a missing SET, WHERE or column list is
//!   reported by `build()`; UPDATE and DELETE require an explicit
//!   `unconditionally()` to touch every row
//! - **Static and dynamic clauses**: statements bound to a backend can keep
//!   appending conditions, columns or assignments after the fact
//! - **Backends**: PostgreSQL, SQLite and MySQL placeholder, quoting and
//!   feature rules, or your own [`Dialect`]
//! - **Execution-agnostic**: [`BuiltQuery`] carries SQL text plus
//!   tokio-postgres compatible parameters; running it is up to you
//!
//! ## Query Builder (qb)
//!
//! ```ignore
//! use sqlweave::prelude::*;
//!
//! let users = Table::new("users")?;
//! let orders = Table::new("orders")?;
//! let id = users.column("id")?.must_not_update();
//! let name = users.column("name")?;
//! let user_id = orders.column("user_id")?;
//!
//! // SELECT
//! let q = qb::select()
//!     .columns([&id, &name])?
//!     .from([FromItem::from(&users), join(&orders, user_id.eq(&id))])?
//!     .filter(name.like("a%"))?
//!     .build(&Backend::postgres())?;
//!
//! // UPDATE
//! let q = qb::update(&users)
//!     .set([name.to("bob")])?
//!     .filter(id.eq(1))?
//!     .build(&Backend::postgres())?;
//!
//! // Rejected at the call: `id` is declared must_not_update.
//! assert!(qb::update(&users).set([id.to(2)]).is_err());
//! ```

pub mod clause;
pub mod config;
pub mod dialect;
pub mod error;
pub mod ident;
pub mod prelude;
pub mod qb;
pub mod render;
pub mod schema;
mod trace;

pub use clause::{
    Assignment, ClauseName, Direction, Flag, FromItem, JoinKind, OrderBy, SelectColumn,
    cross_join, full_join, join, left_join, right_join,
};
pub use config::RenderConfig;
pub use dialect::{Backend, Dialect, Feature, MySql, Postgres, Sqlite};
pub use error::{BuildError, BuildResult, ErrorKind};
pub use ident::{Ident, IntoIdent};
pub use render::{Render, RenderContext};
pub use schema::{Column, RequiredTables, Table, TableSet};

// Re-export qb types for easy access
pub use qb::{
    BuiltQuery, CmpOp, DeleteStatement, Expr, InsertStatement, Param, ParamList, SelectStatement,
    Statement, UpdateStatement, Value,
};
