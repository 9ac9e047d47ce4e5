//! Convenient imports for typical `sqlweave` usage.
//!
//! ```ignore
//! use sqlweave::prelude::*;
//! ```

pub use crate::qb;
pub use crate::{
    Assignment, Backend, BuildError, BuildResult, BuiltQuery, Column, Direction, Expr, Flag,
    FromItem, OrderBy, Param, RenderConfig, SelectColumn, Statement, Table, Value, cross_join,
    full_join, join, left_join, right_join,
};
