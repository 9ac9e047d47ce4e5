//! ORDER BY.

use super::{ClauseData, ClauseKind, ClauseName, Fragment};
use crate::dialect::Feature;
use crate::qb::expr::Value;
use crate::render::{Render, RenderContext, render_list};
use crate::schema::{Column, RequiredTables, TableSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// One sort key.
#[derive(Debug, Clone)]
pub struct OrderBy {
    value: Value,
    direction: Direction,
}

impl OrderBy {
    pub fn new(value: impl Into<Value>, direction: Direction) -> Self {
        Self {
            value: value.into(),
            direction,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl Column {
    /// `column ASC`
    pub fn asc(&self) -> OrderBy {
        OrderBy::new(self, Direction::Asc)
    }

    /// `column DESC`
    pub fn desc(&self) -> OrderBy {
        OrderBy::new(self, Direction::Desc)
    }
}

impl From<Column> for OrderBy {
    fn from(col: Column) -> Self {
        OrderBy::new(col, Direction::Asc)
    }
}

impl From<&Column> for OrderBy {
    fn from(col: &Column) -> Self {
        OrderBy::new(col, Direction::Asc)
    }
}

impl Render for OrderBy {
    fn render(&self, ctx: &mut RenderContext<'_>) {
        self.value.render(ctx);
        ctx.push(match self.direction {
            Direction::Asc => " ASC",
            Direction::Desc => " DESC",
        });
    }
}

impl RequiredTables for OrderBy {
    fn collect_tables(&self, out: &mut TableSet) {
        self.value.collect_tables(out);
    }
}

impl Fragment for OrderBy {
    fn features(&self, out: &mut Vec<Feature>) {
        self.value.collect_features(out);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrderByList;

impl ClauseKind for OrderByList {
    type Fragment = OrderBy;

    const NAME: ClauseName = ClauseName::OrderBy;
    const FRAGMENT: &'static str = "sort key";

    fn render(data: &ClauseData<OrderBy>, ctx: &mut RenderContext<'_>) {
        if data.is_empty() {
            return;
        }
        ctx.push(" ORDER BY ");
        render_list(data.iter(), ",", ctx);
    }
}
