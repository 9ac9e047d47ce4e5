//! Values and predicate expressions.
//!
//! [`Value`] is anything that can stand on either side of an operator or on
//! the right-hand side of an assignment. [`Expr`] is a boolean predicate tree
//! used by WHERE clauses and JOIN conditions.
//!
//! Both report the tables they reference (via [`RequiredTables`]) and the
//! backend features they need, which is all the builder checks look at.

use crate::dialect::Feature;
use crate::qb::param::Param;
use crate::render::{Render, RenderContext, render_list};
use crate::schema::{Column, RequiredTables, TableSet};
use chrono::NaiveDateTime;
use uuid::Uuid;

/// A scalar operand.
#[derive(Clone, Debug)]
pub enum Value {
    /// `NULL`
    Null,
    /// `DEFAULT` (only meaningful as an assignment value)
    Default,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Json(serde_json::Value),
    Uuid(Uuid),
    Timestamp(NaiveDateTime),
    /// Reference to another column.
    Column(Column),
    /// An explicitly bound parameter.
    Param(Param),
}

impl Value {
    /// Bind any `ToSql` value as a parameter.
    pub fn param<T: tokio_postgres::types::ToSql + Send + Sync + 'static>(value: T) -> Self {
        Value::Param(Param::new(value))
    }

    /// The literal as a bound parameter, for `parameterize_literals`.
    fn as_param(&self) -> Option<Param> {
        let param = match self {
            Value::Bool(v) => Param::new(*v),
            Value::Int(v) => Param::new(*v),
            Value::Float(v) => Param::new(*v),
            Value::Text(v) => Param::new(v.clone()),
            Value::Json(v) => Param::new(v.clone()),
            Value::Uuid(v) => Param::new(*v),
            Value::Timestamp(v) => Param::new(*v),
            Value::Null | Value::Default | Value::Column(_) | Value::Param(_) => return None,
        };
        Some(param)
    }

    /// Backend features this value needs as a literal.
    pub(crate) fn collect_features(&self, out: &mut Vec<Feature>) {
        if matches!(self, Value::Float(v) if !v.is_finite()) {
            out.push(Feature::NonFiniteFloat);
        }
    }
}

impl Render for Value {
    fn render(&self, ctx: &mut RenderContext<'_>) {
        if ctx.config().parameterize_literals {
            if let Some(param) = self.as_param() {
                ctx.push_param(param);
                return;
            }
        }
        match self {
            Value::Null => {
                ctx.push("NULL");
            }
            Value::Default => {
                ctx.push("DEFAULT");
            }
            Value::Bool(v) => {
                ctx.push(if *v { "TRUE" } else { "FALSE" });
            }
            Value::Int(v) => {
                ctx.push(&v.to_string());
            }
            Value::Float(v) => {
                ctx.push_float(*v);
            }
            Value::Text(v) => {
                ctx.push_string(v);
            }
            Value::Json(v) => {
                ctx.push_string(&v.to_string());
            }
            Value::Uuid(v) => {
                ctx.push_string(&v.hyphenated().to_string());
            }
            Value::Timestamp(v) => {
                ctx.push_string(&v.format("%Y-%m-%d %H:%M:%S%.f").to_string());
            }
            Value::Column(col) => {
                ctx.push_ident(col.table().reference())
                    .push_char('.')
                    .push_ident(col.name());
            }
            Value::Param(param) => {
                ctx.push_param(param.clone());
            }
        }
    }
}

impl RequiredTables for Value {
    fn collect_tables(&self, out: &mut TableSet) {
        if let Value::Column(col) = self {
            col.collect_tables(out);
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v.into())
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u32 => Int,
    f64 => Float,
    String => Text,
    &str => Text,
    serde_json::Value => Json,
    Uuid => Uuid,
    NaiveDateTime => Timestamp,
    Column => Column,
    Param => Param,
}

/// Goes through the shortest decimal form of the `f32`, so `0.1f32`
/// stays `0.1` instead of picking up widening noise.
impl From<f32> for Value {
    fn from(v: f32) -> Self {
        let widened = v.to_string().parse::<f64>().unwrap_or(f64::from(v));
        Value::Float(widened)
    }
}

impl From<&Column> for Value {
    fn from(col: &Column) -> Self {
        Value::Column(col.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Comparison operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CmpOp {
    fn as_sql(self) -> &'static str {
        match self {
            CmpOp::Eq => "=",
            CmpOp::Ne => "<>",
            CmpOp::Gt => ">",
            CmpOp::Gte => ">=",
            CmpOp::Lt => "<",
            CmpOp::Lte => "<=",
        }
    }
}

/// Boolean expression tree for WHERE and JOIN ... ON.
#[derive(Clone, Debug)]
pub enum Expr {
    /// AND group: all conditions must be true.
    And(Vec<Expr>),
    /// OR group: at least one condition must be true.
    Or(Vec<Expr>),
    /// NOT: negate the inner expression.
    Not(Box<Expr>),
    /// `lhs op rhs`
    Compare { lhs: Value, op: CmpOp, rhs: Value },
    /// `lhs [NOT] LIKE|ILIKE pattern`
    Like {
        lhs: Value,
        pattern: Value,
        case_insensitive: bool,
        negated: bool,
    },
    /// `value IS [NOT] NULL`
    NullCheck { value: Value, is_null: bool },
    /// `value [NOT] IN (...)`
    InList {
        value: Value,
        list: Vec<Value>,
        negated: bool,
    },
    /// `value [NOT] BETWEEN low AND high`
    Between {
        value: Value,
        low: Value,
        high: Value,
        negated: bool,
    },
    /// Raw SQL fragment. Requires no tables; use with care.
    Raw(String),
    /// Always true.
    True,
    /// Always false.
    False,
}

impl Expr {
    /// Create an AND expression from a list of expressions.
    pub fn and(exprs: Vec<Expr>) -> Self {
        Expr::And(exprs)
    }

    /// Create an OR expression from a list of expressions.
    pub fn or(exprs: Vec<Expr>) -> Self {
        Expr::Or(exprs)
    }

    /// Create a NOT expression.
    pub fn not(expr: Expr) -> Self {
        Expr::Not(Box::new(expr))
    }

    /// Create a raw SQL fragment.
    pub fn raw(sql: impl Into<String>) -> Self {
        Expr::Raw(sql.into())
    }

    pub fn compare(lhs: impl Into<Value>, op: CmpOp, rhs: impl Into<Value>) -> Self {
        Expr::Compare {
            lhs: lhs.into(),
            op,
            rhs: rhs.into(),
        }
    }

    /// Backend features this expression needs.
    pub(crate) fn collect_features(&self, out: &mut Vec<Feature>) {
        match self {
            Expr::And(exprs) | Expr::Or(exprs) => {
                for e in exprs {
                    e.collect_features(out);
                }
            }
            Expr::Not(inner) => inner.collect_features(out),
            Expr::Compare { lhs, rhs, .. } => {
                lhs.collect_features(out);
                rhs.collect_features(out);
            }
            Expr::Like {
                lhs,
                pattern,
                case_insensitive,
                ..
            } => {
                if *case_insensitive {
                    out.push(Feature::ILike);
                }
                lhs.collect_features(out);
                pattern.collect_features(out);
            }
            Expr::NullCheck { value, .. } => value.collect_features(out),
            Expr::InList { value, list, .. } => {
                value.collect_features(out);
                for v in list {
                    v.collect_features(out);
                }
            }
            Expr::Between {
                value, low, high, ..
            } => {
                value.collect_features(out);
                low.collect_features(out);
                high.collect_features(out);
            }
            Expr::Raw(_) | Expr::True | Expr::False => {}
        }
    }

    fn render_group<'e>(
        exprs: impl IntoIterator<Item = &'e Expr>,
        sep: &str,
        wrap: fn(&Expr) -> bool,
        ctx: &mut RenderContext<'_>,
    ) {
        for (i, e) in exprs.into_iter().enumerate() {
            if i > 0 {
                ctx.push(sep);
            }
            if wrap(e) {
                ctx.push_char('(');
                e.render(ctx);
                ctx.push_char(')');
            } else {
                e.render(ctx);
            }
        }
    }
}

fn is_compound_or(e: &Expr) -> bool {
    matches!(e, Expr::Or(v) if v.len() > 1)
}

fn is_compound_and(e: &Expr) -> bool {
    matches!(e, Expr::And(v) if v.len() > 1)
}

/// Render `exprs` joined by `AND`, parenthesizing OR groups.
pub(crate) fn render_conjunction<'e>(
    exprs: impl IntoIterator<Item = &'e Expr>,
    ctx: &mut RenderContext<'_>,
) {
    Expr::render_group(exprs, " AND ", is_compound_or, ctx);
}

impl Render for Expr {
    fn render(&self, ctx: &mut RenderContext<'_>) {
        match self {
            Expr::And(exprs) if exprs.is_empty() => {
                ctx.push("1=1");
            }
            Expr::Or(exprs) if exprs.is_empty() => {
                ctx.push("1=0");
            }
            Expr::And(exprs) => render_conjunction(exprs, ctx),
            Expr::Or(exprs) => Self::render_group(exprs, " OR ", is_compound_and, ctx),
            Expr::Not(inner) => {
                ctx.push("NOT (");
                inner.render(ctx);
                ctx.push_char(')');
            }
            Expr::Compare { lhs, op, rhs } => {
                lhs.render(ctx);
                ctx.push(op.as_sql());
                rhs.render(ctx);
            }
            Expr::Like {
                lhs,
                pattern,
                case_insensitive,
                negated,
            } => {
                lhs.render(ctx);
                ctx.push(match (*negated, *case_insensitive) {
                    (false, false) => " LIKE ",
                    (false, true) => " ILIKE ",
                    (true, false) => " NOT LIKE ",
                    (true, true) => " NOT ILIKE ",
                });
                pattern.render(ctx);
            }
            Expr::NullCheck { value, is_null } => {
                value.render(ctx);
                ctx.push(if *is_null { " IS NULL" } else { " IS NOT NULL" });
            }
            Expr::InList {
                value,
                list,
                negated,
            } => {
                if list.is_empty() {
                    ctx.push(if *negated { "1=1" } else { "1=0" });
                    return;
                }
                value.render(ctx);
                ctx.push(if *negated { " NOT IN (" } else { " IN (" });
                render_list(list, ",", ctx);
                ctx.push_char(')');
            }
            Expr::Between {
                value,
                low,
                high,
                negated,
            } => {
                value.render(ctx);
                ctx.push(if *negated { " NOT BETWEEN " } else { " BETWEEN " });
                low.render(ctx);
                ctx.push(" AND ");
                high.render(ctx);
            }
            Expr::Raw(sql) => {
                ctx.push(sql);
            }
            Expr::True => {
                ctx.push("1=1");
            }
            Expr::False => {
                ctx.push("1=0");
            }
        }
    }
}

impl RequiredTables for Expr {
    fn collect_tables(&self, out: &mut TableSet) {
        match self {
            Expr::And(exprs) | Expr::Or(exprs) => exprs.as_slice().collect_tables(out),
            Expr::Not(inner) => inner.collect_tables(out),
            Expr::Compare { lhs, rhs, .. } => {
                lhs.collect_tables(out);
                rhs.collect_tables(out);
            }
            Expr::Like { lhs, pattern, .. } => {
                lhs.collect_tables(out);
                pattern.collect_tables(out);
            }
            Expr::NullCheck { value, .. } => value.collect_tables(out),
            Expr::InList { value, list, .. } => {
                value.collect_tables(out);
                list.as_slice().collect_tables(out);
            }
            Expr::Between {
                value, low, high, ..
            } => {
                value.collect_tables(out);
                low.collect_tables(out);
                high.collect_tables(out);
            }
            Expr::Raw(_) | Expr::True | Expr::False => {}
        }
    }
}

impl From<bool> for Expr {
    fn from(v: bool) -> Self {
        if v { Expr::True } else { Expr::False }
    }
}

/// Predicate constructors on columns.
impl Column {
    /// `column = value`
    pub fn eq(&self, value: impl Into<Value>) -> Expr {
        Expr::compare(self, CmpOp::Eq, value)
    }

    /// `column <> value`
    pub fn ne(&self, value: impl Into<Value>) -> Expr {
        Expr::compare(self, CmpOp::Ne, value)
    }

    /// `column > value`
    pub fn gt(&self, value: impl Into<Value>) -> Expr {
        Expr::compare(self, CmpOp::Gt, value)
    }

    /// `column >= value`
    pub fn gte(&self, value: impl Into<Value>) -> Expr {
        Expr::compare(self, CmpOp::Gte, value)
    }

    /// `column < value`
    pub fn lt(&self, value: impl Into<Value>) -> Expr {
        Expr::compare(self, CmpOp::Lt, value)
    }

    /// `column <= value`
    pub fn lte(&self, value: impl Into<Value>) -> Expr {
        Expr::compare(self, CmpOp::Lte, value)
    }

    /// `column LIKE pattern`
    pub fn like(&self, pattern: impl Into<Value>) -> Expr {
        Expr::Like {
            lhs: self.into(),
            pattern: pattern.into(),
            case_insensitive: false,
            negated: false,
        }
    }

    /// `column ILIKE pattern` (Postgres only)
    pub fn ilike(&self, pattern: impl Into<Value>) -> Expr {
        Expr::Like {
            lhs: self.into(),
            pattern: pattern.into(),
            case_insensitive: true,
            negated: false,
        }
    }

    /// `column NOT LIKE pattern`
    pub fn not_like(&self, pattern: impl Into<Value>) -> Expr {
        Expr::Like {
            lhs: self.into(),
            pattern: pattern.into(),
            case_insensitive: false,
            negated: true,
        }
    }

    /// `column IS NULL`
    pub fn is_null(&self) -> Expr {
        Expr::NullCheck {
            value: self.into(),
            is_null: true,
        }
    }

    /// `column IS NOT NULL`
    pub fn is_not_null(&self) -> Expr {
        Expr::NullCheck {
            value: self.into(),
            is_null: false,
        }
    }

    /// `column IN (values...)`; an empty list renders as `1=0`.
    pub fn in_list<V: Into<Value>>(&self, values: impl IntoIterator<Item = V>) -> Expr {
        Expr::InList {
            value: self.into(),
            list: values.into_iter().map(Into::into).collect(),
            negated: false,
        }
    }

    /// `column NOT IN (values...)`; an empty list renders as `1=1`.
    pub fn not_in<V: Into<Value>>(&self, values: impl IntoIterator<Item = V>) -> Expr {
        Expr::InList {
            value: self.into(),
            list: values.into_iter().map(Into::into).collect(),
            negated: true,
        }
    }

    /// `column BETWEEN low AND high`
    pub fn between(&self, low: impl Into<Value>, high: impl Into<Value>) -> Expr {
        Expr::Between {
            value: self.into(),
            low: low.into(),
            high: high.into(),
            negated: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::dialect::Backend;
    use crate::schema::Table;

    fn render(expr: &Expr, backend: &Backend, config: &RenderConfig) -> (String, usize) {
        let mut ctx = RenderContext::new(backend, config);
        expr.render(&mut ctx);
        let n = ctx.param_count();
        (ctx.sql().to_string(), n)
    }

    fn render_pg(expr: &Expr) -> String {
        render(expr, &Backend::postgres(), &RenderConfig::default()).0
    }

    #[test]
    fn test_compare_renders_compact() {
        let users = Table::new("users").unwrap();
        let id = users.column("id").unwrap();
        assert_eq!(render_pg(&id.eq(1)), "users.id=1");
        assert_eq!(render_pg(&id.ne(1)), "users.id<>1");
        assert_eq!(render_pg(&id.gte(18)), "users.id>=18");
    }

    #[test]
    fn test_nested_groups() {
        let users = Table::new("users").unwrap();
        let status = users.column("status").unwrap();
        let role = users.column("role").unwrap();
        let expr = Expr::and(vec![
            status.eq("active"),
            Expr::or(vec![role.eq("admin"), role.eq("owner")]),
        ]);
        assert_eq!(
            render_pg(&expr),
            "users.status='active' AND (users.role='admin' OR users.role='owner')"
        );
    }

    #[test]
    fn test_empty_groups_and_lists() {
        let users = Table::new("users").unwrap();
        let id = users.column("id").unwrap();
        assert_eq!(render_pg(&Expr::and(vec![])), "1=1");
        assert_eq!(render_pg(&Expr::or(vec![])), "1=0");
        assert_eq!(render_pg(&id.in_list(Vec::<i64>::new())), "1=0");
        assert_eq!(render_pg(&id.not_in(Vec::<i64>::new())), "1=1");
        assert_eq!(render_pg(&id.in_list([1, 2, 3])), "users.id IN (1,2,3)");
    }

    #[test]
    fn test_literals() {
        let t = Table::new("t").unwrap();
        let c = t.column("c").unwrap();
        assert_eq!(render_pg(&c.eq("it's")), "t.c='it''s'");
        assert_eq!(render_pg(&c.eq(true)), "t.c=TRUE");
        assert_eq!(render_pg(&c.eq(None::<i32>)), "t.c=NULL");
        assert_eq!(render_pg(&c.eq(1.5)), "t.c=1.5");
        assert_eq!(
            render_pg(&c.eq(serde_json::json!({"a": 1}))),
            r#"t.c='{"a":1}'"#
        );
        assert_eq!(render_pg(&c.between(1, 5)), "t.c BETWEEN 1 AND 5");
        assert_eq!(render_pg(&c.is_not_null()), "t.c IS NOT NULL");
    }

    #[test]
    fn test_parameterized_literals() {
        let t = Table::new("t").unwrap();
        let a = t.column("a").unwrap();
        let b = t.column("b").unwrap();
        let expr = Expr::and(vec![a.eq(1), b.like("x%"), a.is_null()]);
        let config = RenderConfig::new().parameterize_literals();
        let (sql, n) = render(&expr, &Backend::postgres(), &config);
        assert_eq!(sql, "t.a=$1 AND t.b LIKE $2 AND t.a IS NULL");
        assert_eq!(n, 2);
    }

    #[test]
    fn test_column_to_column_comparison() {
        let users = Table::new("users").unwrap().alias("u").unwrap();
        let orders = Table::new("orders").unwrap();
        let expr = users
            .column("id")
            .unwrap()
            .eq(&orders.column("user_id").unwrap());
        assert_eq!(render_pg(&expr), "u.id=orders.user_id");

        let tables = expr.required_tables();
        assert_eq!(tables.len(), 2);
    }

    #[test]
    fn test_features() {
        let t = Table::new("t").unwrap();
        let c = t.column("c").unwrap();
        let mut features = Vec::new();
        Expr::not(Expr::or(vec![c.ilike("%a%"), c.like("b")])).collect_features(&mut features);
        assert_eq!(features, vec![Feature::ILike]);

        let mut features = Vec::new();
        Expr::and(vec![c.eq(1.5), c.between(0, f64::INFINITY)]).collect_features(&mut features);
        assert_eq!(features, vec![Feature::NonFiniteFloat]);
    }

    #[test]
    fn test_non_finite_floats_on_postgres() {
        let t = Table::new("t").unwrap();
        let c = t.column("c").unwrap();
        assert_eq!(render_pg(&c.eq(f64::NAN)), "t.c='NaN'::float8");
        assert_eq!(render_pg(&c.lt(f64::INFINITY)), "t.c<'Infinity'::float8");
        assert_eq!(render_pg(&c.gt(f64::NEG_INFINITY)), "t.c>'-Infinity'::float8");
    }

    #[test]
    fn test_f32_keeps_its_decimal_form() {
        let t = Table::new("t").unwrap();
        let c = t.column("c").unwrap();
        assert_eq!(render_pg(&c.eq(0.1f32)), "t.c=0.1");
        assert_eq!(render_pg(&c.eq(2.7f32)), "t.c=2.7");
        assert!(matches!(Value::from(f32::NAN), Value::Float(v) if v.is_nan()));
        assert!(matches!(Value::from(f32::NEG_INFINITY), Value::Float(v) if v == f64::NEG_INFINITY));
    }
}
