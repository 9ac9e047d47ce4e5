//! Serialization backends.
//!
//! A [`Dialect`] decides how identifiers, string literals and placeholders are
//! spelled, and which optional constructs ([`Feature`]) it can render at all.
//! Statements bound to a [`Backend`] consult it at every builder call, so an
//! unsupported construct is rejected before any SQL text exists.

use crate::ident::Ident;
use std::fmt;
use std::sync::Arc;

/// Constructs that only some backends can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// `SELECT STRAIGHT_JOIN ...`
    StraightJoin,
    /// `SELECT SQL_NO_CACHE ...`
    SqlNoCache,
    /// `a ILIKE b`
    ILike,
    /// `FULL OUTER JOIN`
    FullJoin,
    /// `UPDATE t SET ... FROM other`
    UpdateFrom,
    /// `NaN`, `Infinity` and `-Infinity` float literals
    NonFiniteFloat,
}

impl Feature {
    /// Human readable name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Feature::StraightJoin => "STRAIGHT_JOIN",
            Feature::SqlNoCache => "SQL_NO_CACHE",
            Feature::ILike => "ILIKE",
            Feature::FullJoin => "FULL OUTER JOIN",
            Feature::UpdateFrom => "UPDATE ... FROM",
            Feature::NonFiniteFloat => "non-finite float literal",
        }
    }
}

/// Backend-specific serialization rules.
pub trait Dialect: fmt::Debug + Send + Sync {
    /// Backend name, also used to compare backends.
    fn name(&self) -> &'static str;

    /// Whether the backend can render `feature`.
    fn supports(&self, feature: Feature) -> bool;

    /// Write the placeholder for the 1-based parameter `index`.
    fn write_placeholder(&self, index: usize, out: &mut String);

    /// Write an identifier.
    fn write_ident(&self, ident: &Ident, force_quotes: bool, out: &mut String) {
        ident.write_with('"', force_quotes, out);
    }

    /// Write a float literal. Non-finite values only reach backends that
    /// support [`Feature::NonFiniteFloat`].
    fn write_float(&self, value: f64, out: &mut String) {
        use std::fmt::Write;
        let _ = write!(out, "{}", value);
    }

    /// Write a string literal.
    fn write_string(&self, value: &str, out: &mut String) {
        out.push('\'');
        for ch in value.chars() {
            if ch == '\'' {
                out.push('\'');
            }
            out.push(ch);
        }
        out.push('\'');
    }
}

/// PostgreSQL: `$n` placeholders, double-quoted identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

impl Dialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn supports(&self, feature: Feature) -> bool {
        matches!(
            feature,
            Feature::ILike | Feature::FullJoin | Feature::UpdateFrom | Feature::NonFiniteFloat
        )
    }

    fn write_placeholder(&self, index: usize, out: &mut String) {
        use std::fmt::Write;
        let _ = write!(out, "${}", index);
    }

    fn write_float(&self, value: f64, out: &mut String) {
        use std::fmt::Write;
        let special = if value.is_nan() {
            "'NaN'::float8"
        } else if value == f64::INFINITY {
            "'Infinity'::float8"
        } else if value == f64::NEG_INFINITY {
            "'-Infinity'::float8"
        } else {
            let _ = write!(out, "{}", value);
            return;
        };
        out.push_str(special);
    }
}

/// SQLite: `?` placeholders, double-quoted identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sqlite;

impl Dialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn supports(&self, feature: Feature) -> bool {
        matches!(feature, Feature::FullJoin | Feature::UpdateFrom)
    }

    fn write_placeholder(&self, _index: usize, out: &mut String) {
        out.push('?');
    }
}

/// MySQL: `?` placeholders, backtick identifiers, backslash escapes in strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySql;

impl Dialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn supports(&self, feature: Feature) -> bool {
        matches!(feature, Feature::StraightJoin | Feature::SqlNoCache)
    }

    fn write_placeholder(&self, _index: usize, out: &mut String) {
        out.push('?');
    }

    fn write_ident(&self, ident: &Ident, force_quotes: bool, out: &mut String) {
        ident.write_with('`', force_quotes, out);
    }

    fn write_string(&self, value: &str, out: &mut String) {
        out.push('\'');
        for ch in value.chars() {
            match ch {
                '\'' => out.push_str("''"),
                '\\' => out.push_str("\\\\"),
                _ => out.push(ch),
            }
        }
        out.push('\'');
    }
}

/// A shareable handle to a [`Dialect`].
///
/// Binding a statement to a backend is what enables its `dynamic_*` builder
/// methods.
#[derive(Clone)]
pub struct Backend(Arc<dyn Dialect>);

impl Backend {
    pub fn new<D: Dialect + 'static>(dialect: D) -> Self {
        Backend(Arc::new(dialect))
    }

    pub fn postgres() -> Self {
        Self::new(Postgres)
    }

    pub fn sqlite() -> Self {
        Self::new(Sqlite)
    }

    pub fn mysql() -> Self {
        Self::new(MySql)
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    pub fn dialect(&self) -> &dyn Dialect {
        &*self.0
    }

    pub fn supports(&self, feature: Feature) -> bool {
        self.0.supports(feature)
    }
}

impl PartialEq for Backend {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for Backend {}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Backend").field(&self.name()).finish()
    }
}
