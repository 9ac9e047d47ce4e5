//! Table and column descriptors.
//!
//! Statements never look at a catalog; they only need to know which table a
//! column belongs to and what its declaration forbids. Every fragment reports
//! the tables it depends on through [`RequiredTables`], which is what the
//! table-visibility checks compare against the tables a statement provides.
//!
//! # Example
//!
//! ```ignore
//! use sqlweave::schema::Table;
//!
//! let users = Table::new("users")?.require_insert("name")?;
//! let id = users.column("id")?.must_not_update();
//! assert!(users.column("name")?.is_require_insert());
//! # Ok::<(), sqlweave::BuildError>(())
//! ```

use crate::error::BuildResult;
use crate::ident::{Ident, IntoIdent};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Ordered set of table identities.
pub type TableSet = BTreeSet<Table>;

/// Anything that depends on tables being visible in a statement.
pub trait RequiredTables {
    /// Add every table this node depends on to `out`.
    fn collect_tables(&self, out: &mut TableSet);

    /// The set of tables this node depends on.
    fn required_tables(&self) -> TableSet {
        let mut out = TableSet::new();
        self.collect_tables(&mut out);
        out
    }
}

impl<T: RequiredTables> RequiredTables for [T] {
    fn collect_tables(&self, out: &mut TableSet) {
        for item in self {
            item.collect_tables(out);
        }
    }
}

/// Tables of `required` that are not in `provided`, rendered for error messages.
pub(crate) fn unknown_tables(required: &TableSet, provided: &TableSet) -> Vec<String> {
    required
        .difference(provided)
        .map(ToString::to_string)
        .collect()
}

/// A table identity: a (possibly schema-qualified) name and an optional alias.
///
/// Two `Table` values denote the same table only when both name and alias
/// match, so `users` and `users AS u` are distinct for visibility purposes.
/// The list of columns an INSERT must provide travels with the table but is
/// not part of its identity.
#[derive(Debug, Clone)]
pub struct Table {
    name: Ident,
    alias: Option<Ident>,
    required_inserts: Arc<[Ident]>,
}

impl Table {
    /// Declare a table, e.g. `users` or `public.users`.
    pub fn new(name: impl IntoIdent) -> BuildResult<Self> {
        Ok(Self {
            name: name.into_ident()?,
            alias: None,
            required_inserts: Arc::from(Vec::new()),
        })
    }

    /// The same table under an alias (`users AS u`).
    pub fn alias(&self, alias: &str) -> BuildResult<Self> {
        Ok(Self {
            name: self.name.clone(),
            alias: Some(Ident::parse_simple(alias)?),
            required_inserts: self.required_inserts.clone(),
        })
    }

    /// Declare a column that every static INSERT value list must assign
    /// (a NOT NULL column without a default).
    pub fn require_insert(self, column: &str) -> BuildResult<Self> {
        let column = Ident::parse_simple(column)?;
        if self.required_inserts.contains(&column) {
            return Ok(self);
        }
        let mut required = self.required_inserts.to_vec();
        required.push(column);
        Ok(Self {
            required_inserts: required.into(),
            ..self
        })
    }

    /// Columns declared with [`Table::require_insert`], in declaration order.
    pub fn required_inserts(&self) -> &[Ident] {
        &self.required_inserts
    }

    /// Declare a column of this table.
    pub fn column(&self, name: &str) -> BuildResult<Column> {
        let name = Ident::parse_simple(name)?;
        Ok(Column {
            require_insert: self.required_inserts.contains(&name),
            table: self.clone(),
            name,
            must_not_update: false,
            must_not_insert: false,
        })
    }

    pub fn name(&self) -> &Ident {
        &self.name
    }

    pub fn alias_name(&self) -> Option<&Ident> {
        self.alias.as_ref()
    }

    /// The identifier columns of this table are qualified with.
    pub fn reference(&self) -> &Ident {
        self.alias.as_ref().unwrap_or(&self.name)
    }

    fn key(&self) -> (&Ident, Option<&Ident>) {
        (&self.name, self.alias.as_ref())
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Table {}

impl PartialOrd for Table {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Table {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl Hash for Table {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{} AS {}", self.name, alias),
            None => write!(f, "{}", self.name),
        }
    }
}

/// A column reference together with its declaration tags.
#[derive(Debug, Clone)]
pub struct Column {
    table: Table,
    name: Ident,
    must_not_update: bool,
    must_not_insert: bool,
    require_insert: bool,
}

impl Column {
    /// Mark the column as update-prohibited (e.g. a primary key).
    pub fn must_not_update(mut self) -> Self {
        self.must_not_update = true;
        self
    }

    /// Mark the column as insert-prohibited (e.g. a generated column).
    pub fn must_not_insert(mut self) -> Self {
        self.must_not_insert = true;
        self
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn name(&self) -> &Ident {
        &self.name
    }

    pub fn is_must_not_update(&self) -> bool {
        self.must_not_update
    }

    pub fn is_must_not_insert(&self) -> bool {
        self.must_not_insert
    }

    /// Whether the owning table declares this column with [`Table::require_insert`].
    pub fn is_require_insert(&self) -> bool {
        self.require_insert
    }

    /// Identity of the column, ignoring declaration tags.
    pub(crate) fn key(&self) -> (&Table, &Ident) {
        (&self.table, &self.name)
    }

    /// `table.column`, used in error messages.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.table.reference(), self.name)
    }
}

impl PartialEq for Column {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Column {}

impl RequiredTables for Column {
    fn collect_tables(&self, out: &mut TableSet) {
        out.insert(self.table.clone());
    }
}
