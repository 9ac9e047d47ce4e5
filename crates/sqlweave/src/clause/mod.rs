//! Clause policy machinery.
//!
//! Every optional part of a statement lives in a [`Clause`] slot, which is in
//! one of three states:
//!
//! - `Absent`: never attached. Contributes nothing to the SQL; mandatory
//!   clauses make the statement inconsistent in this state.
//! - `Static`: attached by a plain builder call (`set`, `flags`, `filter`, ...).
//!   The fragment list is fixed from then on.
//! - `Dynamic`: attached by a `dynamic_*` call on a backend-bound statement.
//!   Further fragments may be appended through `add_*` calls.
//!
//! What differs per clause (fragment type, rules, grammar) is described by a
//! [`ClauseKind`]. All builder checks run eagerly, in a fixed order, and stop
//! at the first failure; a rejected call leaves the clause untouched.

mod assign;
pub(crate) mod check;
mod columns;
mod data;
mod filter;
mod flags;
mod from;
mod order;

pub use assign::{Assignment, InsertValues, UpdateAssignments};
pub use columns::{SelectColumn, SelectColumns};
pub use data::{ClauseData, DynamicList};
pub use filter::Where;
pub use flags::{Flag, SelectFlags};
pub use from::{FromItem, FromTables, JoinKind, cross_join, full_join, join, left_join, right_join};
pub use order::{Direction, OrderBy, OrderByList};

pub(crate) use assign::check_required_inserts;
pub(crate) use from::{provided_tables, render_table};

use crate::dialect::{Backend, Feature};
use crate::error::{BuildError, BuildResult};
use crate::render::{Render, RenderContext};
use crate::schema::{RequiredTables, Table, TableSet};
use std::fmt;

/// Names of clause slots, used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseName {
    Flags,
    Columns,
    From,
    Where,
    OrderBy,
    Limit,
    Offset,
    Assignments,
    InsertValues,
}

impl fmt::Display for ClauseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ClauseName::Flags => "select flags",
            ClauseName::Columns => "selected columns",
            ClauseName::From => "from",
            ClauseName::Where => "where expression",
            ClauseName::OrderBy => "order by",
            ClauseName::Limit => "limit",
            ClauseName::Offset => "offset",
            ClauseName::Assignments => "update assignments",
            ClauseName::InsertValues => "insert values",
        })
    }
}

/// One element of a clause.
///
/// A fragment knows how to render itself, which tables it reads and which
/// optional backend features its rendering needs.
pub trait Fragment: Render + RequiredTables + Clone + fmt::Debug {
    /// Push the backend features this fragment needs onto `out`.
    fn features(&self, _out: &mut Vec<Feature>) {}

    /// Reject the fragment if `backend` cannot render it.
    fn check_support(&self, backend: &Backend) -> BuildResult<()> {
        let mut features = Vec::new();
        self.features(&mut features);
        check::supports(&features, backend)
    }
}

/// Whether a dynamic add verifies table visibility.
///
/// `Skip` backs the `*_ntc` ("no table check") builder variants, for
/// fragments whose tables are provided by something the statement cannot see,
/// e.g. a correlated outer query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableCheck {
    Required,
    Skip,
}

/// Which builder call a kind rule is running for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// `set`, `flags`, ... (`dynamic` for the `dynamic_*` variants).
    Attach { dynamic: bool },
    /// `add_*` on a dynamic clause.
    Add(TableCheck),
}

impl Step {
    pub fn checks_tables(self) -> bool {
        self != Step::Add(TableCheck::Skip)
    }
}

/// What the statement looks like to a clause being checked.
#[derive(Debug, Clone)]
pub struct Scope {
    /// Tables visible so far.
    pub(crate) provided: TableSet,
    /// The table an UPDATE / INSERT / DELETE writes to.
    pub(crate) target: Option<Table>,
    /// Postpone static visibility checks until consistency (FROM not attached yet).
    pub(crate) defer_visibility: bool,
}

impl Scope {
    pub(crate) fn new(provided: TableSet) -> Self {
        Self {
            provided,
            target: None,
            defer_visibility: false,
        }
    }

    pub(crate) fn with_target(mut self, target: &Table) -> Self {
        self.target = Some(target.clone());
        self
    }

    pub(crate) fn deferred(mut self, defer: bool) -> Self {
        self.defer_visibility = defer;
        self
    }
}

/// Describes one kind of clause: its fragment type, rules and grammar.
pub trait ClauseKind {
    type Fragment: Fragment;

    const NAME: ClauseName;
    /// What a single fragment is called in arity errors.
    const FRAGMENT: &'static str;
    /// Whether a static attach may receive an empty list.
    const ALLOW_EMPTY: bool = false;
    /// Builder hint reported when the clause is mandatory but absent.
    const REQUIRED: Option<&'static str> = None;

    /// Table visibility of `items`, about to join `existing`.
    #[doc(hidden)]
    fn check_visibility(
        _existing: &ClauseData<Self::Fragment>,
        items: &[Self::Fragment],
        scope: &Scope,
    ) -> BuildResult<()> {
        check::visible(Self::NAME, items, &scope.provided)
    }

    /// Visibility of the static fragments against the finished statement.
    #[doc(hidden)]
    fn check_final(data: &ClauseData<Self::Fragment>, provided: &TableSet) -> BuildResult<()> {
        check::visible(Self::NAME, data.static_items(), provided)
    }

    /// Kind-specific rules (duplicates, column tags, ...).
    #[doc(hidden)]
    fn check_rules(
        _existing: &ClauseData<Self::Fragment>,
        _items: &[Self::Fragment],
        _scope: &Scope,
        _step: Step,
    ) -> BuildResult<()> {
        Ok(())
    }

    /// Write the clause in its grammar position, including any leading keyword.
    fn render(data: &ClauseData<Self::Fragment>, ctx: &mut RenderContext<'_>);
}

/// A clause slot of a statement.
#[derive(Debug, Clone)]
pub enum Clause<K: ClauseKind> {
    Absent,
    Static(ClauseData<K::Fragment>),
    Dynamic {
        data: ClauseData<K::Fragment>,
        backend: Backend,
    },
}

impl<K: ClauseKind> Default for Clause<K> {
    fn default() -> Self {
        Clause::Absent
    }
}

impl<K: ClauseKind> Clause<K> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Clause::Absent)
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, Clause::Dynamic { .. })
    }

    pub fn data(&self) -> Option<&ClauseData<K::Fragment>> {
        match self {
            Clause::Absent => None,
            Clause::Static(data) | Clause::Dynamic { data, .. } => Some(data),
        }
    }

    /// Attach the clause with `items` as its static fragments.
    ///
    /// `backend` is the statement's backend, if it has one; `dynamic` selects
    /// the `dynamic_*` variant, which requires it.
    pub(crate) fn attach(
        &self,
        method: &'static str,
        items: Vec<K::Fragment>,
        dynamic: bool,
        backend: Option<&Backend>,
        scope: &Scope,
    ) -> BuildResult<Self> {
        if !self.is_absent() {
            return Err(BuildError::ClauseAlreadySet {
                clause: K::NAME,
                method,
            });
        }
        if items.is_empty() && !dynamic && !K::ALLOW_EMPTY {
            return Err(BuildError::EmptyClause {
                method,
                fragment: K::FRAGMENT,
            });
        }
        let bound = match (dynamic, backend) {
            (true, None) => return Err(BuildError::StaticStatement { method }),
            (true, Some(backend)) => Some(backend.clone()),
            (false, _) => None,
        };

        let empty = ClauseData::default();
        if !scope.defer_visibility {
            K::check_visibility(&empty, &items, scope)?;
        }
        if let Some(backend) = backend {
            check::supported(&items, backend)?;
        }
        K::check_rules(&empty, &items, scope, Step::Attach { dynamic })?;

        let data = ClauseData::new(items);
        Ok(match bound {
            Some(backend) => Clause::Dynamic { data, backend },
            None => Clause::Static(data),
        })
    }

    /// Attach the clause with no fragments at all, bypassing the arity check.
    ///
    /// Used for constructs that are complete without fragments, such as
    /// `unconditionally()` or `default_values()`.
    pub(crate) fn attach_empty(&self, method: &'static str) -> BuildResult<Self> {
        if !self.is_absent() {
            return Err(BuildError::ClauseAlreadySet {
                clause: K::NAME,
                method,
            });
        }
        Ok(Clause::Static(ClauseData::default()))
    }

    /// Append `items` to the dynamic buffer; all of them or none.
    pub(crate) fn add(
        &mut self,
        method: &'static str,
        items: Vec<K::Fragment>,
        table_check: TableCheck,
        statement_backend: Option<&Backend>,
        scope: &Scope,
    ) -> BuildResult<()> {
        if statement_backend.is_none() {
            return Err(BuildError::StaticStatement { method });
        }
        let Clause::Dynamic { data, backend } = self else {
            return Err(BuildError::ClauseNotDynamic {
                clause: K::NAME,
                method,
            });
        };

        if table_check == TableCheck::Required {
            K::check_visibility(data, &items, scope)?;
        }
        check::supported(&items, backend)?;
        K::check_rules(data, &items, scope, Step::Add(table_check))?;

        data.dynamic_items_mut().extend(items);
        Ok(())
    }

    /// The clause's contribution to the statement's consistency verdict.
    pub(crate) fn verdict(&self, provided: &TableSet) -> BuildResult<()> {
        match self {
            Clause::Absent => match K::REQUIRED {
                Some(hint) => Err(BuildError::MissingClause {
                    clause: K::NAME,
                    hint,
                }),
                None => Ok(()),
            },
            Clause::Static(data) => K::check_final(data, provided),
            Clause::Dynamic { data, .. } => {
                K::check_final(data, provided)?;
                if K::REQUIRED.is_some() && !K::ALLOW_EMPTY && data.is_empty() {
                    return Err(BuildError::EmptyClause {
                        method: "build",
                        fragment: K::FRAGMENT,
                    });
                }
                Ok(())
            }
        }
    }

    /// Serializability of every fragment for `backend`.
    pub(crate) fn check_support(&self, backend: &Backend) -> BuildResult<()> {
        match self.data() {
            Some(data) => check::supported(data.iter(), backend),
            None => Ok(()),
        }
    }

    pub(crate) fn render(&self, ctx: &mut RenderContext<'_>) {
        if let Some(data) = self.data() {
            K::render(data, ctx);
        }
    }
}
