//! Error types for sqlweave

use crate::clause::ClauseName;
use thiserror::Error;

/// Result type alias for statement construction.
pub type BuildResult<T> = Result<T, BuildError>;

/// Broad category of a [`BuildError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The builder was called in a way it never accepts (wrong method, no backend, empty list).
    Usage,
    /// The fragments are well-formed but violate a table, column or backend rule.
    Semantic,
    /// A mandatory clause was never provided (only reported when finalizing).
    Incomplete,
}

/// Rejections produced while building or finalizing a statement.
///
/// A builder call either succeeds completely or fails with one of these; no
/// partially applied state is ever observable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A set-style call received no fragments.
    #[error("at least one {fragment} required in {method}()")]
    EmptyClause {
        method: &'static str,
        fragment: &'static str,
    },

    /// The clause slot has already been filled on this statement.
    #[error("{clause} already set, {method}() must not be called twice")]
    ClauseAlreadySet {
        clause: ClauseName,
        method: &'static str,
    },

    /// A dynamic variant was called on a statement without a backend.
    #[error("{method}() must not be called in a static statement")]
    StaticStatement { method: &'static str },

    /// A dynamic add targets a clause that is absent or was attached statically.
    #[error("{method}() must not be called for static {clause}")]
    ClauseNotDynamic {
        clause: ClauseName,
        method: &'static str,
    },

    /// A fragment requires tables the statement does not provide.
    #[error("{clause} uses tables unknown to this statement: {}", tables.join(", "))]
    UnknownTables {
        clause: ClauseName,
        tables: Vec<String>,
    },

    /// The backend has no rendering for a construct.
    #[error("{construct} is not supported by the {backend} backend")]
    Unsupported {
        backend: &'static str,
        construct: &'static str,
    },

    /// The same fragment appears twice where that is forbidden.
    #[error("duplicate {fragment} detected in {clause}")]
    DuplicateFragment { clause: ClauseName, fragment: String },

    /// The same column is assigned twice.
    #[error("column {column} assigned more than once in {clause}")]
    DuplicateColumn { clause: ClauseName, column: String },

    /// The column declaration prohibits updates.
    #[error("column {column} must not be updated")]
    NotUpdatable { column: String },

    /// The column declaration prohibits explicit inserts.
    #[error("column {column} must not be inserted")]
    NotInsertable { column: String },

    /// Assignment targets span more than one table.
    #[error("{clause} contains assignments for columns from more than one table: {}", tables.join(", "))]
    MultipleTables {
        clause: ClauseName,
        tables: Vec<String>,
    },

    /// A static INSERT value list omits columns declared as required.
    #[error("required columns missing in {clause}: {}", columns.join(", "))]
    MissingRequiredColumns {
        clause: ClauseName,
        columns: Vec<String>,
    },

    /// A mandatory clause was never attached.
    #[error("{clause} required, e.g. {hint}")]
    MissingClause {
        clause: ClauseName,
        hint: &'static str,
    },

    /// A statement bound to one backend was finalized for another.
    #[error("statement is bound to the {bound} backend but was built for {requested}")]
    BackendMismatch {
        bound: &'static str,
        requested: &'static str,
    },

    /// Malformed identifiers and similar input errors.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl BuildError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyClause { .. }
            | Self::ClauseAlreadySet { .. }
            | Self::StaticStatement { .. }
            | Self::ClauseNotDynamic { .. }
            | Self::BackendMismatch { .. }
            | Self::Validation(_) => ErrorKind::Usage,
            Self::UnknownTables { .. }
            | Self::Unsupported { .. }
            | Self::DuplicateFragment { .. }
            | Self::DuplicateColumn { .. }
            | Self::NotUpdatable { .. }
            | Self::NotInsertable { .. }
            | Self::MultipleTables { .. }
            | Self::MissingRequiredColumns { .. } => ErrorKind::Semantic,
            Self::MissingClause { .. } => ErrorKind::Incomplete,
        }
    }

    /// Check if this error reports a programmer misuse of the builder
    pub fn is_usage(&self) -> bool {
        self.kind() == ErrorKind::Usage
    }

    /// Check if this error reports a missing mandatory clause
    pub fn is_incomplete(&self) -> bool {
        self.kind() == ErrorKind::Incomplete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = BuildError::MissingClause {
            clause: ClauseName::Assignments,
            hint: "set(...)",
        };
        assert_eq!(err.to_string(), "update assignments required, e.g. set(...)");
        assert!(err.is_incomplete());

        let err = BuildError::UnknownTables {
            clause: ClauseName::Where,
            tables: vec!["orders".to_string(), "users".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "where expression uses tables unknown to this statement: orders, users"
        );
        assert_eq!(err.kind(), ErrorKind::Semantic);
    }

    #[test]
    fn test_usage_errors() {
        let err = BuildError::StaticStatement {
            method: "dynamic_set",
        };
        assert!(err.is_usage());
        assert_eq!(
            err.to_string(),
            "dynamic_set() must not be called in a static statement"
        );
    }
}
