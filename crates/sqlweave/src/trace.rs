//! `tracing` events for finalized statements.
//!
//! Enable via the crate feature: `sqlweave = { features = ["tracing"] }`.
//! Built statements are reported on target `sqlweave.sql`, rejected ones on
//! `sqlweave.build`, both at `DEBUG`.

#[cfg(feature = "tracing")]
use crate::{BuildError, BuiltQuery, RenderConfig, dialect::Backend};

/// Cut `sql` to at most `max_bytes`, on a char boundary.
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
pub(crate) fn truncate_sql(sql: &str, max: Option<usize>) -> String {
    match max {
        Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
        _ => sql.to_string(),
    }
}

#[cfg(feature = "tracing")]
pub(crate) fn statement_built(
    kind: &'static str,
    backend: &Backend,
    built: &BuiltQuery,
    config: &RenderConfig,
) {
    let sql = truncate_sql(&built.sql, config.max_log_sql_length);
    tracing::debug!(
        target: "sqlweave.sql",
        statement = kind,
        backend = backend.name(),
        param_count = built.params.len(),
        sql = %sql,
    );
}

#[cfg(feature = "tracing")]
pub(crate) fn statement_rejected(kind: &'static str, backend: &Backend, err: &BuildError) {
    tracing::debug!(
        target: "sqlweave.build",
        statement = kind,
        backend = backend.name(),
        error_kind = ?err.kind(),
        error = %err,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_sql() {
        assert_eq!(truncate_sql("SELECT * FROM users", Some(10)), "SELECT * F...");
        assert_eq!(truncate_sql("SELECT 1", Some(10)), "SELECT 1");
        assert_eq!(truncate_sql("SELECT 1", None), "SELECT 1");
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        assert_eq!(truncate_sql_bytes("héllo", 2), "h");
        assert_eq!(truncate_sql_bytes("héllo", 3), "hé");
    }
}
