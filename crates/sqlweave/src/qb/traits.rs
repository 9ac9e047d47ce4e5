//! Trait definitions for statements.

use crate::config::RenderConfig;
use crate::dialect::Backend;
use crate::error::{BuildError, BuildResult};
use crate::qb::param::Param;
use crate::render::RenderContext;
use std::fmt;
use tokio_postgres::types::ToSql;

/// SQL text plus the parameters its placeholders refer to.
#[derive(Clone, Debug)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<Param>,
}

impl BuiltQuery {
    pub fn new(sql: String, params: Vec<Param>) -> Self {
        Self { sql, params }
    }

    /// Get parameters as references compatible with tokio-postgres.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(Param::as_ref).collect()
    }
}

/// Base trait for all statements.
///
/// Builder calls validate eagerly, so the only thing left to check when
/// finalizing is whether every mandatory clause was provided (and, for a
/// statement built for a backend it was not bound to, whether that backend
/// can render it).
pub trait Statement: Clone + fmt::Debug {
    /// Statement keyword, used in logs.
    const KIND: &'static str;

    /// The backend this statement is bound to, if any.
    fn backend(&self) -> Option<&Backend>;

    /// First unmet requirement, in clause order.
    fn check_consistency(&self) -> BuildResult<()>;

    /// Whether [`Statement::check_consistency`] passes.
    fn is_consistent(&self) -> bool {
        self.check_consistency().is_ok()
    }

    /// Whether `backend` can render every fragment of this statement.
    fn check_support(&self, backend: &Backend) -> BuildResult<()>;

    /// Append the statement's SQL to `ctx`. Performs no validation.
    fn render(&self, ctx: &mut RenderContext<'_>);

    /// Finalize for `backend` with the default [`RenderConfig`].
    fn build(&self, backend: &Backend) -> BuildResult<BuiltQuery> {
        self.build_with(backend, &RenderConfig::default())
    }

    /// Finalize for `backend`.
    ///
    /// Fails if the statement is bound to a different backend, is not
    /// consistent, or contains a construct `backend` cannot render.
    fn build_with(&self, backend: &Backend, config: &RenderConfig) -> BuildResult<BuiltQuery> {
        let result = finalize(self, backend, config);

        #[cfg(feature = "tracing")]
        match &result {
            Ok(built) => crate::trace::statement_built(Self::KIND, backend, built, config),
            Err(err) => crate::trace::statement_rejected(Self::KIND, backend, err),
        }

        result
    }

    /// Debug helper to get the SQL string.
    fn to_sql(&self, backend: &Backend) -> BuildResult<String> {
        self.build(backend).map(|built| built.sql)
    }
}

fn finalize<S: Statement>(
    stmt: &S,
    backend: &Backend,
    config: &RenderConfig,
) -> BuildResult<BuiltQuery> {
    if let Some(bound) = stmt.backend() {
        if bound != backend {
            return Err(BuildError::BackendMismatch {
                bound: bound.name(),
                requested: backend.name(),
            });
        }
    }
    stmt.check_consistency()?;
    stmt.check_support(backend)?;

    let mut ctx = RenderContext::new(backend, config);
    stmt.render(&mut ctx);
    Ok(ctx.finish())
}
