//! The serialization context.
//!
//! [`RenderContext`] is the sink every fragment writes into. It knows the
//! target backend (identifier quoting, placeholder style) and collects bound
//! parameters in placeholder order. Rendering never fails and never checks
//! anything: all validation happened when the fragments were added.

use crate::config::RenderConfig;
use crate::dialect::Backend;
use crate::ident::Ident;
use crate::qb::param::{Param, ParamList};
use crate::qb::traits::BuiltQuery;

/// Something that can write itself into a [`RenderContext`].
pub trait Render {
    fn render(&self, ctx: &mut RenderContext<'_>);
}

impl<T: Render + ?Sized> Render for &T {
    fn render(&self, ctx: &mut RenderContext<'_>) {
        (**self).render(ctx)
    }
}

/// Output sink for one statement.
#[derive(Debug)]
pub struct RenderContext<'a> {
    backend: &'a Backend,
    config: &'a RenderConfig,
    sql: String,
    params: ParamList,
}

impl<'a> RenderContext<'a> {
    pub fn new(backend: &'a Backend, config: &'a RenderConfig) -> Self {
        Self {
            backend,
            config,
            sql: String::new(),
            params: ParamList::new(),
        }
    }

    pub fn backend(&self) -> &Backend {
        self.backend
    }

    pub fn config(&self) -> &RenderConfig {
        self.config
    }

    /// Append raw SQL text.
    pub fn push(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    pub fn push_char(&mut self, ch: char) -> &mut Self {
        self.sql.push(ch);
        self
    }

    /// Append an identifier, quoted the way the backend wants.
    pub fn push_ident(&mut self, ident: &Ident) -> &mut Self {
        let force = self.config.quote_identifiers;
        self.backend.dialect().write_ident(ident, force, &mut self.sql);
        self
    }

    /// Append a float literal in the backend's spelling.
    pub fn push_float(&mut self, value: f64) -> &mut Self {
        self.backend.dialect().write_float(value, &mut self.sql);
        self
    }

    /// Append a string literal.
    pub fn push_string(&mut self, value: &str) -> &mut Self {
        self.backend.dialect().write_string(value, &mut self.sql);
        self
    }

    /// Append a placeholder and bind `param` to it.
    pub fn push_param(&mut self, param: Param) -> &mut Self {
        let idx = self.params.push(param);
        self.backend.dialect().write_placeholder(idx, &mut self.sql);
        self
    }

    /// Text rendered so far.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    pub fn finish(self) -> BuiltQuery {
        BuiltQuery::new(self.sql, self.params.into_vec())
    }
}

/// Render `items` separated by `sep`.
pub(crate) fn render_list<'i, T, I>(items: I, sep: &str, ctx: &mut RenderContext<'_>)
where
    T: Render + 'i,
    I: IntoIterator<Item = &'i T>,
{
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            ctx.push(sep);
        }
        item.render(ctx);
    }
}
