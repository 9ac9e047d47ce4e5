use serde::{Deserialize, Serialize};

/// Options applied when a statement is rendered into SQL.
///
/// The defaults render literals inline and quote only identifiers that were
/// declared quoted. The struct is `serde`-friendly so applications can keep it
/// in their own configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Emit literal values as bound parameters instead of inline text.
    pub parameterize_literals: bool,
    /// Quote every identifier, not only those declared quoted.
    pub quote_identifiers: bool,
    /// Truncate logged SQL to this many bytes. `None` means no truncation.
    pub max_log_sql_length: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            parameterize_literals: false,
            quote_identifiers: false,
            max_log_sql_length: Some(200),
        }
    }
}

impl RenderConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind literal values as parameters (`$1`, `?`) instead of inlining them.
    pub fn parameterize_literals(mut self) -> Self {
        self.parameterize_literals = true;
        self
    }

    /// Quote every identifier part.
    pub fn quote_identifiers(mut self) -> Self {
        self.quote_identifiers = true;
        self
    }

    /// Set maximum SQL length written to logs.
    pub fn with_max_log_sql_length(mut self, len: usize) -> Self {
        self.max_log_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation in logs.
    pub fn no_log_truncate(mut self) -> Self {
        self.max_log_sql_length = None;
        self
    }
}
