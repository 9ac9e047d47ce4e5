//! SQL identifiers for tables, aliases and columns.
//!
//! [`Ident`] represents a possibly dotted identifier (`schema.table`), where
//! each part is either a plain word or a quoted name.
//!
//! - Unquoted parts are validated against: `[A-Za-z_][A-Za-z0-9_$]*`
//! - Quoted parts allow any characters except NUL; the quote character is
//!   doubled when rendered
//!
//! How quoted parts are rendered depends on the backend (`"x"` for Postgres
//! and SQLite, `` `x` `` for MySQL), see [`crate::dialect::Dialect::write_ident`].

use crate::error::{BuildError, BuildResult};
use std::fmt;

/// A part of a SQL identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IdentPart {
    /// Unquoted identifier: must match `[A-Za-z_][A-Za-z0-9_$]*`.
    Unquoted(String),
    /// Quoted identifier: allows any characters except NUL.
    Quoted(String),
}

impl IdentPart {
    /// The name without quotes.
    pub fn name(&self) -> &str {
        match self {
            IdentPart::Unquoted(s) | IdentPart::Quoted(s) => s,
        }
    }
}

/// A SQL identifier (column, table, or schema name).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ident {
    parts: Vec<IdentPart>,
}

impl Ident {
    /// Create a single-part quoted identifier.
    pub fn quoted(name: &str) -> BuildResult<Self> {
        if name.is_empty() {
            return Err(BuildError::validation("Empty quoted identifier"));
        }
        if name.contains('\0') {
            return Err(BuildError::validation(
                "Identifier cannot contain NUL character",
            ));
        }
        Ok(Self {
            parts: vec![IdentPart::Quoted(name.to_string())],
        })
    }

    /// Parse an identifier string, supporting dotted and quoted forms.
    ///
    /// - Dotted: `schema.table`
    /// - Quoted: `"CamelCase"."UserTable"`
    /// - Mixed: `public."UserTable"`
    pub fn parse(s: &str) -> BuildResult<Self> {
        if s.is_empty() {
            return Err(BuildError::validation("Identifier cannot be empty"));
        }
        if s.contains('\0') {
            return Err(BuildError::validation(
                "Identifier cannot contain NUL character",
            ));
        }

        let mut parts = Vec::new();
        let mut chars = s.chars().peekable();

        while chars.peek().is_some() {
            if !parts.is_empty() {
                match chars.next() {
                    Some('.') => {
                        if chars.peek().is_none() {
                            return Err(BuildError::validation("Trailing '.' in identifier"));
                        }
                    }
                    Some(c) => {
                        return Err(BuildError::validation(format!(
                            "Expected '.' between identifier parts, got '{c}'"
                        )));
                    }
                    None => break,
                }
            }

            if chars.peek() == Some(&'"') {
                chars.next();
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('"') => {
                            if chars.peek() == Some(&'"') {
                                chars.next();
                                name.push('"');
                            } else {
                                break;
                            }
                        }
                        Some(c) => name.push(c),
                        None => return Err(BuildError::validation("Unclosed quoted identifier")),
                    }
                }
                if name.is_empty() {
                    return Err(BuildError::validation("Empty quoted identifier"));
                }
                parts.push(IdentPart::Quoted(name));
                continue;
            }

            let mut name = String::new();
            while let Some(&c) = chars.peek() {
                if c == '.' {
                    break;
                }
                let ok = if name.is_empty() {
                    c == '_' || c.is_ascii_alphabetic()
                } else {
                    c == '_' || c == '$' || c.is_ascii_alphanumeric()
                };
                if !ok {
                    return Err(BuildError::validation(format!(
                        "Invalid character in identifier '{s}': '{c}'"
                    )));
                }
                name.push(c);
                chars.next();
            }
            if name.is_empty() {
                return Err(BuildError::validation("Empty identifier segment"));
            }
            parts.push(IdentPart::Unquoted(name));
        }

        if parts.is_empty() {
            return Err(BuildError::validation("Empty identifier"));
        }

        Ok(Self { parts })
    }

    /// Parse an identifier that must consist of exactly one part (aliases, column names).
    pub fn parse_simple(s: &str) -> BuildResult<Self> {
        let ident = Self::parse(s)?;
        if ident.parts.len() != 1 {
            return Err(BuildError::validation(format!(
                "Expected a simple identifier, got '{s}'"
            )));
        }
        Ok(ident)
    }

    pub fn parts(&self) -> &[IdentPart] {
        &self.parts
    }

    /// The last part of the identifier, unquoted.
    pub fn name(&self) -> &str {
        self.parts.last().map(IdentPart::name).unwrap_or_default()
    }

    /// Write the identifier using `quote` around quoted parts.
    ///
    /// With `force` every part is quoted, including plain words.
    pub(crate) fn write_with(&self, quote: char, force: bool, out: &mut String) {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            match part {
                IdentPart::Unquoted(s) if !force => out.push_str(s),
                IdentPart::Unquoted(s) | IdentPart::Quoted(s) => {
                    out.push(quote);
                    for ch in s.chars() {
                        if ch == quote {
                            out.push(quote);
                        }
                        out.push(ch);
                    }
                    out.push(quote);
                }
            }
        }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_with('"', false, &mut out);
        f.write_str(&out)
    }
}

/// Convert an input into an [`Ident`].
pub trait IntoIdent {
    fn into_ident(self) -> BuildResult<Ident>;
}

impl IntoIdent for Ident {
    fn into_ident(self) -> BuildResult<Ident> {
        Ok(self)
    }
}

impl IntoIdent for &Ident {
    fn into_ident(self) -> BuildResult<Ident> {
        Ok(self.clone())
    }
}

impl IntoIdent for &str {
    fn into_ident(self) -> BuildResult<Ident> {
        Ident::parse(self)
    }
}

impl IntoIdent for String {
    fn into_ident(self) -> BuildResult<Ident> {
        Ident::parse(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ident_simple() {
        let ident = Ident::parse("users").unwrap();
        assert_eq!(ident.to_string(), "users");
        assert_eq!(ident.name(), "users");
    }

    #[test]
    fn ident_dotted() {
        let ident = Ident::parse("public.users").unwrap();
        assert_eq!(ident.to_string(), "public.users");
        assert_eq!(ident.name(), "users");
    }

    #[test]
    fn ident_quoted_with_escape() {
        let ident = Ident::parse(r#""has""quote""#).unwrap();
        assert_eq!(ident.to_string(), r#""has""quote""#);
        assert_eq!(ident.name(), r#"has"quote"#);
    }

    #[test]
    fn ident_backtick_quoting() {
        let ident = Ident::parse(r#"shop."Order""#).unwrap();
        let mut out = String::new();
        ident.write_with('`', false, &mut out);
        assert_eq!(out, "shop.`Order`");
    }

    #[test]
    fn ident_forced_quoting() {
        let ident = Ident::parse("public.users").unwrap();
        let mut out = String::new();
        ident.write_with('"', true, &mut out);
        assert_eq!(out, r#""public"."users""#);
    }

    #[test]
    fn ident_simple_rejects_dotted() {
        assert!(Ident::parse_simple("a.b").is_err());
        assert!(Ident::parse_simple("a").is_ok());
    }

    #[test]
    fn ident_rejects_malformed() {
        assert!(Ident::parse("").is_err());
        assert!(Ident::parse("1table").is_err());
        assert!(Ident::parse("my table").is_err());
        assert!(Ident::parse("schema..table").is_err());
        assert!(Ident::parse("schema.").is_err());
        assert!(Ident::parse(r#""unclosed"#).is_err());
    }
}
