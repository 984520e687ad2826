//! SQL identifier and literal quoting.
//!
//! PostgreSQL and SQLite both quote identifiers with ANSI double quotes;
//! MySQL uses backticks. Both forms escape an embedded quote character by
//! doubling it, which is sufficient to neutralize injection through an
//! identifier position.

/// Quote an identifier using ANSI double-quoting (PostgreSQL, SQLite).
///
/// ```
/// use blueprint_core::quote_ident;
/// assert_eq!(quote_ident("users"), "\"users\"");
/// assert_eq!(quote_ident("user\"name"), "\"user\"\"name\"");
/// ```
#[inline]
#[must_use]
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote an identifier using MySQL backtick-quoting.
///
/// ```
/// use blueprint_core::quote_ident_mysql;
/// assert_eq!(quote_ident_mysql("users"), "`users`");
/// assert_eq!(quote_ident_mysql("user`name"), "`user``name`");
/// ```
#[inline]
#[must_use]
pub fn quote_ident_mysql(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Quote a string literal using ANSI single-quoting, doubling embedded
/// single quotes. Used for default-value literals and enum `CHECK` lists.
#[inline]
#[must_use]
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Split a possibly schema-qualified table name (`schema.table`) into
/// `(schema, table)`, defaulting the schema to `default_schema` when no dot
/// is present. Only the first dot is treated as a separator.
#[must_use]
pub fn split_schema_qualified<'a>(name: &'a str, default_schema: &'a str) -> (&'a str, &'a str) {
    match name.split_once('.') {
        Some((schema, table)) => (schema, table),
        None => (default_schema, name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident_simple() {
        assert_eq!(quote_ident("users"), "\"users\"");
    }

    #[test]
    fn test_quote_ident_embedded_quote() {
        assert_eq!(quote_ident("user\"name"), "\"user\"\"name\"");
    }

    #[test]
    fn test_quote_ident_keyword() {
        assert_eq!(quote_ident("select"), "\"select\"");
    }

    #[test]
    fn test_quote_ident_unicode() {
        assert_eq!(quote_ident("用户"), "\"用户\"");
    }

    #[test]
    fn test_quote_ident_sql_injection_neutralized() {
        let malicious = "users\"; DROP TABLE secrets; --";
        let quoted = quote_ident(malicious);
        assert_eq!(quoted, "\"users\"\"; DROP TABLE secrets; --\"");
        assert_eq!(quoted.matches('"').count(), 4);
    }

    #[test]
    fn test_quote_ident_mysql_simple() {
        assert_eq!(quote_ident_mysql("users"), "`users`");
    }

    #[test]
    fn test_quote_ident_mysql_embedded_backtick() {
        assert_eq!(quote_ident_mysql("user`name"), "`user``name`");
    }

    #[test]
    fn test_quote_literal_simple() {
        assert_eq!(quote_literal("active"), "'active'");
    }

    #[test]
    fn test_quote_literal_embedded_quote() {
        assert_eq!(quote_literal("it's"), "'it''s'");
    }

    #[test]
    fn test_split_schema_qualified_present() {
        assert_eq!(split_schema_qualified("billing.invoices", "public"), ("billing", "invoices"));
    }

    #[test]
    fn test_split_schema_qualified_absent() {
        assert_eq!(split_schema_qualified("invoices", "public"), ("public", "invoices"));
    }
}
