//! Constraint/index name derivation, shared by all three grammars.
//!
//! A constraint/index name is local to its table, never its schema, so a
//! schema-qualified `table` (`billing.invoices`) always has the schema
//! stripped before deriving the name (`pk_invoices`, not `pk_billing.invoices`).

use blueprint_core::split_schema_qualified;

fn bare_table(table: &str) -> &str {
    split_schema_qualified(table, "").1
}

pub(crate) fn primary_key_name(table: &str) -> String {
    format!("pk_{}", bare_table(table))
}

pub(crate) fn unique_key_name(table: &str, columns: &[String]) -> String {
    format!("uk_{}_{}", bare_table(table), columns.join("_"))
}

pub(crate) fn index_name(table: &str, columns: &[String]) -> String {
    format!("idx_{}_{}", bare_table(table), columns.join("_"))
}

pub(crate) fn full_text_name(table: &str, columns: &[String]) -> String {
    format!("ft_{}_{}", bare_table(table), columns.join("_"))
}

pub(crate) fn foreign_key_name(table: &str, referenced: &str) -> String {
    format!("fk_{}_{}", bare_table(table), bare_table(referenced))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_key_name_joins_columns() {
        assert_eq!(
            unique_key_name("users", &["tenant_id".into(), "email".into()]),
            "uk_users_tenant_id_email"
        );
    }

    #[test]
    fn test_foreign_key_name() {
        assert_eq!(foreign_key_name("posts", "users"), "fk_posts_users");
    }

    #[test]
    fn test_primary_key_name_strips_schema_qualifier() {
        assert_eq!(primary_key_name("billing.invoices"), "pk_invoices");
    }

    #[test]
    fn test_unique_key_name_strips_schema_qualifier() {
        assert_eq!(
            unique_key_name("billing.invoices", &["number".into()]),
            "uk_invoices_number"
        );
    }

    #[test]
    fn test_foreign_key_name_strips_schema_qualifier_on_both_sides() {
        assert_eq!(
            foreign_key_name("billing.invoices", "billing.accounts"),
            "fk_invoices_accounts"
        );
    }
}
