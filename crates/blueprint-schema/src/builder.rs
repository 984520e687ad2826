//! The per-dialect façade: validates and compiles a [`Blueprint`] and
//! drives its statements through a [`Context`], plus the read-only
//! inspection operations (`HasTable`, `GetColumns`, ...).

use blueprint_core::{split_schema_qualified, Cx, Dialect, Error, Outcome, Result, Value};

use crate::blueprint::Blueprint;
use crate::context::Context;
use crate::grammar::{grammar_for, ColumnInfo, Grammar, IndexInfo};

/// A per-dialect schema builder. Stateless beyond its `Grammar` and default
/// schema name; every operation takes the `Context` to drive explicitly.
pub struct Builder {
    dialect: Dialect,
    grammar: Box<dyn Grammar>,
    schema: String,
}

impl Builder {
    /// Resolves the dialect's grammar and default schema (`public` for
    /// PostgreSQL, the database name itself for MySQL/SQLite where the
    /// caller's connection already scopes it).
    pub fn new(dialect: Dialect) -> Result<Self> {
        let grammar = grammar_for(dialect)?;
        let schema = match dialect {
            Dialect::Postgres => "public".to_string(),
            _ => String::new(),
        };
        Ok(Self {
            dialect,
            grammar,
            schema,
        })
    }

    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Overrides the default schema used by inspection queries
    /// (`schema.table`, defaulting to `public` for PostgreSQL).
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    /// Splits a possibly schema-qualified `table` argument into the schema
    /// to query and the bare table name, defaulting the schema to this
    /// builder's configured default (`public` for PostgreSQL).
    fn resolve_schema_table<'a>(&'a self, table: &'a str) -> (&'a str, &'a str) {
        split_schema_qualified(table, &self.schema)
    }

    #[tracing::instrument(level = "debug", skip(self, blueprint), fields(dialect = %self.dialect))]
    fn compile(&self, blueprint: &Blueprint) -> Result<Vec<String>> {
        let statements = self.grammar.compile(blueprint)?;
        tracing::debug!(count = statements.len(), "compiled blueprint into statements");
        Ok(statements)
    }

    async fn run<C: Context>(&self, cx: &Cx, ctx: &C, statements: Vec<String>) -> Outcome<(), Error> {
        for sql in statements {
            blueprint_console::log_debug!("executing: {sql}");
            match ctx.exec(cx, &sql, &[]).await {
                Outcome::Ok(_) => {}
                Outcome::Err(e) => return Outcome::Err(e),
                Outcome::Cancelled(r) => return Outcome::Cancelled(r),
                Outcome::Panicked(p) => return Outcome::Panicked(p),
            }
        }
        Outcome::Ok(())
    }

    /// Builds `table` from scratch via `define`, then compiles and executes
    /// the resulting `CREATE TABLE` (plus any trailing constraint
    /// statements) against `ctx`.
    pub async fn create<C: Context>(
        &self,
        cx: &Cx,
        ctx: &C,
        table: &str,
        define: impl FnOnce(&mut Blueprint),
    ) -> Outcome<(), Error> {
        if table.is_empty() {
            return Outcome::Err(Error::invalid_argument("table name must not be empty"));
        }
        let mut blueprint = Blueprint::new(table);
        blueprint.create();
        define(&mut blueprint);
        let statements = match self.compile(&blueprint) {
            Ok(s) => s,
            Err(e) => return Outcome::Err(e),
        };
        self.run(cx, ctx, statements).await
    }

    /// Alters an existing `table` via `define`, then compiles and executes
    /// the resulting statements against `ctx`.
    pub async fn table<C: Context>(
        &self,
        cx: &Cx,
        ctx: &C,
        table: &str,
        define: impl FnOnce(&mut Blueprint),
    ) -> Outcome<(), Error> {
        if table.is_empty() {
            return Outcome::Err(Error::invalid_argument("table name must not be empty"));
        }
        let mut blueprint = Blueprint::new(table);
        define(&mut blueprint);
        let statements = match self.compile(&blueprint) {
            Ok(s) => s,
            Err(e) => return Outcome::Err(e),
        };
        self.run(cx, ctx, statements).await
    }

    pub async fn drop<C: Context>(&self, cx: &Cx, ctx: &C, table: &str) -> Outcome<(), Error> {
        if table.is_empty() {
            return Outcome::Err(Error::invalid_argument("table name must not be empty"));
        }
        let mut blueprint = Blueprint::new(table);
        blueprint.drop();
        let statements = match self.compile(&blueprint) {
            Ok(s) => s,
            Err(e) => return Outcome::Err(e),
        };
        self.run(cx, ctx, statements).await
    }

    pub async fn drop_if_exists<C: Context>(
        &self,
        cx: &Cx,
        ctx: &C,
        table: &str,
    ) -> Outcome<(), Error> {
        if table.is_empty() {
            return Outcome::Err(Error::invalid_argument("table name must not be empty"));
        }
        let mut blueprint = Blueprint::new(table);
        blueprint.drop_if_exists();
        let statements = match self.compile(&blueprint) {
            Ok(s) => s,
            Err(e) => return Outcome::Err(e),
        };
        self.run(cx, ctx, statements).await
    }

    pub async fn rename<C: Context>(
        &self,
        cx: &Cx,
        ctx: &C,
        table: &str,
        to: &str,
    ) -> Outcome<(), Error> {
        if table.is_empty() || to.is_empty() {
            return Outcome::Err(Error::invalid_argument(
                "rename source and destination table names must not be empty",
            ));
        }
        let mut blueprint = Blueprint::new(table);
        blueprint.rename(to);
        let statements = match self.compile(&blueprint) {
            Ok(s) => s,
            Err(e) => return Outcome::Err(e),
        };
        self.run(cx, ctx, statements).await
    }

    pub async fn has_table<C: Context>(&self, cx: &Cx, ctx: &C, table: &str) -> Outcome<bool, Error> {
        if table.is_empty() {
            return Outcome::Err(Error::invalid_argument("table name must not be empty"));
        }
        let (schema, table) = self.resolve_schema_table(table);
        let sql = self.grammar.compile_table_exists(schema, table);
        match ctx.query_row(cx, &sql, &[]).await {
            Outcome::Ok(row) => Outcome::Ok(!row.is_empty()),
            Outcome::Err(_) => Outcome::Ok(false),
            Outcome::Cancelled(r) => Outcome::Cancelled(r),
            Outcome::Panicked(p) => Outcome::Panicked(p),
        }
    }

    pub async fn get_columns<C: Context>(
        &self,
        cx: &Cx,
        ctx: &C,
        table: &str,
    ) -> Outcome<Vec<ColumnInfo>, Error> {
        if table.is_empty() {
            return Outcome::Err(Error::invalid_argument("table name must not be empty"));
        }
        let (schema, table) = self.resolve_schema_table(table);
        let sql = self.grammar.compile_column_listing(schema, table);
        match ctx.query(cx, &sql, &[]).await {
            Outcome::Ok(rows) => {
                let columns = rows
                    .iter()
                    .filter_map(|row| {
                        let name = row.get_by_name("column_name")?.as_text()?.to_string();
                        let type_name = row
                            .get_by_name("data_type")
                            .or_else(|| row.get_by_name("column_type"))
                            .and_then(Value::as_text)
                            .unwrap_or_default()
                            .to_string();
                        let nullable = row
                            .get_by_name("is_nullable")
                            .and_then(Value::as_text)
                            .is_some_and(|v| v.eq_ignore_ascii_case("yes"));
                        let default = row
                            .get_by_name("column_default")
                            .and_then(Value::as_text)
                            .map(str::to_string);
                        Some(ColumnInfo {
                            name,
                            type_name,
                            nullable,
                            default,
                        })
                    })
                    .collect();
                Outcome::Ok(columns)
            }
            Outcome::Err(_) => Outcome::Ok(Vec::new()),
            Outcome::Cancelled(r) => Outcome::Cancelled(r),
            Outcome::Panicked(p) => Outcome::Panicked(p),
        }
    }

    pub async fn has_column<C: Context>(
        &self,
        cx: &Cx,
        ctx: &C,
        table: &str,
        column: &str,
    ) -> Outcome<bool, Error> {
        match self.get_columns(cx, ctx, table).await {
            Outcome::Ok(columns) => Outcome::Ok(columns.iter().any(|c| c.name == column)),
            Outcome::Err(e) => Outcome::Err(e),
            Outcome::Cancelled(r) => Outcome::Cancelled(r),
            Outcome::Panicked(p) => Outcome::Panicked(p),
        }
    }

    pub async fn has_columns<C: Context>(
        &self,
        cx: &Cx,
        ctx: &C,
        table: &str,
        names: &[&str],
    ) -> Outcome<bool, Error> {
        if names.is_empty() {
            return Outcome::Err(Error::invalid_argument("column name list must not be empty"));
        }
        match self.get_columns(cx, ctx, table).await {
            Outcome::Ok(columns) => {
                let present: std::collections::HashSet<&str> =
                    columns.iter().map(|c| c.name.as_str()).collect();
                Outcome::Ok(names.iter().all(|n| present.contains(n)))
            }
            Outcome::Err(e) => Outcome::Err(e),
            Outcome::Cancelled(r) => Outcome::Cancelled(r),
            Outcome::Panicked(p) => Outcome::Panicked(p),
        }
    }

    pub async fn get_indexes<C: Context>(
        &self,
        cx: &Cx,
        ctx: &C,
        table: &str,
    ) -> Outcome<Vec<IndexInfo>, Error> {
        if table.is_empty() {
            return Outcome::Err(Error::invalid_argument("table name must not be empty"));
        }
        let (schema, table) = self.resolve_schema_table(table);
        let sql = self.grammar.compile_index_listing(schema, table);
        match ctx.query(cx, &sql, &[]).await {
            Outcome::Ok(rows) => {
                let mut by_name: Vec<IndexInfo> = Vec::new();
                for row in &rows {
                    let Some(name) = row
                        .get_by_name("index_name")
                        .and_then(Value::as_text)
                        .map(str::to_string)
                    else {
                        continue;
                    };
                    let Some(column) = row
                        .get_by_name("column_name")
                        .and_then(Value::as_text)
                        .map(str::to_string)
                    else {
                        continue;
                    };
                    let unique = row
                        .get_by_name("indisunique")
                        .and_then(Value::as_bool)
                        .unwrap_or(false);
                    let primary = row
                        .get_by_name("indisprimary")
                        .and_then(Value::as_bool)
                        .unwrap_or(false);

                    if let Some(existing) = by_name.iter_mut().find(|i| i.name == name) {
                        existing.columns.push(column);
                    } else {
                        by_name.push(IndexInfo {
                            name,
                            columns: vec![column],
                            unique,
                            primary,
                        });
                    }
                }
                Outcome::Ok(by_name)
            }
            Outcome::Err(_) => Outcome::Ok(Vec::new()),
            Outcome::Cancelled(r) => Outcome::Cancelled(r),
            Outcome::Panicked(p) => Outcome::Panicked(p),
        }
    }

    /// Returns true if `columns` exactly match (order-insensitively) an
    /// existing index's column set, or if `columns` is a single element
    /// that matches an index's *name* directly.
    pub async fn has_index<C: Context>(
        &self,
        cx: &Cx,
        ctx: &C,
        table: &str,
        columns: &[&str],
    ) -> Outcome<bool, Error> {
        if columns.is_empty() {
            return Outcome::Err(Error::invalid_argument("column list must not be empty"));
        }
        match self.get_indexes(cx, ctx, table).await {
            Outcome::Ok(indexes) => {
                let wanted: std::collections::BTreeSet<&str> = columns.iter().copied().collect();
                let found = indexes.iter().any(|idx| {
                    if columns.len() == 1 && idx.name == columns[0] {
                        return true;
                    }
                    let have: std::collections::BTreeSet<&str> =
                        idx.columns.iter().map(String::as_str).collect();
                    have == wanted
                });
                Outcome::Ok(found)
            }
            Outcome::Err(e) => Outcome::Err(e),
            Outcome::Cancelled(r) => Outcome::Cancelled(r),
            Outcome::Panicked(p) => Outcome::Panicked(p),
        }
    }

    pub async fn get_tables<C: Context>(&self, cx: &Cx, ctx: &C) -> Outcome<Vec<String>, Error> {
        let sql = self.grammar.compile_tables(&self.schema);
        match ctx.query(cx, &sql, &[]).await {
            Outcome::Ok(rows) => {
                let names = rows
                    .iter()
                    .filter_map(|row| row.get(0).and_then(Value::as_text).map(str::to_string))
                    .collect();
                Outcome::Ok(names)
            }
            Outcome::Err(_) => Outcome::Ok(Vec::new()),
            Outcome::Cancelled(r) => Outcome::Cancelled(r),
            Outcome::Panicked(p) => Outcome::Panicked(p),
        }
    }
}

/// Resolves a `Builder` for a dialect named the way connection strings
/// typically spell it (`postgres`, `pgx`, `mysql`, `mariadb`, `sqlite`,
/// `sqlite3`), falling back to the process-wide dialect when `name` is empty.
pub fn new_builder(name: &str) -> Result<Builder> {
    let dialect = if name.is_empty() {
        blueprint_core::get_dialect()
    } else {
        Dialect::from_name(name)
    };
    if dialect == Dialect::Unknown {
        return Err(Error::unsupported_dialect(name));
    }
    Builder::new(dialect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::new_dry_run_context;
    use asupersync::runtime::RuntimeBuilder;
    use asupersync::Cx;

    #[test]
    fn test_has_index_on_dry_run_context_is_empty_result() {
        let rt = RuntimeBuilder::current_thread()
            .build()
            .expect("create asupersync runtime");
        let cx = Cx::for_testing();

        rt.block_on(async {
            let builder = Builder::new(Dialect::Postgres).unwrap();
            let ctx = new_dry_run_context();

            // A dry-run context always answers queries with zero rows, so
            // `has_index` exercises the "no such table" -> empty-result
            // contract here; the name/column-set matching logic itself is
            // covered directly by the unit test below.
            let found = match builder.has_index(&cx, &ctx, "users", &["nope"]).await {
                Outcome::Ok(v) => v,
                _ => panic!("expected Ok"),
            };
            assert!(!found);
        });
    }

    #[test]
    fn test_index_column_set_matching_logic() {
        let indexes = vec![
            IndexInfo {
                name: "idx_a".to_string(),
                columns: vec!["company_id".to_string(), "id".to_string()],
                unique: false,
                primary: false,
            },
            IndexInfo {
                name: "uk_users_email".to_string(),
                columns: vec!["email".to_string()],
                unique: true,
                primary: false,
            },
        ];

        let matches = |columns: &[&str]| -> bool {
            let wanted: std::collections::BTreeSet<&str> = columns.iter().copied().collect();
            indexes.iter().any(|idx| {
                if columns.len() == 1 && idx.name == columns[0] {
                    return true;
                }
                let have: std::collections::BTreeSet<&str> =
                    idx.columns.iter().map(String::as_str).collect();
                have == wanted
            })
        };

        assert!(matches(&["email"]));
        assert!(matches(&["company_id", "id"]));
        assert!(matches(&["uk_users_email"]));
        assert!(!matches(&["nope"]));
    }

    #[test]
    fn test_has_columns_rejects_empty_name_list() {
        let rt = RuntimeBuilder::current_thread()
            .build()
            .expect("create asupersync runtime");
        let cx = Cx::for_testing();

        rt.block_on(async {
            let builder = Builder::new(Dialect::Postgres).unwrap();
            let ctx = new_dry_run_context();

            match builder.has_columns(&cx, &ctx, "users", &[]).await {
                Outcome::Err(Error::InvalidArgument(_)) => {}
                other => panic!("expected InvalidArgument, got {other:?}"),
            }
        });
    }

    #[test]
    fn test_has_index_rejects_empty_column_list() {
        let rt = RuntimeBuilder::current_thread()
            .build()
            .expect("create asupersync runtime");
        let cx = Cx::for_testing();

        rt.block_on(async {
            let builder = Builder::new(Dialect::Postgres).unwrap();
            let ctx = new_dry_run_context();

            match builder.has_index(&cx, &ctx, "users", &[]).await {
                Outcome::Err(Error::InvalidArgument(_)) => {}
                other => panic!("expected InvalidArgument, got {other:?}"),
            }
        });
    }

    #[test]
    fn test_create_rejects_empty_table_name() {
        let rt = RuntimeBuilder::current_thread()
            .build()
            .expect("create asupersync runtime");
        let cx = Cx::for_testing();

        rt.block_on(async {
            let builder = Builder::new(Dialect::Postgres).unwrap();
            let ctx = new_dry_run_context();

            match builder.create(&cx, &ctx, "", |bp| { bp.id(); }).await {
                Outcome::Err(Error::InvalidArgument(_)) => {}
                other => panic!("expected InvalidArgument, got {other:?}"),
            }
        });
    }

    #[test]
    fn test_rename_rejects_empty_source_or_destination() {
        let rt = RuntimeBuilder::current_thread()
            .build()
            .expect("create asupersync runtime");
        let cx = Cx::for_testing();

        rt.block_on(async {
            let builder = Builder::new(Dialect::Postgres).unwrap();
            let ctx = new_dry_run_context();

            match builder.rename(&cx, &ctx, "users", "").await {
                Outcome::Err(Error::InvalidArgument(_)) => {}
                other => panic!("expected InvalidArgument, got {other:?}"),
            }
            match builder.rename(&cx, &ctx, "", "users2").await {
                Outcome::Err(Error::InvalidArgument(_)) => {}
                other => panic!("expected InvalidArgument, got {other:?}"),
            }
        });
    }

    #[test]
    fn test_resolve_schema_table_splits_schema_qualified_name() {
        let builder = Builder::new(Dialect::Postgres).unwrap();
        assert_eq!(
            builder.resolve_schema_table("billing.invoices"),
            ("billing", "invoices")
        );
        assert_eq!(builder.resolve_schema_table("invoices"), ("public", "invoices"));
    }
}
