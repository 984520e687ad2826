//! The stateless, per-dialect compiler from a [`crate::Blueprint`] to an
//! ordered list of SQL statements.

mod mysql;
mod naming;
mod postgres;
mod sqlite;

pub use mysql::MysqlGrammar;
pub use postgres::PostgresGrammar;
pub use sqlite::SqliteGrammar;

use blueprint_core::{Dialect, Error, Result};

use crate::Blueprint;

/// One row of an introspected column listing, as returned by
/// [`crate::Builder::get_columns`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub type_name: String,
    pub nullable: bool,
    pub default: Option<String>,
}

/// One row of an introspected index listing, as returned by
/// [`crate::Builder::get_indexes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexInfo {
    pub name: String,
    pub columns: Vec<String>,
    pub unique: bool,
    pub primary: bool,
}

/// A dialect's compiler from `Blueprint` to SQL text.
///
/// Implementations are stateless: every method takes the dialect's fixed
/// rules plus whatever `Blueprint`/schema name it's given, and nothing else.
pub trait Grammar: Send + Sync {
    fn dialect(&self) -> Dialect;

    /// Compiles a blueprint into the ordered statements a `Builder` will
    /// execute in sequence, aborting at the first failure.
    fn compile(&self, blueprint: &Blueprint) -> Result<Vec<String>>;

    fn compile_table_exists(&self, schema: &str, table: &str) -> String;
    fn compile_column_listing(&self, schema: &str, table: &str) -> String;
    fn compile_index_listing(&self, schema: &str, table: &str) -> String;
    fn compile_tables(&self, schema: &str) -> String;

    /// A separate `COMMENT ON TABLE`-style statement for dialects that
    /// express table comments that way. `None` means this dialect either
    /// has no table-comment syntax (SQLite) or expresses it inline within
    /// `compile`'s own output instead (MySQL's `COMMENT=` clause) — in
    /// both cases there is no separate statement to emit.
    fn compile_table_comment(&self, _table: &str, _comment: &str) -> Option<String> {
        None
    }
}

/// Resolves the `Grammar` for a process-wide or explicitly named dialect.
pub fn grammar_for(dialect: Dialect) -> Result<Box<dyn Grammar>> {
    match dialect {
        Dialect::Postgres => Ok(Box::new(PostgresGrammar)),
        Dialect::MySQL => Ok(Box::new(MysqlGrammar)),
        Dialect::SQLite => Ok(Box::new(SqliteGrammar)),
        Dialect::Unknown => Err(Error::unsupported_dialect("unknown")),
    }
}
