//! Public façade over the `blueprint-core` and `blueprint-schema` crates:
//! the process-wide dialect configuration, the `Builder`/`Context`
//! factories, and the fluent `Blueprint` DSL, re-exported flat so callers
//! depend on a single crate.

pub use blueprint_core::{
    get_dialect, quote_ident, quote_ident_mysql, quote_literal, set_dialect, Cx, Dialect, Error,
    ExecResult, Outcome, Result, Row, Transaction, Value,
};
pub use blueprint_schema::{
    grammar_for, new_builder, new_context, new_dry_run_context, Blueprint, Builder,
    CapturedStatement, ColumnDefinition, ColumnInfo, ColumnType, Command, CommandName, Context,
    DryRunContext, Grammar, IndexInfo, LiveContext, Migration, MigrationKind, MigrationName,
    MysqlGrammar, PostgresGrammar, ReferentialAction, SqliteGrammar,
};
pub use blueprint_console::{init_logging, set_log_level, LogLevel};

/// Glob-importable re-export of the types most callers reach for, mirroring
/// the façade crate's own flat surface.
pub mod prelude {
    pub use crate::{
        get_dialect, new_builder, new_context, new_dry_run_context, set_dialect, Blueprint,
        Builder, ColumnDefinition, Context, Cx, Dialect, DryRunContext, Error, Outcome, Result,
    };
}
