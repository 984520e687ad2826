//! Blueprint, Grammar, Builder and execution Context for the schema
//! definition library: a mutable table blueprint compiled by a per-dialect
//! grammar into ordered DDL statements, driven by a pluggable execution
//! context that can run live or capture in dry-run mode.

mod blueprint;
mod builder;
mod column;
mod command;
mod context;
mod grammar;
mod migration;

pub use blueprint::Blueprint;
pub use builder::{new_builder, Builder};
pub use column::{ColumnDefinition, ColumnType};
pub use command::{Command, CommandName, ReferentialAction};
pub use context::{new_context, new_dry_run_context, CapturedStatement, Context, DryRunContext, LiveContext};
pub use grammar::{grammar_for, ColumnInfo, Grammar, IndexInfo, MysqlGrammar, PostgresGrammar, SqliteGrammar};
pub use migration::{Migration, MigrationKind, MigrationName};
