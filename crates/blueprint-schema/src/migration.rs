//! Migration-runner collaborator contract: the shape an external migration
//! runner drives this library through. The runner itself (file discovery,
//! transaction lifecycle, CLI, config) is out of scope; this module only
//! defines the registration interface and the filename-pattern recognizer
//! a scaffold generator would use.

use std::future::Future;
use std::sync::OnceLock;

use blueprint_core::{Cx, Error, Outcome};
use regex::Regex;

use crate::context::Context;

/// A single registered migration: an id (typically a timestamp-prefixed
/// name) paired with its up/down functions. The runner invokes `up`/`down`
/// with a live context bound to the migration's own transaction.
pub struct Migration<C: Context> {
    pub id: String,
    pub up: Box<dyn Fn(&Cx, &C) -> MigrationFuture + Send + Sync>,
    pub down: Box<dyn Fn(&Cx, &C) -> MigrationFuture + Send + Sync>,
}

type MigrationFuture = std::pin::Pin<Box<dyn Future<Output = Outcome<(), Error>> + Send>>;

impl<C: Context> Migration<C> {
    pub fn new(
        id: impl Into<String>,
        up: impl Fn(&Cx, &C) -> MigrationFuture + Send + Sync + 'static,
        down: impl Fn(&Cx, &C) -> MigrationFuture + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            up: Box::new(up),
            down: Box::new(down),
        }
    }
}

/// The kind of scaffold a generated migration name implies, as recognized
/// by [`MigrationName::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationKind {
    CreateTable,
    AddColumns,
    DropColumns,
    AlterTable,
    CreateIndex,
    AddForeignKey,
    DropTable,
    Unrecognized,
}

/// A parsed migration name, inferring the target table (and kind of
/// scaffold) from conventional lowercase naming, e.g.
/// `create_widgets_table`, `add_price_to_widgets`, `drop_widgets`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationName {
    pub kind: MigrationKind,
    pub table: String,
}

struct Patterns {
    create: Regex,
    add: Regex,
    drop_columns: Regex,
    alter: Regex,
    index: Regex,
    foreign_key: Regex,
    drop_table: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        create: Regex::new(r"^create_(?P<table>[a-z0-9_]+?)(?:_table)?$").unwrap(),
        add: Regex::new(r"^add_(?P<cols>[a-z0-9_]+)_to_(?P<table>[a-z0-9_]+?)(?:_table)?$")
            .unwrap(),
        drop_columns: Regex::new(
            r"^(?:remove|drop)_(?P<cols>[a-z0-9_]+)_(?:from|in)_(?P<table>[a-z0-9_]+?)(?:_table)?$",
        )
        .unwrap(),
        alter: Regex::new(r"^(?:update|modify|alter)_(?P<table>[a-z0-9_]+?)(?:_table)?$").unwrap(),
        index: Regex::new(
            r"^(?:add|create)_(?:index|idx)_(?:to|on)_(?P<table>[a-z0-9_]+?)(?:_table)?$",
        )
        .unwrap(),
        foreign_key: Regex::new(r"^add_(?:foreign_key|fk)_to_(?P<table>[a-z0-9_]+?)(?:_table)?$")
            .unwrap(),
        drop_table: Regex::new(r"^drop_(?P<table>[a-z0-9_]+?)(?:_table)?$").unwrap(),
    })
}

impl MigrationName {
    /// Parses a migration base name (the `<name>` part of
    /// `<timestamp>_<name>`) against the recognized scaffold patterns.
    /// Uppercase or non-matching names yield `MigrationKind::Unrecognized`
    /// with an empty table name, per the generator's documented fallback.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        if name != name.to_lowercase() {
            blueprint_console::log_warn!("migration name is not lowercase, treating as unrecognized: {name}");
            return Self {
                kind: MigrationKind::Unrecognized,
                table: String::new(),
            };
        }

        let p = patterns();
        if let Some(caps) = p.create.captures(name) {
            return Self {
                kind: MigrationKind::CreateTable,
                table: caps["table"].to_string(),
            };
        }
        if let Some(caps) = p.add.captures(name) {
            return Self {
                kind: MigrationKind::AddColumns,
                table: caps["table"].to_string(),
            };
        }
        if let Some(caps) = p.drop_columns.captures(name) {
            return Self {
                kind: MigrationKind::DropColumns,
                table: caps["table"].to_string(),
            };
        }
        if let Some(caps) = p.index.captures(name) {
            return Self {
                kind: MigrationKind::CreateIndex,
                table: caps["table"].to_string(),
            };
        }
        if let Some(caps) = p.foreign_key.captures(name) {
            return Self {
                kind: MigrationKind::AddForeignKey,
                table: caps["table"].to_string(),
            };
        }
        if let Some(caps) = p.drop_table.captures(name) {
            return Self {
                kind: MigrationKind::DropTable,
                table: caps["table"].to_string(),
            };
        }
        if let Some(caps) = p.alter.captures(name) {
            return Self {
                kind: MigrationKind::AlterTable,
                table: caps["table"].to_string(),
            };
        }

        blueprint_console::log_warn!("migration name did not match any recognized pattern: {name}");
        Self {
            kind: MigrationKind::Unrecognized,
            table: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_table_pattern() {
        let parsed = MigrationName::parse("create_widgets_table");
        assert_eq!(parsed.kind, MigrationKind::CreateTable);
        assert_eq!(parsed.table, "widgets");
    }

    #[test]
    fn test_add_columns_pattern() {
        let parsed = MigrationName::parse("add_price_and_sku_to_widgets");
        assert_eq!(parsed.kind, MigrationKind::AddColumns);
        assert_eq!(parsed.table, "widgets");
    }

    #[test]
    fn test_drop_table_pattern_checked_after_drop_columns() {
        let parsed = MigrationName::parse("drop_widgets_table");
        assert_eq!(parsed.kind, MigrationKind::DropTable);
        assert_eq!(parsed.table, "widgets");
    }

    #[test]
    fn test_uppercase_name_is_unrecognized() {
        let parsed = MigrationName::parse("Create_Widgets_Table");
        assert_eq!(parsed.kind, MigrationKind::Unrecognized);
        assert_eq!(parsed.table, "");
    }

    #[test]
    fn test_nonmatching_name_is_unrecognized() {
        let parsed = MigrationName::parse("frobnicate_the_widgets");
        assert_eq!(parsed.kind, MigrationKind::Unrecognized);
        assert_eq!(parsed.table, "");
    }
}
