//! The mutable, dialect-agnostic table description: an ordered list of
//! columns plus an ordered list of commands, compiled by a [`crate::Grammar`]
//! into SQL statements.

use crate::column::{ColumnDefinition, ColumnType};
use crate::command::{Command, CommandName};

/// A table under construction or alteration.
///
/// Columns and commands are recorded in the order their constructor methods
/// are called; that order drives statement emission during compilation
/// (see [`crate::Grammar::compile`]).
#[derive(Debug, Clone)]
pub struct Blueprint {
    pub table: String,
    pub columns: Vec<ColumnDefinition>,
    pub commands: Vec<Command>,
    pub(crate) comment: Option<String>,
}

impl Blueprint {
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            commands: Vec::new(),
            comment: None,
        }
    }

    fn push_column(&mut self, name: &str, column_type: ColumnType) -> &mut ColumnDefinition {
        self.columns.push(ColumnDefinition::new(name, column_type));
        self.columns.last_mut().expect("just pushed")
    }

    fn push_command(&mut self, name: CommandName) -> &mut Command {
        self.commands.push(Command::new(name));
        self.commands.last_mut().expect("just pushed")
    }

    // ---- identity / increment columns -----------------------------------

    /// Shorthand for an unsigned, auto-incrementing, primary `bigInteger`
    /// column named `id`.
    pub fn id(&mut self) -> &mut ColumnDefinition {
        self.big_increments("id")
    }

    pub fn big_increments(&mut self, name: &str) -> &mut ColumnDefinition {
        let col = self.push_column(name, ColumnType::BigIncrements);
        col.auto_increment().unsigned().primary();
        self.columns.last_mut().expect("just pushed")
    }

    pub fn increments(&mut self, name: &str) -> &mut ColumnDefinition {
        let col = self.push_column(name, ColumnType::Increments);
        col.auto_increment().unsigned().primary();
        self.columns.last_mut().expect("just pushed")
    }

    pub fn tiny_increments(&mut self, name: &str) -> &mut ColumnDefinition {
        let col = self.push_column(name, ColumnType::TinyIncrements);
        col.auto_increment().unsigned().primary();
        self.columns.last_mut().expect("just pushed")
    }

    pub fn small_increments(&mut self, name: &str) -> &mut ColumnDefinition {
        let col = self.push_column(name, ColumnType::SmallIncrements);
        col.auto_increment().unsigned().primary();
        self.columns.last_mut().expect("just pushed")
    }

    pub fn medium_increments(&mut self, name: &str) -> &mut ColumnDefinition {
        let col = self.push_column(name, ColumnType::MediumIncrements);
        col.auto_increment().unsigned().primary();
        self.columns.last_mut().expect("just pushed")
    }

    // ---- text-ish columns -------------------------------------------------

    /// `VARCHAR`, defaulting to a length of 255 (overridable via
    /// `.length(n)` on the returned column).
    pub fn string(&mut self, name: &str) -> &mut ColumnDefinition {
        let col = self.push_column(name, ColumnType::String);
        col.length(255);
        self.columns.last_mut().expect("just pushed")
    }

    pub fn char(&mut self, name: &str) -> &mut ColumnDefinition {
        let col = self.push_column(name, ColumnType::Char);
        col.length(255);
        self.columns.last_mut().expect("just pushed")
    }

    pub fn text(&mut self, name: &str) -> &mut ColumnDefinition {
        self.push_column(name, ColumnType::Text)
    }

    pub fn tiny_text(&mut self, name: &str) -> &mut ColumnDefinition {
        self.push_column(name, ColumnType::TinyText)
    }

    pub fn medium_text(&mut self, name: &str) -> &mut ColumnDefinition {
        self.push_column(name, ColumnType::MediumText)
    }

    pub fn long_text(&mut self, name: &str) -> &mut ColumnDefinition {
        self.push_column(name, ColumnType::LongText)
    }

    // ---- numeric columns ---------------------------------------------------

    pub fn integer(&mut self, name: &str) -> &mut ColumnDefinition {
        self.push_column(name, ColumnType::Integer)
    }

    pub fn tiny_integer(&mut self, name: &str) -> &mut ColumnDefinition {
        self.push_column(name, ColumnType::TinyInteger)
    }

    pub fn small_integer(&mut self, name: &str) -> &mut ColumnDefinition {
        self.push_column(name, ColumnType::SmallInteger)
    }

    pub fn medium_integer(&mut self, name: &str) -> &mut ColumnDefinition {
        self.push_column(name, ColumnType::MediumInteger)
    }

    pub fn big_integer(&mut self, name: &str) -> &mut ColumnDefinition {
        self.push_column(name, ColumnType::BigInteger)
    }

    pub fn float(&mut self, name: &str) -> &mut ColumnDefinition {
        self.push_column(name, ColumnType::Float)
    }

    pub fn double(&mut self, name: &str) -> &mut ColumnDefinition {
        self.push_column(name, ColumnType::Double)
    }

    pub fn decimal(&mut self, name: &str, total: u32, places: u32) -> &mut ColumnDefinition {
        let col = self.push_column(name, ColumnType::Decimal);
        col.total(total).places(places);
        self.columns.last_mut().expect("just pushed")
    }

    // ---- misc scalar columns -----------------------------------------------

    pub fn boolean(&mut self, name: &str) -> &mut ColumnDefinition {
        self.push_column(name, ColumnType::Boolean)
    }

    /// `CHECK`-constrained (Postgres/SQLite) or native `ENUM` (MySQL) column
    /// restricted to `allowed`.
    pub fn r#enum(&mut self, name: &str, allowed: &[&str]) -> &mut ColumnDefinition {
        let col = self.push_column(name, ColumnType::Enum);
        col.allowed = allowed.iter().map(|s| (*s).to_string()).collect();
        self.columns.last_mut().expect("just pushed")
    }

    pub fn json(&mut self, name: &str) -> &mut ColumnDefinition {
        self.push_column(name, ColumnType::Json)
    }

    pub fn jsonb(&mut self, name: &str) -> &mut ColumnDefinition {
        self.push_column(name, ColumnType::Jsonb)
    }

    pub fn uuid(&mut self, name: &str) -> &mut ColumnDefinition {
        self.push_column(name, ColumnType::Uuid)
    }

    pub fn binary(&mut self, name: &str) -> &mut ColumnDefinition {
        self.push_column(name, ColumnType::Binary)
    }

    // ---- date/time columns -------------------------------------------------

    pub fn date(&mut self, name: &str) -> &mut ColumnDefinition {
        self.push_column(name, ColumnType::Date)
    }

    pub fn time(&mut self, name: &str) -> &mut ColumnDefinition {
        self.push_column(name, ColumnType::Time)
    }

    pub fn time_tz(&mut self, name: &str) -> &mut ColumnDefinition {
        self.push_column(name, ColumnType::TimeTz)
    }

    pub fn date_time(&mut self, name: &str) -> &mut ColumnDefinition {
        self.push_column(name, ColumnType::DateTime)
    }

    pub fn date_time_tz(&mut self, name: &str) -> &mut ColumnDefinition {
        self.push_column(name, ColumnType::DateTimeTz)
    }

    /// Defaults to second precision (0), matching the fixed-precision
    /// timestamp literal most dialects print without an explicit arg.
    pub fn timestamp(&mut self, name: &str) -> &mut ColumnDefinition {
        let col = self.push_column(name, ColumnType::Timestamp);
        col.precision(0);
        self.columns.last_mut().expect("just pushed")
    }

    pub fn timestamp_tz(&mut self, name: &str) -> &mut ColumnDefinition {
        let col = self.push_column(name, ColumnType::TimestampTz);
        col.precision(0);
        self.columns.last_mut().expect("just pushed")
    }

    /// Adds `created_at`/`updated_at` timestamp columns, not null and
    /// defaulting to `CURRENT_TIMESTAMP`.
    pub fn timestamps(&mut self) -> &mut Self {
        self.timestamp("created_at").not_nullable().use_current();
        self.timestamp("updated_at").not_nullable().use_current();
        self
    }

    pub fn year(&mut self, name: &str) -> &mut ColumnDefinition {
        self.push_column(name, ColumnType::Year)
    }

    // ---- spatial columns ----------------------------------------------------

    pub fn geography(&mut self, name: &str) -> &mut ColumnDefinition {
        self.push_column(name, ColumnType::Geography)
    }

    pub fn geometry(&mut self, name: &str) -> &mut ColumnDefinition {
        self.push_column(name, ColumnType::Geometry)
    }

    pub fn point(&mut self, name: &str) -> &mut ColumnDefinition {
        self.push_column(name, ColumnType::Point)
    }

    /// Escape hatch for a caller-supplied, dialect-specific type string.
    pub fn column(&mut self, name: &str, raw_type: impl Into<String>) -> &mut ColumnDefinition {
        self.push_column(name, ColumnType::Raw(raw_type.into()))
    }

    // ---- foreign-key sugar, grounded on the fluent `foreignId` pattern ----

    /// An unsigned `bigInteger` column named for a foreign key, e.g.
    /// `foreign_id("user_id")`. When `name` matches the `<resource>_id`
    /// pattern, also queues a `foreign(name).references("id").on(<table>)`
    /// command, naively pluralizing `resource` into its referenced table
    /// name. For an irregular plural or a non-`id` reference column, call
    /// `foreign(name)` directly instead and skip this constructor.
    pub fn foreign_id(&mut self, name: &str) -> &mut ColumnDefinition {
        let col = self.push_column(name, ColumnType::BigInteger);
        col.unsigned();

        if let Some(resource) = name.strip_suffix("_id") {
            let table = naive_pluralize(resource);
            self.foreign(name).references("id").on(table);
        }

        self.columns.last_mut().expect("just pushed")
    }

    /// `foreign_id_for("User")` is sugar for `foreign_id("user_id")` —
    /// lower-snake-cases the referenced type name and appends `_id`.
    pub fn foreign_id_for(&mut self, referenced: &str) -> &mut ColumnDefinition {
        let column_name = format!("{}_id", to_snake_case(referenced));
        self.foreign_id(&column_name)
    }

    // ---- table-level commands ----------------------------------------------

    pub fn create(&mut self) -> &mut Command {
        self.push_command(CommandName::Create)
    }

    pub fn drop(&mut self) -> &mut Command {
        self.push_command(CommandName::Drop)
    }

    pub fn drop_if_exists(&mut self) -> &mut Command {
        self.push_command(CommandName::DropIfExists)
    }

    pub fn rename(&mut self, to: impl Into<String>) -> &mut Command {
        let cmd = self.push_command(CommandName::Rename);
        cmd.to = Some(to.into());
        self.commands.last_mut().expect("just pushed")
    }

    pub fn primary(&mut self, columns: &[&str]) -> &mut Command {
        let cmd = self.push_command(CommandName::Primary);
        cmd.columns = columns.iter().map(|s| (*s).to_string()).collect();
        self.commands.last_mut().expect("just pushed")
    }

    pub fn unique(&mut self, columns: &[&str]) -> &mut Command {
        let cmd = self.push_command(CommandName::Unique);
        cmd.columns = columns.iter().map(|s| (*s).to_string()).collect();
        self.commands.last_mut().expect("just pushed")
    }

    pub fn index(&mut self, columns: &[&str]) -> &mut Command {
        let cmd = self.push_command(CommandName::Index);
        cmd.columns = columns.iter().map(|s| (*s).to_string()).collect();
        self.commands.last_mut().expect("just pushed")
    }

    pub fn full_text(&mut self, columns: &[&str]) -> &mut Command {
        let cmd = self.push_command(CommandName::FullText);
        cmd.columns = columns.iter().map(|s| (*s).to_string()).collect();
        self.commands.last_mut().expect("just pushed")
    }

    /// Starts a foreign-key command; chain `.references().on()...` on the
    /// returned command.
    pub fn foreign(&mut self, column: &str) -> &mut Command {
        let cmd = self.push_command(CommandName::Foreign);
        cmd.columns = vec![column.to_string()];
        self.commands.last_mut().expect("just pushed")
    }

    pub fn drop_column(&mut self, column: &str) -> &mut Command {
        let cmd = self.push_command(CommandName::DropColumn);
        cmd.column = Some(column.to_string());
        self.commands.last_mut().expect("just pushed")
    }

    pub fn rename_column(&mut self, from: &str, to: &str) -> &mut Command {
        let cmd = self.push_command(CommandName::RenameColumn);
        cmd.from = Some(from.to_string());
        cmd.to = Some(to.to_string());
        self.commands.last_mut().expect("just pushed")
    }

    pub fn rename_index(&mut self, from: &str, to: &str) -> &mut Command {
        let cmd = self.push_command(CommandName::RenameIndex);
        cmd.from = Some(from.to_string());
        cmd.to = Some(to.to_string());
        self.commands.last_mut().expect("just pushed")
    }

    pub fn drop_index(&mut self, name: &str) -> &mut Command {
        let cmd = self.push_command(CommandName::DropIndex);
        cmd.index = Some(name.to_string());
        self.commands.last_mut().expect("just pushed")
    }

    pub fn drop_unique(&mut self, name: &str) -> &mut Command {
        let cmd = self.push_command(CommandName::DropUnique);
        cmd.index = Some(name.to_string());
        self.commands.last_mut().expect("just pushed")
    }

    pub fn drop_full_text(&mut self, name: &str) -> &mut Command {
        let cmd = self.push_command(CommandName::DropFullText);
        cmd.index = Some(name.to_string());
        self.commands.last_mut().expect("just pushed")
    }

    pub fn drop_primary(&mut self) -> &mut Command {
        self.push_command(CommandName::DropPrimary)
    }

    pub fn drop_foreign(&mut self, name: &str) -> &mut Command {
        let cmd = self.push_command(CommandName::DropForeign);
        cmd.index = Some(name.to_string());
        self.commands.last_mut().expect("just pushed")
    }

    /// Queues a `COMMENT ON TABLE`/`table_options` comment, compiled after
    /// the primary create/alter statement.
    pub fn comment(&mut self, text: impl Into<String>) -> &mut Self {
        self.comment = Some(text.into());
        self
    }

    #[must_use]
    pub fn table_comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

/// Naive English pluralization (`user` -> `users`, `category` -> `categorys`)
/// sufficient for the common `<resource>_id` -> `<resource>s` inference this
/// library needs; irregular plurals are the caller's responsibility via an
/// explicit `.on(...)` override on the queued foreign-key command.
fn naive_pluralize(word: &str) -> String {
    format!("{word}s")
}

fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if i != 0 {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_is_unsigned_auto_increment_primary() {
        let mut bp = Blueprint::new("users");
        bp.id();
        let col = &bp.columns[0];
        assert_eq!(col.name, "id");
        assert_eq!(col.auto_increment, Some(true));
        assert_eq!(col.unsigned, Some(true));
        assert_eq!(col.primary, Some(true));
    }

    #[test]
    fn test_string_defaults_to_255() {
        let mut bp = Blueprint::new("users");
        bp.string("name");
        assert_eq!(bp.columns[0].length, Some(255));
    }

    #[test]
    fn test_foreign_id_for_snake_cases_referenced_type() {
        let mut bp = Blueprint::new("posts");
        bp.foreign_id_for("User");
        assert_eq!(bp.columns[0].name, "user_id");
        assert_eq!(bp.columns[0].unsigned, Some(true));
    }

    #[test]
    fn test_foreign_id_queues_inferred_foreign_command() {
        let mut bp = Blueprint::new("posts");
        bp.foreign_id("user_id");

        assert_eq!(bp.commands.len(), 1);
        let cmd = &bp.commands[0];
        assert!(matches!(cmd.name, CommandName::Foreign));
        assert_eq!(cmd.columns, vec!["user_id".to_string()]);
        assert_eq!(cmd.references, vec!["id".to_string()]);
        assert_eq!(cmd.on.as_deref(), Some("users"));
    }

    #[test]
    fn test_timestamps_adds_two_not_null_columns_defaulting_to_current() {
        let mut bp = Blueprint::new("users");
        bp.timestamps();
        assert_eq!(bp.columns.len(), 2);
        assert_eq!(bp.columns[0].name, "created_at");
        assert_eq!(bp.columns[1].name, "updated_at");
        assert!(!bp.columns[0].is_nullable());
        assert!(!bp.columns[1].is_nullable());
        assert_eq!(bp.columns[0].use_current, Some(true));
        assert_eq!(bp.columns[1].use_current, Some(true));
    }

    #[test]
    fn test_commands_recorded_in_insertion_order() {
        let mut bp = Blueprint::new("users");
        bp.id();
        bp.string("email").unique();
        bp.unique(&["email"]);
        bp.index(&["email"]);
        assert_eq!(bp.commands.len(), 2);
        assert!(matches!(bp.commands[0].name, CommandName::Unique));
        assert!(matches!(bp.commands[1].name, CommandName::Index));
    }
}
