//! SQLite grammar: double-quoted identifiers, loose column typing, and a
//! heavily restricted `ALTER TABLE` — composite primary keys and foreign
//! keys must be embedded in `CREATE TABLE`, and most constraint changes
//! require a table rebuild this library does not perform.

use blueprint_core::{Dialect, Error, Result, Value, quote_ident, quote_literal};

use super::naming;
use super::Grammar;
use crate::column::{ColumnDefinition, ColumnType};
use crate::command::CommandName;
use crate::Blueprint;

pub struct SqliteGrammar;

fn q(name: &str) -> String {
    quote_ident(name)
}

fn get_type(col: &ColumnDefinition) -> String {
    match &col.column_type {
        ColumnType::BigIncrements
        | ColumnType::BigInteger
        | ColumnType::Increments
        | ColumnType::MediumIncrements
        | ColumnType::Integer
        | ColumnType::MediumInteger
        | ColumnType::TinyIncrements
        | ColumnType::TinyInteger
        | ColumnType::SmallIncrements
        | ColumnType::SmallInteger
        | ColumnType::Year
        | ColumnType::Boolean => "INTEGER".to_string(),
        ColumnType::String
        | ColumnType::Char
        | ColumnType::Enum
        | ColumnType::Uuid
        | ColumnType::Date
        | ColumnType::Time
        | ColumnType::TimeTz
        | ColumnType::DateTime
        | ColumnType::DateTimeTz
        | ColumnType::Timestamp
        | ColumnType::TimestampTz => "TEXT".to_string(),
        ColumnType::Text | ColumnType::TinyText | ColumnType::MediumText | ColumnType::LongText => {
            "TEXT".to_string()
        }
        ColumnType::Float | ColumnType::Double | ColumnType::Decimal => "REAL".to_string(),
        ColumnType::Json | ColumnType::Jsonb => "TEXT".to_string(),
        ColumnType::Binary | ColumnType::Geography | ColumnType::Geometry | ColumnType::Point => {
            "BLOB".to_string()
        }
        ColumnType::Raw(sql) => sql.clone(),
    }
}

fn value_sql(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        Value::Int(i) => i.to_string(),
        Value::BigInt(i) => i.to_string(),
        Value::Double(d) => d.to_string(),
        Value::Text(s) => quote_literal(s),
        Value::Bytes(_) => "NULL".to_string(),
        Value::Json(j) => quote_literal(&j.to_string()),
        Value::Expression(raw) => raw.clone(),
    }
}

fn render_column_clause(col: &ColumnDefinition, inline_pk_autoincrement: bool) -> Result<String> {
    if col.name.trim().is_empty() {
        return Err(Error::compilation("column name must not be empty"));
    }

    let mut out = format!("{} {}", q(&col.name), get_type(col));

    if col.column_type == ColumnType::Enum {
        let values = col
            .allowed
            .iter()
            .map(|v| quote_literal(v))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!(" CHECK ({} IN ({values}))", q(&col.name)));
    }

    if inline_pk_autoincrement {
        out.push_str(" PRIMARY KEY AUTOINCREMENT");
        return Ok(out);
    }

    if col.use_current == Some(true) && col.default_value.is_none() {
        out.push_str(" DEFAULT CURRENT_TIMESTAMP");
    } else if let Some(default) = &col.default_value {
        out.push_str(&format!(" DEFAULT {}", value_sql(default)));
    }

    out.push_str(if col.is_nullable() { " NULL" } else { " NOT NULL" });
    Ok(out)
}

fn primary_columns(blueprint: &Blueprint) -> Vec<String> {
    if let Some(cmd) = blueprint
        .commands
        .iter()
        .find(|c| c.name == CommandName::Primary)
    {
        return cmd.columns.clone();
    }
    blueprint
        .columns
        .iter()
        .filter(|c| c.primary == Some(true))
        .map(|c| c.name.clone())
        .collect()
}

impl Grammar for SqliteGrammar {
    fn dialect(&self) -> Dialect {
        Dialect::SQLite
    }

    fn compile(&self, blueprint: &Blueprint) -> Result<Vec<String>> {
        let table = blueprint.table.as_str();
        let mut statements = Vec::new();
        let has_create = blueprint
            .commands
            .iter()
            .any(|c| c.name == CommandName::Create);

        if has_create {
            let pk_cols = primary_columns(blueprint);
            let inline_autoincrement_col = if pk_cols.len() == 1 {
                blueprint
                    .columns
                    .iter()
                    .find(|c| c.name == pk_cols[0] && c.auto_increment == Some(true))
                    .map(|c| c.name.clone())
            } else {
                None
            };

            let mut body: Vec<String> = Vec::new();
            for col in &blueprint.columns {
                let inline = inline_autoincrement_col.as_deref() == Some(col.name.as_str());
                body.push(render_column_clause(col, inline)?);
            }

            for cmd in blueprint
                .commands
                .iter()
                .filter(|c| c.name == CommandName::Foreign)
            {
                let on = cmd
                    .on
                    .as_deref()
                    .ok_or_else(|| Error::compilation("foreign key command missing .on(table)"))?;
                if cmd.columns.is_empty() {
                    return Err(Error::compilation("foreign key command missing column"));
                }
                if cmd.references.is_empty() {
                    return Err(Error::compilation("foreign key command missing .references(column)"));
                }
                let cols = cmd
                    .columns
                    .iter()
                    .map(|c| q(c))
                    .collect::<Vec<_>>()
                    .join(", ");
                let refs = cmd
                    .references
                    .iter()
                    .map(|c| q(c))
                    .collect::<Vec<_>>()
                    .join(", ");
                body.push(format!("FOREIGN KEY ({cols}) REFERENCES {} ({refs})", q(on)));
            }

            if inline_autoincrement_col.is_none() && !pk_cols.is_empty() {
                let cols = pk_cols
                    .iter()
                    .map(|c| q(c))
                    .collect::<Vec<_>>()
                    .join(", ");
                body.push(format!("PRIMARY KEY ({cols})"));
            }

            statements.push(format!("CREATE TABLE {} ({})", q(table), body.join(", ")));
        } else {
            for col in &blueprint.columns {
                if col.change {
                    return Err(Error::unsupported_operation(
                        "sqlite does not support changing an existing column's type or nullability",
                    ));
                }
                if !col.is_nullable() && col.default_value.is_none() {
                    return Err(Error::compilation(
                        "sqlite requires a default when adding a NOT NULL column",
                    ));
                }
                statements.push(format!(
                    "ALTER TABLE {} ADD COLUMN {}",
                    q(table),
                    render_column_clause(col, false)?
                ));
            }
        }

        for cmd in &blueprint.commands {
            match cmd.name {
                CommandName::Create | CommandName::Add | CommandName::Change => {}
                CommandName::Drop => statements.push(format!("DROP TABLE {}", q(table))),
                CommandName::DropIfExists => {
                    statements.push(format!("DROP TABLE IF EXISTS {}", q(table)));
                }
                CommandName::Rename => {
                    let to = cmd
                        .to
                        .as_deref()
                        .ok_or_else(|| Error::compilation("rename command missing .to"))?;
                    statements.push(format!("ALTER TABLE {} RENAME TO {}", q(table), q(to)));
                }
                CommandName::Index => {
                    let name = cmd
                        .index
                        .clone()
                        .unwrap_or_else(|| naming::index_name(table, &cmd.columns));
                    let cols = cmd
                        .columns
                        .iter()
                        .map(|c| q(c))
                        .collect::<Vec<_>>()
                        .join(", ");
                    statements.push(format!(
                        "CREATE INDEX {} ON {} ({cols})",
                        q(&name),
                        q(table)
                    ));
                }
                CommandName::Unique => {
                    let name = cmd
                        .index
                        .clone()
                        .unwrap_or_else(|| naming::unique_key_name(table, &cmd.columns));
                    let cols = cmd
                        .columns
                        .iter()
                        .map(|c| q(c))
                        .collect::<Vec<_>>()
                        .join(", ");
                    statements.push(format!(
                        "CREATE UNIQUE INDEX {} ON {} ({cols})",
                        q(&name),
                        q(table)
                    ));
                }
                CommandName::DropIndex | CommandName::DropUnique => {
                    let name = cmd.index.clone().unwrap_or_default();
                    statements.push(format!("DROP INDEX {}", q(&name)));
                }
                CommandName::DropColumn
                | CommandName::RenameColumn
                | CommandName::DropPrimary
                | CommandName::DropForeign
                | CommandName::RenameIndex => {
                    return Err(Error::unsupported_operation(format!(
                        "sqlite does not support {:?} via ALTER TABLE",
                        cmd.name
                    )));
                }
                CommandName::Primary | CommandName::Foreign => {
                    if !has_create {
                        return Err(Error::unsupported_operation(
                            "sqlite requires primary/foreign key constraints to be declared at CREATE TABLE time",
                        ));
                    }
                }
                CommandName::FullText | CommandName::DropFullText => {
                    return Err(Error::unsupported_operation(
                        "sqlite has no native full-text index; use an FTS virtual table instead",
                    ));
                }
            }
        }

        for col in &blueprint.columns {
            if col.unique == Some(true) {
                let name = col
                    .unique_name
                    .clone()
                    .unwrap_or_else(|| naming::unique_key_name(table, &[col.name.clone()]));
                statements.push(format!(
                    "CREATE UNIQUE INDEX {} ON {} ({})",
                    q(&name),
                    q(table),
                    q(&col.name)
                ));
            }
        }

        Ok(statements)
    }

    fn compile_table_exists(&self, _schema: &str, table: &str) -> String {
        format!(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = '{table}'"
        )
    }

    fn compile_column_listing(&self, _schema: &str, table: &str) -> String {
        format!("PRAGMA table_info('{table}')")
    }

    fn compile_index_listing(&self, _schema: &str, table: &str) -> String {
        format!("PRAGMA index_list('{table}')")
    }

    fn compile_tables(&self, _schema: &str) -> String {
        "SELECT name FROM sqlite_master WHERE type = 'table'".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Blueprint;

    #[test]
    fn test_foreign_key_missing_references_is_rejected() {
        let mut bp = Blueprint::new("posts");
        bp.create();
        bp.integer("user_id");
        bp.foreign("user_id").on("users");

        let err = SqliteGrammar.compile(&bp).unwrap_err();
        assert!(matches!(err, Error::CompilationError(_)));
    }

    #[test]
    fn test_s5_composite_pk_with_foreign_keys() {
        let mut bp = Blueprint::new("user_roles");
        bp.create();
        bp.big_integer("user_id");
        bp.integer("role_id");
        bp.primary(&["user_id", "role_id"]);
        bp.foreign("user_id").references("id").on("users");
        bp.foreign("role_id").references("id").on("roles");

        let statements = SqliteGrammar.compile(&bp).unwrap();
        assert_eq!(
            statements,
            vec![
                "CREATE TABLE \"user_roles\" (\"user_id\" INTEGER NOT NULL, \"role_id\" INTEGER NOT NULL, FOREIGN KEY (\"user_id\") REFERENCES \"users\" (\"id\"), FOREIGN KEY (\"role_id\") REFERENCES \"roles\" (\"id\"), PRIMARY KEY (\"user_id\", \"role_id\"))",
            ]
        );
    }

    #[test]
    fn test_single_autoincrement_pk_embeds_inline() {
        let mut bp = Blueprint::new("widgets");
        bp.create();
        bp.id();

        let statements = SqliteGrammar.compile(&bp).unwrap();
        assert_eq!(
            statements,
            vec!["CREATE TABLE \"widgets\" (\"id\" INTEGER PRIMARY KEY AUTOINCREMENT)"]
        );
    }

    #[test]
    fn test_change_column_is_unsupported() {
        let mut bp = Blueprint::new("widgets");
        bp.string("name").change();

        let err = SqliteGrammar.compile(&bp).unwrap_err();
        assert!(matches!(err, Error::UnsupportedOperation(_)));
    }
}
