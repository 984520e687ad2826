//! MySQL/MariaDB grammar: backtick-quoted identifiers, inline foreign keys
//! and primary keys within `CREATE TABLE`, `FULLTEXT INDEX`, and no
//! `DEFERRABLE` support.

use blueprint_core::{Dialect, Error, Result, Value, quote_ident_mysql, quote_literal};

use super::naming;
use super::Grammar;
use crate::column::{ColumnDefinition, ColumnType};
use crate::command::{Command, CommandName};
use crate::Blueprint;

pub struct MysqlGrammar;

fn q(name: &str) -> String {
    quote_ident_mysql(name)
}

fn get_type(col: &ColumnDefinition) -> String {
    let unsigned = if col.unsigned == Some(true) {
        " UNSIGNED"
    } else {
        ""
    };

    match &col.column_type {
        ColumnType::BigIncrements | ColumnType::BigInteger => format!("BIGINT{unsigned}"),
        ColumnType::Increments | ColumnType::MediumIncrements | ColumnType::Integer => {
            format!("INT{unsigned}")
        }
        ColumnType::MediumInteger => format!("MEDIUMINT{unsigned}"),
        ColumnType::TinyIncrements | ColumnType::TinyInteger => format!("TINYINT{unsigned}"),
        ColumnType::SmallIncrements | ColumnType::SmallInteger => format!("SMALLINT{unsigned}"),
        ColumnType::String => match col.length {
            Some(n) => format!("VARCHAR({n})"),
            None => "VARCHAR(255)".to_string(),
        },
        ColumnType::Char => match col.length {
            Some(n) => format!("CHAR({n})"),
            None => "CHAR(255)".to_string(),
        },
        ColumnType::Text | ColumnType::Enum => "TEXT".to_string(),
        ColumnType::TinyText => "TINYTEXT".to_string(),
        ColumnType::MediumText => "MEDIUMTEXT".to_string(),
        ColumnType::LongText => "LONGTEXT".to_string(),
        ColumnType::Float => "FLOAT".to_string(),
        ColumnType::Double => "DOUBLE".to_string(),
        ColumnType::Decimal => format!(
            "DECIMAL({},{})",
            col.total.unwrap_or(10),
            col.places.unwrap_or(0)
        ),
        ColumnType::Boolean => "TINYINT(1)".to_string(),
        ColumnType::Json => "JSON".to_string(),
        ColumnType::Jsonb => "JSON".to_string(),
        ColumnType::Uuid => "CHAR(36)".to_string(),
        ColumnType::Binary => "BLOB".to_string(),
        ColumnType::Date => "DATE".to_string(),
        ColumnType::Time | ColumnType::TimeTz => with_precision("TIME", col.precision),
        ColumnType::DateTime | ColumnType::DateTimeTz => with_precision("DATETIME", col.precision),
        ColumnType::Timestamp | ColumnType::TimestampTz => with_precision("TIMESTAMP", col.precision),
        ColumnType::Year => "YEAR".to_string(),
        ColumnType::Geography | ColumnType::Geometry => "GEOMETRY".to_string(),
        ColumnType::Point => "POINT".to_string(),
        ColumnType::Raw(sql) => sql.clone(),
    }
}

fn with_precision(base: &str, precision: Option<u32>) -> String {
    match precision {
        Some(p) => format!("{base}({p})"),
        None => base.to_string(),
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

fn render_column_clause(col: &ColumnDefinition) -> Result<String> {
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

    out.push_str(if col.is_nullable() { " NULL" } else { " NOT NULL" });

    if col.auto_increment == Some(true) {
        out.push_str(" AUTO_INCREMENT");
    } else if col.use_current == Some(true) && col.default_value.is_none() {
        out.push_str(" DEFAULT CURRENT_TIMESTAMP");
    } else if let Some(default) = &col.default_value {
        out.push_str(&format!(" DEFAULT {}", value_sql(default)));
    }

    if let Some(comment) = &col.comment {
        out.push_str(&format!(" COMMENT {}", quote_literal(comment)));
    }

    Ok(out)
}

fn referenced_table(cmd: &Command) -> Result<&str> {
    cmd.on
        .as_deref()
        .ok_or_else(|| Error::compilation("foreign key command missing .on(table)"))
}

fn foreign_key_clause(table: &str, cmd: &Command) -> Result<String> {
    let on = referenced_table(cmd)?;
    if cmd.columns.is_empty() {
        return Err(Error::compilation("foreign key command missing column"));
    }
    if cmd.references.is_empty() {
        return Err(Error::compilation("foreign key command missing .references(column)"));
    }
    let name = cmd
        .index
        .clone()
        .unwrap_or_else(|| naming::foreign_key_name(table, on));
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

    let mut clause = format!(
        "CONSTRAINT {} FOREIGN KEY ({cols}) REFERENCES {}({refs})",
        q(&name),
        q(on)
    );
    if let Some(action) = cmd.on_delete {
        clause.push_str(&format!(" ON DELETE {}", action.as_sql()));
    }
    if let Some(action) = cmd.on_update {
        clause.push_str(&format!(" ON UPDATE {}", action.as_sql()));
    }
    Ok(clause)
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

impl Grammar for MysqlGrammar {
    fn dialect(&self) -> Dialect {
        Dialect::MySQL
    }

    fn compile(&self, blueprint: &Blueprint) -> Result<Vec<String>> {
        let table = blueprint.table.as_str();
        let mut statements = Vec::new();
        let has_create = blueprint
            .commands
            .iter()
            .any(|c| c.name == CommandName::Create);

        if has_create {
            let mut body: Vec<String> = Vec::new();
            for col in &blueprint.columns {
                body.push(render_column_clause(col)?);
            }
            for cmd in blueprint
                .commands
                .iter()
                .filter(|c| c.name == CommandName::Foreign)
            {
                body.push(foreign_key_clause(table, cmd)?);
            }
            let pk_cols = primary_columns(blueprint);
            if !pk_cols.is_empty() {
                let cols = pk_cols
                    .iter()
                    .map(|c| q(c))
                    .collect::<Vec<_>>()
                    .join(", ");
                body.push(format!("PRIMARY KEY ({cols})"));
            }
            let table_comment = blueprint
                .table_comment()
                .map(|c| format!(" COMMENT={}", quote_literal(c)))
                .unwrap_or_default();
            statements.push(format!(
                "CREATE TABLE {} ({}){table_comment}",
                q(table),
                body.join(", ")
            ));
        } else {
            let added: Vec<&ColumnDefinition> =
                blueprint.columns.iter().filter(|c| !c.change).collect();
            if !added.is_empty() {
                let clauses = added
                    .iter()
                    .map(|c| render_column_clause(c).map(|clause| format!("ADD COLUMN {clause}")))
                    .collect::<Result<Vec<_>>>()?;
                statements.push(format!("ALTER TABLE {} {}", q(table), clauses.join(", ")));
            }

            for col in blueprint.columns.iter().filter(|c| c.change) {
                statements.push(format!(
                    "ALTER TABLE {} MODIFY COLUMN {}",
                    q(table),
                    render_column_clause(col)?
                ));
            }

            if let Some(comment) = blueprint.table_comment() {
                statements.push(format!(
                    "ALTER TABLE {} COMMENT = {}",
                    q(table),
                    quote_literal(comment)
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
                    statements.push(format!("RENAME TABLE {} TO {}", q(table), q(to)));
                }
                CommandName::DropColumn => {
                    let col = cmd
                        .column
                        .as_deref()
                        .ok_or_else(|| Error::compilation("dropColumn command missing column"))?;
                    statements.push(format!("ALTER TABLE {} DROP COLUMN {}", q(table), q(col)));
                }
                CommandName::RenameColumn => {
                    let from = cmd
                        .from
                        .as_deref()
                        .filter(|s| !s.is_empty())
                        .ok_or_else(|| Error::compilation("rename column command missing from/to"))?;
                    let to = cmd
                        .to
                        .as_deref()
                        .filter(|s| !s.is_empty())
                        .ok_or_else(|| Error::compilation("rename column command missing from/to"))?;
                    statements.push(format!(
                        "ALTER TABLE {} RENAME COLUMN {} TO {}",
                        q(table),
                        q(from),
                        q(to)
                    ));
                }
                CommandName::Primary => {
                    if !has_create {
                        let cols = cmd
                            .columns
                            .iter()
                            .map(|c| q(c))
                            .collect::<Vec<_>>()
                            .join(", ");
                        statements.push(format!(
                            "ALTER TABLE {} ADD PRIMARY KEY ({cols})",
                            q(table)
                        ));
                    }
                }
                CommandName::DropPrimary => {
                    statements.push(format!("ALTER TABLE {} DROP PRIMARY KEY", q(table)));
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
                        "ALTER TABLE {} ADD CONSTRAINT {} UNIQUE ({cols})",
                        q(table),
                        q(&name)
                    ));
                }
                CommandName::DropUnique => {
                    let name = cmd.index.clone().unwrap_or_default();
                    statements.push(format!("ALTER TABLE {} DROP INDEX {}", q(table), q(&name)));
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
                CommandName::DropIndex => {
                    let name = cmd.index.clone().unwrap_or_default();
                    statements.push(format!("DROP INDEX {} ON {}", q(&name), q(table)));
                }
                CommandName::FullText => {
                    let name = cmd
                        .index
                        .clone()
                        .unwrap_or_else(|| naming::full_text_name(table, &cmd.columns));
                    let cols = cmd
                        .columns
                        .iter()
                        .map(|c| q(c))
                        .collect::<Vec<_>>()
                        .join(", ");
                    statements.push(format!(
                        "ALTER TABLE {} ADD FULLTEXT INDEX {} ({cols})",
                        q(table),
                        q(&name)
                    ));
                }
                CommandName::DropFullText => {
                    let name = cmd.index.clone().unwrap_or_default();
                    statements.push(format!("ALTER TABLE {} DROP INDEX {}", q(table), q(&name)));
                }
                CommandName::Foreign => {
                    if !has_create {
                        statements.push(format!(
                            "ALTER TABLE {} ADD {}",
                            q(table),
                            foreign_key_clause(table, cmd)?
                        ));
                    }
                }
                CommandName::DropForeign => {
                    let name = cmd.index.clone().unwrap_or_default();
                    statements.push(format!(
                        "ALTER TABLE {} DROP FOREIGN KEY {}",
                        q(table),
                        q(&name)
                    ));
                }
                CommandName::RenameIndex => {
                    let from = cmd.from.as_deref().unwrap_or_default();
                    let to = cmd.to.as_deref().unwrap_or_default();
                    statements.push(format!(
                        "ALTER TABLE {} RENAME INDEX {} TO {}",
                        q(table),
                        q(from),
                        q(to)
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
                    "ALTER TABLE {} ADD CONSTRAINT {} UNIQUE ({})",
                    q(table),
                    q(&name),
                    q(&col.name)
                ));
            }
        }

        Ok(statements)
    }

    fn compile_table_exists(&self, schema: &str, table: &str) -> String {
        format!(
            "SELECT 1 FROM information_schema.tables WHERE table_schema = '{schema}' AND table_name = '{table}'"
        )
    }

    fn compile_column_listing(&self, schema: &str, table: &str) -> String {
        format!(
            "SELECT column_name, column_type, is_nullable, column_default FROM information_schema.columns WHERE table_schema = '{schema}' AND table_name = '{table}' ORDER BY ordinal_position"
        )
    }

    fn compile_index_listing(&self, schema: &str, table: &str) -> String {
        format!(
            "SELECT index_name, column_name, non_unique FROM information_schema.statistics WHERE table_schema = '{schema}' AND table_name = '{table}'"
        )
    }

    fn compile_tables(&self, schema: &str) -> String {
        format!(
            "SELECT table_name FROM information_schema.tables WHERE table_schema = '{schema}'"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Blueprint;

    #[test]
    fn test_foreign_key_missing_references_is_rejected() {
        let mut bp = Blueprint::new("posts");
        bp.foreign("user_id").on("users");

        let err = MysqlGrammar.compile(&bp).unwrap_err();
        assert!(matches!(err, Error::CompilationError(_)));
    }

    #[test]
    fn test_rename_column_missing_from_is_rejected() {
        let mut bp = Blueprint::new("users");
        bp.rename_column("", "new_name");

        let err = MysqlGrammar.compile(&bp).unwrap_err();
        assert!(matches!(err, Error::CompilationError(_)));
    }

    #[test]
    fn test_create_with_inline_primary_and_foreign() {
        let mut bp = Blueprint::new("posts");
        bp.create();
        bp.big_integer("id").unsigned().auto_increment().primary();
        bp.big_integer("user_id").unsigned();
        bp.foreign("user_id").references("id").on("users").cascade_on_delete();

        let statements = MysqlGrammar.compile(&bp).unwrap();
        assert_eq!(
            statements,
            vec![
                "CREATE TABLE `posts` (`id` BIGINT UNSIGNED NOT NULL AUTO_INCREMENT, `user_id` BIGINT UNSIGNED NOT NULL, CONSTRAINT `fk_posts_users` FOREIGN KEY (`user_id`) REFERENCES `users`(`id`) ON DELETE CASCADE, PRIMARY KEY (`id`))",
            ]
        );
    }

    #[test]
    fn test_full_text_index_command() {
        let mut bp = Blueprint::new("articles");
        bp.full_text(&["body"]);

        let statements = MysqlGrammar.compile(&bp).unwrap();
        assert_eq!(
            statements,
            vec!["ALTER TABLE `articles` ADD FULLTEXT INDEX `ft_articles_body` (`body`)"]
        );
    }

    #[test]
    fn test_table_and_column_comment_are_inline() {
        let mut bp = Blueprint::new("widgets");
        bp.create();
        bp.string("sku").comment("stock keeping unit");
        bp.comment("catalog of purchasable widgets");

        let statements = MysqlGrammar.compile(&bp).unwrap();
        assert_eq!(
            statements,
            vec![
                "CREATE TABLE `widgets` (`sku` VARCHAR(255) NOT NULL COMMENT 'stock keeping unit') COMMENT='catalog of purchasable widgets'",
            ]
        );
    }
}
