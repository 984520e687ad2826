//! PostgreSQL grammar: named `pk_`/`uk_`/`fk_` constraints emitted as
//! separate `ALTER TABLE` statements (except the primary key, which is
//! embedded in `CREATE TABLE` when the table is being created), SERIAL-family
//! auto-increment types, and `to_tsvector`/GIN full-text indexes.

use blueprint_core::{Dialect, Error, Result, Value, quote_literal};

use super::naming;
use super::Grammar;
use crate::column::{ColumnDefinition, ColumnType};
use crate::command::{Command, CommandName};
use crate::Blueprint;

pub struct PostgresGrammar;

/// PostgreSQL identifiers are emitted bare; unlike SQLite this grammar never
/// needs to double-quote, since every name produced here is already a valid
/// unquoted identifier.
fn q(name: &str) -> String {
    name.to_string()
}

fn get_type(col: &ColumnDefinition) -> String {
    if col.auto_increment == Some(true) {
        return match col.column_type {
            ColumnType::BigIncrements | ColumnType::BigInteger => "BIGSERIAL".to_string(),
            ColumnType::TinyIncrements
            | ColumnType::SmallIncrements
            | ColumnType::TinyInteger
            | ColumnType::SmallInteger => "SMALLSERIAL".to_string(),
            _ => "SERIAL".to_string(),
        };
    }

    match &col.column_type {
        ColumnType::BigIncrements | ColumnType::BigInteger => "BIGINT".to_string(),
        ColumnType::Increments
        | ColumnType::MediumIncrements
        | ColumnType::Integer
        | ColumnType::MediumInteger => "INTEGER".to_string(),
        ColumnType::TinyIncrements
        | ColumnType::SmallIncrements
        | ColumnType::TinyInteger
        | ColumnType::SmallInteger => "SMALLINT".to_string(),
        ColumnType::String | ColumnType::Enum => match col.length {
            Some(n) => format!("VARCHAR({n})"),
            None => "VARCHAR".to_string(),
        },
        ColumnType::Char => match col.length {
            Some(n) => format!("CHAR({n})"),
            None => "CHAR".to_string(),
        },
        ColumnType::Text | ColumnType::TinyText | ColumnType::MediumText | ColumnType::LongText => {
            "TEXT".to_string()
        }
        ColumnType::Float => "REAL".to_string(),
        ColumnType::Double => "DOUBLE PRECISION".to_string(),
        ColumnType::Decimal => format!(
            "DECIMAL({},{})",
            col.total.unwrap_or(10),
            col.places.unwrap_or(0)
        ),
        ColumnType::Boolean => "BOOLEAN".to_string(),
        ColumnType::Json => "JSON".to_string(),
        ColumnType::Jsonb => "JSONB".to_string(),
        ColumnType::Uuid => "UUID".to_string(),
        ColumnType::Binary => "BYTEA".to_string(),
        ColumnType::Date => "DATE".to_string(),
        ColumnType::Time => with_precision("TIME", col.precision),
        ColumnType::TimeTz => format!("{} WITH TIME ZONE", with_precision("TIME", col.precision)),
        ColumnType::DateTime => with_precision("TIMESTAMP", col.precision),
        ColumnType::DateTimeTz => {
            format!("{} WITH TIME ZONE", with_precision("TIMESTAMP", col.precision))
        }
        ColumnType::Timestamp => with_precision("TIMESTAMP", col.precision),
        ColumnType::TimestampTz => {
            format!("{} WITH TIME ZONE", with_precision("TIMESTAMP", col.precision))
        }
        ColumnType::Year => "SMALLINT".to_string(),
        ColumnType::Geography => "GEOGRAPHY".to_string(),
        ColumnType::Geometry => "GEOMETRY".to_string(),
        ColumnType::Point => "GEOMETRY(POINT)".to_string(),
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
        Value::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
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

    if col.auto_increment != Some(true) {
        if col.use_current == Some(true) && col.default_value.is_none() {
            out.push_str(" DEFAULT CURRENT_TIMESTAMP");
        } else if let Some(default) = &col.default_value {
            out.push_str(&format!(" DEFAULT {}", value_sql(default)));
        }
    }

    out.push_str(if col.is_nullable() { " NULL" } else { " NOT NULL" });
    Ok(out)
}

fn referenced_table(cmd: &Command) -> Result<&str> {
    cmd.on
        .as_deref()
        .ok_or_else(|| Error::compilation("foreign key command missing .on(table)"))
}

fn foreign_key_clause(table: &str, cmd: &Command, named: bool) -> Result<String> {
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
    let cols = cmd.columns.join(", ");
    let refs = cmd.references.join(", ");

    let mut clause = if named {
        format!(
            "CONSTRAINT {} FOREIGN KEY ({cols}) REFERENCES {on}({refs})",
            q(&name)
        )
    } else {
        format!("FOREIGN KEY ({cols}) REFERENCES {on}({refs})")
    };

    if let Some(action) = cmd.on_delete {
        clause.push_str(&format!(" ON DELETE {}", action.as_sql()));
    }
    if let Some(action) = cmd.on_update {
        clause.push_str(&format!(" ON UPDATE {}", action.as_sql()));
    }
    if cmd.deferrable == Some(true) {
        clause.push_str(" DEFERRABLE");
        match cmd.initially_immediate {
            Some(true) => clause.push_str(" INITIALLY IMMEDIATE"),
            Some(false) => clause.push_str(" INITIALLY DEFERRED"),
            None => {}
        }
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

impl Grammar for PostgresGrammar {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
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
            let pk_cols = primary_columns(blueprint);
            if !pk_cols.is_empty() {
                let name = naming::primary_key_name(table);
                body.push(format!(
                    "CONSTRAINT {} PRIMARY KEY ({})",
                    q(&name),
                    pk_cols.join(", ")
                ));
            }
            statements.push(format!("CREATE TABLE {} ({})", q(table), body.join(", ")));
        } else {
            let added: Vec<&ColumnDefinition> =
                blueprint.columns.iter().filter(|c| !c.change).collect();
            if !added.is_empty() {
                let clauses = added
                    .iter()
                    .map(|c| render_column_clause(c).map(|clause| format!("ADD COLUMN {clause}")))
                    .collect::<Result<Vec<_>>>()?;
                statements.push(format!(
                    "ALTER TABLE {} {}",
                    q(table),
                    clauses.join(", ")
                ));
            }

            for col in blueprint.columns.iter().filter(|c| c.change) {
                let mut clauses = vec![format!(
                    "ALTER COLUMN {} TYPE {}",
                    q(&col.name),
                    get_type(col)
                )];
                if col.commands.contains("nullable") {
                    clauses.push(format!(
                        "ALTER COLUMN {} {}",
                        q(&col.name),
                        if col.is_nullable() {
                            "DROP NOT NULL"
                        } else {
                            "SET NOT NULL"
                        }
                    ));
                }
                if let Some(default) = &col.default_value {
                    clauses.push(format!(
                        "ALTER COLUMN {} SET DEFAULT {}",
                        q(&col.name),
                        value_sql(default)
                    ));
                }
                statements.push(format!("ALTER TABLE {} {}", q(table), clauses.join(", ")));
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
                        let name = naming::primary_key_name(table);
                        statements.push(format!(
                            "ALTER TABLE {} ADD CONSTRAINT {} PRIMARY KEY ({})",
                            q(table),
                            q(&name),
                            cmd.columns.join(", ")
                        ));
                    }
                }
                CommandName::DropPrimary => {
                    let name = naming::primary_key_name(table);
                    statements.push(format!(
                        "ALTER TABLE {} DROP CONSTRAINT {}",
                        q(table),
                        q(&name)
                    ));
                }
                CommandName::Unique => {
                    let name = cmd
                        .index
                        .clone()
                        .unwrap_or_else(|| naming::unique_key_name(table, &cmd.columns));
                    statements.push(format!(
                        "ALTER TABLE {} ADD CONSTRAINT {} UNIQUE ({})",
                        q(table),
                        q(&name),
                        cmd.columns.join(", ")
                    ));
                }
                CommandName::DropUnique => {
                    let name = cmd.index.clone().unwrap_or_default();
                    statements.push(format!(
                        "ALTER TABLE {} DROP CONSTRAINT {}",
                        q(table),
                        q(&name)
                    ));
                }
                CommandName::Index => {
                    let name = cmd
                        .index
                        .clone()
                        .unwrap_or_else(|| naming::index_name(table, &cmd.columns));
                    let using = cmd
                        .algorithm
                        .as_ref()
                        .map(|alg| format!(" USING {alg}"))
                        .unwrap_or_default();
                    statements.push(format!(
                        "CREATE INDEX {}{using} ON {} ({})",
                        q(&name),
                        q(table),
                        cmd.columns.join(", ")
                    ));
                }
                CommandName::DropIndex => {
                    let name = cmd.index.clone().unwrap_or_default();
                    statements.push(format!("DROP INDEX {}", q(&name)));
                }
                CommandName::FullText => {
                    let name = cmd
                        .index
                        .clone()
                        .unwrap_or_else(|| naming::full_text_name(table, &cmd.columns));
                    let language = cmd.language.clone().unwrap_or_else(|| "english".to_string());
                    let concat = cmd
                        .columns
                        .iter()
                        .map(|c| q(c))
                        .collect::<Vec<_>>()
                        .join(" || ' ' || ");
                    statements.push(format!(
                        "CREATE INDEX {} ON {} USING GIN (to_tsvector('{language}', {concat}))",
                        q(&name),
                        q(table)
                    ));
                }
                CommandName::DropFullText => {
                    let name = cmd.index.clone().unwrap_or_default();
                    statements.push(format!("DROP INDEX {}", q(&name)));
                }
                CommandName::Foreign => {
                    statements.push(format!(
                        "ALTER TABLE {} ADD {}",
                        q(table),
                        foreign_key_clause(table, cmd, true)?
                    ));
                }
                CommandName::DropForeign => {
                    let name = cmd.index.clone().unwrap_or_default();
                    statements.push(format!(
                        "ALTER TABLE {} DROP CONSTRAINT {}",
                        q(table),
                        q(&name)
                    ));
                }
                CommandName::RenameIndex => {
                    let from = cmd.from.as_deref().unwrap_or_default();
                    let to = cmd.to.as_deref().unwrap_or_default();
                    statements.push(format!("ALTER INDEX {} RENAME TO {}", q(from), q(to)));
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
            if let Some(comment) = &col.comment {
                statements.push(format!(
                    "COMMENT ON COLUMN {}.{} IS {}",
                    q(table),
                    q(&col.name),
                    quote_literal(comment)
                ));
            }
        }

        if let Some(comment) = blueprint.table_comment() {
            statements.push(
                self.compile_table_comment(table, comment)
                    .expect("PostgresGrammar::compile_table_comment always returns Some"),
            );
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
            "SELECT column_name, data_type, is_nullable, column_default FROM information_schema.columns WHERE table_schema = '{schema}' AND table_name = '{table}' ORDER BY ordinal_position"
        )
    }

    fn compile_index_listing(&self, schema: &str, table: &str) -> String {
        format!(
            "SELECT i.relname AS index_name, a.attname AS column_name, ix.indisunique, ix.indisprimary FROM pg_index ix JOIN pg_class t ON t.oid = ix.indrelid JOIN pg_class i ON i.oid = ix.indexrelid JOIN pg_attribute a ON a.attrelid = t.oid AND a.attnum = ANY(ix.indkey) JOIN pg_namespace n ON n.oid = t.relnamespace WHERE n.nspname = '{schema}' AND t.relname = '{table}'"
        )
    }

    fn compile_tables(&self, schema: &str) -> String {
        format!(
            "SELECT table_name FROM information_schema.tables WHERE table_schema = '{schema}'"
        )
    }

    fn compile_table_comment(&self, table: &str, comment: &str) -> Option<String> {
        Some(format!(
            "COMMENT ON TABLE {} IS {}",
            q(table),
            quote_literal(comment)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Blueprint;

    #[test]
    fn test_s1_create_users() {
        let mut bp = Blueprint::new("users");
        bp.create();
        bp.id();
        bp.string("name");
        bp.string("email").unique();
        bp.string("password").nullable();
        bp.timestamp("created_at").use_current();
        bp.timestamp("updated_at").use_current();

        let statements = PostgresGrammar.compile(&bp).unwrap();
        assert_eq!(
            statements,
            vec![
                "CREATE TABLE users (id BIGSERIAL NOT NULL, name VARCHAR(255) NOT NULL, email VARCHAR(255) NOT NULL, password VARCHAR(255) NULL, created_at TIMESTAMP(0) DEFAULT CURRENT_TIMESTAMP NOT NULL, updated_at TIMESTAMP(0) DEFAULT CURRENT_TIMESTAMP NOT NULL, CONSTRAINT pk_users PRIMARY KEY (id))",
                "ALTER TABLE users ADD CONSTRAINT uk_users_email UNIQUE (email)",
            ]
        );
    }

    #[test]
    fn test_unique_column_name_as_overrides_derived_constraint_name() {
        let mut bp = Blueprint::new("users");
        bp.create();
        bp.string("email").unique().name_as("users_email_unique");

        let statements = PostgresGrammar.compile(&bp).unwrap();
        assert!(statements[1].contains("CONSTRAINT users_email_unique UNIQUE (email)"));
    }

    #[test]
    fn test_s2_foreign_key_deferrable() {
        let mut bp = Blueprint::new("posts");
        bp.foreign("user_id")
            .references("id")
            .on("users")
            .cascade_on_delete()
            .deferrable()
            .initially_immediate(false);

        let statements = PostgresGrammar.compile(&bp).unwrap();
        assert_eq!(
            statements,
            vec![
                "ALTER TABLE posts ADD CONSTRAINT fk_posts_users FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE DEFERRABLE INITIALLY DEFERRED",
            ]
        );
    }

    #[test]
    fn test_foreign_key_missing_references_is_rejected() {
        let mut bp = Blueprint::new("posts");
        bp.foreign("user_id").on("users");

        let err = PostgresGrammar.compile(&bp).unwrap_err();
        assert!(matches!(err, Error::CompilationError(_)));
    }

    #[test]
    fn test_foreign_key_missing_columns_is_rejected() {
        let mut bp = Blueprint::new("posts");
        bp.foreign("user_id").references("id").on("users");
        bp.commands.last_mut().unwrap().columns.clear();

        let err = PostgresGrammar.compile(&bp).unwrap_err();
        assert!(matches!(err, Error::CompilationError(_)));
    }

    #[test]
    fn test_rename_column_missing_to_is_rejected() {
        let mut bp = Blueprint::new("users");
        bp.rename_column("old_name", "");

        let err = PostgresGrammar.compile(&bp).unwrap_err();
        assert!(matches!(err, Error::CompilationError(_)));
    }

    #[test]
    fn test_s3_change_column() {
        let mut bp = Blueprint::new("users");
        bp.string("email").length(500).nullable().change();

        let statements = PostgresGrammar.compile(&bp).unwrap();
        assert_eq!(
            statements,
            vec!["ALTER TABLE users ALTER COLUMN email TYPE VARCHAR(500), ALTER COLUMN email DROP NOT NULL"]
        );
    }

    #[test]
    fn test_s4_enum_column() {
        let mut bp = Blueprint::new("users");
        bp.r#enum("status", &["active", "inactive", "pending"]);

        let statements = PostgresGrammar.compile(&bp).unwrap();
        assert_eq!(
            statements,
            vec!["ALTER TABLE users ADD COLUMN status VARCHAR(255) CHECK (status IN ('active', 'inactive', 'pending')) NOT NULL"]
        );
    }

    #[test]
    fn test_table_comment_emits_trailing_statement() {
        let mut bp = Blueprint::new("widgets");
        bp.create();
        bp.id();
        bp.comment("catalog of purchasable widgets");

        let statements = PostgresGrammar.compile(&bp).unwrap();
        assert_eq!(
            statements.last().unwrap(),
            "COMMENT ON TABLE widgets IS 'catalog of purchasable widgets'"
        );
    }

    #[test]
    fn test_column_comment_emits_trailing_statement() {
        let mut bp = Blueprint::new("widgets");
        bp.create();
        bp.string("sku").comment("stock keeping unit");

        let statements = PostgresGrammar.compile(&bp).unwrap();
        assert_eq!(
            statements.last().unwrap(),
            "COMMENT ON COLUMN widgets.sku IS 'stock keeping unit'"
        );
    }
}
