//! Column definitions and the fluent per-column modifier chain.

use std::collections::HashSet;

use blueprint_core::Value;

/// The closed set of column storage types a `Blueprint` can declare.
///
/// `Raw` is the escape hatch backing [`crate::Blueprint::column`] for a
/// caller-supplied, dialect-specific type string the fluent constructors
/// don't cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    BigIncrements,
    Increments,
    TinyIncrements,
    SmallIncrements,
    MediumIncrements,
    String,
    Char,
    Text,
    TinyText,
    MediumText,
    LongText,
    Integer,
    TinyInteger,
    SmallInteger,
    MediumInteger,
    BigInteger,
    Float,
    Double,
    Decimal,
    Boolean,
    Enum,
    Json,
    Jsonb,
    Uuid,
    Binary,
    Date,
    Time,
    TimeTz,
    DateTime,
    DateTimeTz,
    Timestamp,
    TimestampTz,
    Year,
    Geography,
    Geometry,
    Point,
    Raw(String),
}

/// A single column in a [`crate::Blueprint`], built up through the fluent
/// modifier chain returned by its constructor method.
///
/// `commands` mirrors the invoked-setter bookkeeping used by the wider
/// command list: it records which modifier methods were actually called on
/// this column, which matters for `default(null)` — `default_value` holding
/// `Some(Value::Null)` already distinguishes "defaulted to null" from
/// "never defaulted" (`None`), but `commands` keeps that distinction
/// inspectable per-field the same way it is for every other modifier.
#[derive(Debug, Clone)]
pub struct ColumnDefinition {
    pub name: String,
    pub column_type: ColumnType,
    pub length: Option<u32>,
    pub precision: Option<u32>,
    pub total: Option<u32>,
    pub places: Option<u32>,
    pub nullable: Option<bool>,
    pub unique: Option<bool>,
    pub unique_name: Option<String>,
    pub primary: Option<bool>,
    pub auto_increment: Option<bool>,
    pub unsigned: Option<bool>,
    pub use_current: Option<bool>,
    pub default_value: Option<Value>,
    pub comment: Option<String>,
    pub allowed: Vec<String>,
    pub subtype: Option<String>,
    pub srid: Option<i64>,
    pub change: bool,
    pub commands: HashSet<String>,
}

impl ColumnDefinition {
    pub(crate) fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            length: None,
            precision: None,
            total: None,
            places: None,
            nullable: None,
            unique: None,
            unique_name: None,
            primary: None,
            auto_increment: None,
            unsigned: None,
            use_current: None,
            default_value: None,
            comment: None,
            allowed: Vec::new(),
            subtype: None,
            srid: None,
            change: false,
            commands: HashSet::new(),
        }
    }

    fn mark(&mut self, setter: &str) {
        self.commands.insert(setter.to_string());
    }

    pub fn nullable(&mut self) -> &mut Self {
        self.nullable = Some(true);
        self.mark("nullable");
        self
    }

    pub fn not_nullable(&mut self) -> &mut Self {
        self.nullable = Some(false);
        self.mark("nullable");
        self
    }

    pub fn default(&mut self, value: impl Into<Value>) -> &mut Self {
        self.default_value = Some(value.into());
        self.mark("default");
        self
    }

    /// Sets the default to a raw SQL expression (e.g. `CURRENT_TIMESTAMP`),
    /// emitted unquoted by the grammar.
    pub fn default_raw(&mut self, expression: impl Into<String>) -> &mut Self {
        self.default_value = Some(Value::Expression(expression.into()));
        self.mark("default");
        self
    }

    pub fn unique(&mut self) -> &mut Self {
        self.unique = Some(true);
        self.mark("unique");
        self
    }

    /// Overrides the derived `uk_<table>_<col>` constraint name for this
    /// column's unique index, the column-DSL equivalent of
    /// [`crate::Command::name_as`] on the table-level `unique(columns)` call.
    pub fn name_as(&mut self, index_name: impl Into<String>) -> &mut Self {
        self.unique_name = Some(index_name.into());
        self
    }

    pub fn primary(&mut self) -> &mut Self {
        self.primary = Some(true);
        self.mark("primary");
        self
    }

    pub fn auto_increment(&mut self) -> &mut Self {
        self.auto_increment = Some(true);
        self.mark("autoIncrement");
        self
    }

    pub fn unsigned(&mut self) -> &mut Self {
        self.unsigned = Some(true);
        self.mark("unsigned");
        self
    }

    pub fn use_current(&mut self) -> &mut Self {
        self.use_current = Some(true);
        self.mark("useCurrent");
        self
    }

    pub fn comment(&mut self, text: impl Into<String>) -> &mut Self {
        self.comment = Some(text.into());
        self.mark("comment");
        self
    }

    /// Marks this column as an alteration of an existing column rather than
    /// a new one, so the `change` command compiles instead of `add`.
    pub fn change(&mut self) -> &mut Self {
        self.change = true;
        self.mark("change");
        self
    }

    pub fn length(&mut self, length: u32) -> &mut Self {
        self.length = Some(length);
        self
    }

    pub fn precision(&mut self, precision: u32) -> &mut Self {
        self.precision = Some(precision);
        self
    }

    pub fn total(&mut self, total: u32) -> &mut Self {
        self.total = Some(total);
        self
    }

    pub fn places(&mut self, places: u32) -> &mut Self {
        self.places = Some(places);
        self
    }

    /// Grounds the spatial `subtype`/`srid` refinements for `geometry`
    /// columns (e.g. restricting to `POINT` with a specific SRID).
    pub fn subtype(&mut self, subtype: impl Into<String>) -> &mut Self {
        self.subtype = Some(subtype.into());
        self
    }

    pub fn srid(&mut self, srid: i64) -> &mut Self {
        self.srid = Some(srid);
        self
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_null_distinguished_from_unset() {
        let mut unset = ColumnDefinition::new("a", ColumnType::String);
        let mut explicit_null = ColumnDefinition::new("b", ColumnType::String);
        explicit_null.default(Value::Null);

        assert_eq!(unset.default_value, None);
        assert_eq!(explicit_null.default_value, Some(Value::Null));
        assert!(!unset.commands.contains("default"));
        assert!(explicit_null.commands.contains("default"));
    }

    #[test]
    fn test_chained_modifiers_return_same_column() {
        let mut col = ColumnDefinition::new("email", ColumnType::String);
        col.nullable().unique().comment("contact address");

        assert_eq!(col.nullable, Some(true));
        assert_eq!(col.unique, Some(true));
        assert_eq!(col.comment.as_deref(), Some("contact address"));
    }

    #[test]
    fn test_default_raw_uses_expression_value() {
        let mut col = ColumnDefinition::new("created_at", ColumnType::Timestamp);
        col.default_raw("CURRENT_TIMESTAMP");
        assert_eq!(
            col.default_value,
            Some(Value::Expression("CURRENT_TIMESTAMP".to_string()))
        );
    }

    #[test]
    fn test_unique_name_as_overrides_derived_constraint_name() {
        let mut col = ColumnDefinition::new("email", ColumnType::String);
        col.unique().name_as("users_email_unique");

        assert_eq!(col.unique, Some(true));
        assert_eq!(col.unique_name.as_deref(), Some("users_email_unique"));
    }

    #[test]
    fn test_unique_without_name_as_leaves_unique_name_unset() {
        let mut col = ColumnDefinition::new("email", ColumnType::String);
        col.unique();

        assert_eq!(col.unique_name, None);
    }
}
