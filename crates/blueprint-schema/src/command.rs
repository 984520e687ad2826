//! Table-level commands queued on a [`crate::Blueprint`] and compiled, in
//! insertion order, into one statement each.

/// The closed set of command tags a `Blueprint` can queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandName {
    Add,
    Change,
    Create,
    Drop,
    DropIfExists,
    DropColumn,
    DropForeign,
    DropFullText,
    DropIndex,
    DropPrimary,
    DropUnique,
    Foreign,
    FullText,
    Index,
    Primary,
    Rename,
    RenameColumn,
    RenameIndex,
    Unique,
}

/// Referential actions available to `foreign().onDelete()/.onUpdate()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferentialAction {
    Cascade,
    SetNull,
    SetDefault,
    Restrict,
    NoAction,
}

impl ReferentialAction {
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
            Self::Restrict => "RESTRICT",
            Self::NoAction => "NO ACTION",
        }
    }
}

/// A single queued command. The struct is intentionally flat, following the
/// table-level command's own shape: every field is optional or empty by
/// default and only the fields relevant to `name` are populated by the
/// constructor that created it.
#[derive(Debug, Clone)]
pub struct Command {
    pub name: CommandName,
    pub column: Option<String>,
    pub columns: Vec<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub on: Option<String>,
    pub references: Vec<String>,
    pub on_delete: Option<ReferentialAction>,
    pub on_update: Option<ReferentialAction>,
    pub index: Option<String>,
    pub algorithm: Option<String>,
    pub language: Option<String>,
    pub deferrable: Option<bool>,
    pub initially_immediate: Option<bool>,
}

impl Command {
    pub(crate) fn new(name: CommandName) -> Self {
        Self {
            name,
            column: None,
            columns: Vec::new(),
            from: None,
            to: None,
            on: None,
            references: Vec::new(),
            on_delete: None,
            on_update: None,
            index: None,
            algorithm: None,
            language: None,
            deferrable: None,
            initially_immediate: None,
        }
    }

    /// Overrides the derived constraint/index name for this command.
    pub fn name_as(&mut self, index_name: impl Into<String>) -> &mut Self {
        self.index = Some(index_name.into());
        self
    }

    pub fn references(&mut self, column: impl Into<String>) -> &mut Self {
        self.references.push(column.into());
        self
    }

    pub fn on(&mut self, table: impl Into<String>) -> &mut Self {
        self.on = Some(table.into());
        self
    }

    pub fn on_delete(&mut self, action: ReferentialAction) -> &mut Self {
        self.on_delete = Some(action);
        self
    }

    pub fn on_update(&mut self, action: ReferentialAction) -> &mut Self {
        self.on_update = Some(action);
        self
    }

    pub fn cascade_on_delete(&mut self) -> &mut Self {
        self.on_delete(ReferentialAction::Cascade)
    }

    pub fn restrict_on_delete(&mut self) -> &mut Self {
        self.on_delete(ReferentialAction::Restrict)
    }

    pub fn null_on_delete(&mut self) -> &mut Self {
        self.on_delete(ReferentialAction::SetNull)
    }

    pub fn no_action_on_delete(&mut self) -> &mut Self {
        self.on_delete(ReferentialAction::NoAction)
    }

    pub fn cascade_on_update(&mut self) -> &mut Self {
        self.on_update(ReferentialAction::Cascade)
    }

    pub fn restrict_on_update(&mut self) -> &mut Self {
        self.on_update(ReferentialAction::Restrict)
    }

    /// Postgres-only; the grammar for other dialects ignores this flag.
    pub fn deferrable(&mut self) -> &mut Self {
        self.deferrable = Some(true);
        self
    }

    pub fn initially_immediate(&mut self, value: bool) -> &mut Self {
        self.initially_immediate = Some(value);
        self
    }

    pub fn algorithm(&mut self, algorithm: impl Into<String>) -> &mut Self {
        self.algorithm = Some(algorithm.into());
        self
    }

    pub fn language(&mut self, language: impl Into<String>) -> &mut Self {
        self.language = Some(language.into());
        self
    }
}
