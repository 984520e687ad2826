//! Core types shared by the blueprint schema-definition library: the
//! dialect tag, the error type, identifier/literal quoting, dynamic values
//! and rows, and the transaction trait the live execution context wraps.

pub mod connection;
pub mod dialect;
pub mod error;
pub mod identifiers;
pub mod row;
pub mod value;

pub use connection::{ExecResult, Transaction};
pub use dialect::{Dialect, get_dialect, set_dialect};
pub use error::{Error, Result};
pub use identifiers::{quote_ident, quote_ident_mysql, quote_literal, split_schema_qualified};
pub use row::Row;
pub use value::Value;

pub use asupersync::{Cx, Outcome};
