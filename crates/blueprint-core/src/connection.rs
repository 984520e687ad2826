//! The transaction handle trait the live execution context wraps.

use crate::error::Error;
use crate::row::Row;
use crate::value::Value;
use asupersync::{Cx, Outcome};

/// Result of an `exec` call: rows affected plus, for inserts, the
/// driver-assigned last insert id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecResult {
    pub rows_affected: u64,
    pub last_insert_id: i64,
}

/// The caller-supplied transaction handle a live `Context` forwards calls
/// to. The library never begins, commits, or rolls back a transaction
/// itself — it only calls `exec`/`query`/`query_one` against one the
/// caller already owns.
///
/// Every operation takes a `Cx` so that a triggered cancellation token
/// surfaces as a driver error on the next call, per the cancellation
/// model: in-flight statements are not retried.
pub trait Transaction: Send + Sync {
    fn exec(
        &self,
        cx: &Cx,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = Outcome<ExecResult, Error>> + Send;

    fn query(
        &self,
        cx: &Cx,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = Outcome<Vec<Row>, Error>> + Send;

    fn query_row(
        &self,
        cx: &Cx,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = Outcome<Row, Error>> + Send;
}

use std::future::Future;
