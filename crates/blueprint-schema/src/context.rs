//! The execution sink a [`crate::Builder`] drives: a live context wrapping a
//! caller-owned transaction, or a dry-run context that only records what
//! would have been executed.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;

use blueprint_core::{Cx, ExecResult, Outcome, Row, Transaction, Value};

/// A single captured `(sql, args)` pair, trimmed of leading/trailing
/// whitespace, recorded by [`DryRunContext`].
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedStatement {
    pub sql: String,
    pub args: Vec<Value>,
}

/// Uniform execution sink a `Builder` holds: either a live context wrapping
/// a transaction, or a dry-run context. Builders are written against this
/// trait and never need to know which one they were given.
pub trait Context: Send + Sync {
    fn exec(
        &self,
        cx: &Cx,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = Outcome<ExecResult, blueprint_core::Error>> + Send;

    fn query(
        &self,
        cx: &Cx,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = Outcome<Vec<Row>, blueprint_core::Error>> + Send;

    fn query_row(
        &self,
        cx: &Cx,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = Outcome<Row, blueprint_core::Error>> + Send;
}

/// Wraps a caller-supplied transaction. The library never begins, commits,
/// or rolls back this transaction; lifecycle is entirely the caller's.
pub struct LiveContext<'a, T: Transaction> {
    transaction: &'a T,
}

impl<'a, T: Transaction> LiveContext<'a, T> {
    pub fn new(transaction: &'a T) -> Self {
        Self { transaction }
    }
}

impl<T: Transaction + Sync> Context for LiveContext<'_, T> {
    async fn exec(
        &self,
        cx: &Cx,
        sql: &str,
        args: &[Value],
    ) -> Outcome<ExecResult, blueprint_core::Error> {
        self.transaction.exec(cx, sql, args).await
    }

    async fn query(
        &self,
        cx: &Cx,
        sql: &str,
        args: &[Value],
    ) -> Outcome<Vec<Row>, blueprint_core::Error> {
        self.transaction.query(cx, sql, args).await
    }

    async fn query_row(
        &self,
        cx: &Cx,
        sql: &str,
        args: &[Value],
    ) -> Outcome<Row, blueprint_core::Error> {
        self.transaction.query_row(cx, sql, args).await
    }
}

/// Captures every statement instead of executing it. `captured_sql` is
/// append-only; `pending_queries` is a FIFO a logger collaborator can drain
/// independently of the capture log.
#[derive(Default)]
pub struct DryRunContext {
    captured: Mutex<Vec<CapturedStatement>>,
    pending_queries: Mutex<VecDeque<CapturedStatement>>,
}

impl DryRunContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every statement passed to `exec`/`query`/`query_row`, in call order.
    #[must_use]
    pub fn captured_sql(&self) -> Vec<CapturedStatement> {
        self.captured.lock().expect("capture lock poisoned").clone()
    }

    /// Pops the oldest not-yet-drained query off the pending-queries FIFO.
    pub fn drain_pending_query(&self) -> Option<CapturedStatement> {
        let drained = self
            .pending_queries
            .lock()
            .expect("pending-queries lock poisoned")
            .pop_front();
        if let Some(stmt) = &drained {
            blueprint_console::log_debug!("drained pending query: {}", stmt.sql);
        }
        drained
    }

    fn record(&self, sql: &str, args: &[Value]) -> CapturedStatement {
        let statement = CapturedStatement {
            sql: sql.trim().to_string(),
            args: args.to_vec(),
        };
        self.captured
            .lock()
            .expect("capture lock poisoned")
            .push(statement.clone());
        statement
    }
}

impl Context for DryRunContext {
    async fn exec(
        &self,
        _cx: &Cx,
        sql: &str,
        args: &[Value],
    ) -> Outcome<ExecResult, blueprint_core::Error> {
        self.record(sql, args);
        Outcome::Ok(ExecResult {
            rows_affected: 1,
            last_insert_id: 1,
        })
    }

    async fn query(
        &self,
        _cx: &Cx,
        sql: &str,
        args: &[Value],
    ) -> Outcome<Vec<Row>, blueprint_core::Error> {
        let statement = self.record(sql, args);
        self.pending_queries
            .lock()
            .expect("pending-queries lock poisoned")
            .push_back(statement);
        Outcome::Ok(Vec::new())
    }

    async fn query_row(
        &self,
        _cx: &Cx,
        sql: &str,
        args: &[Value],
    ) -> Outcome<Row, blueprint_core::Error> {
        let statement = self.record(sql, args);
        self.pending_queries
            .lock()
            .expect("pending-queries lock poisoned")
            .push_back(statement);
        Outcome::Ok(Row::empty())
    }
}

/// Builds a live context over `transaction`.
pub fn new_context<T: Transaction>(transaction: &T) -> LiveContext<'_, T> {
    LiveContext::new(transaction)
}

/// Builds a fresh dry-run context with empty capture/pending-queries logs.
#[must_use]
pub fn new_dry_run_context() -> DryRunContext {
    DryRunContext::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_run_capture_trims_whitespace_and_preserves_args() {
        let ctx = DryRunContext::new();
        let stmt = ctx.record("  SELECT 1  ", &[Value::Int(7)]);
        assert_eq!(stmt.sql, "SELECT 1");
        assert_eq!(stmt.args, vec![Value::Int(7)]);
        assert_eq!(ctx.captured_sql(), vec![stmt]);
    }

    #[test]
    fn test_dry_run_pending_queries_is_fifo() {
        let ctx = DryRunContext::new();
        ctx.record("SELECT a", &[]);
        ctx.pending_queries
            .lock()
            .unwrap()
            .push_back(ctx.captured.lock().unwrap()[0].clone());
        ctx.record("SELECT b", &[]);
        ctx.pending_queries
            .lock()
            .unwrap()
            .push_back(ctx.captured.lock().unwrap()[1].clone());

        assert_eq!(ctx.drain_pending_query().unwrap().sql, "SELECT a");
        assert_eq!(ctx.drain_pending_query().unwrap().sql, "SELECT b");
        assert!(ctx.drain_pending_query().is_none());
    }
}
