//! Dialect tag and process-wide dialect configuration.

use std::sync::atomic::{AtomicU8, Ordering};

/// The closed set of SQL dialects this library targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Dialect {
    Unknown = 0,
    Postgres = 1,
    MySQL = 2,
    SQLite = 3,
}

impl Dialect {
    /// Parse an external driver name into a `Dialect`.
    ///
    /// Accepted names (case-sensitive): `postgres`, `pgx`, `mysql`,
    /// `mariadb`, `sqlite`, `sqlite3`. Anything else maps to `Unknown`.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "postgres" | "pgx" => Dialect::Postgres,
            "mysql" | "mariadb" => Dialect::MySQL,
            "sqlite" | "sqlite3" => Dialect::SQLite,
            _ => Dialect::Unknown,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Dialect::Unknown => "unknown",
            Dialect::Postgres => "postgres",
            Dialect::MySQL => "mysql",
            Dialect::SQLite => "sqlite",
        }
    }

    const fn from_u8(v: u8) -> Self {
        match v {
            1 => Dialect::Postgres,
            2 => Dialect::MySQL,
            3 => Dialect::SQLite,
            _ => Dialect::Unknown,
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Process-wide dialect configuration: an atomic cell initialized to
// Unknown, read on every Builder construction, written by `set_dialect`.
// Last write wins; lock-free reads and writes are safe from any thread.
static GLOBAL_DIALECT: AtomicU8 = AtomicU8::new(Dialect::Unknown as u8);

/// Set the process-wide dialect. Callers should do this once at startup,
/// before constructing any Builder that relies on the global.
pub fn set_dialect(dialect: Dialect) {
    GLOBAL_DIALECT.store(dialect as u8, Ordering::Relaxed);
}

/// Read the process-wide dialect.
#[must_use]
pub fn get_dialect() -> Dialect {
    Dialect::from_u8(GLOBAL_DIALECT.load(Ordering::Relaxed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_postgres() {
        assert_eq!(Dialect::from_name("postgres"), Dialect::Postgres);
        assert_eq!(Dialect::from_name("pgx"), Dialect::Postgres);
    }

    #[test]
    fn test_from_name_mysql() {
        assert_eq!(Dialect::from_name("mysql"), Dialect::MySQL);
        assert_eq!(Dialect::from_name("mariadb"), Dialect::MySQL);
    }

    #[test]
    fn test_from_name_sqlite() {
        assert_eq!(Dialect::from_name("sqlite"), Dialect::SQLite);
        assert_eq!(Dialect::from_name("sqlite3"), Dialect::SQLite);
    }

    #[test]
    fn test_from_name_unknown() {
        assert_eq!(Dialect::from_name("oracle"), Dialect::Unknown);
        assert_eq!(Dialect::from_name("Postgres"), Dialect::Unknown); // case-sensitive
    }

    #[test]
    fn test_global_dialect_last_write_wins() {
        set_dialect(Dialect::Postgres);
        assert_eq!(get_dialect(), Dialect::Postgres);
        set_dialect(Dialect::SQLite);
        assert_eq!(get_dialect(), Dialect::SQLite);
        // restore a known state for other tests sharing the process
        set_dialect(Dialect::Unknown);
        assert_eq!(get_dialect(), Dialect::Unknown);
    }
}
