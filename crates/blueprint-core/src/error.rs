//! Error types for the schema-definition library.

use std::fmt;

/// The primary error type for Blueprint/Grammar/Builder/Context operations.
#[derive(Debug)]
pub enum Error {
    /// Nil context, empty table/column name, empty name list, empty rename
    /// source/destination, missing foreign-key fields.
    InvalidArgument(String),
    /// `new_builder` called with a dialect name outside the closed set.
    UnsupportedDialect(String),
    /// An operation the target dialect cannot express (e.g. SQLite
    /// drop-column, rename-column, change-column, drop-primary, drop-foreign).
    UnsupportedOperation(String),
    /// A Grammar invariant was violated while compiling a Blueprint.
    CompilationError(String),
    /// An error returned by the underlying execution context's driver.
    DriverError {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Construct a `DriverError` wrapping an arbitrary source error.
    pub fn driver(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Error::DriverError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Construct a bare `DriverError` with only a message.
    pub fn driver_msg(message: impl Into<String>) -> Self {
        Error::DriverError {
            message: message.into(),
            source: None,
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    pub fn unsupported_dialect(name: impl Into<String>) -> Self {
        Error::UnsupportedDialect(name.into())
    }

    pub fn unsupported_operation(message: impl Into<String>) -> Self {
        Error::UnsupportedOperation(message.into())
    }

    pub fn compilation(message: impl Into<String>) -> Self {
        Error::CompilationError(message.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Error::UnsupportedDialect(name) => write!(f, "unsupported dialect: {name}"),
            Error::UnsupportedOperation(msg) => write!(f, "unsupported operation: {msg}"),
            Error::CompilationError(msg) => write!(f, "compilation error: {msg}"),
            Error::DriverError { message, .. } => write!(f, "driver error: {message}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::DriverError { source, .. } => {
                source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// Result type alias for Blueprint operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_invalid_argument() {
        let e = Error::invalid_argument("table name is empty");
        assert_eq!(e.to_string(), "invalid argument: table name is empty");
    }

    #[test]
    fn test_display_unsupported_dialect() {
        let e = Error::unsupported_dialect("oracle");
        assert_eq!(e.to_string(), "unsupported dialect: oracle");
    }

    #[test]
    fn test_display_unsupported_operation() {
        let e = Error::unsupported_operation("sqlite drop column");
        assert_eq!(e.to_string(), "unsupported operation: sqlite drop column");
    }

    #[test]
    fn test_display_compilation_error() {
        let e = Error::compilation("empty column name");
        assert_eq!(e.to_string(), "compilation error: empty column name");
    }

    #[test]
    fn test_driver_error_has_source() {
        use std::error::Error as _;
        #[derive(Debug)]
        struct Inner;
        impl fmt::Display for Inner {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "connection reset")
            }
        }
        impl std::error::Error for Inner {}

        let e = Error::driver("exec failed", Inner);
        assert_eq!(e.to_string(), "driver error: exec failed");
        assert!(e.source().is_some());
    }

    #[test]
    fn test_driver_msg_has_no_source() {
        use std::error::Error as _;
        let e = Error::driver_msg("no such table");
        assert!(e.source().is_none());
    }
}
