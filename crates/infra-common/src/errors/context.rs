use crate::errors::types::{Error, Result};
use std::fmt;

/// Where an error happened: the component and the operation in flight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Component where the error occurred
    pub component: String,
    /// Operation that was being performed
    pub operation: String,
    /// Additional context information
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new<S: Into<String>, T: Into<String>>(component: S, operation: T) -> Self {
        ErrorContext {
            component: component.into(),
            operation: operation.into(),
            details: None,
        }
    }

    /// Add details to the context
    pub fn with_details<S: Into<String>>(mut self, details: S) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "in component '{}' during operation '{}'", self.component, self.operation)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

/// Extension trait for attaching an [`ErrorContext`] to errors and results
pub trait ErrorExt<T> {
    /// Attach a prepared context
    fn context(self, ctx: ErrorContext) -> Result<T>;

    /// Attach a context built from component and operation names
    fn with_context<S: Into<String>, O: Into<String>>(self, component: S, operation: O) -> Result<T>
    where
        Self: Sized,
    {
        self.context(ErrorContext::new(component, operation))
    }
}

impl Error {
    /// Wrap this error with context, keeping the variant where it carries a message
    pub fn in_context(self, ctx: &ErrorContext) -> Error {
        match self {
            Error::Config(msg) => Error::Config(format!("{} [{}]", msg, ctx)),
            Error::Custom(msg) => Error::Custom(format!("{} [{}]", msg, ctx)),
            other => Error::Custom(format!("{} [{}]", other, ctx)),
        }
    }
}

impl<T> ErrorExt<T> for Result<T> {
    fn context(self, ctx: ErrorContext) -> Result<T> {
        self.map_err(|e| e.in_context(&ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_display() {
        let ctx = ErrorContext::new("session-core", "connect").with_details("attempt 2");
        assert_eq!(
            ctx.to_string(),
            "in component 'session-core' during operation 'connect' (attempt 2)"
        );
    }

    #[test]
    fn test_context_keeps_config_variant() {
        let result: Result<()> = Err(Error::Config("bad port".into()));
        let err = result.with_context("config", "load").unwrap_err();
        match err {
            Error::Config(msg) => {
                assert!(msg.starts_with("bad port ["));
                assert!(msg.contains("'load'"));
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_context_leaves_ok_untouched() {
        let result: Result<u8> = Ok(7);
        assert_eq!(result.with_context("a", "b").unwrap(), 7);
    }

    #[test]
    fn test_released_becomes_custom() {
        let err = Error::Released.in_context(&ErrorContext::new("lifecycle", "get"));
        assert!(matches!(err, Error::Custom(ref m) if m.contains("handle used after release")));
    }
}
