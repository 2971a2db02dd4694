//! Error types for role registration and role checks

use thiserror::Error;

/// Errors raised by the registry, the mixin and config loading
#[derive(Debug, Error)]
pub enum AuthorizeError {
    /// Role is not present in the registry
    #[error("Unknown role: {role}")]
    UnknownRole { role: String },

    /// Role id is already registered
    #[error("Role already registered: {role}")]
    DuplicateRole { role: String },

    /// Role definition failed validation
    #[error("Invalid role '{role}': {reason}")]
    InvalidRole { role: String, reason: String },

    /// Role inheritance forms a cycle
    #[error("Circular dependency detected: {}", cycle.join(" -> "))]
    CircularDependency { cycle: Vec<String> },

    /// Configuration could not be parsed or applied
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AuthorizeError {
    pub(crate) fn unknown(role: impl Into<String>) -> Self {
        AuthorizeError::UnknownRole { role: role.into() }
    }

    pub(crate) fn invalid(role: impl Into<String>, reason: impl Into<String>) -> Self {
        AuthorizeError::InvalidRole {
            role: role.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for role operations
pub type Result<T> = std::result::Result<T, AuthorizeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_role_display() {
        let err = AuthorizeError::unknown("editor");
        assert_eq!(err.to_string(), "Unknown role: editor");
    }

    #[test]
    fn test_circular_dependency_display() {
        let err = AuthorizeError::CircularDependency {
            cycle: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };
        assert!(err.to_string().contains("a -> b -> a"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: AuthorizeError = io.into();
        assert!(matches!(err, AuthorizeError::Io(_)));
    }
}
