//! Core role and principal types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique role identifier
pub type RoleId = String;

/// Action a role may grant (read, write, publish, etc.)
///
/// Granted actions may also be wildcard patterns: `*`, `prefix:*`, `*:suffix`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Action {
    /// Action name
    pub name: String,
}

impl Action {
    /// Create a new action
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Whether this action is a wildcard pattern rather than a concrete name
    pub fn is_pattern(&self) -> bool {
        self.name.contains('*')
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for Action {
    fn from(name: &str) -> Self {
        Action::new(name)
    }
}

impl From<String> for Action {
    fn from(name: String) -> Self {
        Action::new(name)
    }
}

/// Options recognised when constructing a principal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalOptions {
    /// Initial role
    #[serde(default)]
    pub role: Option<RoleId>,
}

impl PrincipalOptions {
    pub fn with_role(role: impl Into<RoleId>) -> Self {
        Self {
            role: Some(role.into()),
        }
    }
}

/// Principal (user, service account, agent) holding at most one role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Principal identifier (e.g., "user:alice")
    pub id: String,

    /// Assigned role, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<RoleId>,
}

impl Principal {
    /// Create a principal with no role assigned
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: None,
        }
    }
}

/// Outcome of a permission check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Whether the action is permitted
    pub allowed: bool,

    /// Role the decision was made for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<RoleId>,

    /// Action that was checked
    pub action: Action,

    /// Reason for the decision
    pub reason: String,
}

impl Decision {
    pub fn allow(role: impl Into<RoleId>, action: Action, reason: impl Into<String>) -> Self {
        Self {
            allowed: true,
            role: Some(role.into()),
            action,
            reason: reason.into(),
        }
    }

    pub fn deny(role: Option<RoleId>, action: Action, reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            role,
            action,
            reason: reason.into(),
        }
    }
}
