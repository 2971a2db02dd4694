//! Role definition

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use crate::error::{AuthorizeError, Result};
use crate::pattern::check_pattern;
use crate::types::{Action, RoleId};

/// A named permission group
///
/// A role grants its own `actions` plus every action granted by the roles it
/// `inherits`. Parents must be registered before the role that names them.
///
/// ```rust
/// use authorize_roles::Role;
///
/// let editor = Role::new("editor")
///     .with_actions(["edit", "post:*"])
///     .inherits_from("author");
///
/// assert_eq!(editor.inherits, vec!["author".to_string()]);
/// assert!(editor.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Unique role identifier
    pub id: RoleId,

    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Actions granted directly by this role
    #[serde(default)]
    pub actions: BTreeSet<Action>,

    /// Roles whose actions this role also grants
    #[serde(default, rename = "inheritsFrom", skip_serializing_if = "Vec::is_empty")]
    pub inherits: Vec<RoleId>,
}

impl Role {
    /// Creates a role with no actions and no parents
    pub fn new(id: impl Into<RoleId>) -> Self {
        Self {
            id: id.into(),
            description: None,
            actions: BTreeSet::new(),
            inherits: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_action(mut self, action: impl Into<Action>) -> Self {
        self.actions.insert(action.into());
        self
    }

    pub fn with_actions<I, A>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Action>,
    {
        self.actions.extend(actions.into_iter().map(Into::into));
        self
    }

    /// Adds a parent role
    pub fn inherits_from(mut self, parent: impl Into<RoleId>) -> Self {
        self.inherits.push(parent.into());
        self
    }

    /// Validates the role definition
    ///
    /// # Validation Rules
    ///
    /// 1. Role id cannot be empty or contain whitespace
    /// 2. Every action must be a name or a well-formed wildcard pattern
    /// 3. Parent ids cannot be empty or repeated
    /// 4. A role cannot inherit from itself
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(AuthorizeError::invalid(&self.id, "role id cannot be empty"));
        }
        if self.id.chars().any(char::is_whitespace) {
            return Err(AuthorizeError::invalid(&self.id, "role id cannot contain whitespace"));
        }

        for action in &self.actions {
            if let Some(reason) = check_pattern(action.as_str()) {
                return Err(AuthorizeError::invalid(
                    &self.id,
                    format!("action '{}': {}", action, reason),
                ));
            }
        }

        let mut seen = HashSet::new();
        for parent in &self.inherits {
            if parent.is_empty() {
                return Err(AuthorizeError::invalid(&self.id, "parent role cannot be empty"));
            }
            if parent == &self.id {
                return Err(AuthorizeError::CircularDependency {
                    cycle: vec![self.id.clone(), self.id.clone()],
                });
            }
            if !seen.insert(parent.as_str()) {
                return Err(AuthorizeError::invalid(
                    &self.id,
                    format!("parent role '{}' listed more than once", parent),
                ));
            }
        }

        Ok(())
    }
}
