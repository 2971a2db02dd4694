//! Role declarations loaded from TOML or JSON
//!
//! ```toml
//! [[roles]]
//! id = "reader"
//! actions = ["read"]
//!
//! [[roles]]
//! id = "author"
//! actions = ["write", "publish"]
//! inherits = ["reader"]
//! ```
//!
//! Roles may be declared in any order; [`RegistryConfig::build`] registers
//! parents first.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use crate::error::{AuthorizeError, Result};
use crate::registry::graph::{ordered, InheritanceGraph};
use crate::registry::{Role, RoleRegistry};
use crate::types::RoleId;

/// Complete registry configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub roles: Vec<RoleConfig>,
}

/// A single role declaration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RoleConfig {
    pub id: RoleId,

    #[serde(default)]
    pub actions: Vec<String>,

    #[serde(default)]
    pub inherits: Vec<RoleId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<RoleConfig> for Role {
    fn from(config: RoleConfig) -> Self {
        Role {
            id: config.id,
            description: config.description,
            actions: config.actions.into_iter().map(Into::into).collect(),
            inherits: config.inherits,
        }
    }
}

impl RegistryConfig {
    /// Loads configuration from a `.toml` or `.json` file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&contents),
            Some("json") => Self::from_json_str(&contents),
            other => Err(AuthorizeError::Config(format!(
                "unsupported config format {:?} for {}",
                other.unwrap_or(""),
                path.display()
            ))),
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| AuthorizeError::Config(e.to_string()))
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).map_err(|e| AuthorizeError::Config(e.to_string()))
    }

    /// Checks declarations for duplicates, undeclared parents and cycles
    pub fn validate(&self) -> Result<()> {
        self.graph().map(|_| ())
    }

    /// Builds a registry, registering each role after its parents
    ///
    /// # Errors
    ///
    /// - `DuplicateRole` if an id is declared twice
    /// - `UnknownRole` if a parent is not declared
    /// - `CircularDependency` if inheritance forms a cycle
    /// - `InvalidRole` if a declaration fails validation
    pub fn build(&self) -> Result<RoleRegistry> {
        let graph = self.graph()?;
        let roles: Vec<Role> = self.roles.iter().cloned().map(Role::from).collect();

        let registry = RoleRegistry::new();
        for role in ordered(roles, |r| r.id.as_str(), &graph)? {
            registry.register_role(role)?;
        }

        info!(roles = registry.len(), "built role registry from config");
        Ok(registry)
    }

    fn graph(&self) -> Result<InheritanceGraph> {
        let mut declared = HashSet::new();
        for role in &self.roles {
            if !declared.insert(role.id.as_str()) {
                return Err(AuthorizeError::DuplicateRole {
                    role: role.id.clone(),
                });
            }
        }

        let mut graph = InheritanceGraph::new();
        for role in &self.roles {
            if let Some(missing) = role.inherits.iter().find(|p| !declared.contains(p.as_str())) {
                return Err(AuthorizeError::unknown(missing.clone()));
            }
            graph.add_role(role.id.clone(), &role.inherits);
        }

        graph.resolve_order()?;
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Action;

    const PUBLISHING: &str = r#"
        [[roles]]
        id = "editor"
        actions = ["post:*"]
        inherits = ["author"]

        [[roles]]
        id = "author"
        actions = ["write", "publish"]
        inherits = ["reader"]
        description = "Writes and publishes posts"

        [[roles]]
        id = "reader"
        actions = ["read"]
    "#;

    #[test]
    fn test_parse_toml() {
        let config = RegistryConfig::from_toml_str(PUBLISHING).unwrap();
        assert_eq!(config.roles.len(), 3);
        assert_eq!(config.roles[1].description.as_deref(), Some("Writes and publishes posts"));
        assert!(config.roles[2].inherits.is_empty());
    }

    #[test]
    fn test_build_out_of_order() {
        let registry = RegistryConfig::from_toml_str(PUBLISHING).unwrap().build().unwrap();

        assert_eq!(registry.len(), 3);
        let editor = registry.actions_for("editor").unwrap();
        assert!(editor.contains(&Action::new("read")));
        assert!(editor.contains(&Action::new("publish")));
        assert!(registry.grants("editor", "post:archive").unwrap());
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{"roles": [{"id": "author", "actions": ["write"]}]}"#;
        let registry = RegistryConfig::from_json_str(json).unwrap().build().unwrap();
        assert!(registry.is_valid_role("author"));
    }

    #[test]
    fn test_empty_config() {
        let registry = RegistryConfig::from_toml_str("").unwrap().build().unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_declaration() {
        let toml = r#"
            [[roles]]
            id = "author"
            [[roles]]
            id = "author"
        "#;
        let result = RegistryConfig::from_toml_str(toml).unwrap().build();
        assert!(matches!(result, Err(AuthorizeError::DuplicateRole { .. })));
    }

    #[test]
    fn test_undeclared_parent() {
        let toml = r#"
            [[roles]]
            id = "editor"
            inherits = ["author"]
        "#;
        let result = RegistryConfig::from_toml_str(toml).unwrap().validate();
        assert!(
            matches!(result, Err(AuthorizeError::UnknownRole { ref role }) if role == "author")
        );
    }

    #[test]
    fn test_cycle() {
        let toml = r#"
            [[roles]]
            id = "a"
            inherits = ["b"]
            [[roles]]
            id = "b"
            inherits = ["a"]
        "#;
        let result = RegistryConfig::from_toml_str(toml).unwrap().build();
        assert!(matches!(result, Err(AuthorizeError::CircularDependency { .. })));
    }

    #[test]
    fn test_invalid_action_pattern() {
        let toml = r#"
            [[roles]]
            id = "author"
            actions = ["po*st"]
        "#;
        let result = RegistryConfig::from_toml_str(toml).unwrap().build();
        assert!(matches!(result, Err(AuthorizeError::InvalidRole { .. })));
    }

    #[test]
    fn test_malformed_toml() {
        let result = RegistryConfig::from_toml_str("[[roles]\nid = ");
        assert!(matches!(result, Err(AuthorizeError::Config(_))));
    }
}
