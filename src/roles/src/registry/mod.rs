//! Role registry
//!
//! Canonical source of truth for valid roles and the actions they grant.
//!
//! - **Duplicate Protection**: a role id can be registered once
//! - **Inheritance**: a role grants its parents' actions, transitively
//! - **Effective-Action Cache**: flattened action sets are memoised and
//!   cleared on every registration
//! - **Thread-Safe**: storage is shared through `Arc<DashMap>`, so clones of a
//!   registry see the same roles

pub mod graph;
pub mod types;

pub use graph::InheritanceGraph;
pub use types::Role;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::{BTreeSet, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{AuthorizeError, Result};
use crate::pattern;
use crate::types::{Action, RoleId};

/// Effective-action cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Registry of roles and their granted actions
///
/// # Examples
///
/// ```rust
/// use authorize_roles::{Action, RoleRegistry};
///
/// let registry = RoleRegistry::new();
/// registry.register("author", ["write", "publish"]).unwrap();
///
/// assert!(registry.is_valid_role("author"));
/// assert!(registry.actions_for("author").unwrap().contains(&Action::new("write")));
/// assert!(registry.actions_for("editor").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoleRegistry {
    roles: Arc<DashMap<RoleId, Role>>,

    /// role -> own actions plus every inherited action
    effective: Arc<DashMap<RoleId, Arc<BTreeSet<Action>>>>,

    counters: Arc<Counters>,
}

impl RoleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a role with its action set
    ///
    /// # Errors
    ///
    /// `DuplicateRole` if the role is already registered. The registry is left
    /// unchanged on failure.
    pub fn register<I, A>(&self, role: impl Into<RoleId>, actions: I) -> Result<()>
    where
        I: IntoIterator<Item = A>,
        A: Into<Action>,
    {
        self.register_role(Role::new(role).with_actions(actions))
    }

    /// Registers a full role definition, including its parents
    ///
    /// # Errors
    ///
    /// - `InvalidRole` / `CircularDependency` if the definition fails validation
    /// - `UnknownRole` if a parent is not registered yet
    /// - `DuplicateRole` if the id is taken
    pub fn register_role(&self, role: Role) -> Result<()> {
        if let Err(err) = role.validate() {
            warn!(role = %role.id, error = %err, "rejected role definition");
            return Err(err);
        }

        if let Some(missing) = role.inherits.iter().find(|p| !self.roles.contains_key(*p)) {
            warn!(role = %role.id, parent = %missing, "parent role not registered");
            return Err(AuthorizeError::unknown(missing.clone()));
        }

        let id = role.id.clone();
        let action_count = role.actions.len();
        let parent_count = role.inherits.len();

        match self.roles.entry(id.clone()) {
            Entry::Occupied(_) => {
                warn!(role = %id, "role already registered");
                return Err(AuthorizeError::DuplicateRole { role: id });
            }
            Entry::Vacant(slot) => {
                slot.insert(role);
            }
        }

        self.effective.clear();

        info!(
            role = %id,
            actions = action_count,
            parents = parent_count,
            "registered role"
        );
        Ok(())
    }

    /// Whether the role is registered
    pub fn is_valid_role(&self, role: &str) -> bool {
        self.roles.contains_key(role)
    }

    /// Returns every action the role grants, inherited ones included
    ///
    /// # Errors
    ///
    /// `UnknownRole` if the role is not registered.
    pub fn actions_for(&self, role: &str) -> Result<BTreeSet<Action>> {
        Ok((*self.effective_actions(role)?).clone())
    }

    /// Whether the role grants the action, directly, by pattern or by inheritance
    ///
    /// # Errors
    ///
    /// `UnknownRole` if the role is not registered.
    pub fn grants(&self, role: &str, action: &str) -> Result<bool> {
        let actions = self.effective_actions(role)?;
        Ok(actions
            .iter()
            .any(|granted| pattern::grants(granted.as_str(), action)))
    }

    /// Transitive parents of a role, each listed after its own parents
    ///
    /// # Errors
    ///
    /// `UnknownRole` if the role is not registered.
    pub fn ancestors(&self, role: &str) -> Result<Vec<RoleId>> {
        let mut seen = HashSet::new();
        seen.insert(role.to_string());
        let mut out = Vec::new();

        // Explicit post-order walk: (role, its parents, next parent to visit)
        let mut stack = vec![(role.to_string(), self.parents_of(role)?, 0usize)];
        while let Some((_, parents, next)) = stack.last_mut() {
            if let Some(parent) = parents.get(*next).cloned() {
                *next += 1;
                if seen.insert(parent.clone()) {
                    let grandparents = self.parents_of(&parent)?;
                    stack.push((parent, grandparents, 0));
                }
            } else if let Some((done, _, _)) = stack.pop() {
                if !stack.is_empty() {
                    out.push(done);
                }
            }
        }
        Ok(out)
    }

    /// Returns a copy of a role definition
    pub fn get(&self, role: &str) -> Option<Role> {
        self.roles.get(role).map(|r| r.value().clone())
    }

    /// Lists all role ids, sorted
    pub fn roles(&self) -> Vec<RoleId> {
        let mut ids: Vec<RoleId> = self.roles.iter().map(|r| r.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Re-checks the whole inheritance graph for missing parents and cycles
    pub fn validate(&self) -> Result<()> {
        let roles: Vec<Role> = self.roles.iter().map(|r| r.value().clone()).collect();

        let mut graph = InheritanceGraph::new();
        for role in &roles {
            if let Some(missing) = role.inherits.iter().find(|p| !self.roles.contains_key(*p)) {
                return Err(AuthorizeError::unknown(missing.clone()));
            }
            graph.add_role(role.id.clone(), &role.inherits);
        }
        graph.resolve_order()?;
        Ok(())
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            entries: self.effective.len(),
        }
    }

    pub fn clear_cache(&self) {
        self.effective.clear();
    }

    pub(crate) fn effective_actions(&self, role: &str) -> Result<Arc<BTreeSet<Action>>> {
        if let Some(cached) = self.effective.get(role) {
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
            debug!(role, "effective actions cache hit");
            return Ok(Arc::clone(cached.value()));
        }
        self.counters.misses.fetch_add(1, Ordering::Relaxed);

        let own = self
            .roles
            .get(role)
            .map(|r| r.actions.clone())
            .ok_or_else(|| AuthorizeError::unknown(role))?;

        let mut actions = own;
        for ancestor in self.ancestors(role)? {
            if let Some(parent) = self.roles.get(&ancestor) {
                actions.extend(parent.actions.iter().cloned());
            }
        }

        let actions = Arc::new(actions);
        self.effective.insert(role.to_string(), Arc::clone(&actions));
        Ok(actions)
    }

    /// Copies the parent list so no map guard outlives the lookup
    fn parents_of(&self, role: &str) -> Result<Vec<RoleId>> {
        self.roles
            .get(role)
            .map(|r| r.inherits.clone())
            .ok_or_else(|| AuthorizeError::unknown(role))
    }
}
