//! Query scopes over collections of principals
//!
//! A [`RoleScope`] is a reusable, parameterized filter ("all principals with
//! role X"). A [`PrincipalDirectory`] is whatever owns the principals; the
//! library only relies on it to scan them; filtering is done here, lazily.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::mixin::RoleHolder;
use crate::types::RoleId;

/// Named filter over principals by role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "roles", rename_all = "snake_case")]
pub enum RoleScope {
    /// Principals whose role is exactly this one
    WithRole(RoleId),
    /// Principals holding any of these roles
    AnyOf(Vec<RoleId>),
    /// Principals with no role assigned
    Unassigned,
    /// Every principal
    All,
}

impl RoleScope {
    pub fn with_role(role: impl Into<RoleId>) -> Self {
        RoleScope::WithRole(role.into())
    }

    pub fn any_of<I, R>(roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RoleId>,
    {
        RoleScope::AnyOf(roles.into_iter().map(Into::into).collect())
    }

    /// The predicate every directory query is built on
    pub fn matches<P>(&self, principal: &P) -> bool
    where
        P: RoleHolder + ?Sized,
    {
        match self {
            RoleScope::WithRole(role) => principal.role() == Some(role.as_str()),
            RoleScope::AnyOf(roles) => principal
                .role()
                .is_some_and(|held| roles.iter().any(|r| r == held)),
            RoleScope::Unassigned => principal.role().is_none(),
            RoleScope::All => true,
        }
    }

    /// Roles named by this scope
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        let named: &[RoleId] = match self {
            RoleScope::WithRole(role) => std::slice::from_ref(role),
            RoleScope::AnyOf(roles) => roles,
            RoleScope::Unassigned | RoleScope::All => &[],
        };
        named.iter().map(String::as_str)
    }
}

impl fmt::Display for RoleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleScope::WithRole(role) => write!(f, "role = {}", role),
            RoleScope::AnyOf(roles) => write!(f, "role in [{}]", roles.join(", ")),
            RoleScope::Unassigned => f.write_str("role is none"),
            RoleScope::All => f.write_str("all"),
        }
    }
}

/// Lazy iterator yielding only the principals a scope matches
#[derive(Debug, Clone)]
pub struct ScopeFilter<I> {
    inner: I,
    scope: RoleScope,
}

impl<I> ScopeFilter<I> {
    pub fn scope(&self) -> &RoleScope {
        &self.scope
    }
}

impl<'a, P, I> Iterator for ScopeFilter<I>
where
    P: RoleHolder + ?Sized + 'a,
    I: Iterator<Item = &'a P>,
{
    type Item = &'a P;

    fn next(&mut self) -> Option<Self::Item> {
        let scope = &self.scope;
        self.inner.find(|p| scope.matches(*p))
    }
}

/// Filters any collection of role holders by a scope, lazily
pub fn filter_by_scope<'a, P, I>(principals: I, scope: RoleScope) -> ScopeFilter<I::IntoIter>
where
    P: RoleHolder + ?Sized + 'a,
    I: IntoIterator<Item = &'a P>,
{
    ScopeFilter {
        inner: principals.into_iter(),
        scope,
    }
}

/// Result of a directory query
pub type Selection<'a, P> = ScopeFilter<Box<dyn Iterator<Item = &'a P> + 'a>>;

/// Data-access collaborator owning a collection of principals
pub trait PrincipalDirectory {
    type Principal: RoleHolder;

    /// Iterates every principal in the directory
    fn scan(&self) -> Box<dyn Iterator<Item = &Self::Principal> + '_>;

    /// Iterates the principals matching `scope`
    fn select(&self, scope: RoleScope) -> Selection<'_, Self::Principal> {
        filter_by_scope(self.scan(), scope)
    }
}

/// Vec-backed directory
#[derive(Debug, Clone)]
pub struct InMemoryDirectory<P> {
    principals: Vec<P>,
}

impl<P> InMemoryDirectory<P> {
    pub fn new() -> Self {
        Self {
            principals: Vec::new(),
        }
    }

    pub fn insert(&mut self, principal: P) {
        self.principals.push(principal);
    }

    pub fn len(&self) -> usize {
        self.principals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.principals.is_empty()
    }

    /// Mutable access, e.g. to reassign roles in place
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, P> {
        self.principals.iter_mut()
    }
}

impl<P> Default for InMemoryDirectory<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> From<Vec<P>> for InMemoryDirectory<P> {
    fn from(principals: Vec<P>) -> Self {
        Self { principals }
    }
}

impl<P> FromIterator<P> for InMemoryDirectory<P> {
    fn from_iter<T: IntoIterator<Item = P>>(iter: T) -> Self {
        Self {
            principals: iter.into_iter().collect(),
        }
    }
}

impl<P: RoleHolder> PrincipalDirectory for InMemoryDirectory<P> {
    type Principal = P;

    fn scan(&self) -> Box<dyn Iterator<Item = &P> + '_> {
        Box::new(self.principals.iter())
    }
}
