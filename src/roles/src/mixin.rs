//! Role awareness for principal types
//!
//! Any type that stores a role implements [`RoleHolder`]; [`RoleMixin`] then
//! answers role and permission questions about it against a shared
//! [`RoleRegistry`]. Nothing is inherited or generated at runtime: the mixin
//! is a plain service the principal is passed to.

use tracing::{debug, warn};

use crate::error::{AuthorizeError, Result};
use crate::registry::RoleRegistry;
use crate::scope::{PrincipalDirectory, RoleScope, Selection};
use crate::types::{Action, Decision, Principal, PrincipalOptions, RoleId};

/// A principal-like entity carrying at most one role
pub trait RoleHolder {
    /// Currently assigned role
    fn role(&self) -> Option<&str>;

    /// Overwrites the assigned role without validation
    ///
    /// Use [`RoleMixin::assign_role`] to reject unknown roles.
    fn set_role(&mut self, role: Option<RoleId>);
}

impl RoleHolder for Principal {
    fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    fn set_role(&mut self, role: Option<RoleId>) {
        self.role = role;
    }
}

impl<T: RoleHolder + ?Sized> RoleHolder for Box<T> {
    fn role(&self) -> Option<&str> {
        (**self).role()
    }

    fn set_role(&mut self, role: Option<RoleId>) {
        (**self).set_role(role)
    }
}

/// Role and permission checks over any [`RoleHolder`]
///
/// # Examples
///
/// ```rust
/// use authorize_roles::{PrincipalOptions, RoleMixin, RoleRegistry};
///
/// let registry = RoleRegistry::new();
/// registry.register("author", ["write", "publish"]).unwrap();
///
/// let roles = RoleMixin::new(registry);
/// let alice = roles
///     .build_principal("user:alice", PrincipalOptions::with_role("author"))
///     .unwrap();
///
/// assert!(roles.has_role(&alice, "author").unwrap());
/// assert!(roles.can_perform(&alice, "write").unwrap());
/// assert!(!roles.can_perform(&alice, "delete").unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct RoleMixin {
    registry: RoleRegistry,
}

impl RoleMixin {
    pub fn new(registry: RoleRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RoleRegistry {
        &self.registry
    }

    /// True iff the principal's assigned role is `role`
    ///
    /// A principal with no role never has a role.
    ///
    /// # Errors
    ///
    /// `UnknownRole` if `role` is not registered.
    pub fn has_role<P>(&self, principal: &P, role: &str) -> Result<bool>
    where
        P: RoleHolder + ?Sized,
    {
        self.ensure_known(role)?;
        Ok(principal.role() == Some(role))
    }

    /// Like [`has_role`](Self::has_role), but also true when the principal's
    /// role inherits `role`
    pub fn has_role_or_ancestor<P>(&self, principal: &P, role: &str) -> Result<bool>
    where
        P: RoleHolder + ?Sized,
    {
        self.ensure_known(role)?;
        match principal.role() {
            None => Ok(false),
            Some(assigned) if assigned == role => Ok(true),
            Some(assigned) => Ok(self.registry.ancestors(assigned)?.iter().any(|a| a == role)),
        }
    }

    /// True iff the principal's role grants `action`
    ///
    /// # Errors
    ///
    /// `UnknownRole` if the principal holds a role that is not registered.
    pub fn can_perform<P>(&self, principal: &P, action: &str) -> Result<bool>
    where
        P: RoleHolder + ?Sized,
    {
        match principal.role() {
            None => Ok(false),
            Some(role) => self.registry.grants(role, action),
        }
    }

    /// Permission check returning a [`Decision`] with its reason
    pub fn authorize<P>(&self, principal: &P, action: &str) -> Result<Decision>
    where
        P: RoleHolder + ?Sized,
    {
        let requested = Action::new(action);

        let decision = match principal.role() {
            None => Decision::deny(None, requested, "no role assigned"),
            Some(role) => {
                if self.registry.grants(role, action)? {
                    Decision::allow(role, requested, format!("role '{}' grants '{}'", role, action))
                } else {
                    Decision::deny(
                        Some(role.to_string()),
                        requested,
                        format!("role '{}' does not grant '{}'", role, action),
                    )
                }
            }
        };

        debug!(
            role = decision.role.as_deref().unwrap_or("-"),
            action,
            allowed = decision.allowed,
            "authorization decision"
        );
        Ok(decision)
    }

    /// Validates and assigns a role
    ///
    /// # Errors
    ///
    /// `UnknownRole` if `role` is not registered; the principal is untouched.
    pub fn assign_role<P>(&self, principal: &mut P, role: &str) -> Result<()>
    where
        P: RoleHolder + ?Sized,
    {
        self.ensure_known(role)?;
        principal.set_role(Some(role.to_string()));
        Ok(())
    }

    pub fn clear_role<P>(&self, principal: &mut P)
    where
        P: RoleHolder + ?Sized,
    {
        principal.set_role(None);
    }

    /// Builds a [`Principal`] from construction options
    ///
    /// # Errors
    ///
    /// `UnknownRole` if `options.role` names an unregistered role.
    pub fn build_principal(
        &self,
        id: impl Into<String>,
        options: PrincipalOptions,
    ) -> Result<Principal> {
        let mut principal = Principal::new(id);
        if let Some(role) = options.role {
            self.assign_role(&mut principal, &role)?;
        }
        Ok(principal)
    }

    /// Lazily yields the directory's principals whose role is `role`
    ///
    /// # Errors
    ///
    /// `UnknownRole` if `role` is not registered.
    pub fn find_by_role<'a, D>(
        &self,
        directory: &'a D,
        role: &str,
    ) -> Result<Selection<'a, D::Principal>>
    where
        D: PrincipalDirectory + ?Sized,
    {
        self.find_in_scope(directory, RoleScope::with_role(role))
    }

    /// Lazily yields the directory's principals matching `scope`
    ///
    /// Every role named by the scope must be registered.
    pub fn find_in_scope<'a, D>(
        &self,
        directory: &'a D,
        scope: RoleScope,
    ) -> Result<Selection<'a, D::Principal>>
    where
        D: PrincipalDirectory + ?Sized,
    {
        for role in scope.roles() {
            self.ensure_known(role)?;
        }
        Ok(directory.select(scope))
    }

    fn ensure_known(&self, role: &str) -> Result<()> {
        if self.registry.is_valid_role(role) {
            Ok(())
        } else {
            warn!(role, "unknown role");
            Err(AuthorizeError::unknown(role))
        }
    }
}
