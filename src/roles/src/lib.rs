//! # Authorize Roles
//!
//! Role-based authorization for any principal type:
//! - Role registry with duplicate protection and role inheritance
//! - Wildcard action grants (`*`, `prefix:*`, `*:suffix`)
//! - Role checks through a mixin service rather than inheritance
//! - Lazy query scopes over collections of principals
//! - TOML/JSON role declarations
//!
//! ## Example
//!
//! ```rust
//! use authorize_roles::{PrincipalOptions, RoleMixin, RoleRegistry};
//!
//! # fn example() -> authorize_roles::Result<()> {
//! let registry = RoleRegistry::new();
//! registry.register("author", ["write", "publish"])?;
//!
//! let roles = RoleMixin::new(registry);
//! let alice = roles.build_principal("user:alice", PrincipalOptions::with_role("author"))?;
//!
//! assert!(roles.can_perform(&alice, "write")?);
//! assert!(!roles.can_perform(&alice, "delete")?);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod config;
pub mod error;
pub mod mixin;
pub mod pattern;
pub mod registry;
pub mod scope;
pub mod types;

pub use config::{RegistryConfig, RoleConfig};
pub use error::{AuthorizeError, Result};
pub use mixin::{RoleHolder, RoleMixin};
pub use registry::{CacheStats, Role, RoleRegistry};
pub use scope::{filter_by_scope, InMemoryDirectory, PrincipalDirectory, RoleScope, Selection};
pub use types::{Action, Decision, Principal, PrincipalOptions, RoleId};
