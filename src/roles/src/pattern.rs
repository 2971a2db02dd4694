//! Wildcard matching for granted actions
//!
//! A role may grant a concrete action (`"write"`) or a pattern:
//! - `"*"` grants every action
//! - `"post:*"` grants `"post:edit"`, `"post:comment:delete"`
//! - `"*:read"` grants `"post:read"`, `"draft:read"`

/// Checks whether a granted action (possibly a pattern) covers a requested action
///
/// Matching is case-sensitive and segment-aware: `"post:*"` does not cover
/// `"post"` or `"postal"`.
///
/// ```rust
/// use authorize_roles::pattern::grants;
///
/// assert!(grants("*", "delete"));
/// assert!(grants("post:*", "post:edit"));
/// assert!(grants("*:read", "draft:read"));
/// assert!(!grants("post:*", "postal"));
/// ```
pub fn grants(granted: &str, requested: &str) -> bool {
    if granted == requested || granted == "*" {
        return true;
    }

    if let Some(prefix) = granted.strip_suffix(":*") {
        return requested
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with(':') && rest.len() > 1);
    }

    if let Some(suffix) = granted.strip_prefix("*:") {
        return requested
            .strip_suffix(suffix)
            .is_some_and(|rest| rest.ends_with(':') && rest.len() > 1);
    }

    false
}

/// Checks that a granted action is well formed
///
/// Returns the reason it is rejected, if any.
pub fn check_pattern(granted: &str) -> Option<&'static str> {
    if granted.is_empty() {
        return Some("action name cannot be empty");
    }

    match granted.matches('*').count() {
        0 => None,
        1 if granted == "*" => None,
        1 => match granted
            .strip_suffix(":*")
            .or_else(|| granted.strip_prefix("*:"))
        {
            Some("") => Some("wildcard segment needs a non-empty prefix or suffix"),
            Some(_) => None,
            None => Some("wildcard must be the whole action or a leading/trailing segment"),
        },
        _ => Some("multiple wildcards not supported"),
    }
}
