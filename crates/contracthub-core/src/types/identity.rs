//! Caller identity yielded by the identity verifier.

use serde::{Deserialize, Serialize};

/// Role assigned when the credential carries none.
pub const DEFAULT_ROLE: &str = "user";

/// Role that may access every owner's records.
pub const ADMIN_ROLE: &str = "admin";

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque subject id from the identity provider.
    pub id: String,
    /// Email address, when the provider includes one.
    pub email: Option<String>,
    /// Role name.
    pub role: String,
}

impl Identity {
    /// Build an identity, defaulting the role to `"user"`.
    pub fn new(id: impl Into<String>, email: Option<String>, role: Option<String>) -> Self {
        Self {
            id: id.into(),
            email,
            role: role
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ROLE.to_string()),
        }
    }

    /// Returns whether this identity is an administrator.
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_defaults_to_user() {
        assert_eq!(Identity::new("u1", None, None).role, "user");
        assert_eq!(Identity::new("u1", None, Some(" ".into())).role, "user");
        assert!(Identity::new("u1", None, Some("admin".into())).is_admin());
    }
}
