//! Request context carrying the authenticated caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use contracthub_core::types::{ADMIN_ROLE, Identity};

/// Context for the current authenticated request.
///
/// Built by the API layer from the verified identity and passed into
/// service methods so that every operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The caller's subject id.
    pub user_id: String,
    /// The caller's email, when known.
    pub email: Option<String>,
    /// The caller's role.
    pub role: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a context for a verified identity.
    pub fn new(identity: Identity) -> Self {
        Self {
            user_id: identity.id,
            email: identity.email,
            role: identity.role,
            request_time: Utc::now(),
        }
    }

    /// Returns whether the caller is an administrator.
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }

    /// Whether the caller may see a record owned by `owner_id`.
    pub fn can_access(&self, owner_id: &str) -> bool {
        self.user_id == owner_id || self.is_admin()
    }
}

impl From<Identity> for RequestContext {
    fn from(identity: Identity) -> Self {
        Self::new(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_rules() {
        let user = RequestContext::new(Identity::new("u1", None, None));
        assert!(user.can_access("u1"));
        assert!(!user.can_access("u2"));

        let admin = RequestContext::new(Identity::new("root", None, Some("admin".into())));
        assert!(admin.can_access("u2"));
    }
}
