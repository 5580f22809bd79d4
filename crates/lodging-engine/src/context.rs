//! Who is acting on the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lodging_core::types::id::UserId;
use lodging_entity::user::UserRole;

use crate::error::BookingError;

/// The already-authenticated caller of an engine operation.
///
/// Authentication happens upstream; the engine trusts the id and role it
/// is given and only enforces ownership and role rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorContext {
    /// The acting user.
    pub actor_id: UserId,
    /// The role the user acts in.
    pub role: UserRole,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl ActorContext {
    /// Create a context for the given user and role.
    pub fn new(actor_id: UserId, role: UserRole) -> Self {
        Self {
            actor_id,
            role,
            request_time: Utc::now(),
        }
    }

    /// Shorthand for a customer context.
    pub fn customer(actor_id: UserId) -> Self {
        Self::new(actor_id, UserRole::Customer)
    }

    /// Shorthand for a host context.
    pub fn host(actor_id: UserId) -> Self {
        Self::new(actor_id, UserRole::Host)
    }

    /// Shorthand for an admin context.
    pub fn admin(actor_id: UserId) -> Self {
        Self::new(actor_id, UserRole::Admin)
    }

    /// Whether the caller is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Fail with [`BookingError::NotPermitted`] unless the caller has `role`.
    pub fn require(&self, role: UserRole, action: &str) -> Result<(), BookingError> {
        if self.role == role {
            Ok(())
        } else {
            Err(BookingError::NotPermitted(format!(
                "Only the {role} role can {action}"
            )))
        }
    }
}
