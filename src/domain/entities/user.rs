use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::validation::{validate_loose_email, validate_trimmed};

const MAX_USERNAME_LENGTH: u64 = 40;
const MAX_ROLE_NAME_LENGTH: u64 = 40;

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AdminUser {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ───── API Response Models ──────────────────────────────────────────

/// User projection with its role set materialized as an array.
#[derive(Debug, Serialize)]
pub struct UserWithRoles {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
    pub is_active: bool,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserWithRoles>,
    pub total: i64,
}

/// Outcome of a role reassignment: the diff that was actually applied.
#[derive(Debug, Serialize)]
pub struct RoleAssignmentResponse {
    pub user_id: Uuid,
    pub added: Vec<Uuid>,
    pub removed: Vec<Uuid>,
    pub roles: Vec<Role>,
}

// ───── Input & Validation Requests ──────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct NewUserRequest {
    #[validate(custom(function = validate_loose_email))]
    pub email: String,

    #[validate(
        length(min = 2, max = MAX_USERNAME_LENGTH),
        custom(function = validate_trimmed)
    )]
    pub username: Option<String>,

    #[serde(default)]
    pub role_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewRoleRequest {
    #[validate(
        length(min = 2, max = MAX_ROLE_NAME_LENGTH),
        custom(function = validate_trimmed)
    )]
    pub name: String,

    #[validate(length(max = 200))]
    pub description: Option<String>,
}

/// The full desired role set for a user. The server computes the diff
/// against current assignments; it never deletes-then-reinserts.
#[derive(Debug, Deserialize)]
pub struct AssignRolesRequest {
    pub role_ids: Vec<Uuid>,
}

/// Diff between a user's current role ids and a desired set.
///
/// Both sides are applied in one transaction; a failure leaves the prior
/// assignments intact, so there is no window where the user has no roles.
#[derive(Debug, PartialEq)]
pub struct RoleDiff {
    pub to_add: Vec<Uuid>,
    pub to_remove: Vec<Uuid>,
}

impl RoleDiff {
    pub fn compute(current: &[Uuid], desired: &[Uuid]) -> Self {
        let to_add = desired
            .iter()
            .filter(|id| !current.contains(id))
            .copied()
            .collect();
        let to_remove = current
            .iter()
            .filter(|id| !desired.contains(id))
            .copied()
            .collect();
        RoleDiff { to_add, to_remove }
    }

    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}
