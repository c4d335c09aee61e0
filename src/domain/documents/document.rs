use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub owner_id: Uuid,
    pub read_only_users: Vec<Uuid>,
    pub read_write_users: Vec<Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Access level of a user on a document. `Admin` is implied by ownership and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Admin,
    ReadOnly,
    ReadWrite,
}

/// The subset of roles an owner may hand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GrantableRole {
    ReadOnly,
    ReadWrite,
}

impl GrantableRole {
    pub fn opposite(self) -> Self {
        match self {
            GrantableRole::ReadOnly => GrantableRole::ReadWrite,
            GrantableRole::ReadWrite => GrantableRole::ReadOnly,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GrantableRole::ReadOnly => "readOnly",
            GrantableRole::ReadWrite => "readWrite",
        }
    }
}

impl Document {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }

    pub fn role_set_mut(&mut self, role: GrantableRole) -> &mut Vec<Uuid> {
        match role {
            GrantableRole::ReadOnly => &mut self.read_only_users,
            GrantableRole::ReadWrite => &mut self.read_write_users,
        }
    }

    // Precedence: owner, then read-only, then read-write.
    pub fn effective_role(&self, user_id: Uuid) -> Option<Role> {
        if self.is_owned_by(user_id) {
            Some(Role::Admin)
        } else if self.read_only_users.contains(&user_id) {
            Some(Role::ReadOnly)
        } else if self.read_write_users.contains(&user_id) {
            Some(Role::ReadWrite)
        } else {
            None
        }
    }

    /// Role-set members in assignment order: read-only entries first, then read-write.
    pub fn assignments(&self) -> Vec<(GrantableRole, Uuid)> {
        self.read_only_users
            .iter()
            .map(|id| (GrantableRole::ReadOnly, *id))
            .chain(
                self.read_write_users
                    .iter()
                    .map(|id| (GrantableRole::ReadWrite, *id)),
            )
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleDocument {
    pub doc_id: Uuid,
    pub name: String,
    pub description: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    pub role: GrantableRole,
    pub email: String,
}
