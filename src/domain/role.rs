//! Role domain entity and the permission enumeration.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Fine-grained capability strings grantable via roles.
///
/// The wire format is `"<resource>:<action>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Permission {
    #[serde(rename = "user:read")]
    UserRead,
    #[serde(rename = "user:write")]
    UserWrite,
    #[serde(rename = "user:delete")]
    UserDelete,
    #[serde(rename = "user:manage")]
    UserManage,
    #[serde(rename = "role:read")]
    RoleRead,
    #[serde(rename = "role:write")]
    RoleWrite,
    #[serde(rename = "role:delete")]
    RoleDelete,
    #[serde(rename = "role:manage")]
    RoleManage,
    #[serde(rename = "todo:read")]
    TodoRead,
    #[serde(rename = "todo:write")]
    TodoWrite,
    #[serde(rename = "todo:delete")]
    TodoDelete,
    #[serde(rename = "todo:manage")]
    TodoManage,
    #[serde(rename = "system:admin")]
    SystemAdmin,
    #[serde(rename = "system:config")]
    SystemConfig,
}

impl Permission {
    /// Every permission in the enumeration.
    pub const ALL: &'static [Permission] = &[
        Permission::UserRead,
        Permission::UserWrite,
        Permission::UserDelete,
        Permission::UserManage,
        Permission::RoleRead,
        Permission::RoleWrite,
        Permission::RoleDelete,
        Permission::RoleManage,
        Permission::TodoRead,
        Permission::TodoWrite,
        Permission::TodoDelete,
        Permission::TodoManage,
        Permission::SystemAdmin,
        Permission::SystemConfig,
    ];

    /// Permission string as stored and transmitted.
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::UserRead => "user:read",
            Permission::UserWrite => "user:write",
            Permission::UserDelete => "user:delete",
            Permission::UserManage => "user:manage",
            Permission::RoleRead => "role:read",
            Permission::RoleWrite => "role:write",
            Permission::RoleDelete => "role:delete",
            Permission::RoleManage => "role:manage",
            Permission::TodoRead => "todo:read",
            Permission::TodoWrite => "todo:write",
            Permission::TodoDelete => "todo:delete",
            Permission::TodoManage => "todo:manage",
            Permission::SystemAdmin => "system:admin",
            Permission::SystemConfig => "system:config",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .iter()
            .find(|p| p.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown permission: {}", s))
    }
}

/// Role domain entity: a named bundle of permissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub permissions: Vec<Permission>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Role {
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}

/// Role creation data
#[derive(Debug, Clone)]
pub struct NewRole {
    pub name: String,
    pub description: Option<String>,
    pub permissions: Vec<Permission>,
    pub is_active: bool,
}

/// Partial role update; absent fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct RoleUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub permissions: Option<Vec<Permission>>,
    pub is_active: Option<bool>,
}

/// Role response (wire shape)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub permissions: Vec<Permission>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Role> for RoleResponse {
    fn from(role: Role) -> Self {
        Self {
            id: role.id,
            name: role.name,
            description: role.description,
            permissions: role.permissions,
            is_active: role.is_active,
            created_at: role.created_at,
            updated_at: role.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_string_roundtrip() {
        for p in Permission::ALL {
            assert_eq!(Permission::from_str(p.as_str()).unwrap(), *p);
        }
    }

    #[test]
    fn unknown_permission_rejected() {
        assert!(Permission::from_str("todo:fly").is_err());
    }

    #[test]
    fn permission_serde_uses_colon_form() {
        let json = serde_json::to_string(&Permission::TodoWrite).unwrap();
        assert_eq!(json, "\"todo:write\"");
        let back: Permission = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Permission::TodoWrite);
    }
}
