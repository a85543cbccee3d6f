use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role carried in the access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Director,
    Teacher,
    Auxiliary,
    Secretary,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Director => "DIRECTOR",
            Role::Teacher => "TEACHER",
            Role::Auxiliary => "AUXILIARY",
            Role::Secretary => "SECRETARY",
        }
    }
}

/// JWT Claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // staff member id
    pub username: String,
    pub role: Role,
    pub exp: usize,
    pub iat: usize,
    pub token_type: String, // "access" or "refresh"
}

/// Access level required by a page of the back office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RoleCategory {
    Public,
    Authenticated,
    Admin,
    Director,
    Teacher,
    Auxiliary,
    Secretary,
}

impl RoleCategory {
    /// Whether a caller with `role` (or no session) may open the page.
    pub fn allows(self, role: Option<Role>) -> bool {
        match (self, role) {
            (RoleCategory::Public, _) => true,
            (_, None) => false,
            (RoleCategory::Authenticated, Some(_)) => true,
            (RoleCategory::Admin, Some(role)) => role == Role::Admin,
            (RoleCategory::Director, Some(role)) => role == Role::Director,
            (RoleCategory::Teacher, Some(role)) => role == Role::Teacher,
            (RoleCategory::Auxiliary, Some(role)) => role == Role::Auxiliary,
            (RoleCategory::Secretary, Some(role)) => role == Role::Secretary,
        }
    }

    pub fn requires_session(self) -> bool {
        self != RoleCategory::Public
    }
}

/// A navigable page and who may open it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RouteEntry {
    pub path: String,
    pub category: RoleCategory,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoutesResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub routes: Vec<RouteEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RouteAccess {
    pub path: String,
    pub category: RoleCategory,
    pub allowed: bool,
}
