use serde::{Deserialize, Serialize};

/// Identity classification controlling default permissions.
///
/// The set is closed: a role can only be one of these variants, and the
/// role-permission table is validated to cover all of them. Roles are
/// immutable once assigned to a user; only an explicit administrative
/// update changes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "guest")]
    Guest,
    #[serde(rename = "member")]
    Member,
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "organizationAdmin")]
    OrganizationAdmin,
}

impl Role {
    /// Every role variant, in declaration order.
    pub const ALL: [Role; 4] = [
        Role::Guest,
        Role::Member,
        Role::Admin,
        Role::OrganizationAdmin,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::Member => "member",
            Role::Admin => "admin",
            Role::OrganizationAdmin => "organizationAdmin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Protectable entity category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    /// Wildcard: all resources.
    #[serde(rename = "*")]
    Any,
    User,
    Notification,
    Image,
}

impl Resource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Any => "*",
            Resource::User => "User",
            Resource::Notification => "Notification",
            Resource::Image => "Image",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation category performed against a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Wildcard: all actions.
    #[serde(rename = "*")]
    Any,
    Create,
    Read,
    Update,
    Delete,
    Invite,
    Publish,
    Redeem,
}

impl Action {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Any => "*",
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Invite => "invite",
            Action::Publish => "publish",
            Action::Redeem => "redeem",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
