use crate::{
    error::AccessError,
    role::{Action, Resource, Role},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A grant of one or more actions on a resource category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub resource: Resource,
    pub actions: Vec<Action>,
}

impl Permission {
    #[must_use]
    pub fn new(resource: Resource, actions: impl Into<Vec<Action>>) -> Self {
        Self {
            resource,
            actions: actions.into(),
        }
    }

    /// Whether this entry satisfies the given (resource, action) pair.
    #[must_use]
    pub fn grants(&self, resource: Resource, action: Action) -> bool {
        let resource_match = self.resource == Resource::Any || self.resource == resource;
        let action_match =
            self.actions.contains(&Action::Any) || self.actions.contains(&action);
        resource_match && action_match
    }
}

/// The role-permission table: every role maps to an ordered list of
/// permissions. Immutable after construction.
#[derive(Debug, Clone)]
pub struct RolePermissions {
    table: HashMap<Role, Vec<Permission>>,
}

impl RolePermissions {
    /// Build a table from an explicit role → permissions map.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::MissingRole`] if any role variant lacks an
    /// entry. An empty list is a valid entry (it means "no access"), a
    /// missing one is a configuration bug.
    pub fn new(table: HashMap<Role, Vec<Permission>>) -> Result<Self, AccessError> {
        for role in Role::ALL {
            if !table.contains_key(&role) {
                return Err(AccessError::MissingRole(role));
            }
        }
        Ok(Self { table })
    }

    /// The standard membership-platform table.
    ///
    /// guest has no access; member can read/update their profile and read
    /// notifications; admin manages notifications and can read member
    /// profiles; organizationAdmin holds the full wildcard.
    #[must_use]
    pub fn standard() -> Self {
        let table = HashMap::from([
            (Role::Guest, vec![]),
            (
                Role::Member,
                vec![
                    Permission::new(Resource::User, [Action::Read, Action::Update]),
                    Permission::new(Resource::Notification, [Action::Read]),
                ],
            ),
            (
                Role::Admin,
                vec![
                    Permission::new(
                        Resource::Notification,
                        [Action::Create, Action::Read, Action::Update, Action::Delete],
                    ),
                    Permission::new(Resource::User, [Action::Read]),
                ],
            ),
            (
                Role::OrganizationAdmin,
                vec![Permission::new(Resource::Any, [Action::Any])],
            ),
        ]);

        // The map above covers Role::ALL by inspection; a miss here would
        // be a bug in this constructor itself.
        Self { table }
    }

    /// Whether `role` may perform `action` on `resource`.
    ///
    /// A role with no matching entry is denied; the table never grants by
    /// omission.
    #[must_use]
    pub fn has_permission(&self, role: Role, resource: Resource, action: Action) -> bool {
        self.table
            .get(&role)
            .is_some_and(|perms| perms.iter().any(|p| p.grants(resource, action)))
    }

    /// All permissions for a role. Always defined, possibly empty.
    #[must_use]
    pub fn permissions_for_role(&self, role: Role) -> &[Permission] {
        self.table.get(&role).map_or(&[], Vec::as_slice)
    }

    /// Whether the role holds the full `*:*` wildcard. Diagnostic helper,
    /// not used on the authorization hot path.
    #[must_use]
    pub fn has_wildcard_access(&self, role: Role) -> bool {
        self.permissions_for_role(role)
            .iter()
            .any(|p| p.resource == Resource::Any && p.actions.contains(&Action::Any))
    }
}

impl Default for RolePermissions {
    fn default() -> Self {
        Self::standard()
    }
}
