//! The authenticated caller.

use crate::error::ApiError;
use crate::model::{Role, UserId};

#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_role(&self, role: Role) -> Result<(), ApiError> {
        self.require_any_role(&[role])
    }

    pub fn require_any_role(&self, roles: &[Role]) -> Result<(), ApiError> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(ApiError::forbidden())
        }
    }

    /// The caller acts on their own data, or is an admin.
    pub fn require_self_or_admin(&self, user_id: UserId) -> Result<(), ApiError> {
        if self.user_id == user_id || self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::forbidden())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(id: u32, role: Role) -> Principal {
        Principal {
            user_id: UserId(id),
            email: format!("user{}@example.com", id),
            role,
        }
    }

    #[test]
    fn test_role_checks() {
        let owner = principal(1, Role::RestaurantOwner);
        assert!(owner.require_role(Role::RestaurantOwner).is_ok());
        assert_eq!(owner.require_role(Role::Admin), Err(ApiError::forbidden()));
        assert!(owner
            .require_any_role(&[Role::Admin, Role::RestaurantOwner])
            .is_ok());
    }

    #[test]
    fn test_self_or_admin() {
        let customer = principal(1, Role::Customer);
        assert!(customer.require_self_or_admin(UserId(1)).is_ok());
        assert!(customer.require_self_or_admin(UserId(2)).is_err());
        assert!(principal(9, Role::Admin).require_self_or_admin(UserId(2)).is_ok());
    }
}
