//! Explicit caller identity for pipeline operations.
//!
//! Every state-machine and scheduler operation receives the caller's
//! identity as an argument; there is no ambient session.

use cvp_model::{DepartmentId, UserId, UserRole};

/// Identity and authorization context of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: UserId,
    pub role: UserRole,
    pub department_id: Option<DepartmentId>,
}

impl AuthContext {
    #[must_use]
    pub fn new(user_id: UserId, role: UserRole, department_id: Option<DepartmentId>) -> Self {
        Self {
            user_id,
            role,
            department_id,
        }
    }

    /// Contracts created by this caller start out Active instead of
    /// PendingApproval.
    #[must_use]
    pub fn can_activate_directly(&self) -> bool {
        self.role == UserRole::SuperAdmin
    }

    /// Whether this caller may approve or reject contracts of the given
    /// department.
    #[must_use]
    pub fn can_approve(&self, department_id: DepartmentId) -> bool {
        match self.role {
            UserRole::SuperAdmin => true,
            UserRole::DepartmentManager => self.department_id == Some(department_id),
            UserRole::Requester => false,
        }
    }

    #[must_use]
    pub fn is_elevated(&self) -> bool {
        self.role.is_elevated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manager_approves_only_own_department() {
        let dept = DepartmentId::generate();
        let other = DepartmentId::generate();
        let manager = AuthContext::new(UserId::generate(), UserRole::DepartmentManager, Some(dept));
        assert!(manager.can_approve(dept));
        assert!(!manager.can_approve(other));
        assert!(!manager.can_activate_directly());
    }

    #[test]
    fn admin_approves_everywhere() {
        let admin = AuthContext::new(UserId::generate(), UserRole::SuperAdmin, None);
        assert!(admin.can_approve(DepartmentId::generate()));
        assert!(admin.can_activate_directly());
    }

    #[test]
    fn requester_is_not_elevated() {
        let requester = AuthContext::new(UserId::generate(), UserRole::Requester, None);
        assert!(!requester.is_elevated());
        assert!(!requester.can_approve(DepartmentId::generate()));
    }
}
