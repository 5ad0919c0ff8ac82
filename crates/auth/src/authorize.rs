use thiserror::Error;

use crate::{Permission, Principal};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// Check one permission. Pure policy: no IO, no business rules.
pub fn authorize(principal: &Principal, required: &Permission) -> Result<(), AuthzError> {
    let granted = principal
        .permissions
        .iter()
        .any(|p| p.is_wildcard() || p == required);

    if granted {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PrincipalId, Role};

    #[test]
    fn admin_is_authorized_for_anything() {
        let admin = Principal::from_roles(PrincipalId::new(), "Owner", vec![Role::ADMIN]);
        assert!(authorize(&admin, &Permission::new("orders.anything")).is_ok());
        assert!(authorize(&admin, &Permission::ORDERS_STATUS_UPDATE).is_ok());
    }

    #[test]
    fn customer_is_forbidden_from_status_updates() {
        let customer = Principal::from_roles(PrincipalId::new(), "Asha", vec![Role::CUSTOMER]);
        let err = authorize(&customer, &Permission::ORDERS_STATUS_UPDATE).unwrap_err();
        assert_eq!(err, AuthzError::Forbidden("orders.status.update".to_string()));
        assert!(authorize(&customer, &Permission::ORDERS_PLACE).is_ok());
    }

    #[test]
    fn no_roles_no_permissions() {
        let nobody = Principal::from_roles(PrincipalId::new(), "anon", vec![]);
        assert!(authorize(&nobody, &Permission::ORDERS_READ_OWN).is_err());
    }
}
