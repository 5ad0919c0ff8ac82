//! `stitchflow-auth`: who is calling and what they may do.
//!
//! Token issuance lives with the identity provider; this crate only verifies
//! tokens, maps roles to permissions and answers authorization questions.
//! No HTTP, no storage.

pub mod authorize;
pub mod claims;
pub mod permissions;
pub mod principal;
pub mod roles;

pub use authorize::{AuthzError, authorize};
pub use claims::{Hs256JwtValidator, JwtClaims, JwtValidator, TokenValidationError, validate_claims};
pub use permissions::Permission;
pub use principal::{Principal, PrincipalId};
pub use roles::{Role, permissions_for_roles};
