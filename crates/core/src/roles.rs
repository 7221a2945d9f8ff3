//! Well-known role name constants.
//!
//! These must match the `role` claim values issued by the identity platform.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_PRINCIPAL: &str = "principal";
pub const ROLE_SCHOOL: &str = "school";
pub const ROLE_DONOR: &str = "donor";
