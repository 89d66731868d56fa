//! Authentication and authorization extractors.
//!
//! - [`auth::Identity`] -- the token's user, without profile resolution.
//! - [`auth::AuthUser`] -- the user acting through their active profile.
//! - [`rbac`] -- role requirements on the active profile.

pub mod auth;
pub mod rbac;
