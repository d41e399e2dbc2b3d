//! API-side authorization guard.
//!
//! Role checks happen at the route boundary, before any service call;
//! the domain crates stay auth-agnostic.

use axum::http::StatusCode;

use crate::app::errors;
use crate::context::PrincipalContext;

/// Require the admin role for the current request.
pub fn require_admin(principal: &PrincipalContext) -> Result<(), axum::response::Response> {
    if principal.role().is_admin() {
        Ok(())
    } else {
        Err(errors::json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            "admin role required",
        ))
    }
}
