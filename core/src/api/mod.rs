//! Endpoint-specific wrappers over `ApiClient`.
//!
//! Each operation fixes a path and a method and serializes its payload.
//! Responses come back as raw JSON; normalizing them is the caller's job.
//! Errors propagate unchanged.

mod admin_user;
mod auth;
mod category;
mod service;

pub use admin_user::AdminUserApi;
pub use auth::AuthApi;
pub use category::CategoryApi;
pub use service::ServiceApi;

use crate::error::ApiError;
use crate::types::Id;

/// Reject an empty identifier before any request is built.
fn require_id(id: &Id) -> Result<&str, ApiError> {
    if id.is_empty() {
        return Err(ApiError::MissingId);
    }
    Ok(id.as_str())
}
