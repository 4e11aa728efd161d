// handlers/mod.rs - Two-tier handler layout
//
// Public (no credential) → Protected (x-auth-token verified by the auth gate)

pub mod protected;
pub mod public;

use uuid::Uuid;
use validator::ValidationError;

use crate::embedded::MutationError;
use crate::error::{ApiError, ApiResult};

/// Parse an id from a path segment; anything unparsable cannot name a stored record
pub(crate) fn parse_id(raw: &str, not_found: &'static str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::not_found(not_found))
}

/// Map a mutation failure, naming the missing item the way the route does
pub(crate) fn item_error(not_found: &'static str) -> impl Fn(MutationError) -> ApiError {
    move |err| match err {
        MutationError::NotFound(_) => ApiError::not_found(not_found),
        other => other.into(),
    }
}

/// Empty strings from form posts count as absent
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Validator rule: at least one non-whitespace character
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank"))
    } else {
        Ok(())
    }
}
