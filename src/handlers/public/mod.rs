// handlers/public/mod.rs - Public handlers (no credential required)
//
// Token acquisition (register, login) and read-only profile browsing.

pub mod auth;
pub mod profile;
pub mod users;

use serde::Serialize;

/// Body returned by every credential-issuing route
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}
