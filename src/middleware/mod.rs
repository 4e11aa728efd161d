pub mod auth;
pub mod validation;

pub use auth::{auth_gate, AUTH_HEADER};
pub use validation::ValidJson;
