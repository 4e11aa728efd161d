// handlers/protected/mod.rs - Protected handlers (credential required)
//
// Every route here sits behind `middleware::auth_gate`, which places the
// caller's `Identity` in the request extensions. Owner-only mutations check
// it with `auth::authorize` before touching the store.

pub mod auth;
pub mod posts;
pub mod profile;
