use std::sync::Arc;

use crate::auth::{CredentialCodec, PasswordHasher};
use crate::database::models::{Post, Profile, User};
use crate::database::{DocumentStore, Repository};
use crate::services::GithubClient;

/// Shared handles injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub users: Repository<User>,
    pub profiles: Repository<Profile>,
    pub posts: Repository<Post>,
    pub codec: Arc<CredentialCodec>,
    pub passwords: PasswordHasher,
    pub github: GithubClient,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, codec: CredentialCodec, github: GithubClient) -> Self {
        Self {
            users: Repository::new(Arc::clone(&store)),
            profiles: Repository::new(Arc::clone(&store)),
            posts: Repository::new(Arc::clone(&store)),
            store,
            codec: Arc::new(codec),
            passwords: PasswordHasher::default(),
            github,
        }
    }
}
