// App state for Axum server
use std::sync::Arc;

use campus_votes_engine::VotingService;

use crate::config::Dependencies;
use crate::server::auth::Authenticator;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<VotingService>,
    pub auth: Arc<Authenticator>,
}

impl AppState {
    pub fn new(dependencies: &Dependencies) -> Self {
        Self {
            service: dependencies.service.clone(),
            auth: Arc::new(Authenticator::new(dependencies.sessions.clone())),
        }
    }
}
