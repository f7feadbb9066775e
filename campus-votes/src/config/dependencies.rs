use std::sync::Arc;

use campus_votes_engine::VotingService;
use campus_votes_engine::cooldown::{CooldownLedger, InMemoryCooldownLedger};
use campus_votes_repository::{
    CommentsRepository, EntitiesRepository, InMemoryStore, PostgresStore, SessionsRepository,
    UsersRepository, VotesRepository,
};
use tracing::info;

use crate::config::{AppConfig, SeedData};
use crate::errors::ServerError;

/// `Dependencies` holds the components the HTTP service is built from.
///
/// It includes the voting service, the session store used to resolve bearer
/// tokens, and the cooldown ledger whose sweep runs next to the server.
pub struct Dependencies {
    pub service: Arc<VotingService>,
    pub sessions: Arc<dyn SessionsRepository>,
    pub cooldown: Arc<dyn CooldownLedger>,
}

impl Dependencies {
    /// Creates a new `Dependencies` instance from `config`.
    ///
    /// Connects to PostgreSQL when a database URL is configured, running the
    /// embedded migrations if enabled, and falls back to the in-memory store
    /// otherwise. The seed file, if any, is applied to the selected store.
    ///
    /// # Returns
    ///
    /// A `Result` which is `Ok(Self)` on successful initialization or a
    /// `ServerError` if the store or the seed cannot be set up.
    pub async fn new(config: &AppConfig) -> Result<Self, ServerError> {
        let seed = config
            .seed_file
            .as_deref()
            .map(SeedData::load)
            .transpose()?;

        match &config.database_url {
            Some(url) => {
                let store = PostgresStore::connect(url).await?;
                if config.run_migrations {
                    store.migrate().await?;
                    info!("Database migrations applied");
                }
                if let Some(seed) = &seed {
                    seed.apply(&store).await?;
                }
                info!("Using PostgreSQL store");
                Ok(Self::with_store(config, Arc::new(store)))
            }
            None => {
                let store = InMemoryStore::new();
                if let Some(seed) = &seed {
                    seed.apply(&store).await?;
                }
                info!("Using in-memory store");
                Ok(Self::with_store(config, Arc::new(store)))
            }
        }
    }

    /// Wires every component on top of one store.
    pub fn with_store<S>(config: &AppConfig, store: Arc<S>) -> Self
    where
        S: EntitiesRepository
            + VotesRepository
            + CommentsRepository
            + UsersRepository
            + SessionsRepository
            + 'static,
    {
        let cooldown: Arc<dyn CooldownLedger> =
            Arc::new(InMemoryCooldownLedger::new(config.cooldown.clone()));
        let service = Arc::new(VotingService::with_store(cooldown.clone(), store.clone()));
        Self {
            service,
            sessions: store,
            cooldown,
        }
    }
}
