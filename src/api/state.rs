use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    config::{Config, Credentials, StorageBackend},
    db::{create_redis_client, FileStore, KeyValueStore, MemoryStore, RedisStore},
    error::AppResult,
    models::MakeupLook,
    services::{
        entitlement::FreeTierLimits, EntitlementGate, EntitlementOracle, LookGenerator,
        LookLibrary, ProfileService, StaticEntitlements,
    },
};

/// Look shown on the result screen, tagged with the generation that produced it
#[derive(Debug, Clone)]
pub struct CurrentLook {
    pub ticket: u64,
    pub look: MakeupLook,
}

/// Shared application state
///
/// Built once with [`AppState::initialize`] and torn down with
/// [`AppState::shutdown`]; nothing here is a process-wide global.
#[derive(Clone)]
pub struct AppState {
    pub profile: Arc<ProfileService>,
    pub library: Arc<LookLibrary>,
    pub gate: Arc<EntitlementGate>,
    pub generator: Arc<LookGenerator>,
    pub current_look: Arc<RwLock<Option<CurrentLook>>>,
}

impl AppState {
    /// Loads every service from `store` and repairs cross-record drift
    pub async fn initialize(
        store: Arc<dyn KeyValueStore>,
        oracle: Arc<dyn EntitlementOracle>,
        limits: FreeTierLimits,
        generator: LookGenerator,
    ) -> AppResult<Self> {
        let profile = Arc::new(ProfileService::load(store.clone()).await);
        let gate = Arc::new(EntitlementGate::initialize(store.clone(), oracle, limits).await);
        let library = Arc::new(LookLibrary::load(store, profile.clone(), gate.clone()).await?);

        Ok(Self {
            profile,
            library,
            gate,
            generator: Arc::new(generator),
            current_look: Arc::new(RwLock::new(None)),
        })
    }

    /// Builds the store, oracle and providers described by `config`
    pub async fn from_config(config: &Config, credentials: &Credentials) -> anyhow::Result<Self> {
        let store: Arc<dyn KeyValueStore> = match config.storage_backend {
            StorageBackend::File => Arc::new(FileStore::open(&config.storage_path).await?),
            StorageBackend::Redis => {
                let client = create_redis_client(&config.redis_url)?;
                Arc::new(RedisStore::new(client, "glowguide"))
            }
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
        };

        tracing::info!(backend = store.name(), "Local store ready");

        let oracle = Arc::new(StaticEntitlements::new(config.subscription_status));
        let limits = FreeTierLimits {
            looks: config.free_look_limit,
            saves: config.free_save_limit,
        };
        let generator = LookGenerator::from_config(config, credentials)?;

        Ok(Self::initialize(store, oracle, limits, generator).await?)
    }

    /// Replaces the current look unless a newer generation already set one
    pub async fn set_current_look(&self, ticket: u64, look: MakeupLook) -> bool {
        let mut current = self.current_look.write().await;
        if current.as_ref().is_some_and(|c| c.ticket > ticket) {
            return false;
        }
        *current = Some(CurrentLook { ticket, look });
        true
    }

    pub async fn shutdown(&self) -> AppResult<()> {
        self.gate.shutdown().await?;
        tracing::info!("Application state shut down");
        Ok(())
    }
}
