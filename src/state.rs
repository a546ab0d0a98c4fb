use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, CatalogService, SeaOrmAuthService, SeaOrmCatalogService, TokenSigner,
};

/// Everything built once at startup and shared by every request.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub catalog_service: Arc<dyn CatalogService>,
}

impl SharedState {
    /// Connects to the store, applies migrations and wires the services.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::from_config(&config.database).await?;
        Ok(Self::with_store(config, store))
    }

    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let (secret, _) = config.auth.signing_secret();
        let signer = TokenSigner::new(secret, config.auth.token_ttl_hours);

        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            signer,
            config.security.clone(),
        )) as Arc<dyn AuthService>;

        let catalog_service =
            Arc::new(SeaOrmCatalogService::new(store.clone())) as Arc<dyn CatalogService>;

        Self {
            config: Arc::new(config),
            store,
            auth_service,
            catalog_service,
        }
    }
}
