use std::sync::Arc;

use mongodb::Client;

use crate::config::AppConfig;
use crate::db::mongo::create_mongo_client;
use crate::services::{
    catalog_service::{InMemoryCatalog, ListingCatalog, MongoCatalog},
    saved_items_service::{InMemorySavedItems, MongoSavedItems, SavedItemsStore},
};

/// Shared handles every route receives through `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn ListingCatalog>,
    pub saved_items: Arc<dyn SavedItemsStore>,
    pub mongo: Option<Arc<Client>>,
    pub environment: String,
}

impl AppState {
    pub fn in_memory(catalog: InMemoryCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            saved_items: Arc::new(InMemorySavedItems::new()),
            mongo: None,
            environment: AppConfig::default().environment,
        }
    }

    pub async fn with_mongo(client: Arc<Client>, database: &str) -> Self {
        let saved_items = MongoSavedItems::new(client.clone(), database);
        if let Err(err) = saved_items.ensure_indexes().await {
            log::warn!("Failed to create SavedItems index: {}", err);
        }

        Self {
            catalog: Arc::new(MongoCatalog::new(client.clone(), database)),
            saved_items: Arc::new(saved_items),
            mongo: Some(client),
            environment: AppConfig::default().environment,
        }
    }

    pub async fn from_config(config: &AppConfig) -> Result<Self, mongodb::error::Error> {
        let state = match &config.mongodb_uri {
            Some(uri) => {
                let client = create_mongo_client(uri).await?;
                Self::with_mongo(client, &config.database_name).await
            }
            None => {
                log::warn!("MONGODB_URI not set, using in-memory catalog and saved items");
                Self::in_memory(InMemoryCatalog::default())
            }
        };

        Ok(Self {
            environment: config.environment.clone(),
            ..state
        })
    }
}
