use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use bson::{doc, Document};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    Client, Collection, IndexModel,
};

use crate::error::AppError;
use crate::models::account::SavedItem;

const DUPLICATE_KEY: i32 = 11000;

/// Per-user set of saved listing ids. `list` returns ids in the order they
/// were saved.
#[async_trait]
pub trait SavedItemsStore: Send + Sync {
    async fn has(&self, user_id: &str, item_id: &str) -> Result<bool, AppError>;

    /// Flips membership and returns whether the item is saved afterwards.
    async fn toggle(&self, user_id: &str, item_id: &str) -> Result<bool, AppError>;

    async fn list(&self, user_id: &str) -> Result<Vec<String>, AppError>;
}

#[derive(Debug, Default)]
pub struct InMemorySavedItems {
    items: RwLock<HashMap<String, Vec<String>>>,
}

impl InMemorySavedItems {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SavedItemsStore for InMemorySavedItems {
    async fn has(&self, user_id: &str, item_id: &str) -> Result<bool, AppError> {
        let items = self.items.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(items
            .get(user_id)
            .is_some_and(|saved| saved.iter().any(|id| id == item_id)))
    }

    async fn toggle(&self, user_id: &str, item_id: &str) -> Result<bool, AppError> {
        let mut items = self.items.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        let saved = items.entry(user_id.to_string()).or_default();

        match saved.iter().position(|id| id == item_id) {
            Some(index) => {
                saved.remove(index);
                if saved.is_empty() {
                    items.remove(user_id);
                }
                Ok(false)
            }
            None => {
                saved.push(item_id.to_string());
                Ok(true)
            }
        }
    }

    async fn list(&self, user_id: &str) -> Result<Vec<String>, AppError> {
        let items = self.items.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(items
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }
}

pub struct MongoSavedItems {
    collection: Collection<SavedItem>,
}

impl MongoSavedItems {
    pub fn new(client: Arc<Client>, database: &str) -> Self {
        Self {
            collection: client.database(database).collection("SavedItems"),
        }
    }

    /// One document per (user, item); concurrent toggles that both insert
    /// collide on this index instead of leaving duplicates behind.
    pub async fn ensure_indexes(&self) -> Result<(), AppError> {
        self.collection.create_index(Self::unique_index()).await?;
        Ok(())
    }

    fn unique_index() -> IndexModel {
        IndexModel::builder()
            .keys(doc! { "user_id": 1, "item_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("user_item_unique".to_string())
                    .build(),
            )
            .build()
    }

    fn item_filter(user_id: &str, item_id: &str) -> Document {
        doc! { "user_id": user_id, "item_id": item_id }
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl SavedItemsStore for MongoSavedItems {
    async fn has(&self, user_id: &str, item_id: &str) -> Result<bool, AppError> {
        let filter = Self::item_filter(user_id, item_id);
        Ok(self.collection.find_one(filter).await?.is_some())
    }

    async fn toggle(&self, user_id: &str, item_id: &str) -> Result<bool, AppError> {
        let filter = Self::item_filter(user_id, item_id);

        let deleted = self.collection.delete_one(filter).await?;
        if deleted.deleted_count > 0 {
            return Ok(false);
        }

        let saved = SavedItem {
            id: None,
            user_id: user_id.to_string(),
            item_id: item_id.to_string(),
            created_at: Utc::now(),
        };
        match self.collection.insert_one(&saved).await {
            Ok(_) => Ok(true),
            // A concurrent toggle saved it first.
            Err(err) if is_duplicate_key(&err) => Ok(true),
            Err(err) => Err(err.into()),
        }
    }

    async fn list(&self, user_id: &str) -> Result<Vec<String>, AppError> {
        let cursor = self
            .collection
            .find(doc! { "user_id": user_id })
            .sort(doc! { "created_at": 1 })
            .await?;

        let saved: Vec<SavedItem> = cursor.try_collect().await?;
        Ok(saved.into_iter().map(|item| item.item_id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_rt::test]
    async fn test_toggle_flips_membership() {
        let store = InMemorySavedItems::new();

        assert!(!store.has("user-1", "trip-1").await.unwrap());
        assert!(store.toggle("user-1", "trip-1").await.unwrap());
        assert!(store.has("user-1", "trip-1").await.unwrap());
        assert!(!store.toggle("user-1", "trip-1").await.unwrap());
        assert!(!store.has("user-1", "trip-1").await.unwrap());
    }

    #[actix_rt::test]
    async fn test_users_are_isolated() {
        let store = InMemorySavedItems::new();
        store.toggle("user-1", "event-9").await.unwrap();

        assert!(!store.has("user-2", "event-9").await.unwrap());
        assert!(store.list("user-2").await.unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn test_list_keeps_save_order() {
        let store = InMemorySavedItems::new();
        for id in ["school-3", "trip-1", "event-2"] {
            store.toggle("user-1", id).await.unwrap();
        }
        store.toggle("user-1", "trip-1").await.unwrap();
        store.toggle("user-1", "trip-1").await.unwrap();

        assert_eq!(
            store.list("user-1").await.unwrap(),
            vec!["school-3", "event-2", "trip-1"]
        );
    }

    #[actix_rt::test]
    async fn test_unsaving_last_item_drops_user_entry() {
        let store = InMemorySavedItems::new();
        store.toggle("user-1", "trip-1").await.unwrap();
        store.toggle("user-1", "trip-1").await.unwrap();

        assert!(store.items.read().unwrap().is_empty());
        assert!(store.list("user-1").await.unwrap().is_empty());
    }

    #[test]
    fn test_mongo_filter_and_index_cover_user_and_item() {
        let filter = MongoSavedItems::item_filter("user-1", "trip-1");
        assert_eq!(filter, doc! { "user_id": "user-1", "item_id": "trip-1" });

        let index = MongoSavedItems::unique_index();
        assert_eq!(index.keys, doc! { "user_id": 1, "item_id": 1 });
        assert_eq!(index.options.and_then(|options| options.unique), Some(true));
    }

    #[test]
    fn test_saved_item_document_shape() {
        let saved = SavedItem {
            id: None,
            user_id: "user-1".to_string(),
            item_id: "trip-1".to_string(),
            created_at: Utc::now(),
        };

        let document = bson::to_document(&saved).unwrap();
        assert!(!document.contains_key("_id"));
        assert_eq!(document.get_str("user_id").unwrap(), "user-1");
        assert_eq!(document.get_str("item_id").unwrap(), "trip-1");
        assert!(document.contains_key("created_at"));
    }
}
