use std::sync::Arc;

use async_trait::async_trait;
use bson::{doc, Bson, Document};
use futures::TryStreamExt;
use mongodb::{Client, Collection};

use crate::error::AppError;
use crate::models::listing::{ItemKind, RawListing};

/// Read side of the listing documents owned by the trips, events and schools
/// services.
#[async_trait]
pub trait ListingCatalog: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<RawListing>, AppError>;
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalog {
    listings: Vec<RawListing>,
}

impl InMemoryCatalog {
    pub fn new(listings: Vec<RawListing>) -> Self {
        Self { listings }
    }
}

#[async_trait]
impl ListingCatalog for InMemoryCatalog {
    async fn fetch_all(&self) -> Result<Vec<RawListing>, AppError> {
        Ok(self.listings.clone())
    }
}

pub struct MongoCatalog {
    client: Arc<Client>,
    database: String,
}

impl MongoCatalog {
    const COLLECTIONS: [(&'static str, ItemKind); 3] = [
        ("Trips", ItemKind::Trip),
        ("Events", ItemKind::Event),
        ("AdventureSchools", ItemKind::School),
    ];

    pub fn new(client: Arc<Client>, database: &str) -> Self {
        Self {
            client,
            database: database.to_string(),
        }
    }

    async fn fetch_kind(&self, collection: &str, kind: ItemKind) -> Result<Vec<RawListing>, AppError> {
        let collection: Collection<Document> =
            self.client.database(&self.database).collection(collection);

        let cursor = collection
            .find(doc! {})
            .sort(doc! { "createdAt": -1 })
            .await?;
        let documents: Vec<Document> = cursor.try_collect().await?;

        let listings = documents
            .into_iter()
            .filter_map(|document| {
                // Relaxed extended JSON keeps ObjectIds and dates readable by the lenient fields
                let value = Bson::Document(document).into_relaxed_extjson();
                match RawListing::from_value_as(kind, value) {
                    Ok(listing) => Some(listing),
                    Err(err) => {
                        log::warn!("Skipping unreadable {} document: {}", kind.label(), err);
                        None
                    }
                }
            })
            .collect();

        Ok(listings)
    }
}

#[async_trait]
impl ListingCatalog for MongoCatalog {
    async fn fetch_all(&self) -> Result<Vec<RawListing>, AppError> {
        let mut listings = Vec::new();

        for (collection, kind) in Self::COLLECTIONS {
            let fetched = self.fetch_kind(collection, kind).await?;
            log::debug!("Fetched {} {} listings", fetched.len(), kind.label());
            listings.extend(fetched);
        }

        Ok(listings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_relaxed_extjson_documents_normalize() {
        let document = doc! {
            "_id": bson::oid::ObjectId::parse_str("65a1b2c3d4e5f60718293a4b").unwrap(),
            "title": "Hampta Pass",
            "startDate": bson::DateTime::from_millis(1_767_225_600_000),
            "accommodationItems": [{ "cost": 2000 }],
        };

        let value = Bson::Document(document).into_relaxed_extjson();
        let listing = RawListing::from_value_as(ItemKind::Trip, value).unwrap();
        let item = listing.normalize();

        assert_eq!(item.id, "65a1b2c3d4e5f60718293a4b");
        assert_eq!(item.title, "Hampta Pass");
        assert!(item.start_date.is_some());
        assert_eq!(item.base_price, 2000.0);
    }

    #[actix_rt::test]
    async fn test_in_memory_catalog_returns_listings() {
        let listings = RawListing::from_values(vec![
            json!({ "itemType": "trip", "title": "A" }),
            json!({ "itemType": "event", "title": "B" }),
        ]);
        let catalog = InMemoryCatalog::new(listings);

        let fetched = catalog.fetch_all().await.unwrap();
        assert_eq!(fetched.len(), 2);
        assert_eq!(fetched[1].kind(), ItemKind::Event);
    }
}
