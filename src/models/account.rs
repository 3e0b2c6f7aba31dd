use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One saved listing for one user, stored in `SavedItems`.
#[derive(Debug, Deserialize, Serialize)]
pub struct SavedItem {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String,
    pub item_id: String,
    pub created_at: DateTime<Utc>,
}
