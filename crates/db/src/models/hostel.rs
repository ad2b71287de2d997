use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// A realtor-owned listing. `available` is not tied to the owner's account
/// status: a suspended realtor's hostels stay listed until deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hostel {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub realtor_id: ObjectId,
    pub name: String,
    pub location: String,
    pub price: i64,
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    pub whatsapp: Option<String>,
    #[serde(default = "bool_true")]
    pub available: bool,
    #[serde(default)]
    pub applications: i64,
    #[serde(default)]
    pub views: i64,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

fn bool_true() -> bool {
    true
}

impl Hostel {
    pub const COLLECTION: &'static str = "hostels";
}
