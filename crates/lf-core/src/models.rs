//! # Domain Models
//!
//! These structs represent the core entities of the lost & found service.
//! We use UUID v7 for time-ordered, globally unique identification.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// A stored administrator. Never serialized as-is: the hash stays server-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminAccount {
    pub id: Uuid,
    pub username: String,
    /// Lowercased on the way in so uniqueness is case-insensitive.
    pub email: String,
    /// PHC-format one-way hash produced by the `CredentialHasher`.
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The public view of an account returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDescriptor {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&AdminAccount> for AccountDescriptor {
    fn from(account: &AdminAccount) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            email: account.email.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            phone_number: account.phone_number.clone(),
            created_at: account.created_at,
        }
    }
}

/// What a successful create or login hands back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub account: AccountDescriptor,
}

/// Raw admin-creation payload. Every field is optional here so that
/// "absent" is reported as a validation error rather than a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccountRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Clients send this as either a JSON string or a number.
    #[serde(default, deserialize_with = "string_or_number")]
    pub phone_number: Option<String>,
}

/// Claims carried by a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Account id.
    pub sub: Uuid,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

/// Whether the item was lost or found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostType {
    Lost,
    Found,
}

impl PostType {
    pub const ALL: [PostType; 2] = [PostType::Lost, PostType::Found];

    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::Lost => "Lost",
            PostType::Found => "Found",
        }
    }
}

impl FromStr for PostType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PostType::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| AppError::validation(format!("postType must be one of Lost, Found (got {s:?})")))
    }
}

impl fmt::Display for PostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed set of item categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    #[serde(rename = "water bottle")]
    WaterBottle,
    #[serde(rename = "lunch box")]
    LunchBox,
    #[serde(rename = "clothing")]
    Clothing,
    #[serde(rename = "jewelry")]
    Jewelry,
    #[serde(rename = "wallet/purse")]
    WalletPurse,
    #[serde(rename = "keys")]
    Keys,
    #[serde(rename = "computer")]
    Computer,
    #[serde(rename = "cell phone")]
    CellPhone,
    #[serde(rename = "glasses/sunglasses")]
    Glasses,
    #[serde(rename = "other")]
    Other,
}

impl ItemType {
    pub const ALL: [ItemType; 10] = [
        ItemType::WaterBottle,
        ItemType::LunchBox,
        ItemType::Clothing,
        ItemType::Jewelry,
        ItemType::WalletPurse,
        ItemType::Keys,
        ItemType::Computer,
        ItemType::CellPhone,
        ItemType::Glasses,
        ItemType::Other,
    ];

    /// Wire and storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::WaterBottle => "water bottle",
            ItemType::LunchBox => "lunch box",
            ItemType::Clothing => "clothing",
            ItemType::Jewelry => "jewelry",
            ItemType::WalletPurse => "wallet/purse",
            ItemType::Keys => "keys",
            ItemType::Computer => "computer",
            ItemType::CellPhone => "cell phone",
            ItemType::Glasses => "glasses/sunglasses",
            ItemType::Other => "other",
        }
    }
}

impl FromStr for ItemType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AppError::validation(format!("itemType {s:?} is not a known category")))
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted lost/found report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemReport {
    pub id: Uuid,
    pub post_type: PostType,
    pub item_type: ItemType,
    pub location_id: Uuid,
    pub account_id: Uuid,
    pub color: Option<String>,
    pub material: Option<String>,
    pub image_url: Option<String>,
    pub image_file_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw item submission, validated by `ItemRecordStore::create_item`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItemRequest {
    pub post_type: Option<String>,
    pub item_type: Option<String>,
    pub location_id: Option<String>,
    pub account_id: Option<String>,
    pub color: Option<String>,
    pub material: Option<String>,
    pub image_url: Option<String>,
    pub image_file_name: Option<String>,
}

/// Trims and drops blank strings; a whitespace-only field counts as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}
