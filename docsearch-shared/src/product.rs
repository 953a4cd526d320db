//! Product catalogue document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::codec::CodecError;
use crate::document::{Document, DocumentId};

/// A product listing as stored in the `products` index.
///
/// Timestamps are optional: an absent or `null` timestamp decodes to `None`
/// rather than to the epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDocument {
    /// Product id, also used as the document id.
    pub id: i64,
    /// Seller that owns the listing.
    pub seller_id: Uuid,
    pub name: String,
    pub category: String,
    pub quantity: i64,
    /// Unit price. Must be finite.
    pub price: f64,
    /// Weight in grams.
    pub weight: i64,
    pub size: String,
    pub status: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Document for ProductDocument {
    fn document_id(&self) -> DocumentId {
        DocumentId::Int(self.id)
    }

    fn validate(&self) -> Result<(), CodecError> {
        // JSON has no NaN or infinity; serde_json would silently write null.
        if !self.price.is_finite() {
            return Err(CodecError::encoding(format!(
                "price must be a finite number, got {}",
                self.price
            )));
        }
        Ok(())
    }
}
