//! Conversion between documents and their JSON wire form.
//!
//! All functions are pure. Encoding validates the document first and insists
//! on a JSON object at the top level, since that is the only shape the search
//! service accepts as a document source.

use serde_json::Value;
use thiserror::Error;

use crate::document::Document;

/// Errors produced while converting documents to or from the wire format.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    /// The document holds a value the wire format cannot represent.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The payload is not a valid document of the requested type.
    #[error("Decoding error: {0}")]
    Decoding(String),
}

impl CodecError {
    /// Create an encoding error.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Create a decoding error.
    pub fn decoding(msg: impl Into<String>) -> Self {
        Self::Decoding(msg.into())
    }
}

/// Serialize a document into its JSON object form.
pub fn to_value<D: Document>(doc: &D) -> Result<Value, CodecError> {
    doc.validate()?;

    let value = serde_json::to_value(doc).map_err(|e| CodecError::encoding(e.to_string()))?;
    if !value.is_object() {
        return Err(CodecError::encoding(format!(
            "document must serialize to a JSON object, got {}",
            json_kind(&value)
        )));
    }

    Ok(value)
}

/// Serialize a document into JSON bytes.
pub fn encode<D: Document>(doc: &D) -> Result<Vec<u8>, CodecError> {
    let value = to_value(doc)?;
    serde_json::to_vec(&value).map_err(|e| CodecError::encoding(e.to_string()))
}

/// Deserialize a document from its JSON object form.
pub fn from_value<D: Document>(value: Value) -> Result<D, CodecError> {
    if !value.is_object() {
        return Err(CodecError::decoding(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    }
    serde_json::from_value(value).map_err(|e| CodecError::decoding(e.to_string()))
}

/// Deserialize a document from JSON bytes.
pub fn decode<D: Document>(bytes: &[u8]) -> Result<D, CodecError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| CodecError::decoding(e.to_string()))?;
    from_value(value)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentId;
    use crate::product::ProductDocument;
    use chrono::{TimeZone, Utc};
    use serde::{Deserialize, Serialize};
    use std::collections::HashMap;
    use uuid::Uuid;

    fn sample_product() -> ProductDocument {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 15).unwrap();
        ProductDocument {
            id: 1,
            seller_id: Uuid::parse_str("ea838b0c-a235-48c0-a84f-90a8aca284e2").unwrap(),
            name: "Martabak Manis".to_string(),
            category: "Makanan".to_string(),
            quantity: 10,
            price: 10.5,
            weight: 10,
            size: "XXL".to_string(),
            status: "Ready".to_string(),
            description: "Kudapan sejenis panekuk yang dijajakan di pinggir jalan.".to_string(),
            created_at: Some(now),
            updated_at: None,
        }
    }

    #[test]
    fn test_round_trip() {
        let product = sample_product();
        let bytes = encode(&product).unwrap();
        let decoded: ProductDocument = decode(&bytes).unwrap();
        assert_eq!(decoded, product);
    }

    #[test]
    fn test_round_trip_awkward_values() {
        let mut product = sample_product();
        product.name = "quote \" backslash \\ tab \t newline \n nul \u{0}".to_string();
        product.price = 0.1 + 0.2;
        product.updated_at = Some(Utc.timestamp_nanos(1_700_000_000_123_456_789));

        let decoded: ProductDocument = decode(&encode(&product).unwrap()).unwrap();
        assert_eq!(decoded, product);
    }

    #[test]
    fn test_unset_timestamps_are_omitted() {
        let mut product = sample_product();
        product.created_at = None;

        let value = to_value(&product).unwrap();
        assert!(value.get("created_at").is_none());
        assert!(value.get("updated_at").is_none());
    }

    #[test]
    fn test_absent_and_null_timestamps_decode_to_unset() {
        let mut value = to_value(&sample_product()).unwrap();
        value["created_at"] = Value::Null;

        let decoded: ProductDocument = from_value(value).unwrap();
        assert!(decoded.created_at.is_none());
        assert!(decoded.updated_at.is_none());
    }

    #[test]
    fn test_missing_required_field() {
        let mut value = to_value(&sample_product()).unwrap();
        value.as_object_mut().unwrap().remove("name");

        let err = from_value::<ProductDocument>(value).unwrap_err();
        assert!(matches!(err, CodecError::Decoding(ref msg) if msg.contains("name")));
    }

    #[test]
    fn test_mistyped_field() {
        let mut value = to_value(&sample_product()).unwrap();
        value["quantity"] = Value::String("ten".to_string());

        let err = from_value::<ProductDocument>(value).unwrap_err();
        assert!(matches!(err, CodecError::Decoding(_)));
    }

    #[test]
    fn test_decode_rejects_non_object() {
        assert!(matches!(
            decode::<ProductDocument>(b"[1, 2, 3]"),
            Err(CodecError::Decoding(_))
        ));
        assert!(matches!(
            decode::<ProductDocument>(b"{not json"),
            Err(CodecError::Decoding(_))
        ));
    }

    #[test]
    fn test_non_finite_price_is_rejected() {
        let mut product = sample_product();
        product.price = f64::NAN;
        assert!(matches!(encode(&product), Err(CodecError::Encoding(_))));

        product.price = f64::INFINITY;
        assert!(matches!(encode(&product), Err(CodecError::Encoding(_))));
    }

    #[derive(Serialize, Deserialize)]
    struct BadKeys {
        id: i64,
        by_point: HashMap<(i32, i32), String>,
    }

    impl Document for BadKeys {
        fn document_id(&self) -> DocumentId {
            DocumentId::Int(self.id)
        }
    }

    #[test]
    fn test_unsupported_field_type() {
        let mut by_point = HashMap::new();
        by_point.insert((1, 2), "x".to_string());
        let doc = BadKeys { id: 1, by_point };

        assert!(matches!(encode(&doc), Err(CodecError::Encoding(_))));
    }

    #[derive(Serialize, Deserialize)]
    struct Bare(i64);

    impl Document for Bare {
        fn document_id(&self) -> DocumentId {
            DocumentId::Int(self.0)
        }
    }

    #[test]
    fn test_non_object_document_is_rejected() {
        let err = encode(&Bare(3)).unwrap_err();
        assert_eq!(
            err,
            CodecError::Encoding("document must serialize to a JSON object, got a number".into())
        );
    }
}
