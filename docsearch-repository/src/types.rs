//! Request and response types for search index operations.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Number, Value};

/// What a write did to the stored document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    Created,
    Updated,
    /// The write carried no change (e.g. an update with identical values).
    Noop,
    Other(String),
}

impl From<&str> for WriteResult {
    fn from(result: &str) -> Self {
        match result {
            "created" => WriteResult::Created,
            "updated" => WriteResult::Updated,
            "noop" => WriteResult::Noop,
            other => WriteResult::Other(other.to_string()),
        }
    }
}

/// Outcome of an index or update request.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexOutcome {
    /// Id of the written document; assigned by the service when none was given.
    pub id: String,
    pub result: WriteResult,
    pub version: Option<i64>,
}

/// A document fetched by id, still in wire form.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub source: Value,
}

/// A single search hit, still in wire form.
#[derive(Debug, Clone, PartialEq)]
pub struct RawHit {
    pub id: String,
    pub score: Option<f64>,
    pub source: Value,
}

/// The hits section of a search response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HitSet {
    /// Total number of matching documents, which may exceed `hits.len()`.
    pub total: u64,
    pub hits: Vec<RawHit>,
}

/// A decoded search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit<D> {
    pub id: String,
    pub score: Option<f64>,
    pub document: D,
}

/// Ordered search results, in the order the service ranked them.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<D> {
    /// Total number of matching documents.
    pub total: u64,
    pub hits: Vec<SearchHit<D>>,
}

impl<D> SearchResult<D> {
    /// Number of hits returned in this page.
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Iterate over the documents in rank order.
    pub fn documents(&self) -> impl Iterator<Item = &D> {
        self.hits.iter().map(|hit| &hit.document)
    }

    pub fn into_documents(self) -> Vec<D> {
        self.hits.into_iter().map(|hit| hit.document).collect()
    }
}

/// Fields to merge into an existing document.
///
/// Fields not mentioned are left unchanged by the service.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldUpdate {
    fields: Map<String, Value>,
    rejected: Vec<String>,
}

/// A value for one field of a `FieldUpdate`.
///
/// Floats that JSON cannot represent are carried as a rejection rather than
/// turning into `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue(Result<Value, String>);

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue(
            Number::from_f64(value)
                .map(Value::Number)
                .ok_or_else(|| format!("{} is not a finite number", value)),
        )
    }
}

impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        FieldValue::from(f64::from(value))
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue(Ok(Value::Null)))
    }
}

macro_rules! field_value_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue(Ok(Value::from(value)))
                }
            }
        )*
    };
}

field_value_from!(bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, String, &str, Value);

impl FieldUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field.
    ///
    /// A value JSON cannot represent is recorded in `rejected` instead, and
    /// the service refuses to send the update.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        let field = field.into();
        match value.into().0 {
            Ok(value) => {
                self.fields.insert(field, value);
            }
            Err(reason) => {
                self.fields.remove(&field);
                self.rejected.push(format!("{}: {}", field, reason));
            }
        }
        self
    }

    /// Set a timestamp field, in the same RFC 3339 form the codec writes.
    pub fn set_timestamp(self, field: impl Into<String>, at: DateTime<Utc>) -> Self {
        self.set(field, at.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    /// Check if any fields are set for update.
    pub fn has_updates(&self) -> bool {
        !self.fields.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Fields that were given a value JSON cannot represent, with the reason.
    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }
}

impl From<Map<String, Value>> for FieldUpdate {
    fn from(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            rejected: Vec::new(),
        }
    }
}

/// Basic facts about the cluster, as reported by its root endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterInfo {
    pub cluster_name: String,
    pub version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_field_update_builder() {
        let update = FieldUpdate::new()
            .set("status", "Not Ready")
            .set("size", "L")
            .set("quantity", 3);

        assert!(update.has_updates());
        assert!(update.contains("status"));
        assert_eq!(
            Value::Object(update.fields().clone()),
            json!({"status": "Not Ready", "size": "L", "quantity": 3})
        );
        assert!(!FieldUpdate::new().has_updates());
    }

    #[test]
    fn test_non_finite_numbers_are_rejected() {
        let update = FieldUpdate::new()
            .set("price", 12.5)
            .set("price", f64::NAN)
            .set("weight", f32::INFINITY)
            .set("status", "Ready");

        assert!(!update.contains("price"));
        assert!(!update.contains("weight"));
        assert_eq!(update.rejected().len(), 2);
        assert!(update.rejected()[0].starts_with("price:"));
        assert_eq!(Value::Object(update.fields().clone()), json!({"status": "Ready"}));
    }

    #[test]
    fn test_optional_values() {
        let update = FieldUpdate::new()
            .set("updated_at", None::<String>)
            .set("price", Some(10.0));

        assert_eq!(
            Value::Object(update.fields().clone()),
            json!({"updated_at": null, "price": 10.0})
        );
        assert!(update.rejected().is_empty());
    }

    #[test]
    fn test_set_timestamp_matches_serde_form() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 15).unwrap();
        let update = FieldUpdate::new().set_timestamp("updated_at", at);

        assert_eq!(update.fields()["updated_at"], serde_json::to_value(at).unwrap());
    }

    #[test]
    fn test_write_result_from_str() {
        assert_eq!(WriteResult::from("created"), WriteResult::Created);
        assert_eq!(WriteResult::from("noop"), WriteResult::Noop);
        assert_eq!(
            WriteResult::from("deleted"),
            WriteResult::Other("deleted".to_string())
        );
    }
}
