//! Entity records for the two migrated tables.
//!
//! Each table has a statically typed wire record (decoded straight off
//! the PostgreSQL row) and a values record (the fully transformed tuple
//! bound to the SQLite insert). The split keeps row decoding and field
//! transformation apart; identifiers pass through both untouched.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::transform;

/// A dictionary entry row as read from PostgreSQL.
#[derive(Debug, Clone, FromRow)]
pub struct Entry {
    /// Source-assigned primary key, preserved verbatim.
    pub id: i64,
    /// Globally unique identifier.
    pub guid: Uuid,
    /// Ordered content strings.
    pub content: Option<Vec<String>>,
    /// Initial letter used for alphabetical listings.
    pub initial: Option<String>,
    /// Search ranking weight.
    pub weight: Option<f64>,
    /// Full-text index vector in its text form.
    pub tokens: Option<String>,
    /// Language code.
    pub lang: String,
    /// Tag strings.
    pub tags: Option<Vec<String>>,
    /// Phonetic transcriptions.
    pub phones: Option<Vec<String>>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Arbitrary metadata object.
    pub meta: Option<serde_json::Value>,
    /// Publication status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
}

/// A transformed entry tuple ready for the SQLite insert, in the
/// destination table's column order.
#[derive(Debug, Clone)]
pub struct EntryValues {
    /// Primary key, equal to the source id.
    pub id: i64,
    /// GUID rendered as text.
    pub guid: String,
    /// Content as a JSON array string.
    pub content: String,
    /// Initial letter, empty when absent.
    pub initial: String,
    /// Weight, 0 when absent.
    pub weight: f64,
    /// Space-separated search lexemes.
    pub tokens: String,
    /// Language code.
    pub lang: String,
    /// Tags as a JSON array string.
    pub tags: String,
    /// Phones as a JSON array string.
    pub phones: String,
    /// Notes, empty when absent.
    pub notes: String,
    /// Metadata as a JSON object string.
    pub meta: String,
    /// Publication status.
    pub status: String,
    /// Creation timestamp as ISO-8601 with a `Z` suffix, or NULL.
    pub created_at: Option<String>,
    /// Update timestamp as ISO-8601 with a `Z` suffix, or NULL.
    pub updated_at: Option<String>,
}

impl Entry {
    /// Transform the wire record into the destination tuple.
    #[must_use]
    pub fn into_values(self) -> EntryValues {
        EntryValues {
            id: self.id,
            guid: self.guid.to_string(),
            content: transform::array_to_json(self.content.as_deref()),
            initial: transform::text_or_empty(self.initial),
            weight: transform::weight_or_zero(self.weight),
            tokens: transform::tsvector_to_tokens(self.tokens.as_deref()),
            lang: self.lang,
            tags: transform::array_to_json(self.tags.as_deref()),
            phones: transform::array_to_json(self.phones.as_deref()),
            notes: transform::text_or_empty(self.notes),
            meta: transform::meta_to_json(self.meta.as_ref()),
            status: self.status,
            created_at: transform::timestamp_to_iso(self.created_at),
            updated_at: transform::timestamp_to_iso(self.updated_at),
        }
    }
}

/// A relation row (a directed link between two entries) as read from
/// PostgreSQL.
#[derive(Debug, Clone, FromRow)]
pub struct Relation {
    /// Source-assigned primary key, preserved verbatim.
    pub id: i64,
    /// Entry the relation points from.
    pub from_id: i64,
    /// Entry the relation points to.
    pub to_id: i64,
    /// Relation type strings.
    pub types: Option<Vec<String>>,
    /// Tag strings.
    pub tags: Option<Vec<String>>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Ordering weight.
    pub weight: Option<f64>,
    /// Publication status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
}

/// A transformed relation tuple ready for the SQLite insert.
#[derive(Debug, Clone)]
pub struct RelationValues {
    /// Primary key, equal to the source id.
    pub id: i64,
    /// Entry the relation points from.
    pub from_id: i64,
    /// Entry the relation points to.
    pub to_id: i64,
    /// Types as a JSON array string.
    pub types: String,
    /// Tags as a JSON array string.
    pub tags: String,
    /// Notes, empty when absent.
    pub notes: String,
    /// Weight, 0 when absent.
    pub weight: f64,
    /// Publication status.
    pub status: String,
    /// Creation timestamp as ISO-8601 with a `Z` suffix, or NULL.
    pub created_at: Option<String>,
    /// Update timestamp as ISO-8601 with a `Z` suffix, or NULL.
    pub updated_at: Option<String>,
}

impl Relation {
    /// Transform the wire record into the destination tuple.
    #[must_use]
    pub fn into_values(self) -> RelationValues {
        RelationValues {
            id: self.id,
            from_id: self.from_id,
            to_id: self.to_id,
            types: transform::array_to_json(self.types.as_deref()),
            tags: transform::array_to_json(self.tags.as_deref()),
            notes: transform::text_or_empty(self.notes),
            weight: transform::weight_or_zero(self.weight),
            status: self.status,
            created_at: transform::timestamp_to_iso(self.created_at),
            updated_at: transform::timestamp_to_iso(self.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_entry() -> Entry {
        Entry {
            id: 42,
            guid: Uuid::nil(),
            content: Some(vec!["नमस्ते".to_string(), "hello".to_string()]),
            initial: None,
            weight: None,
            tokens: Some("'hello':1 'नमस्ते':2".to_string()),
            lang: "hindi".to_string(),
            tags: None,
            phones: Some(vec!["nəməste".to_string()]),
            notes: None,
            meta: None,
            status: "enabled".to_string(),
            created_at: Some(Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap()),
            updated_at: None,
        }
    }

    #[test]
    fn test_entry_into_values_applies_defaults() {
        let values = sample_entry().into_values();

        assert_eq!(values.id, 42);
        assert_eq!(values.guid, "00000000-0000-0000-0000-000000000000");
        assert_eq!(values.content, r#"["नमस्ते","hello"]"#);
        assert_eq!(values.initial, "");
        assert_eq!(values.weight, 0.0);
        assert_eq!(values.tokens, "hello नमस्ते");
        assert_eq!(values.tags, "[]");
        assert_eq!(values.phones, r#"["nəməste"]"#);
        assert_eq!(values.notes, "");
        assert_eq!(values.meta, "{}");
        assert_eq!(values.created_at.as_deref(), Some("2023-06-01T12:00:00Z"));
        assert_eq!(values.updated_at, None);
    }

    #[test]
    fn test_relation_into_values() {
        let relation = Relation {
            id: 7,
            from_id: 1,
            to_id: 2,
            types: Some(vec!["synonym".to_string()]),
            tags: None,
            notes: Some("see also".to_string()),
            weight: Some(1.5),
            status: "enabled".to_string(),
            created_at: None,
            updated_at: None,
        };

        let values = relation.into_values();
        assert_eq!(values.id, 7);
        assert_eq!(values.from_id, 1);
        assert_eq!(values.to_id, 2);
        assert_eq!(values.types, r#"["synonym"]"#);
        assert_eq!(values.tags, "[]");
        assert_eq!(values.notes, "see also");
        assert_eq!(values.weight, 1.5);
        assert_eq!(values.created_at, None);
    }
}
