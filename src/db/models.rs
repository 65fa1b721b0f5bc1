use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// User record in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub hashed_password: String, // argon2 PHC string, never returned to clients
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chirp {
    pub id: i64,
    pub body: String,
    pub author_id: i64,
}

/// Marks a refresh token as no longer honored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokedToken {
    #[serde(with = "time::serde::rfc3339")]
    pub revoked_at: OffsetDateTime,
}

/// Whole persisted state, read and written as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub users: BTreeMap<i64, User>,
    #[serde(default)]
    pub chirps: BTreeMap<i64, Chirp>,
    #[serde(default)]
    pub revoked_tokens: BTreeMap<String, RevokedToken>,
}

impl Document {
    pub fn next_user_id(&self) -> i64 {
        next_id(&self.users)
    }

    pub fn next_chirp_id(&self) -> i64 {
        next_id(&self.chirps)
    }
}

// Keys are kept sorted, so the last one is the maximum.
fn next_id<V>(map: &BTreeMap<i64, V>) -> i64 {
    map.keys().next_back().map_or(1, |max| max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_id_starts_at_one_and_follows_max() {
        let mut doc = Document::default();
        assert_eq!(doc.next_chirp_id(), 1);

        for id in [1, 2, 7] {
            doc.chirps.insert(
                id,
                Chirp { id, body: "hi".into(), author_id: 1 },
            );
        }
        doc.chirps.remove(&2);
        assert_eq!(doc.next_chirp_id(), 8);
        assert_eq!(doc.next_user_id(), 1);
    }

    #[test]
    fn missing_sections_deserialize_as_empty() {
        let doc: Document = serde_json::from_str(r#"{"chirps":{}}"#).unwrap();
        assert!(doc.users.is_empty());
        assert!(doc.revoked_tokens.is_empty());
    }

    #[test]
    fn document_keys_serialize_as_strings() {
        let mut doc = Document::default();
        doc.users.insert(
            3,
            User { id: 3, email: "a@b.com".into(), hashed_password: "h".into() },
        );
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["users"]["3"]["email"], "a@b.com");

        let back: Document = serde_json::from_value(json).unwrap();
        assert_eq!(back, doc);
    }
}
