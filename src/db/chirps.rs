use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::{Chirp, Db, DbError, DbResult};

/// Maximum chirp body length, in bytes.
pub const MAX_CHIRP_LENGTH: usize = 140;

const MASK: &str = "****";

/// Mask banned words. Matching is case-insensitive and whole-word only, so
/// "Kerfuffle!" is masked but "kerfuffled" is left alone.
pub fn clean_body(body: &str) -> String {
    lazy_static! {
        static ref BANNED_RE: Regex = Regex::new(r"(?i)\b(?:kerfuffle|sharbert|fornax)\b").unwrap();
    }
    BANNED_RE.replace_all(body, MASK).into_owned()
}

impl Db {
    pub async fn create_chirp(&self, body: &str, author_id: i64) -> DbResult<Chirp> {
        if body.len() > MAX_CHIRP_LENGTH {
            return Err(DbError::Validation("Chirp is too long".into()));
        }
        let body = clean_body(body);

        self.update(|doc| {
            let chirp = Chirp {
                id: doc.next_chirp_id(),
                body,
                author_id,
            };
            doc.chirps.insert(chirp.id, chirp.clone());
            debug!(chirp_id = chirp.id, author_id, "chirp created");
            Ok(chirp)
        })
        .await
    }

    /// All chirps, ascending by id.
    pub async fn get_chirps(&self) -> DbResult<Vec<Chirp>> {
        // BTreeMap iteration is already ordered by id.
        self.read(|doc| Ok(doc.chirps.values().cloned().collect()))
            .await
    }

    pub async fn get_chirp(&self, id: i64) -> DbResult<Chirp> {
        self.read(|doc| doc.chirps.get(&id).cloned().ok_or(DbError::NotFound("chirp")))
            .await
    }

    /// Remove a chirp. Absent ids are a no-op; authorship is the caller's job.
    pub async fn delete_chirp(&self, id: i64) -> DbResult<()> {
        self.update(|doc| {
            if doc.chirps.remove(&id).is_some() {
                debug!(chirp_id = id, "chirp deleted");
            }
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::temp_db;

    #[test]
    fn masks_banned_words_in_any_case() {
        assert_eq!(
            clean_body("I had something interesting for breakfast"),
            "I had something interesting for breakfast"
        );
        assert_eq!(
            clean_body("I hear Mastodon is better than Chirpy. sharbert I need to migrate"),
            "I hear Mastodon is better than Chirpy. **** I need to migrate"
        );
        assert_eq!(
            clean_body("KERFUFFLE and Fornax and sHaRbErT"),
            "**** and **** and ****"
        );
    }

    #[test]
    fn only_whole_words_are_masked() {
        assert_eq!(clean_body("kerfuffled fornaxes sharberts"), "kerfuffled fornaxes sharberts");
        assert_eq!(clean_body("what a kerfuffle!"), "what a ****!");
        assert_eq!(clean_body("(fornax)"), "(****)");
    }

    #[tokio::test]
    async fn create_rejects_long_bodies_without_persisting() {
        let (_dir, db) = temp_db().await;
        let long = "a".repeat(MAX_CHIRP_LENGTH + 1);

        let err = db.create_chirp(&long, 1).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
        assert!(db.get_chirps().await.unwrap().is_empty());

        let exact = "a".repeat(MAX_CHIRP_LENGTH);
        assert_eq!(db.create_chirp(&exact, 1).await.unwrap().body, exact);
    }

    #[tokio::test]
    async fn length_is_measured_in_bytes() {
        let (_dir, db) = temp_db().await;
        // 71 two-byte chars: 71 characters but 142 bytes.
        let body = "é".repeat(71);
        assert!(db.create_chirp(&body, 1).await.is_err());
    }

    #[tokio::test]
    async fn create_stores_cleaned_body() {
        let (_dir, db) = temp_db().await;
        let chirp = db.create_chirp("this is a Kerfuffle", 7).await.unwrap();
        assert_eq!(chirp.body, "this is a ****");
        assert_eq!(chirp.author_id, 7);
        assert_eq!(db.get_chirp(chirp.id).await.unwrap(), chirp);
    }

    #[tokio::test]
    async fn list_is_sorted_by_id() {
        let (_dir, db) = temp_db().await;
        for i in 0..12 {
            db.create_chirp(&format!("chirp {i}"), 1).await.unwrap();
        }
        let ids: Vec<i64> = db.get_chirps().await.unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, (1..=12).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn delete_is_a_no_op_when_absent() {
        let (_dir, db) = temp_db().await;
        let chirp = db.create_chirp("bye", 1).await.unwrap();

        db.delete_chirp(chirp.id).await.unwrap();
        assert!(matches!(db.get_chirp(chirp.id).await, Err(DbError::NotFound("chirp"))));

        db.delete_chirp(chirp.id).await.unwrap();
    }

    #[tokio::test]
    async fn ids_follow_the_highest_remaining() {
        let (_dir, db) = temp_db().await;
        db.create_chirp("one", 1).await.unwrap();
        let two = db.create_chirp("two", 1).await.unwrap();
        db.delete_chirp(1).await.unwrap();

        let three = db.create_chirp("three", 1).await.unwrap();
        assert_eq!(three.id, two.id + 1);
    }

    #[tokio::test]
    async fn concurrent_creates_get_distinct_sequential_ids() {
        let (_dir, db) = temp_db().await;
        let db = std::sync::Arc::new(db);

        let handles: Vec<_> = (0..24)
            .map(|i| {
                let db = db.clone();
                tokio::spawn(async move { db.create_chirp(&format!("chirp {i}"), 1).await })
            })
            .collect();

        for h in handles {
            h.await.unwrap().unwrap();
        }
        let ids: Vec<i64> = db.get_chirps().await.unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, (1..=24).collect::<Vec<_>>());
    }
}
