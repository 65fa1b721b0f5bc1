use time::OffsetDateTime;
use tracing::debug;

use super::{Db, DbError, DbResult, RevokedToken};

impl Db {
    /// Add a refresh token to the revoked set. Revoking twice is an error.
    pub async fn revoke_token(&self, token: &str) -> DbResult<()> {
        self.update(|doc| {
            if doc.revoked_tokens.contains_key(token) {
                return Err(DbError::AlreadyRevoked);
            }
            doc.revoked_tokens.insert(
                token.to_owned(),
                RevokedToken { revoked_at: OffsetDateTime::now_utc() },
            );
            debug!(revoked = doc.revoked_tokens.len(), "token revoked");
            Ok(())
        })
        .await
    }

    pub async fn is_token_revoked(&self, token: &str) -> DbResult<bool> {
        self.read(|doc| Ok(doc.revoked_tokens.contains_key(token)))
            .await
    }
}
