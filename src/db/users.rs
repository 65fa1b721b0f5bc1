use tracing::debug;

use super::{Db, DbError, DbResult, User};

impl Db {
    /// Insert a new user. Email uniqueness is an exact, case-sensitive match.
    pub async fn create_user(&self, email: &str, hashed_password: &str) -> DbResult<User> {
        self.update(|doc| {
            if doc.users.values().any(|u| u.email == email) {
                return Err(DbError::AlreadyExists("user"));
            }
            let user = User {
                id: doc.next_user_id(),
                email: email.to_owned(),
                hashed_password: hashed_password.to_owned(),
            };
            doc.users.insert(user.id, user.clone());
            debug!(user_id = user.id, "user created");
            Ok(user)
        })
        .await
    }

    pub async fn update_user(
        &self,
        id: i64,
        email: &str,
        hashed_password: &str,
    ) -> DbResult<User> {
        self.update(|doc| {
            if doc.users.values().any(|u| u.id != id && u.email == email) {
                return Err(DbError::AlreadyExists("user"));
            }
            let user = doc.users.get_mut(&id).ok_or(DbError::NotFound("user"))?;
            user.email = email.to_owned();
            user.hashed_password = hashed_password.to_owned();
            Ok(user.clone())
        })
        .await
    }

    pub async fn get_user_by_email(&self, email: &str) -> DbResult<User> {
        self.read(|doc| {
            doc.users
                .values()
                .find(|u| u.email == email)
                .cloned()
                .ok_or(DbError::NotFound("user"))
        })
        .await
    }

    pub async fn get_user(&self, id: i64) -> DbResult<User> {
        self.read(|doc| doc.users.get(&id).cloned().ok_or(DbError::NotFound("user")))
            .await
    }
}
