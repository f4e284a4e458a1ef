use async_trait::async_trait;
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::user::{Role, User};
use crate::repository::UserStore;

pub const USERS_COLLECTION: &str = "users";

/// Stored shape of a user. Unlike the API model it keeps the credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub full_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub roles: Vec<Role>,
}

impl From<&User> for UserRecord {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            email: user.email.to_string(),
            password: user.password.clone(),
            roles: user.roles.clone(),
        }
    }
}

/// MongoDB-backed user storage.
#[derive(Clone)]
pub struct MongoUserRepository {
    client: Client,
    database: String,
}

impl MongoUserRepository {
    pub fn new(client: Client, database: impl Into<String>) -> Self {
        Self {
            client,
            database: database.into(),
        }
    }

    fn users(&self) -> Collection<UserRecord> {
        self.client
            .database(&self.database)
            .collection(USERS_COLLECTION)
    }
}

#[async_trait]
impl UserStore for MongoUserRepository {
    async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        let result = self.users().insert_one(UserRecord::from(user)).await?;
        info!(id = %result.inserted_id, "User registered");
        Ok(())
    }
}
