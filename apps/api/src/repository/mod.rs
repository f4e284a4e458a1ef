//! Data access behind the handlers.

pub mod mongo;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::user::User;

/// Storage for registered users. Carried by the handler as `Arc<dyn UserStore>`.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert_user(&self, user: &User) -> Result<(), AppError>;
}
