//! Placeholder implementation of every operation.
//!
//! Path operations echo the bound id, the search echoes its bound parameters and
//! body-only operations acknowledge with their operation id. Registration is the
//! one operation that reaches storage.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{response::IntoResponse, Json};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::errors::AppError;
use crate::handlers::{ApiHandler, HandlerResult};
use crate::middleware::RequestContext;
use crate::models::application::JobApplication;
use crate::models::job::Job;
use crate::models::search::JobSearchParams;
use crate::models::user::{StartSessionRequest, User};
use crate::repository::UserStore;

#[derive(Clone)]
pub struct EchoHandler {
    users: Arc<dyn UserStore>,
}

impl EchoHandler {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }
}

fn echo_id(ctx: &RequestContext, id: impl Serialize) -> HandlerResult {
    debug!(operation = ctx.operation.operation_id(), "Echoing path id");
    Ok(Json(json!({ "id": id })).into_response())
}

fn acknowledge(ctx: &RequestContext) -> HandlerResult {
    Ok(Json(json!({ "id": ctx.operation.operation_id() })).into_response())
}

fn check_window(job: &Job) -> Result<(), AppError> {
    if job.has_valid_window() {
        Ok(())
    } else {
        Err(AppError::Validation(
            "start_time must not be after end_time".to_string(),
        ))
    }
}

#[async_trait]
impl ApiHandler for EchoHandler {
    async fn delete_job_application(&self, ctx: RequestContext, id: String) -> HandlerResult {
        echo_id(&ctx, id)
    }

    async fn modify_job_application(
        &self,
        ctx: RequestContext,
        id: String,
        _application: JobApplication,
    ) -> HandlerResult {
        echo_id(&ctx, id)
    }

    async fn list_or_search_jobs(
        &self,
        _ctx: RequestContext,
        params: JobSearchParams,
    ) -> HandlerResult {
        Ok(Json(json!({ "params": params })).into_response())
    }

    async fn create_job(&self, ctx: RequestContext, job: Job) -> HandlerResult {
        check_window(&job)?;
        acknowledge(&ctx)
    }

    async fn delete_job(&self, ctx: RequestContext, id: String) -> HandlerResult {
        echo_id(&ctx, id)
    }

    async fn view_job(&self, ctx: RequestContext, id: String) -> HandlerResult {
        echo_id(&ctx, id)
    }

    async fn modify_job(&self, ctx: RequestContext, id: String, job: Job) -> HandlerResult {
        check_window(&job)?;
        echo_id(&ctx, id)
    }

    async fn view_applications_for_job(&self, ctx: RequestContext, id: String) -> HandlerResult {
        echo_id(&ctx, id)
    }

    async fn create_job_application(
        &self,
        ctx: RequestContext,
        id: String,
        _application: JobApplication,
    ) -> HandlerResult {
        echo_id(&ctx, id)
    }

    async fn start_session(
        &self,
        ctx: RequestContext,
        _login: StartSessionRequest,
    ) -> HandlerResult {
        acknowledge(&ctx)
    }

    async fn register_user(&self, ctx: RequestContext, user: User) -> HandlerResult {
        self.users.insert_user(&user).await?;
        acknowledge(&ctx)
    }

    async fn delete_user(&self, ctx: RequestContext, id: String) -> HandlerResult {
        echo_id(&ctx, id)
    }

    async fn view_user(&self, ctx: RequestContext, id: String) -> HandlerResult {
        echo_id(&ctx, id)
    }

    async fn modify_user(&self, ctx: RequestContext, id: String, _user: User) -> HandlerResult {
        echo_id(&ctx, id)
    }

    async fn view_applications_for_user(&self, ctx: RequestContext, id: i64) -> HandlerResult {
        echo_id(&ctx, id)
    }

    async fn list_jobs_for_user(&self, ctx: RequestContext, id: String) -> HandlerResult {
        echo_id(&ctx, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::memory::InMemoryUserStore;
    use crate::routes::operation::Operation;
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use serde_json::Value;

    fn handler() -> (EchoHandler, Arc<InMemoryUserStore>) {
        let store = Arc::new(InMemoryUserStore::default());
        (EchoHandler::new(store.clone()), store)
    }

    async fn body(result: HandlerResult) -> (StatusCode, Value) {
        let response = result.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_view_job_echoes_id() {
        let (handler, _) = handler();
        let ctx = RequestContext::new(Operation::ViewJob);
        let (status, body) = body(handler.view_job(ctx, "j-1".to_string()).await).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "id": "j-1" }));
    }

    #[tokio::test]
    async fn test_user_applications_echo_numeric_id() {
        let (handler, _) = handler();
        let ctx = RequestContext::new(Operation::ViewApplicationsForUser);
        let (_, body) = body(handler.view_applications_for_user(ctx, 9).await).await;
        assert_eq!(body, json!({ "id": 9 }));
    }

    #[tokio::test]
    async fn test_register_user_persists_and_acknowledges() {
        let (handler, store) = handler();
        let user: User = serde_json::from_value(json!({
            "full_name": "Ana Lima",
            "email": "ana@example.com",
            "roles": ["PetSitter"]
        }))
        .unwrap();

        let ctx = RequestContext::new(Operation::RegisterUser);
        let (status, body) = body(handler.register_user(ctx, user.clone()).await).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "id": "RegisterUser" }));
        assert_eq!(store.users(), vec![user]);
    }

    #[tokio::test]
    async fn test_create_job_rejects_inverted_window() {
        let (handler, _) = handler();
        let job: Job = serde_json::from_value(json!({
            "start_time": "2024-05-02T00:00:00Z",
            "end_time": "2024-05-01T00:00:00Z"
        }))
        .unwrap();

        let ctx = RequestContext::new(Operation::CreateJob);
        let err = handler.create_job(ctx, job).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
