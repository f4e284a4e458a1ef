//! The handler interface: one method per API operation.
//!
//! Route wrappers bind parameters and bodies, run the middleware chain, then call
//! exactly one of these methods with typed arguments.

pub mod echo;

use async_trait::async_trait;
use axum::response::Response;

use crate::errors::AppError;
use crate::middleware::RequestContext;
use crate::models::application::JobApplication;
use crate::models::job::Job;
use crate::models::search::JobSearchParams;
use crate::models::user::{StartSessionRequest, User};

pub type HandlerResult = Result<Response, AppError>;

#[async_trait]
pub trait ApiHandler: Send + Sync {
    /// DELETE /job-applications/{id}
    async fn delete_job_application(&self, ctx: RequestContext, id: String) -> HandlerResult;

    /// PUT /job-applications/{id}
    async fn modify_job_application(
        &self,
        ctx: RequestContext,
        id: String,
        application: JobApplication,
    ) -> HandlerResult;

    /// GET /jobs
    async fn list_or_search_jobs(
        &self,
        ctx: RequestContext,
        params: JobSearchParams,
    ) -> HandlerResult;

    /// POST /jobs
    async fn create_job(&self, ctx: RequestContext, job: Job) -> HandlerResult;

    /// DELETE /jobs/{id}
    async fn delete_job(&self, ctx: RequestContext, id: String) -> HandlerResult;

    /// GET /jobs/{id}
    async fn view_job(&self, ctx: RequestContext, id: String) -> HandlerResult;

    /// PUT /jobs/{id}
    async fn modify_job(&self, ctx: RequestContext, id: String, job: Job) -> HandlerResult;

    /// GET /jobs/{id}/job-applications
    async fn view_applications_for_job(&self, ctx: RequestContext, id: String) -> HandlerResult;

    /// POST /jobs/{id}/job-applications
    async fn create_job_application(
        &self,
        ctx: RequestContext,
        id: String,
        application: JobApplication,
    ) -> HandlerResult;

    /// POST /sessions
    async fn start_session(&self, ctx: RequestContext, login: StartSessionRequest)
        -> HandlerResult;

    /// POST /users
    async fn register_user(&self, ctx: RequestContext, user: User) -> HandlerResult;

    /// DELETE /users/{id}
    async fn delete_user(&self, ctx: RequestContext, id: String) -> HandlerResult;

    /// GET /users/{id}
    async fn view_user(&self, ctx: RequestContext, id: String) -> HandlerResult;

    /// PUT /users/{id}
    async fn modify_user(&self, ctx: RequestContext, id: String, user: User) -> HandlerResult;

    /// GET /users/{id}/job-applications
    async fn view_applications_for_user(&self, ctx: RequestContext, id: i64) -> HandlerResult;

    /// GET /users/{id}/jobs
    async fn list_jobs_for_user(&self, ctx: RequestContext, id: String) -> HandlerResult;
}
