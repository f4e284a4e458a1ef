pub mod health;
pub mod operation;

use std::ops::ControlFlow;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{request::Parts, Uri},
    routing::{get, on},
    Router,
};
use bytes::Bytes;

use crate::binding::json_body;
use crate::binding::path::path_param;
use crate::binding::query::QueryArgs;
use crate::errors::AppError;
use crate::handlers::{ApiHandler, HandlerResult};
use crate::middleware::{Middleware, MiddlewareChain};
use crate::models::search::JobSearchParams;
use crate::state::AppState;

use self::operation::Operation;

/// How the generated routes are mounted.
#[derive(Clone, Default)]
pub struct ServerOptions {
    /// Prefix for every operation route, e.g. `/api/v1`. Empty mounts at the root.
    pub base_url: String,
    /// Run in order for every operation, after parameter binding.
    pub middlewares: Vec<Arc<dyn Middleware>>,
}

/// Runs the middleware chain; a short-circuit becomes the handler's response.
macro_rules! admit {
    ($state:expr, $op:expr, $parts:expr) => {
        match $state.middleware.admit($op, &$parts).await {
            ControlFlow::Continue(ctx) => ctx,
            ControlFlow::Break(response) => return Ok(response),
        }
    };
}

/// Binds path and query parameters, runs the middleware chain, decodes the body
/// and calls the handler, in that order. The first failure ends the request.
async fn dispatch(op: Operation, state: AppState, parts: Parts, body: Bytes) -> HandlerResult {
    let handler = &state.handler;

    match op {
        Operation::DeleteJobApplication => {
            let id = path_param(&parts, "id")?;
            let ctx = admit!(state, op, parts);
            handler.delete_job_application(ctx, id).await
        }
        Operation::ModifyJobApplication => {
            let id = path_param(&parts, "id")?;
            let ctx = admit!(state, op, parts);
            let application = json_body(&body)?;
            handler.modify_job_application(ctx, id, application).await
        }
        Operation::ListOrSearchJobs => {
            let params = JobSearchParams::bind(&QueryArgs::parse(parts.uri.query()))?;
            let ctx = admit!(state, op, parts);
            handler.list_or_search_jobs(ctx, params).await
        }
        Operation::CreateJob => {
            let ctx = admit!(state, op, parts);
            let job = json_body(&body)?;
            handler.create_job(ctx, job).await
        }
        Operation::DeleteJob => {
            let id = path_param(&parts, "id")?;
            let ctx = admit!(state, op, parts);
            handler.delete_job(ctx, id).await
        }
        Operation::ViewJob => {
            let id = path_param(&parts, "id")?;
            let ctx = admit!(state, op, parts);
            handler.view_job(ctx, id).await
        }
        Operation::ModifyJob => {
            let id = path_param(&parts, "id")?;
            let ctx = admit!(state, op, parts);
            let job = json_body(&body)?;
            handler.modify_job(ctx, id, job).await
        }
        Operation::ViewApplicationsForJob => {
            let id = path_param(&parts, "id")?;
            let ctx = admit!(state, op, parts);
            handler.view_applications_for_job(ctx, id).await
        }
        Operation::CreateJobApplication => {
            let id = path_param(&parts, "id")?;
            let ctx = admit!(state, op, parts);
            let application = json_body(&body)?;
            handler.create_job_application(ctx, id, application).await
        }
        Operation::StartSession => {
            let ctx = admit!(state, op, parts);
            let login = json_body(&body)?;
            handler.start_session(ctx, login).await
        }
        Operation::RegisterUser => {
            let ctx = admit!(state, op, parts);
            let user = json_body(&body)?;
            handler.register_user(ctx, user).await
        }
        Operation::DeleteUser => {
            let id = path_param(&parts, "id")?;
            let ctx = admit!(state, op, parts);
            handler.delete_user(ctx, id).await
        }
        Operation::ViewUser => {
            let id = path_param(&parts, "id")?;
            let ctx = admit!(state, op, parts);
            handler.view_user(ctx, id).await
        }
        Operation::ModifyUser => {
            let id = path_param(&parts, "id")?;
            let ctx = admit!(state, op, parts);
            let user = json_body(&body)?;
            handler.modify_user(ctx, id, user).await
        }
        Operation::ViewApplicationsForUser => {
            let id = path_param::<i64>(&parts, "id")?;
            let ctx = admit!(state, op, parts);
            handler.view_applications_for_user(ctx, id).await
        }
        Operation::ListJobsForUser => {
            let id = path_param(&parts, "id")?;
            let ctx = admit!(state, op, parts);
            handler.list_jobs_for_user(ctx, id).await
        }
    }
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

pub fn build_router(handler: Arc<dyn ApiHandler>, options: ServerOptions) -> Router {
    let base_url = options.base_url.trim_end_matches('/');
    let state = AppState {
        handler,
        middleware: MiddlewareChain::new(options.middlewares),
    };

    // Operations sharing a path merge into one method router; other methods get 405.
    let api = Operation::ALL.into_iter().fold(Router::new(), |router, op| {
        router.route(
            &op.route(base_url),
            on(
                op.method_filter(),
                move |State(state): State<AppState>, parts: Parts, body: Bytes| {
                    dispatch(op, state, parts, body)
                },
            ),
        )
    });

    api.route("/health", get(health::health_handler))
        .route("/openapi.json", get(health::serve_openapi))
        .fallback(not_found)
        .with_state(state)
}
