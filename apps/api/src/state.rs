use std::sync::Arc;

use crate::handlers::ApiHandler;
use crate::middleware::MiddlewareChain;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Receives every operation once its parameters, middleware and body have passed.
    pub handler: Arc<dyn ApiHandler>,
    pub middleware: MiddlewareChain,
}
