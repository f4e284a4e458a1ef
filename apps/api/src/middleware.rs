//! Per-operation middleware chain and the request context it may enrich.

use std::collections::BTreeMap;
use std::ops::ControlFlow;
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::request::Parts;
use axum::response::Response;
use tracing::debug;

use crate::routes::operation::Operation;

/// Context key under which the session token's granted scopes are stored.
pub const SESSION_TOKEN_SCOPES: &str = "SessionToken.Scopes";

/// Handed to every handler call. Nothing enforces the scopes yet; they start empty
/// and are left for an authentication middleware to fill in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub operation: Operation,
    pub scopes: BTreeMap<&'static str, Vec<String>>,
}

impl RequestContext {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            scopes: BTreeMap::from([(SESSION_TOKEN_SCOPES, Vec::new())]),
        }
    }

    pub fn session_token_scopes(&self) -> &[String] {
        self.scopes
            .get(SESSION_TOKEN_SCOPES)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Runs after parameters are bound and before the request body is read.
/// Returning `Break` ends the request with the given response; the handler never runs.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn handle(&self, ctx: &mut RequestContext, parts: &Parts) -> ControlFlow<Response>;
}

/// Middlewares run in registration order.
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    layers: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    pub fn new(layers: Vec<Arc<dyn Middleware>>) -> Self {
        Self { layers }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub async fn admit(
        &self,
        operation: Operation,
        parts: &Parts,
    ) -> ControlFlow<Response, RequestContext> {
        let mut ctx = RequestContext::new(operation);

        for layer in &self.layers {
            if let ControlFlow::Break(response) = layer.handle(&mut ctx, parts).await {
                debug!(
                    operation = operation.operation_id(),
                    status = response.status().as_u16(),
                    "Request stopped by middleware"
                );
                return ControlFlow::Break(response);
            }
        }

        ControlFlow::Continue(ctx)
    }
}
