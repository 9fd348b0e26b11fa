//! Schemagic web: JSON endpoints whose request and response bodies are validated against schemas.
//! Transport-agnostic: an HTTP server passes (method, path, body) in and writes the Response out.

pub mod into_web_error;
pub mod registry;
pub mod router;
pub mod service;

pub use into_web_error::IntoWebError;
pub use registry::{Module, ServiceDefinition, ServiceRegistry};
pub use router::{RouteId, Router};
pub use schemagic_core::{Args, Schema, ValidationConfig, ValidationError, Value};
pub use service::{Endpoint, Handler, Service};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WebError {
    #[error("route not found: {0}")]
    NotFound(String),
    #[error("route already registered: {0}")]
    DuplicateRoute(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("handler error: {0}")]
    Handler(String),
}

impl WebError {
    /// Input-side validation failures are client errors; everything else the endpoint could
    /// not handle, undecodable bodies included, is a server error.
    pub fn status_code(&self) -> u16 {
        match self {
            WebError::NotFound(_) => 404,
            WebError::Validation(e) if e.is_input() => 400,
            _ => 500,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    pub status_code: u16,
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

impl Response {
    pub fn json(status_code: u16, body: Vec<u8>) -> Self {
        Self {
            status_code,
            body,
            content_type: Some("application/json".into()),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}
