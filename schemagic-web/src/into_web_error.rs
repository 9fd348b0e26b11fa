//! Map custom errors to WebError in handlers.

use crate::WebError;

/// Convert any error to WebError. Use in handlers: `.map_err(IntoWebError::into_web_error)`.
/// The resulting error answers with status 500.
pub trait IntoWebError {
    fn into_web_error(self) -> WebError;
}

impl<E: std::error::Error + Send + Sync + 'static> IntoWebError for E {
    fn into_web_error(self) -> WebError {
        WebError::Handler(self.to_string())
    }
}
