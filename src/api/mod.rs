//! HTTP handlers.
//!
//! Public pages render HTML; admin mutations redirect back to the dashboard.

mod admin;
mod public;
mod session;

pub use admin::*;
pub use public::*;
pub use session::*;

use axum::response::{IntoResponse, Redirect, Response};

use crate::errors::AppError;
use crate::AppState;

/// Redirect to a path under the public base URL.
pub fn redirect(state: &AppState, path: &str) -> Response {
    Redirect::to(&state.config.url(path)).into_response()
}

/// Swallow validation and not-found failures of an admin mutation.
///
/// The admin form redirects as if the write succeeded; storage errors still propagate.
pub fn lenient<T>(action: &str, result: Result<T, AppError>) -> Result<Option<T>, AppError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_recoverable() => {
            tracing::debug!("Ignored {}: {}", action, e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
