//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, static file
//! dispatch, error mapping and header injection.

use crate::config::AppState;
use crate::error::ServeError;
use crate::handler::static_files;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

/// Main entry point for HTTP request handling
///
/// Never fails: per-request errors become HTTP statuses, and the configured
/// extra headers are appended whatever the status.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method();
    let is_head = *method == Method::HEAD;

    let mut response = match *method {
        Method::GET | Method::HEAD => {
            serve_static(&state, req.uri().path(), req.uri().query(), is_head).await
        }
        Method::OPTIONS => http::build_options_response(),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            http::build_405_response()
        }
    };

    state.headers.apply(&mut response);
    Ok(response)
}

async fn serve_static(
    state: &AppState,
    path: &str,
    query: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    match static_files::serve(state, path, query, is_head).await {
        Ok(response) => response,
        Err(err) => {
            if let ServeError::Io(ref e) = err {
                logger::log_error(&format!("Failed to read '{path}': {e}"));
            } else {
                logger::log_debug(&format!("{path}: {err}"));
            }
            http::build_error_response(err.status(), is_head)
        }
    }
}
