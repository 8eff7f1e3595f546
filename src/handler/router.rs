//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, route
//! matching, dispatch and access logging.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http::{self, ConditionalRequest, ResponseBody};
use crate::logger::{self, AccessLogEntry};
use hyper::header::{HeaderName, HeaderValue, CONTENT_LENGTH, REFERER, SERVER, USER_AGENT};
use hyper::http::request::Parts;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
///
/// Request bodies are never read; GET and HEAD carry none worth keeping.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible> {
    let started = Instant::now();
    let (parts, _) = req.into_parts();
    let response = route(&parts, &state).await;

    if state.config.logging.access_log {
        logger::log_access(
            &access_entry(&parts, &response, remote_addr, started),
            &state.config.logging.access_log_format,
        );
    }
    Ok(response)
}

/// Produce the response for a request without logging it
pub async fn route(req: &Parts, state: &AppState) -> Response<ResponseBody> {
    let mut response = dispatch(req, state).await;
    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server);
    }
    response
}

async fn dispatch(req: &Parts, state: &AppState) -> Response<ResponseBody> {
    // 1. Only GET and HEAD read resources
    let method = &req.method;
    if method != Method::GET && method != Method::HEAD {
        logger::log_warning(&format!("Method not allowed: {method}"));
        return http::build_405_response();
    }

    // 2. Match route
    let path = req.uri.path();
    let Some((route, id)) = state.match_route(path) else {
        return http::build_404_response();
    };

    // 3. Validate and serve
    let conditional = ConditionalRequest::from_headers(&req.headers);
    static_files::serve_resource(route, id, &conditional, method == Method::HEAD).await
}

fn access_entry(
    req: &Parts,
    response: &Response<ResponseBody>,
    remote_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let header = |name: HeaderName| {
        req.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        remote_addr.ip().to_string(),
        req.method.to_string(),
        req.uri.path().to_string(),
    );
    entry.query = req.uri.query().map(ToString::to_string);
    entry.http_version = format!("{:?}", req.version)
        .trim_start_matches("HTTP/")
        .to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok());
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}
