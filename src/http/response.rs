//! HTTP response building module
//!
//! Turns cache decisions and resource errors into responses. Bodies are
//! streamed, so every builder returns the boxed [`ResponseBody`].

use crate::cache::{CacheDecision, ValidationOutcome};
use crate::resource::ResourceError;
use futures_util::TryStreamExt;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use hyper::header::{ALLOW, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::Response;
use std::io;

/// Body type shared by every response
pub type ResponseBody = UnsyncBoxBody<Bytes, io::Error>;

pub fn empty_body() -> ResponseBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed_unsync()
}

pub fn text_body(text: &'static str) -> ResponseBody {
    Full::new(Bytes::from_static(text.as_bytes()))
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Build the 200 or 304 response for a cache decision
///
/// `Cache-Control` and the validator header go out on both statuses. For
/// HEAD the body stream is dropped unread.
pub fn build_decision_response(decision: CacheDecision, is_head: bool) -> Response<ResponseBody> {
    let CacheDecision {
        outcome,
        cache_control,
        validator,
    } = decision;

    let mut builder = Response::builder().status(outcome.status());
    if let Some(cache_control) = cache_control {
        builder = builder.header(CACHE_CONTROL, cache_control);
    }
    if let Some(validator) = &validator {
        builder = builder.header(validator.name(), validator.value());
    }

    let body = match outcome {
        ValidationOutcome::Unchanged => empty_body(),
        ValidationOutcome::Fresh { body, content_type } => {
            builder = builder.header(CONTENT_TYPE, content_type);
            if let Some(len) = body.len {
                builder = builder.header(CONTENT_LENGTH, len);
            }
            if is_head {
                empty_body()
            } else {
                // A read error aborts the connection after the partial write
                let frames = body.stream.map_ok(Frame::data).inspect_err(|e| {
                    crate::logger::log_error(&format!("Response body stream failed: {e}"));
                });
                StreamBody::new(frames).boxed_unsync()
            }
        }
    };

    builder.body(body).unwrap_or_else(|e| {
        log_build_error("cached", &e);
        Response::new(empty_body())
    })
}

/// Build the response for a failed resource read
pub fn build_error_response(error: &ResourceError) -> Response<ResponseBody> {
    match error {
        ResourceError::NotFound(_) => build_404_response(),
        ResourceError::Io { .. } => build_500_response(),
    }
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<ResponseBody> {
    build_text_response(404, "404 Not Found")
}

/// Build 500 Internal Server Error response
pub fn build_500_response() -> Response<ResponseBody> {
    build_text_response(500, "500 Internal Server Error")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<ResponseBody> {
    let mut response = build_text_response(405, "405 Method Not Allowed");
    response
        .headers_mut()
        .insert(ALLOW, hyper::header::HeaderValue::from_static("GET, HEAD"));
    response
}

fn build_text_response(status: u16, text: &'static str) -> Response<ResponseBody> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain")
        .header(CONTENT_LENGTH, text.len())
        .body(text_body(text))
        .unwrap_or_else(|e| {
            log_build_error(&status.to_string(), &e);
            Response::new(text_body(text))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
