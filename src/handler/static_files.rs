//! Static resource serving
//!
//! Runs a route's cache policy against its accessor and turns the decision,
//! or the failure, into a response.

use crate::config::Route;
use crate::http::{self, ConditionalRequest, ResponseBody};
use crate::logger;
use crate::resource::ResourceError;
use hyper::Response;

/// Serve resource `id` through `route`
pub async fn serve_resource(
    route: &Route,
    id: &str,
    conditional: &ConditionalRequest,
    is_head: bool,
) -> Response<ResponseBody> {
    match route
        .policy
        .evaluate(&route.accessor, id, conditional)
        .await
    {
        Ok(decision) => {
            logger::log_debug(&format!(
                "route '{}' id '{id}': {} (validator: {:?})",
                route.prefix,
                decision.outcome.status(),
                decision.validator
            ));
            http::build_decision_response(decision, is_head)
        }
        Err(err) => {
            match &err {
                ResourceError::NotFound(_) => logger::log_debug(&err.to_string()),
                ResourceError::Io { .. } => logger::log_error(&err.to_string()),
            }
            http::build_error_response(&err)
        }
    }
}
