use anyhow::Result;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

/// Transport used by configs and variables to reach the service.
///
/// Implementations perform exactly one request per call and report
/// HTTP 404 / 409 as [`ApiError::NotFound`](crate::ApiError::NotFound) /
/// [`ApiError::Conflict`](crate::ApiError::Conflict) so callers can
/// recover them with `downcast_ref`. Every other failure is returned as is.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Sends `method` to the resource `path` (e.g. `/projects/p/configs/c`)
    /// and returns the decoded JSON body.
    async fn api_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        query: &[(&str, String)],
    ) -> Result<Value>;
}
