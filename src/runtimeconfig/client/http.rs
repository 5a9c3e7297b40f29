use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use reqwest::{Method, StatusCode};
use serde_json::Value;

use super::base::BaseClient;
use crate::runtimeconfig::config::ClientSettings;
use crate::runtimeconfig::error::ApiError;
use crate::runtimeconfig::traits::Connection;

/// [`Connection`] speaking JSON over HTTP to the runtime configuration API.
#[derive(Debug, Clone)]
pub struct HttpConnection {
    base: BaseClient,
}

impl HttpConnection {
    pub fn new(settings: ClientSettings) -> Result<Self> {
        Ok(Self {
            base: BaseClient::new(settings)?,
        })
    }

    pub fn base(&self) -> &BaseClient {
        &self.base
    }
}

/// The service reports failures as `{"error": {"code": .., "message": ..}}`.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.chars().take(500).collect())
}

#[async_trait]
impl Connection for HttpConnection {
    async fn api_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        query: &[(&str, String)],
    ) -> Result<Value> {
        debug!("api_request called: {method} {path} query={query:?}");

        let mut request = self.base.base_api(method, path).await?;
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let response_text = response.text().await?;
        debug!("Response status for {path}: {status}");

        match status {
            StatusCode::NOT_FOUND => {
                return Err(ApiError::NotFound {
                    path: path.to_string(),
                }
                .into())
            }
            StatusCode::CONFLICT => {
                return Err(ApiError::Conflict {
                    path: path.to_string(),
                }
                .into())
            }
            status if !status.is_success() => {
                return Err(ApiError::Status {
                    status: status.as_u16(),
                    message: error_message(&response_text),
                }
                .into())
            }
            _ => {}
        }

        if response_text.trim().is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }

        match serde_json::from_str(&response_text) {
            Ok(value) => Ok(value),
            Err(e) => {
                log::error!("Failed to decode response for {path}. Error: {e}");
                log::error!(
                    "Response body (first 500 chars): {}",
                    &response_text.chars().take(500).collect::<String>()
                );
                Err(anyhow::anyhow!(
                    "Failed to decode response: {e}. Check debug log for response body."
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtimeconfig::config::{Auth, TokenCmd};
    use mockito::{Matcher, Server};
    use serde_json::json;

    const VARIABLE_PATH: &str = "/projects/p/configs/c/variables/v";

    fn get_test_connection(server: &Server) -> HttpConnection {
        HttpConnection::new(ClientSettings {
            endpoint: server.url(),
            auth: Auth::Anonymous,
            ..ClientSettings::new()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_get_decodes_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v1beta1/projects/p/configs/c/variables/v")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "projects/p/configs/c/variables/v", "text": "hello"}"#)
            .create_async()
            .await;

        let connection = get_test_connection(&server);
        let value = connection
            .api_request(Method::GET, VARIABLE_PATH, None, &[])
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(value["text"], "hello");
    }

    #[tokio::test]
    async fn test_query_parameters_are_sent() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v1beta1/projects/p/configs/c/variables/v")
            .match_query(Matcher::UrlEncoded("fields".into(), "name".into()))
            .with_status(200)
            .with_body(r#"{"name": "projects/p/configs/c/variables/v"}"#)
            .create_async()
            .await;

        let connection = get_test_connection(&server);
        connection
            .api_request(
                Method::GET,
                VARIABLE_PATH,
                None,
                &[("fields", "name".to_string())],
            )
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_json_body_and_bearer_token() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta1/projects/p/configs/c/variables")
            .match_header("authorization", "Bearer abc123")
            .match_header("content-type", "application/json")
            .match_header("user-agent", Matcher::Regex("^rtconfig/".to_string()))
            .match_body(Matcher::Json(json!({
                "name": "projects/p/configs/c/variables/v",
                "text": "hello"
            })))
            .with_status(200)
            .with_body(r#"{"name": "projects/p/configs/c/variables/v", "text": "hello", "state": "UPDATED"}"#)
            .create_async()
            .await;

        let connection = HttpConnection::new(ClientSettings {
            endpoint: server.url(),
            auth: Auth::Token(TokenCmd {
                cmd: None,
                token: Some("abc123".to_string()),
            }),
            ..ClientSettings::new()
        })
        .unwrap();

        let body = json!({"name": "projects/p/configs/c/variables/v", "text": "hello"});
        let value = connection
            .api_request(
                Method::POST,
                "/projects/p/configs/c/variables",
                Some(&body),
                &[],
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(value["state"], "UPDATED");
    }

    #[tokio::test]
    async fn test_not_found() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/v1beta1/projects/p/configs/c/variables/v")
            .with_status(404)
            .with_body(r#"{"error": {"code": 404, "message": "not found"}}"#)
            .create_async()
            .await;

        let err = get_test_connection(&server)
            .api_request(Method::GET, VARIABLE_PATH, None, &[])
            .await
            .unwrap_err();

        assert!(ApiError::is_not_found(&err));
    }

    #[tokio::test]
    async fn test_conflict() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v1beta1/projects/p/configs/c/variables")
            .with_status(409)
            .create_async()
            .await;

        let body = json!({"name": "projects/p/configs/c/variables/v", "text": "x"});
        let err = get_test_connection(&server)
            .api_request(
                Method::POST,
                "/projects/p/configs/c/variables",
                Some(&body),
                &[],
            )
            .await
            .unwrap_err();

        assert!(ApiError::is_conflict(&err));
    }

    #[tokio::test]
    async fn test_server_error_carries_message() {
        let mut server = Server::new_async().await;
        server
            .mock("PUT", "/v1beta1/projects/p/configs/c/variables/v")
            .with_status(500)
            .with_body(r#"{"error": {"code": 500, "message": "backend exploded"}}"#)
            .create_async()
            .await;

        let body = json!({"name": "projects/p/configs/c/variables/v", "text": "x"});
        let err = get_test_connection(&server)
            .api_request(Method::PUT, VARIABLE_PATH, Some(&body), &[])
            .await
            .unwrap_err();

        match err.downcast_ref::<ApiError>() {
            Some(ApiError::Status { status, message }) => {
                assert_eq!(*status, 500);
                assert_eq!(message, "backend exploded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_body_is_empty_object() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/v1beta1/projects/p/configs/c")
            .with_status(200)
            .create_async()
            .await;

        let value = get_test_connection(&server)
            .api_request(Method::GET, "/projects/p/configs/c", None, &[])
            .await
            .unwrap();

        assert_eq!(value, json!({}));
    }

    #[tokio::test]
    async fn test_invalid_json_is_an_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/v1beta1/projects/p/configs/c")
            .with_status(200)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let err = get_test_connection(&server)
            .api_request(Method::GET, "/projects/p/configs/c", None, &[])
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Failed to decode response"));
        assert!(err.downcast_ref::<ApiError>().is_none());
    }

    #[test]
    fn test_error_message_falls_back_to_body() {
        assert_eq!(error_message("plain failure"), "plain failure");
        assert_eq!(
            error_message(r#"{"error": {"message": "quota"}}"#),
            "quota"
        );
    }
}
