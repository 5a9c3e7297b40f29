//! In-memory [`Connection`] replaying canned responses and recording requests.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::error::ApiError;
use super::traits::Connection;

#[derive(Debug, Clone)]
pub enum StubResponse {
    Ok(Value),
    NotFound,
    Conflict,
    Fail(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub query: Vec<(String, String)>,
}

/// Answers requests with `responses` in order; once exhausted every request
/// fails with not-found.
#[derive(Debug, Default)]
pub struct StubConnection {
    responses: Mutex<VecDeque<StubResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl StubConnection {
    pub fn new(responses: Vec<StubResponse>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn with_json(responses: Vec<Value>) -> Arc<Self> {
        Self::new(responses.into_iter().map(StubResponse::Ok).collect())
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Connection for StubConnection {
    async fn api_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        query: &[(&str, String)],
    ) -> Result<Value> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            path: path.to_string(),
            body: body.cloned(),
            query: query
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
        });

        let response = self.responses.lock().unwrap().pop_front();
        match response {
            Some(StubResponse::Ok(value)) => Ok(value),
            Some(StubResponse::Conflict) => Err(ApiError::Conflict {
                path: path.to_string(),
            }
            .into()),
            Some(StubResponse::Fail(message)) => Err(anyhow::anyhow!(message)),
            Some(StubResponse::NotFound) | None => Err(ApiError::NotFound {
                path: path.to_string(),
            }
            .into()),
        }
    }
}
