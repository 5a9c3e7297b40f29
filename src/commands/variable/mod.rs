pub mod exists;
pub mod get;
pub mod list;
pub mod model;
pub mod set;

#[cfg(test)]
pub(crate) mod test_support {
    use anyhow::Result;
    use async_trait::async_trait;
    use reqwest::Method;
    use rtconfig::{Client, Connection};
    use serde_json::Value;
    use std::sync::Arc;

    struct Offline;

    #[async_trait]
    impl Connection for Offline {
        async fn api_request(
            &self,
            _method: Method,
            path: &str,
            _body: Option<&Value>,
            _query: &[(&str, String)],
        ) -> Result<Value> {
            anyhow::bail!("offline: {path}")
        }
    }

    /// Client for project `p` whose connection fails every request.
    pub fn offline_client() -> Client {
        Client::new("p", Arc::new(Offline))
    }
}
