use anyhow::{Context, Result};
use log::{debug, info};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Method, NoProxy};
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

use crate::runtimeconfig::config::{expand_env_vars, Auth, ClientSettings, TokenCmd};

static RTCONFIG_USER_AGENT: LazyLock<String> = LazyLock::new(|| {
    let version = env!("CARGO_PKG_VERSION");
    format!("rtconfig/{version}")
});

/// Base HTTP client for the runtime configuration API.
/// Handles authentication and provides base request building functionality.
#[derive(Debug, Clone)]
pub struct BaseClient {
    pub client: reqwest::Client,
    pub settings: ClientSettings,
    base_url: Url,
}

impl BaseClient {
    pub fn new(settings: ClientSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&RTCONFIG_USER_AGENT)?);

        let mut client_builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .use_rustls_tls()
            .default_headers(headers)
            .no_proxy();

        // Configure proxy if specified in settings (takes priority)
        if let Some(proxy_url) = &settings.proxy {
            let proxy_url = expand_env_vars(proxy_url)?;
            let proxy = reqwest::Proxy::all(&proxy_url)
                .with_context(|| format!("Invalid proxy URL: {proxy_url}"))?;
            client_builder = client_builder.proxy(proxy);
            info!("🔀 Using proxy from settings: {proxy_url}");
        } else {
            // Fall back to standard environment variables if no proxy is configured
            let no_proxy = NoProxy::from_env().or_else(|| NoProxy::from_string("localhost,127.0.0.1"));
            if let Ok(http_proxy) = std::env::var("HTTP_PROXY").or_else(|_| std::env::var("http_proxy")) {
                let proxy = reqwest::Proxy::http(&http_proxy)
                    .with_context(|| format!("Invalid HTTP_PROXY: {http_proxy}"))?
                    .no_proxy(no_proxy.clone());
                client_builder = client_builder.proxy(proxy);
                info!("🔀 Using proxy from HTTP_PROXY: {http_proxy}");
            }
            if let Ok(https_proxy) = std::env::var("HTTPS_PROXY").or_else(|_| std::env::var("https_proxy")) {
                let proxy = reqwest::Proxy::https(&https_proxy)
                    .with_context(|| format!("Invalid HTTPS_PROXY: {https_proxy}"))?
                    .no_proxy(no_proxy);
                client_builder = client_builder.proxy(proxy);
                info!("🔀 Using proxy from HTTPS_PROXY: {https_proxy}");
            }
        }

        // Ensure base URL ends with a trailing slash for proper path joining
        let mut endpoint = expand_env_vars(&settings.endpoint)?;
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        let base_url = Url::parse(&endpoint)
            .and_then(|url| url.join(&format!("{}/", settings.api_version.trim_matches('/'))))
            .with_context(|| format!("Invalid endpoint URL: {endpoint}"))?;

        let client = client_builder.build().context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            settings,
            base_url,
        })
    }

    /// The versioned API root, e.g. `https://runtimeconfig.googleapis.com/v1beta1/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a resource path such as `/projects/p/configs/c` against the API root.
    pub fn resource_url(&self, path: &str) -> Result<Url> {
        let url = self.base_url.join(path.trim_start_matches('/'))?;
        Ok(url)
    }

    /// Build a request with authentication for the resource at `path`
    pub async fn base_api(&self, method: Method, path: &str) -> Result<reqwest::RequestBuilder> {
        let url = self.resource_url(path)?;
        debug!("🔗 Request URL: {method} {url}");
        let request = self.client.request(method, url);

        match &self.settings.auth {
            Auth::Gcp(auth) => {
                debug!("🔑 GCP Application Default Credentials");
                let token = auth.token().await?;
                Ok(request.bearer_auth(token))
            }
            Auth::Token(token) => {
                debug!("🔑 Token Auth: {:?}", token.cmd);
                let token = resolve_token(token).await?;
                Ok(request.bearer_auth(token))
            }
            Auth::Anonymous => Ok(request),
        }
    }
}

/// Produces the bearer token for [`Auth::Token`], running the helper command
/// when one is configured.
async fn resolve_token(token: &TokenCmd) -> Result<String> {
    if let Some(cmd) = &token.cmd {
        let output = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(cmd)
            .output()
            .await
            .context("Failed to run token helper command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            return Err(anyhow::anyhow!(
                "Token helper command failed with exit code {:?}\nstdout: {}\nstderr: {}",
                output.status.code(),
                stdout,
                stderr
            ));
        }

        let token = String::from_utf8(output.stdout)
            .context("Token helper returned invalid UTF-8")?
            .trim()
            .replace('"', "");
        return Ok(token);
    }

    if let Some(token) = &token.token {
        return expand_env_vars(token.trim());
    }
    Err(anyhow::anyhow!("Token not found"))
}
