//! Single-shot HTTP calls against either a complete URL or URL components.
//!
//! A [`CallRequest`] describes one request. [`make_call`] resolves its target,
//! sends it once through the given `reqwest::Client` and hands back the raw
//! response. Status codes are left for the caller to judge.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Response};
use tracing::debug;

use crate::error::{Error, Result};
use crate::url_builder::{build_url, UrlComponents, UrlPath, UrlQuery};

/// Body sent with the request.
#[derive(Debug, Clone)]
pub enum RequestBody {
    Form(Vec<(String, String)>),
    Json(serde_json::Value),
    Raw(Vec<u8>),
}

/// Options handed to the transport as-is. Nothing is set unless asked for.
#[derive(Debug, Clone, Default)]
pub struct TransportOptions {
    pub timeout: Option<Duration>,
}

/// Everything needed to issue one HTTP request.
#[derive(Debug, Clone)]
pub struct CallRequest {
    pub method: Method,
    pub url: Option<String>,
    pub network_location: Option<String>,
    pub scheme: String,
    pub path: Option<UrlPath>,
    pub query: Option<UrlQuery>,
    pub fragment: Option<String>,
    pub params: Vec<(String, String)>,
    pub body: Option<RequestBody>,
    pub headers: HeaderMap,
    pub transport: TransportOptions,
}

impl CallRequest {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            url: None,
            network_location: None,
            scheme: "https".to_string(),
            path: None,
            query: None,
            fragment: None,
            params: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
            transport: TransportOptions::default(),
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    /// Complete URL; when set, every URL component field is ignored.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn network_location(mut self, network_location: impl Into<String>) -> Self {
        self.network_location = Some(network_location.into());
        self
    }

    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn path(mut self, path: impl Into<UrlPath>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn query(mut self, query: impl Into<UrlQuery>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = Some(fragment.into());
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.transport.timeout = Some(timeout);
        self
    }

    /// URL components this request would hand to [`build_url`], if any.
    pub fn components(&self) -> Option<UrlComponents> {
        let network_location = self.network_location.as_ref()?;
        Some(UrlComponents {
            scheme: self.scheme.clone(),
            network_location: network_location.clone(),
            path: self.path.clone(),
            query: self.query.clone(),
            fragment: self.fragment.clone(),
        })
    }

    /// The URL this request targets.
    pub fn target(&self) -> Result<String> {
        if let Some(url) = &self.url {
            return Ok(url.clone());
        }
        match self.components() {
            Some(components) => Ok(build_url(&components)),
            None => Err(Error::InvalidArgument(
                "either a url or a network location is required to make a call".to_string(),
            )),
        }
    }
}

/// Client with a `User-Agent`, which the GitHub API rejects requests without.
pub fn build_client() -> Result<Client> {
    Ok(Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// Send `request` once and return the response untouched.
pub async fn make_call(client: &Client, request: CallRequest) -> Result<Response> {
    let target = request.target()?;
    debug!(method = %request.method, url = %target, "Issuing HTTP call");

    let mut builder = client
        .request(request.method, &target)
        .headers(request.headers);
    if !request.params.is_empty() {
        builder = builder.query(&request.params);
    }
    builder = match request.body {
        Some(RequestBody::Form(pairs)) => builder.form(&pairs),
        Some(RequestBody::Json(value)) => builder.json(&value),
        Some(RequestBody::Raw(bytes)) => builder.body(bytes),
        None => builder,
    };
    if let Some(timeout) = request.transport.timeout {
        builder = builder.timeout(timeout);
    }

    let response = builder.send().await?;
    debug!(url = %target, status = %response.status(), "HTTP call completed");
    Ok(response)
}
