//! Assemble URLs from discrete components.
//!
//! `build_url` is pure: no validation, no I/O. Components that are absent
//! render as empty strings, so a missing query or fragment never leaves a
//! stray `?`/`#` (or a placeholder word) behind.

use url::form_urlencoded;

/// Schemes whose URLs carry a `//netloc` part even when the netloc is empty.
const NETLOC_SCHEMES: &[&str] = &[
    "ftp", "http", "gopher", "nntp", "telnet", "imap", "wais", "file", "mms", "https",
    "shttp", "snews", "prospero", "rtsp", "rtspu", "rsync", "svn", "svn+ssh", "sftp", "nfs",
    "git", "git+ssh", "ws", "wss",
];

/// Hierarchical path, either as segments to join with `/` or a ready string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlPath {
    Segments(Vec<String>),
    Raw(String),
}

impl UrlPath {
    pub fn segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        UrlPath::Segments(segments.into_iter().map(Into::into).collect())
    }

    pub fn render(&self) -> String {
        match self {
            UrlPath::Segments(segments) => segments.join("/"),
            UrlPath::Raw(raw) => raw.clone(),
        }
    }
}

impl From<&str> for UrlPath {
    fn from(raw: &str) -> Self {
        UrlPath::Raw(raw.to_string())
    }
}

impl From<String> for UrlPath {
    fn from(raw: String) -> Self {
        UrlPath::Raw(raw)
    }
}

impl From<Vec<String>> for UrlPath {
    fn from(segments: Vec<String>) -> Self {
        UrlPath::Segments(segments)
    }
}

/// Query component: key/value pairs to form-encode, or a verbatim string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlQuery {
    Pairs(Vec<(String, String)>),
    Raw(String),
}

impl UrlQuery {
    pub fn pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        UrlQuery::Pairs(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn render(&self) -> String {
        match self {
            UrlQuery::Pairs(pairs) => form_urlencoded::Serializer::new(String::new())
                .extend_pairs(pairs.iter())
                .finish(),
            UrlQuery::Raw(raw) => raw.clone(),
        }
    }
}

impl From<&str> for UrlQuery {
    fn from(raw: &str) -> Self {
        UrlQuery::Raw(raw.to_string())
    }
}

impl From<String> for UrlQuery {
    fn from(raw: String) -> Self {
        UrlQuery::Raw(raw)
    }
}

/// The pieces a URL is assembled from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlComponents {
    pub scheme: String,
    pub network_location: String,
    pub path: Option<UrlPath>,
    pub query: Option<UrlQuery>,
    pub fragment: Option<String>,
}

impl UrlComponents {
    /// Components for `https://{network_location}` with nothing else set.
    pub fn new(network_location: impl Into<String>) -> Self {
        Self {
            scheme: "https".to_string(),
            network_location: network_location.into(),
            path: None,
            query: None,
            fragment: None,
        }
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
}

/// Render `components` as a URL string.
pub fn build_url(components: &UrlComponents) -> String {
    let scheme = components.scheme.as_str();
    let netloc = components.network_location.as_str();
    let path = components
        .path
        .as_ref()
        .map(UrlPath::render)
        .unwrap_or_default();
    let query = components
        .query
        .as_ref()
        .map(UrlQuery::render)
        .unwrap_or_default();
    let fragment = components.fragment.as_deref().unwrap_or_default();

    let mut url = path;
    let wants_netloc =
        !scheme.is_empty() && NETLOC_SCHEMES.contains(&scheme) && !url.starts_with("//");
    if !netloc.is_empty() || wants_netloc {
        if !url.is_empty() && !url.starts_with('/') {
            url.insert(0, '/');
        }
        url = format!("//{netloc}{url}");
    }
    if !scheme.is_empty() {
        url = format!("{scheme}:{url}");
    }
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query);
    }
    if !fragment.is_empty() {
        url.push('#');
        url.push_str(fragment);
    }
    url
}
