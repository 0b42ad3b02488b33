// File: src/client/core.rs
use anyhow::{Context, Result, anyhow};
use http::{Request, Uri};
use http_body_util::BodyExt;
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use std::fmt;
use std::path::PathBuf;

const MAX_REDIRECTS: usize = 5;

type HttpsClient = Client<hyper_rustls::HttpsConnector<HttpConnector>, String>;

/// Where a dataset lives: a remote URL or a file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Remote(Uri),
    Local(PathBuf),
}

impl DataSource {
    /// `http://` and `https://` are remote; everything else is a path,
    /// optionally prefixed with `file://`.
    pub fn parse(spec: &str) -> Result<Self> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Err(anyhow!("Empty data source"));
        }
        if spec.starts_with("http://") || spec.starts_with("https://") {
            let uri: Uri = spec
                .parse()
                .with_context(|| format!("Invalid source URL '{}'", spec))?;
            return Ok(DataSource::Remote(uri));
        }
        let path = spec.strip_prefix("file://").unwrap_or(spec);
        Ok(DataSource::Local(PathBuf::from(path)))
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Remote(uri) => write!(f, "{}", uri),
            DataSource::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Resolves a `Location` header against the URI that produced it.
///
/// Absolute URLs replace the base, `/path` keeps the base authority and a bare
/// relative path replaces the last segment of the base path.
fn resolve_location(base: &Uri, location: &str) -> Uri {
    let location = location.trim();
    if location.starts_with("http://") || location.starts_with("https://") {
        return location.parse().unwrap_or_else(|_| base.clone());
    }

    let path_and_query = if let Some(rest) = location.strip_prefix("//") {
        let scheme = base.scheme_str().unwrap_or("https");
        return format!("{}://{}", scheme, rest)
            .parse()
            .unwrap_or_else(|_| base.clone());
    } else if location.starts_with('/') {
        location.to_string()
    } else {
        let base_path = base.path();
        let dir = &base_path[..base_path.rfind('/').map_or(0, |i| i + 1)];
        if dir.is_empty() {
            format!("/{}", location)
        } else {
            format!("{}{}", dir, location)
        }
    };

    let mut builder = Uri::builder().path_and_query(path_and_query);
    if let Some(s) = base.scheme() {
        builder = builder.scheme(s.clone());
    }
    if let Some(a) = base.authority() {
        builder = builder.authority(a.clone());
    }
    builder.build().unwrap_or_else(|_| base.clone())
}

/// Reads dataset text from files or over HTTP(S).
#[derive(Clone, Debug)]
pub struct SourceClient {
    http: HttpsClient,
    user_agent: String,
}

impl SourceClient {
    pub fn new() -> Result<Self> {
        let mut root_store = rustls::RootCertStore::empty();
        let result = rustls_native_certs::load_native_certs();
        for err in &result.errors {
            log::warn!("Skipping unreadable system certificate: {}", err);
        }
        root_store.add_parsable_certificates(result.certs);
        if root_store.is_empty() {
            log::warn!("No system certificates found; HTTPS sources will fail");
        }

        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let https_connector = HttpsConnectorBuilder::new()
            .with_tls_config(tls_config)
            .https_or_http()
            .enable_http1()
            .build();

        let http = Client::builder(TokioExecutor::new()).build(https_connector);
        Ok(Self {
            http,
            user_agent: format!("deadlines/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    pub async fn fetch_text(&self, source: &DataSource) -> Result<String> {
        match self.fetch_optional_text(source).await? {
            Some(text) => Ok(text),
            None => match source {
                DataSource::Local(path) => Err(anyhow!("Failed to read '{}': file not found", path.display())),
                DataSource::Remote(uri) => Err(anyhow!("'{}' returned HTTP 404 Not Found", uri)),
            },
        }
    }

    /// Like [`Self::fetch_text`], but a missing file or an HTTP 404 is `Ok(None)`.
    pub async fn fetch_optional_text(&self, source: &DataSource) -> Result<Option<String>> {
        match source {
            DataSource::Local(path) => match tokio::fs::read_to_string(path).await {
                Ok(text) => Ok(Some(text)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e).with_context(|| format!("Failed to read '{}'", path.display())),
            },
            DataSource::Remote(uri) => self.fetch_remote(uri).await,
        }
    }

    async fn fetch_remote(&self, uri: &Uri) -> Result<Option<String>> {
        let mut current = uri.clone();

        for _ in 0..=MAX_REDIRECTS {
            log::debug!("GET {}", current);
            let req = Request::get(current.clone())
                .header(http::header::USER_AGENT, self.user_agent.as_str())
                .body(String::new())
                .with_context(|| format!("Failed to build request for '{}'", current))?;

            let response = self
                .http
                .request(req)
                .await
                .with_context(|| format!("Request to '{}' failed", current))?;

            let status = response.status();
            if status.is_redirection()
                && let Some(location) = response.headers().get(http::header::LOCATION)
                && let Ok(loc) = location.to_str()
            {
                current = resolve_location(&current, loc);
                continue;
            }

            if status == http::StatusCode::NOT_FOUND {
                return Ok(None);
            }
            if !status.is_success() {
                return Err(anyhow!("'{}' returned HTTP {}", current, status));
            }

            let body = response
                .into_body()
                .collect()
                .await
                .with_context(|| format!("Failed to read body of '{}'", current))?
                .to_bytes();
            return String::from_utf8(body.to_vec())
                .map(Some)
                .with_context(|| format!("'{}' is not valid UTF-8", current));
        }

        Err(anyhow!("Too many redirects fetching '{}'", uri))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source_kinds() {
        assert!(matches!(
            DataSource::parse("https://example.org/data/conferences.yaml").unwrap(),
            DataSource::Remote(_)
        ));
        assert_eq!(
            DataSource::parse("file:///tmp/c.csv").unwrap(),
            DataSource::Local(PathBuf::from("/tmp/c.csv"))
        );
        assert_eq!(
            DataSource::parse("data/c.yaml").unwrap(),
            DataSource::Local(PathBuf::from("data/c.yaml"))
        );
        assert!(DataSource::parse("  ").is_err());
    }

    #[test]
    fn test_resolve_relative_location() {
        let base: Uri = "https://example.org/a/b.yaml".parse().unwrap();
        let next = resolve_location(&base, "/mirror/b.yaml");
        assert_eq!(next.to_string(), "https://example.org/mirror/b.yaml");

        let absolute = resolve_location(&base, "http://cdn.example.net/b.yaml");
        assert_eq!(absolute.to_string(), "http://cdn.example.net/b.yaml");

        let sibling = resolve_location(&base, "c.yaml?v=2");
        assert_eq!(sibling.to_string(), "https://example.org/a/c.yaml?v=2");

        let root: Uri = "http://127.0.0.1:1234/old.csv".parse().unwrap();
        assert_eq!(
            resolve_location(&root, "new.csv").to_string(),
            "http://127.0.0.1:1234/new.csv"
        );

        let scheme_relative = resolve_location(&base, "//mirror.example.net/b.yaml");
        assert_eq!(scheme_relative.to_string(), "https://mirror.example.net/b.yaml");
    }
}
