//! The read-only request view consumed by the routing layer.
//!
//! A [`Request`] is constructed once per incoming request by the hosting
//! environment and then only read. The builder accepts either explicit
//! parts (scheme, domain, path, method) or raw server metadata in the CGI
//! style (`HTTPS`, `SERVER_NAME`, `REQUEST_URI`, `REQUEST_METHOD`), from
//! which the missing parts are derived.

use std::collections::HashMap;
use std::fmt;

use bytes::Bytes;
use http::Method;
use once_cell::sync::OnceCell;
use serde_json::Value;
use tracing::warn;

use crate::session::{MemoryStore, Session, SessionStore};
use crate::upload::UploadedFile;

/// Read-only view of one incoming request.
#[derive(Debug)]
pub struct Request {
    scheme: String,
    domain: String,
    path: String,
    method: Method,
    input: Bytes,
    input_json: OnceCell<Option<Value>>,
    query: HashMap<String, String>,
    posted: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
    server: HashMap<String, String>,
    session: Session,
}

impl Request {
    /// Creates a builder with no parts set.
    pub fn builder() -> RequestBuilder {
        RequestBuilder::new()
    }

    /// The request scheme, `"http"` or `"https"`.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The host name the request was addressed to.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The request path, without query string or fragment.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the query parameter stored under `key`, if any.
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// Returns the posted form parameter stored under `key`, if any.
    pub fn post(&self, key: &str) -> Option<&str> {
        self.posted.get(key).map(String::as_str)
    }

    /// The raw input body.
    pub fn body(&self) -> &Bytes {
        &self.input
    }

    /// Returns `key` from the JSON-decoded input body.
    ///
    /// The body is decoded at most once per request; a body that is empty
    /// or not valid JSON yields `None` for every key.
    pub fn input(&self, key: &str) -> Option<&Value> {
        self.input_json
            .get_or_init(|| {
                if self.input.is_empty() {
                    None
                } else {
                    serde_json::from_slice(&self.input).ok()
                }
            })
            .as_ref()
            .and_then(|value| value.get(key))
    }

    /// Returns the uploaded file stored under `key`, if any.
    pub fn file(&self, key: &str) -> Option<&UploadedFile> {
        self.files.get(key)
    }

    /// Returns the server metadata value stored under `key`.
    ///
    /// Lookup is case-insensitive on the key: metadata keys are stored
    /// uppercase, and `key` is uppercased before the lookup.
    pub fn server(&self, key: &str) -> Option<&str> {
        self.server.get(&key.to_ascii_uppercase()).map(String::as_str)
    }

    /// The session store injected at construction time.
    pub fn session(&self) -> &Session {
        &self.session
    }
}

/// Builder for [`Request`].
pub struct RequestBuilder {
    scheme: Option<String>,
    domain: Option<String>,
    path: Option<String>,
    method: Option<Method>,
    input: Bytes,
    query: HashMap<String, String>,
    posted: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
    server: HashMap<String, String>,
    store: Option<Box<dyn SessionStore>>,
}

impl RequestBuilder {
    fn new() -> Self {
        Self {
            scheme: None,
            domain: None,
            path: None,
            method: None,
            input: Bytes::new(),
            query: HashMap::new(),
            posted: HashMap::new(),
            files: HashMap::new(),
            server: HashMap::new(),
            store: None,
        }
    }

    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the raw input body.
    pub fn input(mut self, input: impl Into<Bytes>) -> Self {
        self.input = input.into();
        self
    }

    /// Adds a single query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Parses a raw query string and adds every pair it contains.
    ///
    /// A malformed query string is ignored with a warning rather than
    /// failing the build.
    pub fn query_string(mut self, raw: &str) -> Self {
        match serde_urlencoded::from_str::<Vec<(String, String)>>(raw) {
            Ok(pairs) => self.query.extend(pairs),
            Err(e) => warn!(cause = %e, query = raw, "ignoring malformed query string"),
        }
        self
    }

    /// Adds a single posted form parameter.
    pub fn post(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.posted.insert(key.into(), value.into());
        self
    }

    /// Adds an uploaded file descriptor.
    pub fn file(mut self, key: impl Into<String>, file: UploadedFile) -> Self {
        self.files.insert(key.into(), file);
        self
    }

    /// Adds one server metadata entry. Keys are stored uppercase.
    pub fn server(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.server.insert(key.into().to_ascii_uppercase(), value.into());
        self
    }

    /// Injects the session store. Defaults to an in-process [`MemoryStore`].
    pub fn session_store(mut self, store: impl SessionStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// Builds the request, deriving any unset part from server metadata:
    /// scheme from `HTTPS`, domain from `SERVER_NAME`, path from the path
    /// component of `REQUEST_URI`, method from `REQUEST_METHOD`.
    pub fn build(self) -> Request {
        let scheme = self.scheme.unwrap_or_else(|| scheme_from_server(&self.server));
        let domain = match self.domain {
            Some(domain) => domain,
            None => self.server.get("SERVER_NAME").cloned().unwrap_or_default(),
        };
        let path = match self.path {
            Some(path) => path,
            None => self.server.get("REQUEST_URI").map(|uri| uri_path(uri).to_string()).unwrap_or_else(|| "/".to_string()),
        };
        let method = match self.method {
            Some(method) => method,
            None => method_from_server(&self.server),
        };
        let store = self.store.unwrap_or_else(|| Box::new(MemoryStore::new()));

        Request {
            scheme,
            domain,
            path,
            method,
            input: self.input,
            input_json: OnceCell::new(),
            query: self.query,
            posted: self.posted,
            files: self.files,
            server: self.server,
            session: Session::new(store),
        }
    }
}

impl fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("scheme", &self.scheme)
            .field("domain", &self.domain)
            .field("path", &self.path)
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

fn scheme_from_server(server: &HashMap<String, String>) -> String {
    match server.get("HTTPS") {
        Some(https) if https != "off" => "https".to_string(),
        _ => "http".to_string(),
    }
}

fn method_from_server(server: &HashMap<String, String>) -> Method {
    match server.get("REQUEST_METHOD") {
        Some(raw) => Method::from_bytes(raw.as_bytes()).unwrap_or_else(|e| {
            warn!(cause = %e, method = raw.as_str(), "invalid request method, assuming GET");
            Method::GET
        }),
        None => Method::GET,
    }
}

/// Path component of a request URI: everything before the query string or
/// fragment.
fn uri_path(uri: &str) -> &str {
    let end = uri.find(['?', '#']).unwrap_or(uri.len());
    &uri[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn explicit_parts_win_over_server_metadata() {
        let request = Request::builder()
            .scheme("https")
            .domain("example.com")
            .path("/explicit")
            .method(Method::POST)
            .server("REQUEST_URI", "/from-server")
            .server("REQUEST_METHOD", "GET")
            .build();

        assert_eq!(request.scheme(), "https");
        assert_eq!(request.domain(), "example.com");
        assert_eq!(request.path(), "/explicit");
        assert_eq!(request.method(), &Method::POST);
    }

    #[test]
    fn parts_derive_from_server_metadata() {
        let request = Request::builder()
            .server("HTTPS", "on")
            .server("SERVER_NAME", "example.com")
            .server("REQUEST_URI", "/article/42?page=2#top")
            .server("REQUEST_METHOD", "PUT")
            .build();

        assert_eq!(request.scheme(), "https");
        assert_eq!(request.domain(), "example.com");
        assert_eq!(request.path(), "/article/42");
        assert_eq!(request.method(), &Method::PUT);
    }

    #[test]
    fn https_off_means_http() {
        let request = Request::builder().server("HTTPS", "off").build();
        assert_eq!(request.scheme(), "http");

        let request = Request::builder().build();
        assert_eq!(request.scheme(), "http");
    }

    #[test]
    fn server_lookup_is_case_insensitive() {
        let request = Request::builder().server("server_protocol", "HTTP/1.1").build();
        assert_eq!(request.server("SERVER_PROTOCOL"), Some("HTTP/1.1"));
        assert_eq!(request.server("server_protocol"), Some("HTTP/1.1"));
        assert_eq!(request.server("missing"), None);
    }

    #[test]
    fn query_string_is_parsed_into_pairs() {
        let request = Request::builder().query_string("name=hello&zip=world").build();
        assert_eq!(request.query("name"), Some("hello"));
        assert_eq!(request.query("zip"), Some("world"));
        assert_eq!(request.query("missing"), None);
    }

    #[test]
    fn input_decodes_json_body_once() {
        let request = Request::builder().input(r#"{"title":"hello","count":3}"#).build();
        assert_eq!(request.input("title"), Some(&json!("hello")));
        assert_eq!(request.input("count"), Some(&json!(3)));
        assert_eq!(request.input("missing"), None);
    }

    #[test]
    fn non_json_body_yields_no_input_values() {
        let request = Request::builder().input("plain text").build();
        assert_eq!(request.input("anything"), None);
        assert_eq!(request.body().as_ref(), b"plain text");
    }

    #[test]
    fn default_session_store_round_trips() {
        let request = Request::builder().build();
        request.session().set("user", "gabriele");
        assert_eq!(request.session().get("user"), Some(json!("gabriele")));
        request.session().delete("user");
        assert_eq!(request.session().get("user"), None);
    }
}
