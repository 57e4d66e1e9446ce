//! The set of methods a route may allow.
//!
//! Routes restrict themselves to the four methods the routing layer
//! recognizes. Incoming requests carry a full [`http::Method`]; a request
//! method outside this set can never be in a route's allowed set, so a
//! matched route answers it with 405.

use std::fmt;

/// A method a route may allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Put,
    Post,
    Delete,
}

impl Method {
    /// The wire form of this method.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }

    /// Parses a method name, case-insensitively. Returns `None` for
    /// anything outside the recognized set.
    pub fn parse(raw: &str) -> Option<Self> {
        let method = [Method::Get, Method::Put, Method::Post, Method::Delete]
            .into_iter()
            .find(|method| raw.eq_ignore_ascii_case(method.as_str()))?;
        Some(method)
    }

    /// Returns true if `method` is this method.
    pub fn matches(&self, method: &http::Method) -> bool {
        method.as_str() == self.as_str()
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => http::Method::GET,
            Method::Put => http::Method::PUT,
            Method::Post => http::Method::POST,
            Method::Delete => http::Method::DELETE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Method::parse("GET"), Some(Method::Get));
        assert_eq!(Method::parse("get"), Some(Method::Get));
        assert_eq!(Method::parse("Delete"), Some(Method::Delete));
    }

    #[test]
    fn parse_rejects_unrecognized_methods() {
        assert_eq!(Method::parse("PATCH"), None);
        assert_eq!(Method::parse(""), None);
    }

    #[test]
    fn matches_compares_against_request_methods() {
        assert!(Method::Post.matches(&http::Method::POST));
        assert!(!Method::Post.matches(&http::Method::GET));
    }

    #[test]
    fn converts_to_http_method() {
        assert_eq!(http::Method::from(Method::Put), http::Method::PUT);
    }
}
