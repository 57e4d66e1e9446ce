//! Route definitions and the stored route entry.

use serde::Deserialize;

use crate::error::PatternError;
use crate::method::Method;
use crate::pattern::{tokenize, CompiledPattern, PatternToken};

/// Reference to a controller action: a (controller, action) pair resolved
/// against the registry at registration time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ControllerRef {
    controller: String,
    action: String,
}

impl ControllerRef {
    pub fn new(controller: impl Into<String>, action: impl Into<String>) -> Self {
        Self { controller: controller.into(), action: action.into() }
    }

    pub fn controller(&self) -> &str {
        &self.controller
    }

    pub fn action(&self) -> &str {
        &self.action
    }
}

/// A route definition as fed to [`RouteTable::feed`](crate::RouteTable::feed).
///
/// Every field except `path` and `callback` is optional: `methods`
/// defaults to `GET` only, `middlewares` to none. Deserializable so route
/// maps can come straight from configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteDef {
    pub path: Option<String>,
    pub callback: Option<ControllerRef>,
    pub methods: Option<Vec<String>>,
    pub middlewares: Option<Vec<String>>,
}

impl RouteDef {
    pub fn new(path: impl Into<String>, callback: ControllerRef) -> Self {
        Self { path: Some(path.into()), callback: Some(callback), methods: None, middlewares: None }
    }

    pub fn methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods = Some(methods.into_iter().map(Into::into).collect());
        self
    }

    pub fn middlewares<I, S>(mut self, middlewares: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.middlewares = Some(middlewares.into_iter().map(Into::into).collect());
        self
    }
}

/// A registered route: the validated definition plus its cached compiled
/// pattern.
#[derive(Debug, Clone)]
pub struct Route {
    name: String,
    path: String,
    methods: Vec<Method>,
    callback: ControllerRef,
    middlewares: Vec<String>,
    tokens: Vec<PatternToken>,
    pattern: CompiledPattern,
}

impl Route {
    /// Parses and compiles `path`, producing the stored entry. The token
    /// list keeps the raw path's shape for reverse-path building; the
    /// compiled pattern works on the normalized form.
    pub(crate) fn new(
        name: String,
        path: String,
        methods: Vec<Method>,
        callback: ControllerRef,
        middlewares: Vec<String>,
    ) -> Result<Self, PatternError> {
        let tokens = tokenize(&path)?;
        let pattern = CompiledPattern::compile(&path)?;
        Ok(Self { name, path, methods, callback, middlewares, tokens, pattern })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The path as registered, placeholders included.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn callback(&self) -> &ControllerRef {
        &self.callback
    }

    pub fn middlewares(&self) -> &[String] {
        &self.middlewares
    }

    pub(crate) fn tokens(&self) -> &[PatternToken] {
        &self.tokens
    }

    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    /// Returns true if the route allows `method`.
    pub fn allows(&self, method: &http::Method) -> bool {
        self.methods.iter().any(|allowed| allowed.matches(method))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(path: &str) -> Route {
        Route::new(
            "test".to_string(),
            path.to_string(),
            vec![Method::Get, Method::Post],
            ControllerRef::new("Pages", "show"),
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn allows_checks_the_method_set() {
        let route = route("/");
        assert!(route.allows(&http::Method::GET));
        assert!(route.allows(&http::Method::POST));
        assert!(!route.allows(&http::Method::DELETE));
        assert!(!route.allows(&http::Method::PATCH));
    }

    #[test]
    fn new_rejects_invalid_patterns() {
        let result = Route::new(
            "bad".to_string(),
            "/x/{id:uuid}".to_string(),
            vec![Method::Get],
            ControllerRef::new("Pages", "show"),
            vec![],
        );
        assert!(result.is_err());
    }

    #[test]
    fn def_deserializes_from_json() {
        let def: RouteDef = serde_json::from_str(
            r#"{
                "path": "/article/{id:int}",
                "callback": { "controller": "Articles", "action": "show" },
                "methods": ["GET", "POST"]
            }"#,
        )
        .unwrap();

        assert_eq!(def.path.as_deref(), Some("/article/{id:int}"));
        assert_eq!(def.callback, Some(ControllerRef::new("Articles", "show")));
        assert_eq!(def.methods, Some(vec!["GET".to_string(), "POST".to_string()]));
        assert_eq!(def.middlewares, None);
    }

    #[test]
    fn def_builder_sets_optional_fields() {
        let def = RouteDef::new("/", ControllerRef::new("Pages", "home"))
            .methods(["GET"])
            .middlewares(["auth"]);

        assert_eq!(def.methods, Some(vec!["GET".to_string()]));
        assert_eq!(def.middlewares, Some(vec!["auth".to_string()]));
    }
}
