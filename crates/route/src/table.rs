//! The in-memory route collection.
//!
//! Routes are keyed by a unique name and kept in insertion order, which is
//! also the matching order of the dispatcher: the first registered route
//! that matches wins, with no precedence beyond declaration order.
//!
//! Every registration is validated up front against the registry — a
//! table that built successfully can always dispatch.

use std::collections::HashMap;

use tracing::debug;

use crate::error::RouterError;
use crate::method::Method;
use crate::pattern::PatternToken;
use crate::registry::Registry;
use crate::route::{ControllerRef, Route, RouteDef};

/// Insertion-ordered collection of named routes, owning the registry they
/// were validated against.
///
/// Populated once at startup; read-only afterwards. Dispatch calls borrow
/// it and never mutate.
#[derive(Debug)]
pub struct RouteTable {
    registry: Registry,
    routes: Vec<Route>,
    index: HashMap<String, usize>,
}

impl RouteTable {
    pub fn new(registry: Registry) -> Self {
        Self { registry, routes: Vec::new(), index: HashMap::new() }
    }

    /// The registry routes are validated against.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns true iff a route named `name` exists.
    pub fn has(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Registers a route.
    ///
    /// Fails with [`RouterError::DuplicateRoute`] if `name` is taken (the
    /// existing registration stays intact), [`RouterError::InvalidMethod`]
    /// if the method set is empty, [`RouterError::InvalidController`] /
    /// [`RouterError::InvalidMiddleware`] if a reference does not resolve
    /// in the registry, and [`RouterError::InvalidPattern`] if the path
    /// does not compile.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        path: impl Into<String>,
        methods: Vec<Method>,
        callback: ControllerRef,
        middlewares: Vec<String>,
    ) -> Result<(), RouterError> {
        let name = name.into();

        if self.has(&name) {
            return Err(RouterError::duplicate_route(name));
        }
        if methods.is_empty() {
            return Err(RouterError::invalid_method(name, "a route needs at least one method"));
        }
        if !self.registry.has_controller(callback.controller(), callback.action()) {
            return Err(RouterError::invalid_controller(name, &callback));
        }
        for middleware in &middlewares {
            if !self.registry.has_middleware(middleware) {
                return Err(RouterError::invalid_middleware(name, middleware.as_str()));
            }
        }

        let route = Route::new(name.clone(), path.into(), methods, callback, middlewares)
            .map_err(|source| RouterError::invalid_pattern(name.clone(), source))?;

        debug!(route = name.as_str(), path = route.path(), "registered route");
        self.index.insert(name, self.routes.len());
        self.routes.push(route);
        Ok(())
    }

    /// Registers multiple routes from (name, definition) pairs.
    ///
    /// `methods` defaults to `GET`, `middlewares` to none. A definition
    /// missing its path or callback fails with
    /// [`RouterError::IncompleteRouteDefinition`]; an unrecognized method
    /// string with [`RouterError::InvalidMethod`].
    ///
    /// Registration is not transactional: entries before a failing one
    /// remain registered.
    pub fn feed<I>(&mut self, definitions: I) -> Result<(), RouterError>
    where
        I: IntoIterator<Item = (String, RouteDef)>,
    {
        for (name, def) in definitions {
            let Some(path) = def.path else {
                return Err(RouterError::incomplete_route_definition(name));
            };
            let Some(callback) = def.callback else {
                return Err(RouterError::incomplete_route_definition(name));
            };

            let methods = match def.methods {
                Some(raw) => raw
                    .iter()
                    .map(|m| {
                        Method::parse(m)
                            .ok_or_else(|| RouterError::invalid_method(name.as_str(), format!("unrecognized method '{m}'")))
                    })
                    .collect::<Result<Vec<_>, _>>()?,
                None => vec![Method::Get],
            };
            let middlewares = def.middlewares.unwrap_or_default();

            self.add(name, path, methods, callback, middlewares)?;
        }
        Ok(())
    }

    /// Gets a route by name.
    pub fn get(&self, name: &str) -> Result<&Route, RouterError> {
        self.index.get(name).map(|&i| &self.routes[i]).ok_or_else(|| RouterError::route_not_found(name))
    }

    /// Builds the concrete path to a route by substituting placeholders.
    ///
    /// A placeholder whose key is present in `params` becomes `/value`; a
    /// placeholder without a value is omitted entirely, yielding a shorter
    /// path rather than an error.
    pub fn path_for(&self, name: &str, params: &[(&str, &str)]) -> Result<String, RouterError> {
        let route = self.get(name)?;
        let mut path = String::new();

        for token in route.tokens() {
            match token {
                PatternToken::Literal(lit) => path.push_str(lit),
                PatternToken::Placeholder { name: key, .. } => {
                    if let Some(value) = params.iter().find(|(k, _)| *k == key.as_str()).map(|(_, v)| *v) {
                        path.push('/');
                        path.push_str(value);
                    }
                }
            }
        }

        Ok(path)
    }

    /// All routes, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
