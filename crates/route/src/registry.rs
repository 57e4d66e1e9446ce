//! Controller and middleware capabilities, and the registry that resolves
//! them by name.
//!
//! Routes refer to controllers and middlewares by string identifiers. The
//! registry maps those identifiers to implementations up front, so every
//! reference is validated when the route is registered — there is no
//! runtime reflection and no way to dispatch to something that does not
//! exist.

use std::collections::HashMap;
use std::fmt;

use micro_request::Request;

use crate::params::PathParams;
use crate::response::Response;
use crate::route::ControllerRef;

/// A controller action. Implementations receive the request view and the
/// response produced by dispatch.
pub trait Controller: Send + Sync {
    fn handle(&self, request: &Request, response: &mut Response<'_>);
}

/// A middleware. `process` runs before the controller, in the order the
/// route declares, with the parameters extracted from the matched path.
pub trait Middleware: Send + Sync {
    fn process(&self, params: &PathParams, request: &Request, response: &mut Response<'_>);
}

/// A [`Controller`] backed by a plain closure.
pub struct FnController<F>(F);

impl<F> Controller for FnController<F>
where
    F: Fn(&Request, &mut Response<'_>) + Send + Sync,
{
    fn handle(&self, request: &Request, response: &mut Response<'_>) {
        (self.0)(request, response);
    }
}

impl<F> fmt::Debug for FnController<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnController")
    }
}

pub fn controller_fn<F>(f: F) -> FnController<F>
where
    F: Fn(&Request, &mut Response<'_>) + Send + Sync,
{
    FnController(f)
}

/// A [`Middleware`] backed by a plain closure.
pub struct FnMiddleware<F>(F);

impl<F> Middleware for FnMiddleware<F>
where
    F: Fn(&PathParams, &Request, &mut Response<'_>) + Send + Sync,
{
    fn process(&self, params: &PathParams, request: &Request, response: &mut Response<'_>) {
        (self.0)(params, request, response);
    }
}

impl<F> fmt::Debug for FnMiddleware<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnMiddleware")
    }
}

pub fn middleware_fn<F>(f: F) -> FnMiddleware<F>
where
    F: Fn(&PathParams, &Request, &mut Response<'_>) + Send + Sync,
{
    FnMiddleware(f)
}

/// Startup-time mapping from string identifiers to controller and
/// middleware implementations.
///
/// Immutable once built; the route table borrows it for validation at
/// registration time and the dispatcher for resolution at dispatch time.
pub struct Registry {
    controllers: HashMap<String, HashMap<String, Box<dyn Controller>>>,
    middlewares: HashMap<String, Box<dyn Middleware>>,
}

impl Registry {
    /// Creates a new registry builder.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Returns true iff `controller` is registered with an action named
    /// `action`.
    pub fn has_controller(&self, controller: &str, action: &str) -> bool {
        self.controllers.get(controller).is_some_and(|actions| actions.contains_key(action))
    }

    /// Returns true iff a middleware named `name` is registered.
    pub fn has_middleware(&self, name: &str) -> bool {
        self.middlewares.contains_key(name)
    }

    /// Resolves a controller reference.
    pub fn controller(&self, callback: &ControllerRef) -> Option<&dyn Controller> {
        self.controllers.get(callback.controller())?.get(callback.action()).map(Box::as_ref)
    }

    /// Resolves a middleware by name.
    pub fn middleware(&self, name: &str) -> Option<&dyn Middleware> {
        self.middlewares.get(name).map(Box::as_ref)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("controllers", &self.controllers.keys().collect::<Vec<_>>())
            .field("middlewares", &self.middlewares.keys().collect::<Vec<_>>())
            .finish()
    }
}

pub struct RegistryBuilder {
    controllers: HashMap<String, HashMap<String, Box<dyn Controller>>>,
    middlewares: HashMap<String, Box<dyn Middleware>>,
}

impl RegistryBuilder {
    fn new() -> Self {
        Self { controllers: HashMap::new(), middlewares: HashMap::new() }
    }

    /// Registers `action` on `controller`. Re-registering replaces the
    /// previous implementation.
    pub fn controller(
        mut self,
        controller: impl Into<String>,
        action: impl Into<String>,
        implementation: impl Controller + 'static,
    ) -> Self {
        self.controllers.entry(controller.into()).or_default().insert(action.into(), Box::new(implementation));
        self
    }

    /// Registers a middleware under `name`.
    pub fn middleware(mut self, name: impl Into<String>, implementation: impl Middleware + 'static) -> Self {
        self.middlewares.insert(name.into(), Box::new(implementation));
        self
    }

    pub fn build(self) -> Registry {
        Registry { controllers: self.controllers, middlewares: self.middlewares }
    }
}

impl fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryBuilder").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        Registry::builder()
            .controller("Pages", "home", controller_fn(|_req, _resp| {}))
            .controller("Pages", "about", controller_fn(|_req, _resp| {}))
            .middleware("auth", middleware_fn(|_params, _req, _resp| {}))
            .build()
    }

    #[test]
    fn registered_controllers_resolve() {
        let registry = registry();
        assert!(registry.has_controller("Pages", "home"));
        assert!(registry.has_controller("Pages", "about"));
        assert!(registry.controller(&ControllerRef::new("Pages", "home")).is_some());
    }

    #[test]
    fn unknown_controller_or_action_does_not_resolve() {
        let registry = registry();
        assert!(!registry.has_controller("Pages", "missing"));
        assert!(!registry.has_controller("Missing", "home"));
        assert!(registry.controller(&ControllerRef::new("Pages", "missing")).is_none());
    }

    #[test]
    fn registered_middlewares_resolve() {
        let registry = registry();
        assert!(registry.has_middleware("auth"));
        assert!(registry.middleware("auth").is_some());
        assert!(!registry.has_middleware("csrf"));
        assert!(registry.middleware("csrf").is_none());
    }
}
