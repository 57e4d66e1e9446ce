//! The dispatcher: resolves one request against the route table.
//!
//! Dispatch is a single synchronous pass — normalize the path, scan the
//! table in insertion order, decide the status, run the matched route's
//! middlewares — with no state kept between calls. The table must be
//! seeded with the two sentinel routes ([`NOT_FOUND_ROUTE`] and
//! [`METHOD_NOT_ALLOWED_ROUTE`]) before the first dispatch; their absence
//! when needed is a configuration defect, not a matching failure.

use tracing::debug;

use micro_request::Request;

use crate::error::RouterError;
use crate::params::PathParams;
use crate::pattern::normalize_path;
use crate::response::Response;
use crate::route::Route;
use crate::table::RouteTable;

/// Name of the sentinel route selected when no route matches.
pub const NOT_FOUND_ROUTE: &str = "error404";

/// Name of the sentinel route selected when a route matches but does not
/// allow the request method.
pub const METHOD_NOT_ALLOWED_ROUTE: &str = "error405";

/// Dispatches requests against a populated, read-only route table.
#[derive(Debug)]
pub struct Router {
    table: RouteTable,
}

impl Router {
    pub fn new(table: RouteTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Resolves `request` to a response descriptor.
    ///
    /// The first route (in insertion order) whose pattern fully matches
    /// the normalized request path wins. Status policy: 404 when nothing
    /// matches, 405 when the matched route does not allow the request
    /// method (the selected route switches to the `error405` sentinel),
    /// 200 otherwise. The allow-methods header always reports the
    /// originally matched route's methods, and that route's middlewares
    /// run in declared order — a middleware may set headers or redirect
    /// but never changes the status decided here.
    ///
    /// Fails only with [`RouterError::RouteNotFound`] when a needed
    /// sentinel route was never registered.
    pub fn dispatch<'r>(&'r self, request: &'r Request) -> Result<Response<'r>, RouterError> {
        let path = normalize_path(request.path());
        debug!(path, method = %request.method(), "dispatching request");

        let mut matched: Option<(&Route, PathParams)> = None;
        for route in self.table.iter() {
            if let Some(params) = route.pattern().matches(path) {
                debug!(route = route.name(), "matched route");
                matched = Some((route, params));
                break;
            }
        }

        let (route, params, found) = match matched {
            Some((route, params)) => (route, params, true),
            None => {
                debug!(path, "no route matched, selecting the not-found route");
                (self.table.get(NOT_FOUND_ROUTE)?, PathParams::empty(), false)
            }
        };

        let mut response = Response::new(request, &self.table, route.name());
        response.set_allow_methods(route.methods());

        if !found {
            response.set_status(404);
        } else if !route.allows(request.method()) {
            debug!(route = route.name(), method = %request.method(), "method not allowed");
            let fallback = self.table.get(METHOD_NOT_ALLOWED_ROUTE)?;
            response.select_route(fallback.name());
            response.set_status(405);
        } else {
            response.set_status(200);
        }

        for name in route.middlewares() {
            let middleware = self
                .table
                .registry()
                .middleware(name)
                .ok_or_else(|| RouterError::invalid_middleware(route.name(), name.as_str()))?;
            middleware.process(&params, request, &mut response);
        }

        response.set_params(params);
        Ok(response)
    }
}
