//! A minimal, synchronous HTTP routing layer
//!
//! This crate maps an incoming request's method and path to a named route,
//! extracts typed path parameters, selects a controller/middleware chain,
//! and emits basic response status and header metadata. Dispatch is a
//! single pass over an insertion-ordered route table — no concurrency, no
//! persistence, no protocol handling: those belong to the hosting
//! environment.
//!
//! # Route paths
//!
//! A route path may contain typed placeholders, one per `/`-delimited
//! segment: `{id:int}`, `{action:string}`, `{slug:string|chars}`. The
//! types name character classes (`string`, `int`, `chars`, `misc`); the
//! special `null` type makes a segment optional. Patterns compile once at
//! registration time.
//!
//! # Sentinel routes
//!
//! The table must be seeded with two reserved routes before dispatching:
//! `error404` (selected when nothing matches) and `error405` (selected
//! when the matched route does not allow the request method).
//!
//! # Example
//!
//! ```
//! use micro_request::Request;
//! use micro_route::{controller_fn, ControllerRef, Registry, RouteDef, RouteTable, Router};
//!
//! let registry = Registry::builder()
//!     .controller("Pages", "home", controller_fn(|_request, _response| {}))
//!     .controller("Pages", "error", controller_fn(|_request, _response| {}))
//!     .controller("Articles", "show", controller_fn(|_request, _response| {}))
//!     .build();
//!
//! let mut table = RouteTable::new(registry);
//! table.feed([
//!     ("home".to_string(), RouteDef::new("/", ControllerRef::new("Pages", "home"))),
//!     ("article".to_string(), RouteDef::new("/article/{id:int}", ControllerRef::new("Articles", "show"))),
//!     ("error404".to_string(), RouteDef::new("/error/404", ControllerRef::new("Pages", "error"))),
//!     ("error405".to_string(), RouteDef::new("/error/405", ControllerRef::new("Pages", "error"))),
//! ])?;
//!
//! let router = Router::new(table);
//!
//! let request = Request::builder()
//!     .domain("example.com")
//!     .path("/article/42")
//!     .method(http::Method::GET)
//!     .build();
//!
//! let response = router.dispatch(&request)?;
//! assert_eq!(response.status(), http::StatusCode::OK);
//! assert_eq!(response.params().get("id"), Some("42"));
//! # Ok::<(), micro_route::RouterError>(())
//! ```

mod error;
mod method;
mod params;
mod registry;
mod response;
mod route;
mod router;
mod table;

pub mod pattern;

pub use error::PatternError;
pub use error::RouterError;
pub use method::Method;
pub use params::PathParams;
pub use pattern::CompiledPattern;
pub use registry::{controller_fn, middleware_fn, Controller, FnController, FnMiddleware, Middleware, Registry, RegistryBuilder};
pub use response::Response;
pub use route::{ControllerRef, Route, RouteDef};
pub use router::{Router, METHOD_NOT_ALLOWED_ROUTE, NOT_FOUND_ROUTE};
pub use table::RouteTable;
