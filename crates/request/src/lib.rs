//! Request-side boundary types for the micro routing layer
//!
//! This crate provides the read-only view of an incoming request that the
//! routing core consumes: the normalized path and method, query and posted
//! parameters, the raw input body with a lazily decoded JSON view, uploaded
//! file descriptors, server metadata, and an injected session store.
//!
//! The router itself only reads `path` and `method` (plus the server
//! metadata for the protocol line); everything else is carried for the
//! controllers and middlewares that run behind it.
//!
//! # Example
//!
//! ```
//! use http::Method;
//! use micro_request::Request;
//!
//! let request = Request::builder()
//!     .domain("example.com")
//!     .path("/article/42")
//!     .method(Method::GET)
//!     .query("page", "2")
//!     .build();
//!
//! assert_eq!(request.path(), "/article/42");
//! assert_eq!(request.query("page"), Some("2"));
//! ```

mod request;
mod session;
mod upload;

pub use request::Request;
pub use request::RequestBuilder;
pub use session::MemoryStore;
pub use session::Session;
pub use session::SessionStore;
pub use upload::UploadedFile;
