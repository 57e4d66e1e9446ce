use thiserror::Error;

use crate::route::ControllerRef;

/// Errors raised at route registration or lookup time.
///
/// Matching itself never fails: an unmatched path is a normal dispatch
/// outcome, not an error. Every variant here is unrecoverable at the point
/// it is raised — registration errors should abort startup, lookup errors
/// abort the calling operation.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("route named '{name}' already exists in the collection")]
    DuplicateRoute { name: String },

    #[error("invalid methods provided to route '{name}': {reason}")]
    InvalidMethod { name: String, reason: String },

    #[error("invalid callback provided to route '{name}': controller '{controller}' has no registered action '{action}'")]
    InvalidController { name: String, controller: String, action: String },

    #[error("invalid middleware '{middleware}' provided to route '{name}'")]
    InvalidMiddleware { name: String, middleware: String },

    #[error("incomplete route '{name}' definition: a route must include at least a path and a callback")]
    IncompleteRouteDefinition { name: String },

    #[error("route named '{name}' not found")]
    RouteNotFound { name: String },

    #[error("invalid path pattern for route '{name}': {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: PatternError,
    },
}

impl RouterError {
    pub fn duplicate_route<S: Into<String>>(name: S) -> Self {
        Self::DuplicateRoute { name: name.into() }
    }

    pub fn invalid_method<S: Into<String>, R: ToString>(name: S, reason: R) -> Self {
        Self::InvalidMethod { name: name.into(), reason: reason.to_string() }
    }

    pub fn invalid_controller<S: Into<String>>(name: S, callback: &ControllerRef) -> Self {
        Self::InvalidController {
            name: name.into(),
            controller: callback.controller().to_string(),
            action: callback.action().to_string(),
        }
    }

    pub fn invalid_middleware<S: Into<String>, M: Into<String>>(name: S, middleware: M) -> Self {
        Self::InvalidMiddleware { name: name.into(), middleware: middleware.into() }
    }

    pub fn incomplete_route_definition<S: Into<String>>(name: S) -> Self {
        Self::IncompleteRouteDefinition { name: name.into() }
    }

    pub fn route_not_found<S: Into<String>>(name: S) -> Self {
        Self::RouteNotFound { name: name.into() }
    }

    pub fn invalid_pattern<S: Into<String>>(name: S, source: PatternError) -> Self {
        Self::InvalidPattern { name: name.into(), source }
    }
}

/// Errors raised while parsing or compiling a path pattern.
///
/// These surface at registration time, wrapped in
/// [`RouterError::InvalidPattern`]; a compiled pattern never fails later.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("unknown placeholder type '{placeholder_type}' in '{{{placeholder}}}'")]
    UnknownType { placeholder: String, placeholder_type: String },

    #[error("placeholder '{name}' captures no characters: 'null' needs at least one typed alternative")]
    EmptyClasses { name: String },

    #[error("pattern does not compile: {source}")]
    Regex {
        #[from]
        source: regex::Error,
    },
}

impl PatternError {
    pub fn unknown_type<P: Into<String>, T: Into<String>>(placeholder: P, placeholder_type: T) -> Self {
        Self::UnknownType { placeholder: placeholder.into(), placeholder_type: placeholder_type.into() }
    }

    pub fn empty_classes<S: Into<String>>(name: S) -> Self {
        Self::EmptyClasses { name: name.into() }
    }
}
