//! The response descriptor produced by dispatch.
//!
//! Carries the decided status, the header metadata the routing layer
//! emits, and the finally selected route — everything the calling layer
//! needs to answer the request. Also hosts the reverse-URL helpers
//! (`url_to`, `redirect`) since both need the route table and the request
//! at hand.

use http::header::{
    HeaderMap, HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, CONTENT_TYPE,
    LOCATION,
};
use http::StatusCode;
use mime::Mime;
use micro_request::Request;
use tracing::warn;

use crate::error::RouterError;
use crate::method::Method;
use crate::params::PathParams;
use crate::route::Route;
use crate::table::RouteTable;

/// Response metadata for one dispatch call.
///
/// Borrows the request and the route table for the duration of the call;
/// the calling layer reads the descriptor and writes the actual response.
#[derive(Debug)]
pub struct Response<'r> {
    request: &'r Request,
    routes: &'r RouteTable,
    route_name: String,
    params: PathParams,
    status: StatusCode,
    headers: HeaderMap,
}

impl<'r> Response<'r> {
    pub(crate) fn new(request: &'r Request, routes: &'r RouteTable, route_name: &str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type, Access-Control-Allow-Headers, Authorization, X-Requested-With"),
        );
        Self {
            request,
            routes,
            route_name: route_name.to_string(),
            params: PathParams::empty(),
            status: StatusCode::OK,
            headers,
        }
    }

    /// The decided status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The headers the routing layer has emitted so far.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Name of the finally selected route (a sentinel on 404/405).
    pub fn route_name(&self) -> &str {
        &self.route_name
    }

    /// The finally selected route.
    pub fn route(&self) -> Result<&Route, RouterError> {
        self.routes.get(&self.route_name)
    }

    /// Parameters extracted from the matched path.
    pub fn params(&self) -> &PathParams {
        &self.params
    }

    pub(crate) fn select_route(&mut self, name: &str) {
        self.route_name = name.to_string();
    }

    pub(crate) fn set_params(&mut self, params: PathParams) {
        self.params = params;
    }

    /// Sets the status. 200, 404 and 405 are the recognized codes; any
    /// other value falls back to 200.
    pub fn set_status(&mut self, status: u16) {
        self.status = match status {
            404 => StatusCode::NOT_FOUND,
            405 => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::OK,
        };
    }

    /// The status line for the hosting environment, using the protocol the
    /// request reports (`SERVER_PROTOCOL`), e.g. `HTTP/1.1 404 Not Found`.
    pub fn status_line(&self) -> String {
        let protocol = self.request.server("server_protocol").unwrap_or("HTTP/1.1");
        format!("{} {} {}", protocol, self.status.as_u16(), self.status.canonical_reason().unwrap_or_default())
    }

    /// Emits the allow-methods header as a comma-joined list.
    pub fn set_allow_methods(&mut self, methods: &[Method]) {
        let joined = methods.iter().map(Method::as_str).collect::<Vec<_>>().join(", ");
        self.insert_header(ACCESS_CONTROL_ALLOW_METHODS, &joined);
    }

    /// Emits the content-type header with an explicit UTF-8 charset.
    pub fn set_content_type(&mut self, content_type: &Mime) {
        self.insert_header(CONTENT_TYPE, &format!("{}; charset=UTF-8", content_type.essence_str()));
    }

    /// Builds the full URL to a registered route: scheme, domain, the
    /// substituted path and an optional query string.
    pub fn url_to(&self, name: &str, params: &[(&str, &str)], query: &[(&str, &str)]) -> Result<String, RouterError> {
        let path = self.routes.path_for(name, params)?;
        let mut url = format!("{}://{}{}", self.request.scheme(), self.request.domain(), path);

        if !query.is_empty() {
            let encoded = serde_urlencoded::to_string(query).expect("string pairs always serialize");
            url.push('?');
            url.push_str(&encoded);
        }

        Ok(url)
    }

    /// Redirects to `location`: a registered route name resolves through
    /// [`url_to`](Self::url_to), anything else passes through as a literal
    /// target. Only sets the `location` header — the status decided by
    /// dispatch stays as it is.
    pub fn redirect(&mut self, location: &str, params: &[(&str, &str)]) -> Result<(), RouterError> {
        let target = if self.routes.has(location) {
            self.url_to(location, params, &[])?
        } else {
            location.to_string()
        };
        self.insert_header(LOCATION, &target);
        Ok(())
    }

    /// Asks the client to reload the current page.
    pub fn refresh(&mut self) {
        self.insert_header(HeaderName::from_static("refresh"), "0");
    }

    /// Redirects back to the referring page, or to `/` when the request
    /// carries no referer.
    pub fn go_back(&mut self) -> Result<(), RouterError> {
        let target = self.request.server("http_referer").unwrap_or("/").to_string();
        self.redirect(&target, &[])
    }

    fn insert_header(&mut self, name: HeaderName, value: &str) {
        match HeaderValue::from_str(value) {
            Ok(header_value) => {
                self.headers.insert(name, header_value);
            }
            Err(e) => warn!(cause = %e, header = %name, "dropping unrepresentable header value"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{controller_fn, Registry};
    use crate::route::ControllerRef;

    fn table() -> RouteTable {
        let registry = Registry::builder()
            .controller("Pages", "home", controller_fn(|_req, _resp| {}))
            .controller("Articles", "show", controller_fn(|_req, _resp| {}))
            .build();
        let mut table = RouteTable::new(registry);
        table.add("home", "/", vec![Method::Get], ControllerRef::new("Pages", "home"), vec![]).unwrap();
        table
            .add("article", "/article/{id:int}", vec![Method::Get], ControllerRef::new("Articles", "show"), vec![])
            .unwrap();
        table
    }

    fn request() -> Request {
        Request::builder()
            .scheme("https")
            .domain("example.com")
            .path("/")
            .method(http::Method::GET)
            .server("SERVER_PROTOCOL", "HTTP/1.1")
            .server("HTTP_REFERER", "https://example.com/prev")
            .build()
    }

    #[test]
    fn new_response_carries_the_default_allow_headers() {
        let table = table();
        let request = request();
        let response = Response::new(&request, &table, "home");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(ACCESS_CONTROL_ALLOW_HEADERS));
    }

    #[test]
    fn unrecognized_status_codes_fall_back_to_ok() {
        let table = table();
        let request = request();
        let mut response = Response::new(&request, &table, "home");

        response.set_status(404);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        response.set_status(500);
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn status_line_uses_the_request_protocol() {
        let table = table();
        let request = request();
        let mut response = Response::new(&request, &table, "home");
        response.set_status(405);

        assert_eq!(response.status_line(), "HTTP/1.1 405 Method Not Allowed");
    }

    #[test]
    fn allow_methods_header_is_comma_joined() {
        let table = table();
        let request = request();
        let mut response = Response::new(&request, &table, "home");
        response.set_allow_methods(&[Method::Get, Method::Post]);

        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_METHODS], "GET, POST");
    }

    #[test]
    fn content_type_header_carries_the_charset() {
        let table = table();
        let request = request();
        let mut response = Response::new(&request, &table, "home");
        response.set_content_type(&mime::APPLICATION_JSON);

        assert_eq!(response.headers()[CONTENT_TYPE], "application/json; charset=UTF-8");
    }

    #[test]
    fn url_to_builds_scheme_domain_path_and_query() {
        let table = table();
        let request = request();
        let response = Response::new(&request, &table, "home");

        let url = response.url_to("article", &[("id", "42")], &[("ref", "home page")]).unwrap();
        assert_eq!(url, "https://example.com/article/42?ref=home+page");

        let url = response.url_to("article", &[("id", "42")], &[]).unwrap();
        assert_eq!(url, "https://example.com/article/42");
    }

    #[test]
    fn url_to_unknown_route_fails() {
        let table = table();
        let request = request();
        let response = Response::new(&request, &table, "home");
        assert!(matches!(response.url_to("missing", &[], &[]), Err(RouterError::RouteNotFound { .. })));
    }

    #[test]
    fn redirect_resolves_route_names_and_passes_literals_through() {
        let table = table();
        let request = request();

        let mut response = Response::new(&request, &table, "home");
        response.redirect("article", &[("id", "7")]).unwrap();
        assert_eq!(response.headers()[LOCATION], "https://example.com/article/7");

        let mut response = Response::new(&request, &table, "home");
        response.redirect("https://elsewhere.test/page", &[]).unwrap();
        assert_eq!(response.headers()[LOCATION], "https://elsewhere.test/page");
    }

    #[test]
    fn redirect_does_not_touch_the_status() {
        let table = table();
        let request = request();
        let mut response = Response::new(&request, &table, "home");
        response.set_status(405);
        response.redirect("home", &[]).unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn refresh_sets_the_refresh_header() {
        let table = table();
        let request = request();
        let mut response = Response::new(&request, &table, "home");
        response.refresh();

        assert_eq!(response.headers()["refresh"], "0");
    }

    #[test]
    fn go_back_follows_the_referer() {
        let table = table();
        let request = request();
        let mut response = Response::new(&request, &table, "home");
        response.go_back().unwrap();

        assert_eq!(response.headers()[LOCATION], "https://example.com/prev");
    }

    #[test]
    fn go_back_without_referer_falls_back_to_root() {
        let table = table();
        let request = Request::builder().scheme("http").domain("example.com").path("/").build();
        let mut response = Response::new(&request, &table, "home");
        response.go_back().unwrap();

        assert_eq!(response.headers()[LOCATION], "/");
    }
}
