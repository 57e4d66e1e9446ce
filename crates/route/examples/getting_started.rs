use http::Method;
use micro_request::Request;
use micro_route::{controller_fn, ControllerRef, Registry, RouteDef, RouterError, RouteTable, Router};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn home(_request: &Request, response: &mut micro_route::Response<'_>) {
    response.set_content_type(&mime::TEXT_HTML);
    println!("home page, status line: {}", response.status_line());
}

fn show_article(_request: &Request, response: &mut micro_route::Response<'_>) {
    println!("article {}, status line: {}", response.params().get("id").unwrap_or("-"), response.status_line());
}

fn error_page(_request: &Request, response: &mut micro_route::Response<'_>) {
    println!("error page, status line: {}", response.status_line());
}

fn main() -> Result<(), RouterError> {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let registry = Registry::builder()
        .controller("Pages", "home", controller_fn(home))
        .controller("Articles", "show", controller_fn(show_article))
        .controller("Pages", "error", controller_fn(error_page))
        .build();

    let mut table = RouteTable::new(registry);
    table.feed([
        ("home".to_string(), RouteDef::new("/", ControllerRef::new("Pages", "home"))),
        (
            "article".to_string(),
            RouteDef::new("/article/{id:int}", ControllerRef::new("Articles", "show")).methods(["GET", "POST"]),
        ),
        ("error404".to_string(), RouteDef::new("/error/404", ControllerRef::new("Pages", "error"))),
        ("error405".to_string(), RouteDef::new("/error/405", ControllerRef::new("Pages", "error"))),
    ])?;

    let router = Router::new(table);

    // a request the hosting environment would hand over per connection
    for (method, path) in [(Method::GET, "/"), (Method::GET, "/article/42"), (Method::DELETE, "/article/42"), (Method::GET, "/nowhere")] {
        let request = Request::builder().domain("example.com").path(path).method(method.clone()).build();
        let response = router.dispatch(&request)?;

        info!(path, method = %method, status = %response.status(), route = response.route_name(), "dispatched");

        // the calling layer resolves the selected route's controller
        let callback = response.route()?.callback().clone();
        let mut response = response;
        if let Some(controller) = router.table().registry().controller(&callback) {
            controller.handle(&request, &mut response);
        }
    }

    Ok(())
}
