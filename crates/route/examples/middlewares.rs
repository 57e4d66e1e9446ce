use http::Method;
use micro_request::Request;
use micro_route::{
    controller_fn, middleware_fn, ControllerRef, Registry, RouteDef, RouterError, RouteTable, Router,
};
use serde_json::json;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<(), RouterError> {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let registry = Registry::builder()
        .controller("Pages", "home", controller_fn(|_request, _response| {
            println!("home page");
        }))
        .controller("Account", "profile", controller_fn(|_request, response| {
            println!("profile of user {}", response.params().get("name").unwrap_or("?"));
        }))
        .controller("Pages", "error", controller_fn(|_request, response| {
            println!("error page, status line: {}", response.status_line());
        }))
        // remembers the visited profile in the session, before the controller runs
        .middleware("visited", middleware_fn(|params, request, _response| {
            if let Some(name) = params.get("name") {
                request.session().set("last_profile", json!(name));
            }
        }))
        // anonymous users get bounced to the home page; the decided status stays
        .middleware("auth", middleware_fn(|_params, request, response| {
            if request.session().get("user_id").is_none() {
                response.redirect("home", &[]).expect("home route is registered");
            }
        }))
        .build();

    let mut table = RouteTable::new(registry);
    table.feed([
        ("home".to_string(), RouteDef::new("/", ControllerRef::new("Pages", "home"))),
        (
            "profile".to_string(),
            RouteDef::new("/user/{name:string}", ControllerRef::new("Account", "profile"))
                .middlewares(["visited", "auth"]),
        ),
        ("error404".to_string(), RouteDef::new("/error/404", ControllerRef::new("Pages", "error"))),
        ("error405".to_string(), RouteDef::new("/error/405", ControllerRef::new("Pages", "error"))),
    ])?;

    let router = Router::new(table);

    let request = Request::builder().domain("example.com").path("/user/ada").method(Method::GET).build();
    let response = router.dispatch(&request)?;

    info!(
        status = %response.status(),
        route = response.route_name(),
        location = ?response.headers().get(http::header::LOCATION),
        last_profile = ?request.session().get("last_profile"),
        "dispatched"
    );

    Ok(())
}
