//! End-to-end dispatch over a real socket.

use std::fs;
use std::time::Duration;

use axum::http::StatusCode;
use jester::{Action, Dispatcher, JesterConfig, RedirectTo, RequestContext, Response, RouteTable};
use serde_json::{json, Value};

mod common;

fn routes() -> RouteTable {
    let mut routes = RouteTable::new();
    routes
        .get(
            "/",
            Action::new("Home", "index", |_: &RequestContext, args: &[String]| {
                Response::json(&json!({ "page": "home", "args": args }))
            }),
        )
        .get(
            "/users/{id}",
            Action::new("Users", "show", |_: &RequestContext, args: &[String]| {
                Response::json(&json!({ "id": args[0] }))
            }),
        )
        .post(
            "/users/{id}",
            Action::new("Users", "update", |_: &RequestContext, args: &[String]| {
                Response::json(&json!({ "updated": args[0] }))
            }),
        )
        .get(
            "/search",
            Action::new("Search", "index", |req: &RequestContext, _: &[String]| {
                Response::json(&req.query)
            }),
        )
        .get(
            "/welcome/{name}",
            Action::new("Pages", "welcome", |_: &RequestContext, args: &[String]| {
                Response::view("welcome", json!({ "name": args[0] }))
            }),
        );
    routes
}

#[tokio::test]
async fn test_routes_dispatch_by_method_and_path() {
    let server = common::start_server(JesterConfig::default(), Dispatcher::new(routes())).await;
    let client = common::client();

    let res = client.get(server.url("/users/42/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "id": "42" }));

    let res = client.post(server.url("/users/42")).send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "updated": "42" }));

    let res = client.get(server.url("/")).send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "page": "home", "args": [] }));

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_query_is_decoded_in_order() {
    let server = common::start_server(JesterConfig::default(), Dispatcher::new(routes())).await;
    let client = common::client();

    let res = client.get(server.url("/search?b=2&a=1&b=3&flag")).send().await.unwrap();
    let text = res.text().await.unwrap();
    assert_eq!(text, r#"{"b":"3","a":"1","flag":""}"#);

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_unmatched_request_uses_fallback() {
    let dispatcher = Dispatcher::new(routes()).with_fallback(RedirectTo::new("/"));
    let server = common::start_server(JesterConfig::default(), dispatcher).await;
    let client = common::client();

    let res = client.delete(server.url("/users/42")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(res.headers().get("location").unwrap(), "/");

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_unmatched_request_without_fallback_is_404() {
    let server = common::start_server(JesterConfig::default(), Dispatcher::new(routes())).await;
    let client = common::client();

    let res = client.get(server.url("/nothing/here")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.headers().contains_key("x-request-id"));

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_views_render_from_directory() {
    let views = tempfile::tempdir().unwrap();
    fs::write(views.path().join("welcome.html"), "<h1>Welcome, ${name}</h1>").unwrap();

    let mut config = JesterConfig::default();
    config.app.views_dir = views.path().to_string_lossy().into_owned();

    let server = common::start_server(config, Dispatcher::new(routes())).await;
    let client = common::client();

    let res = client.get(server.url("/welcome/Jamie")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "<h1>Welcome, Jamie</h1>");

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_shutdown_stops_server() {
    let server = common::start_server(JesterConfig::default(), Dispatcher::new(routes())).await;

    server.shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), server.handle)
        .await
        .expect("server did not stop");
    assert!(result.unwrap().is_ok());
}
