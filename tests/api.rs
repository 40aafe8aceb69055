use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    routing::get,
};
use serde_json::{Value, json};
use tower::ServiceExt;

use users_api::{
    app::build_router,
    config::Config,
    middleware,
    state::AppState,
};

fn config(extra: &[(&str, &str)]) -> Config {
    let mut env: HashMap<String, String> = HashMap::from([("PORT".into(), "3000".into())]);
    env.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    Config::from_lookup(|key| env.get(key).cloned()).expect("test config")
}

fn app_with(extra: &[(&str, &str)]) -> Router {
    let config = config(extra);
    build_router(AppState::from_config(&config.admission), &config)
}

fn app() -> Router {
    app_with(&[])
}

fn get_req(uri: &str, user_agent: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(ua) = user_agent {
        builder = builder.header(header::USER_AGENT, ua);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_req(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::USER_AGENT, "test-agent")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn valid_token_and_header_lists_users() {
    let (status, body) = send(&app(), get_req("/api/users?token=123", Some("test-agent"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn wrong_token_is_unauthorized() {
    let (status, body) = send(&app(), get_req("/api/users?token=wrong", Some("test-agent"))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"message": "Unauthorized: Invalid Token"}));
}

#[tokio::test]
async fn bad_or_missing_token_is_401_regardless_of_header() {
    let app = app();
    for uri in ["/api/users", "/api/users?token=", "/api/users?token=wrong"] {
        for ua in [Some("test-agent"), None] {
            let (status, body) = send(&app, get_req(uri, ua)).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri} ua={ua:?}");
            assert_eq!(body, json!({"message": "Unauthorized: Invalid Token"}));
        }
    }
}

#[tokio::test]
async fn missing_user_agent_is_bad_request() {
    let (status, body) = send(&app(), get_req("/api/users?token=123", None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"message": "Bad Request: Missing User-Agent header"}));
}

#[tokio::test]
async fn empty_user_agent_is_bad_request() {
    let (status, _) = send(&app(), get_req("/api/users?token=123", Some(""))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn header_first_order_rejects_missing_header_before_token() {
    let app = app_with(&[("GATE_ORDER", "header,token")]);

    for uri in ["/api/users", "/api/users?token=wrong", "/api/users?token=123"] {
        let (status, body) = send(&app, get_req(uri, None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body, json!({"message": "Bad Request: Missing User-Agent header"}));
    }
}

#[tokio::test]
async fn admitted_request_reaches_handler_exactly_once() {
    let config = config(&[]);
    let state = AppState::from_config(&config.admission);
    let hits = Arc::new(AtomicUsize::new(0));

    let counter = hits.clone();
    let routes: Router<AppState> = Router::new().route(
        "/ping",
        get(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                "ok"
            }
        }),
    );
    let app: Router = Router::new()
        .nest("/api", middleware::admission::apply(routes, state.clone()))
        .with_state(state);

    let res = app
        .clone()
        .oneshot(get_req("/api/ping?token=123", Some("test-agent")))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let res = app
        .oneshot(get_req("/api/ping?token=wrong", Some("test-agent")))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn create_then_fetch_user() {
    let app = app();
    let user = json!({"id": 1, "name": "Alice", "email": "alice@example.com"});

    let (status, body) = send(&app, post_req("/api/users?token=123", user.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, user);

    let (status, body) = send(&app, get_req("/api/users/1?token=123", Some("test-agent"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, user);

    let (status, body) = send(&app, get_req("/api/users?token=123", Some("test-agent"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([user]));
}

#[tokio::test]
async fn invalid_payload_lists_every_violation() {
    let (status, body) = send(
        &app(),
        post_req(
            "/api/users?token=123",
            json!({"id": -1, "name": "Al", "email": "not-an-email"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Unprocessable Entity: Invalid user payload");

    let fields: Vec<(&str, &str)> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| (v["field"].as_str().unwrap(), v["kind"].as_str().unwrap()))
        .collect();
    assert_eq!(
        fields,
        vec![
            ("id", "constraint"),
            ("name", "constraint"),
            ("email", "constraint"),
        ]
    );
}

#[tokio::test]
async fn rejected_payload_is_not_stored() {
    let app = app();
    send(
        &app,
        post_req("/api/users?token=123", json!({"id": 9, "name": "Al", "email": "al@example.com"})),
    )
    .await;

    let (status, _) = send(&app, get_req("/api/users/9?token=123", Some("test-agent"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn post_is_gated_before_body_validation() {
    let req = Request::builder()
        .method("POST")
        .uri("/api/users?token=wrong")
        .header(header::USER_AGENT, "test-agent")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&app(), req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"message": "Unauthorized: Invalid Token"}));
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let req = Request::builder()
        .method("POST")
        .uri("/api/users?token=123")
        .header(header::USER_AGENT, "test-agent")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&app(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"message": "Bad Request: Malformed JSON body"}));
}

#[tokio::test]
async fn duplicate_id_conflicts() {
    let app = app();
    let user = json!({"id": 3, "name": "Carol", "email": "carol@example.com"});

    let (status, _) = send(&app, post_req("/api/users?token=123", user.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, post_req("/api/users?token=123", user)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({"message": "Conflict: User 3 already exists"}));
}

#[tokio::test]
async fn unknown_and_invalid_ids() {
    let app = app();

    let (status, body) = send(&app, get_req("/api/users/42?token=123", Some("test-agent"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "User not found"}));

    let (status, body) = send(&app, get_req("/api/users/abc?token=123", Some("test-agent"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"message": "Bad Request: Invalid user id"}));
}

#[tokio::test]
async fn allowlist_filters_header_values() {
    let app = app_with(&[("HEADER_ALLOWLIST", "Thunder Client (https://www.thunderclient.com)")]);

    let (status, _) = send(
        &app,
        get_req(
            "/api/users?token=123",
            Some("Thunder Client (https://www.thunderclient.com)"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, get_req("/api/users?token=123", Some("curl/8.0"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"message": "Bad Request: Missing User-Agent header"}));
}

#[tokio::test]
async fn custom_token_replaces_default() {
    let app = app_with(&[("API_TOKEN", "s3cret")]);

    let (status, _) = send(&app, get_req("/api/users?token=123", Some("test-agent"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, get_req("/api/users?token=s3cret", Some("test-agent"))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn health_is_outside_the_pipeline() {
    let (status, body) = send(&app(), get_req("/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn request_id_is_set_on_rejections_too() {
    let res = app()
        .oneshot(get_req("/api/users?token=wrong", Some("test-agent")))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let (status, body) = send(&app(), get_req("/nope", Some("test-agent"))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "Route not found"}));
}

#[tokio::test]
async fn wrong_method_is_json_405() {
    let req = Request::builder()
        .method("DELETE")
        .uri("/api/users?token=123")
        .header(header::USER_AGENT, "test-agent")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(&app(), req).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({"message": "Method Not Allowed"}));
}

#[tokio::test]
async fn oversized_body_with_content_length_is_json_413() {
    let app = app_with(&[("REQUEST_BODY_LIMIT_BYTES", "64")]);
    let payload = json!({"id": 1, "name": "a".repeat(200), "email": "a@b.co"}).to_string();

    let req = Request::builder()
        .method("POST")
        .uri("/api/users?token=123")
        .header(header::USER_AGENT, "test-agent")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, payload.len())
        .body(Body::from(payload))
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(res.headers().contains_key("x-request-id"));

    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"message": "Payload Too Large"}));
}

#[tokio::test]
async fn oversized_streamed_body_is_json_413() {
    let app = app_with(&[("REQUEST_BODY_LIMIT_BYTES", "64")]);
    let payload = json!({"id": 1, "name": "a".repeat(200), "email": "a@b.co"});

    let (status, body) = send(&app, post_req("/api/users?token=123", payload)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body, json!({"message": "Payload Too Large"}));
}

#[tokio::test]
async fn post_without_json_content_type_is_bad_request() {
    let req = Request::builder()
        .method("POST")
        .uri("/api/users?token=123")
        .header(header::USER_AGENT, "test-agent")
        .body(Body::from(r#"{"id":1,"name":"Alice","email":"a@b.co"}"#))
        .unwrap();

    let (status, body) = send(&app(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"message": "Bad Request: Expected Content-Type: application/json"})
    );
}

#[tokio::test]
async fn non_object_body_is_a_body_type_violation() {
    let (status, body) = send(&app(), post_req("/api/users?token=123", json!([1, 2]))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["errors"],
        json!([{"field": "body", "kind": "type", "message": "body must be a JSON object"}])
    );
}

#[tokio::test]
async fn integral_float_id_is_accepted() {
    let (status, body) = send(
        &app(),
        post_req(
            "/api/users?token=123",
            json!({"id": 1.0, "name": "Alice", "email": "alice@example.com"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], json!(1));
}

#[tokio::test]
async fn slow_request_times_out_with_json_408() {
    let config = config(&[("REQUEST_TIMEOUT_SECONDS", "1")]);
    let slow: Router = Router::new().route(
        "/slow",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            "late"
        }),
    );
    let app = middleware::http::apply(slow, &config);

    let (status, body) = send(&app, get_req("/slow", Some("test-agent"))).await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(body, json!({"message": "Request Timeout"}));
}
