//! End-to-end route tests driven through `Server::dispatch`.

use std::path::PathBuf;

use agora_config::AgoraConfig;
use agora_server::{HttpResponse, Server};
use bytes::Bytes;
use http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;

fn server() -> Server {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let mut config = AgoraConfig::default();
    config.site.static_dir = root.join("static");
    config.site.templates_dir = root.join("templates");
    storefront::build_server(&config).unwrap()
}

fn request(method: Method, uri: &str) -> http::request::Builder {
    Request::builder().method(method).uri(uri)
}

async fn send(request: Request<Bytes>) -> HttpResponse {
    server().dispatch(request).await
}

async fn get(uri: &str) -> HttpResponse {
    send(request(Method::GET, uri).body(Bytes::new()).unwrap()).await
}

async fn post_json(uri: &str, body: &str) -> HttpResponse {
    send(
        request(Method::POST, uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Bytes::from(body.to_string()))
            .unwrap(),
    )
    .await
}

async fn body_text(response: HttpResponse) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: HttpResponse) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_root_redirects_home() {
    let response = get("/").await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/home");
}

#[tokio::test]
async fn test_pages_render() {
    let home = body_text(get("/home").await).await;
    assert!(home.contains("<title>Home</title>"));
    assert!(home.contains("This is home page."));

    let response = get("/about").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("This is about page."));
}

#[tokio::test]
async fn test_static_file_served() {
    let response = get("/storage/v1/file/css/style.css").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/css; charset=utf-8"
    );

    let response = get("/storage/v1/file/css/missing.css").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ping() {
    let response = get("/api/v1/ping").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "pong");
}

#[tokio::test]
async fn test_get_user_flags() {
    let plain = body_json(get("/api/v1/users/42").await).await;
    assert_eq!(plain, serde_json::json!({"id": "42", "name": "S.Bakuli"}));

    let full = body_json(get("/api/v1/users/42?isAddress=true&isAdmin=true").await).await;
    assert_eq!(full["pincode"], 101_010);
    assert_eq!(full["city"], "Kolkata");
    assert_eq!(full["is_admin"], true);

    let not_true = body_json(get("/api/v1/users/42?isAddress=yes").await).await;
    assert!(not_true.get("city").is_none());
}

fn signup(gate: Option<&str>) -> Request<Bytes> {
    let mut builder = request(Method::POST, "/api/v1/users")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(value) = gate {
        builder = builder.header("X-Secure-Host", value);
    }
    builder
        .body(Bytes::from_static(b"name=Asha&pincode=700001&city=Kolkata"))
        .unwrap()
}

#[tokio::test]
async fn test_signup_requires_gate_header() {
    let response = send(signup(None)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_text(response).await, "You are not authorized...");

    let response = send(signup(Some("3001"))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_signup_gate_rejects_non_ascii_header() {
    let request = request(Method::POST, "/api/v1/users")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(
            "X-Secure-Host",
            header::HeaderValue::from_bytes(b"3000\xc3\xa9").unwrap(),
        )
        .body(Bytes::from_static(b"name=Asha"))
        .unwrap();

    let response = send(request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_signup_accepted() {
    let response = send(signup(Some("3000"))).await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let body = body_json(response).await;
    assert_eq!(body["name"], "Asha");
    assert_eq!(body["pincode"], "700001");
    assert_eq!(body["city"], "Kolkata");
    assert_eq!(body["is_admin"], "false");
}

#[tokio::test]
async fn test_signup_multipart() {
    let body = "--b0undary\r\n\
        Content-Disposition: form-data; name=\"name\"\r\n\r\n\
        Asha\r\n\
        --b0undary\r\n\
        Content-Disposition: form-data; name=\"isAdmin\"\r\n\r\n\
        true\r\n\
        --b0undary--\r\n";
    let request = request(Method::POST, "/api/v1/users")
        .header(header::CONTENT_TYPE, "multipart/form-data; boundary=b0undary")
        .header("X-Secure-Host", "3000")
        .body(Bytes::from(body))
        .unwrap();

    let response = send(request).await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let body = body_json(response).await;
    assert_eq!(body["name"], "Asha");
    assert_eq!(body["city"], "");
    assert_eq!(body["is_admin"], "true");
}

#[tokio::test]
async fn test_add_user() {
    let response = post_json("/api/v1/user", r#"{"id": "7", "name": "Ravi"}"#).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "User is added...");

    let response = post_json("/api/v1/user", r#"{"id": "7", "#).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "DESERIALIZATION_FAILED");
}

#[tokio::test]
async fn test_add_customer() {
    let response = post_json(
        "/api/v1/customers",
        r#"{"email": "asha@example.com", "password": "s3cret_pass", "role": "Admin",
            "street_address": "Park Street", "street_number": 12}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Customer is added...");
}

#[tokio::test]
async fn test_customer_zero_street_number_is_supplied() {
    let response = post_json(
        "/api/v1/customers",
        r#"{"email":"a@b.com","password":"abcdefgh","role":"Admin","street_address":"","street_number":0}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(
        "/api/v1/customers",
        r#"{"email":"a@b.com","password":"abcdefgh","role":"Admin","street_address":"Main St","street_number":0}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_customer_street_number_required_with_address() {
    let response = post_json(
        "/api/v1/customers",
        r#"{"email":"a@b.com","password":"abcdefgh","role":"Admin","street_address":"Main St"}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    let violations = body["error"]["violations"].as_array().unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0]["field"], "street_number");
    assert_eq!(violations[0]["rule"], "required_with");
}

#[tokio::test]
async fn test_customer_violations_reported_together() {
    let response = post_json(
        "/api/v1/customers",
        r#"{"email": "not-an-email", "password": "ab-cdefg", "role": "Guest",
            "street_address": "Park Street"}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
    let failed: Vec<(String, String)> = body["error"]["violations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| {
            (
                v["field"].as_str().unwrap().to_string(),
                v["rule"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    let expected = [
        ("email", "email"),
        ("password", "password"),
        ("role", "oneof"),
        ("street_number", "required_with"),
    ];
    assert_eq!(
        failed,
        expected
            .iter()
            .map(|(f, r)| ((*f).to_string(), (*r).to_string()))
            .collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_customer_street_number_type() {
    let response = post_json(
        "/api/v1/customers",
        r#"{"email": "asha@example.com", "password": "s3cret_pass", "role": "Basic",
            "street_number": "twelve"}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    let violations = body["error"]["violations"].as_array().unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0]["field"], "street_number");
    assert_eq!(violations[0]["rule"], "type");
}

#[tokio::test]
async fn test_customer_json_types_enforced() {
    let response = post_json(
        "/api/v1/customers",
        r#"{"email":"a@b.com","password":12345678,"role":"Admin","street_number":"7"}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    let rules: Vec<&str> = body["error"]["violations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["rule"].as_str().unwrap())
        .collect();
    assert_eq!(rules, vec!["type", "type"]);
}

#[tokio::test]
async fn test_unknown_route_and_method() {
    let response = get("/api/v1/nothing").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(request(Method::DELETE, "/api/v1/ping").body(Bytes::new()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(response.headers().contains_key(header::ALLOW));
}
