//! Route table and handlers.

use std::future::Future;
use std::sync::Arc;

use agora_bind::Record;
use agora_extract::ExtractionContext;
use agora_router::{RouteError, Router};
use agora_server::{response, HandlerRegistry, HttpResponse};
use http::{Method, StatusCode};
use serde::Serialize;
use tracing::{debug, info};

use crate::app::AppState;
use crate::gate;

/// `GET /`
pub const ROOT: &str = "root";
/// `GET /home`
pub const PAGES_HOME: &str = "pages.home";
/// `GET /about`
pub const PAGES_ABOUT: &str = "pages.about";
/// `GET /storage/v1/file/*path`
pub const STORAGE_FILE: &str = "storage.file";
/// `GET /api/v1/ping`
pub const API_PING: &str = "api.ping";
/// `GET /api/v1/users/:id`
pub const USERS_GET: &str = "users.get";
/// `POST /api/v1/users`
pub const USERS_CREATE: &str = "users.create";
/// `POST /api/v1/user`
pub const USER_CREATE: &str = "user.create";
/// `POST /api/v1/customers`
pub const CUSTOMERS_CREATE: &str = "customers.create";

const DEMO_USER_NAME: &str = "S.Bakuli";
const DEMO_PINCODE: u32 = 101_010;
const DEMO_CITY: &str = "Kolkata";

/// Builds the route table.
///
/// # Errors
///
/// Returns a [`RouteError`] if two patterns conflict.
pub fn router() -> Result<Router, RouteError> {
    let mut router = Router::new();
    router.route(Method::GET, "/", ROOT)?;
    router.route(Method::GET, "/home", PAGES_HOME)?;
    router.route(Method::GET, "/about", PAGES_ABOUT)?;

    router
        .group("/storage/v1")
        .route(Method::GET, "/file/*path", STORAGE_FILE)?;

    router
        .group("/api/v1")
        .route(Method::GET, "/ping", API_PING)?
        .route(Method::GET, "/users/:id", USERS_GET)?
        .route(Method::POST, "/users", USERS_CREATE)?
        .route(Method::POST, "/user", USER_CREATE)?
        .route(Method::POST, "/customers", CUSTOMERS_CREATE)?;

    Ok(router)
}

/// Registers a handler for every route in [`router`].
pub fn handlers(state: &Arc<AppState>) -> HandlerRegistry {
    let mut handlers = HandlerRegistry::new();
    handlers
        .register(ROOT, |_ctx| async { response::redirect(StatusCode::TEMPORARY_REDIRECT, "/home") })
        .register(PAGES_HOME, with_state(state, home))
        .register(PAGES_ABOUT, with_state(state, about))
        .register(STORAGE_FILE, with_state(state, storage_file))
        .register(API_PING, |_ctx| async { response::text(StatusCode::OK, "pong") })
        .register(USERS_GET, with_state(state, get_user))
        .register(USERS_CREATE, with_state(state, create_users))
        .register(USER_CREATE, with_state(state, create_user))
        .register(CUSTOMERS_CREATE, with_state(state, create_customer));
    handlers
}

fn with_state<F, Fut>(
    state: &Arc<AppState>,
    handler: F,
) -> impl Fn(ExtractionContext) -> Fut + Send + Sync + 'static
where
    F: Fn(Arc<AppState>, ExtractionContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HttpResponse> + Send + 'static,
{
    let state = Arc::clone(state);
    move |ctx| handler(Arc::clone(&state), ctx)
}

async fn home(state: Arc<AppState>, _ctx: ExtractionContext) -> HttpResponse {
    page(&state, "index.html", "Home", "This is home page.")
}

async fn about(state: Arc<AppState>, _ctx: ExtractionContext) -> HttpResponse {
    page(&state, "about.html", "About", "This is about page.")
}

fn page(state: &AppState, name: &str, title: &str, description: &str) -> HttpResponse {
    match state
        .templates
        .render(name, &[("title", title), ("description", description)])
    {
        Some(html) => response::html(StatusCode::OK, html),
        None => response::error_json(
            StatusCode::INTERNAL_SERVER_ERROR,
            "TEMPLATE_MISSING",
            &format!("Template '{name}' is not loaded"),
        ),
    }
}

async fn storage_file(state: Arc<AppState>, ctx: ExtractionContext) -> HttpResponse {
    state.static_files.serve(&ctx).await
}

#[derive(Debug, Serialize)]
struct UserView<'a> {
    id: &'a str,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pincode: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    city: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_admin: Option<bool>,
}

async fn get_user(state: Arc<AppState>, mut ctx: ExtractionContext) -> HttpResponse {
    let record = match state.binder.bind_request(&mut ctx, &state.schemas.user_lookup).await {
        Ok(record) => record,
        Err(err) => return response::bind_error(&err),
    };

    let with_address = flag(&record, "isAddress");
    let view = UserView {
        id: record.str("id").unwrap_or_default(),
        name: DEMO_USER_NAME,
        pincode: with_address.then_some(DEMO_PINCODE),
        city: with_address.then_some(DEMO_CITY),
        is_admin: flag(&record, "isAdmin").then_some(true),
    };
    response::json(StatusCode::OK, &view)
}

fn flag(record: &Record, name: &str) -> bool {
    record.str(name) == Some("true")
}

#[derive(Debug, Serialize)]
struct SignupView<'a> {
    id: &'a str,
    name: &'a str,
    pincode: &'a str,
    city: &'a str,
    is_admin: &'a str,
}

async fn create_users(state: Arc<AppState>, mut ctx: ExtractionContext) -> HttpResponse {
    if let Err(err) = gate::check(&ctx, &state.secure_host_token) {
        debug!(error = %err, "signup rejected");
        return err.into_response();
    }

    let record = match state.binder.bind_request(&mut ctx, &state.schemas.user_signup).await {
        Ok(record) => record,
        Err(err) => return response::bind_error(&err),
    };

    let view = SignupView {
        id: "01",
        name: record.str("name").unwrap_or_default(),
        pincode: record.str("pincode").unwrap_or_default(),
        city: record.str("city").unwrap_or_default(),
        is_admin: record.str("isAdmin").unwrap_or_default(),
    };
    response::json(StatusCode::ACCEPTED, &view)
}

async fn create_user(state: Arc<AppState>, mut ctx: ExtractionContext) -> HttpResponse {
    match state.binder.bind_request(&mut ctx, &state.schemas.user).await {
        Ok(record) => {
            info!(
                id = record.str("id").unwrap_or_default(),
                name = record.str("name").unwrap_or_default(),
                "user added"
            );
            response::text(StatusCode::OK, "User is added...")
        }
        Err(err) => response::bind_error(&err),
    }
}

async fn create_customer(state: Arc<AppState>, mut ctx: ExtractionContext) -> HttpResponse {
    match state.binder.bind_request(&mut ctx, &state.schemas.customer).await {
        Ok(record) => {
            info!(
                email = record.str("email").unwrap_or_default(),
                role = record.str("role").unwrap_or_default(),
                "customer added"
            );
            response::text(StatusCode::OK, "Customer is added...")
        }
        Err(err) => {
            debug!(error = %err, "customer rejected");
            response::bind_error(&err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_resolves_every_route() {
        let router = router().unwrap();
        let cases = [
            (Method::GET, "/", ROOT),
            (Method::GET, "/home", PAGES_HOME),
            (Method::GET, "/about", PAGES_ABOUT),
            (Method::GET, "/storage/v1/file/css/style.css", STORAGE_FILE),
            (Method::GET, "/api/v1/ping", API_PING),
            (Method::GET, "/api/v1/users/7", USERS_GET),
            (Method::POST, "/api/v1/users", USERS_CREATE),
            (Method::POST, "/api/v1/user", USER_CREATE),
            (Method::POST, "/api/v1/customers", CUSTOMERS_CREATE),
        ];
        for (method, path, expected) in cases {
            let matched = router.match_route(&method, path).unwrap();
            assert_eq!(matched.route_id, expected, "{method} {path}");
        }
        assert_eq!(router.len(), 9);
    }

    #[test]
    fn test_user_view_omits_unset_fields() {
        let view = UserView {
            id: "7",
            name: DEMO_USER_NAME,
            pincode: None,
            city: None,
            is_admin: Some(true),
        };
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value, serde_json::json!({"id": "7", "name": "S.Bakuli", "is_admin": true}));
    }
}
