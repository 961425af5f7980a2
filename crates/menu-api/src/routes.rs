//! Router assembly

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, TraceLayer};
use tracing::warn;

use crate::handlers::{auth, categories, events, health, media, menu_items};
use crate::middleware::require_session;
use crate::state::AppState;

/// Multipart overhead allowed on top of the image size limit.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/categories", get(categories::list_categories))
        .route("/api/v1/menu-items", get(menu_items::list_items))
        .route("/api/v1/menu-items/grouped", get(menu_items::grouped_items))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/media/{*path}", get(media::serve_image));

    // Signed-in admin routes
    let protected_routes = Router::new()
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/me", get(auth::me))
        .route("/api/v1/admin/menu-items", post(menu_items::create_item))
        .route(
            "/api/v1/admin/menu-items/{id}",
            put(menu_items::update_item).delete(menu_items::delete_item),
        )
        .route("/api/v1/admin/events", get(events::event_stream))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    let body_limit = state.config.storage.max_image_bytes + FORM_OVERHEAD_BYTES;
    let cors = cors_layer(&state.config.app.cors_origin);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origin == "*" {
        return layer.allow_origin(Any);
    }
    match origin.parse::<HeaderValue>() {
        Ok(value) => layer.allow_origin(value),
        Err(e) => {
            warn!("Invalid CORS origin '{}' ({}), allowing any origin", origin, e);
            layer.allow_origin(Any)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use menu_core::domain::CategoryCatalog;
    use menu_core::services::{AuthService, EventBus, LifecycleSettings, MenuItemLifecycle};
    use menu_infrastructure::{
        InMemoryAuthProvider, InMemoryDocumentStore, InMemoryObjectStore,
        InMemoryReconciliationJournal, ObjectStoreSettings,
    };
    use menu_security::TokenService;
    use menu_shared::config::AppConfig;

    const BOUNDARY: &str = "menu-test-boundary";
    const ADMIN_EMAIL: &str = "admin@menu.local";
    const ADMIN_PASSWORD: &str = "s3cret-pass";

    fn app() -> Router {
        app_with_lifecycle().0
    }

    fn app_with_lifecycle() -> (Router, Arc<MenuItemLifecycle>) {
        let config = AppConfig::defaults().unwrap();
        let objects = Arc::new(InMemoryObjectStore::new(ObjectStoreSettings {
            chunk_bytes: 64,
            public_base_url: config.storage.public_base_url.clone(),
        }));
        let lifecycle = MenuItemLifecycle::new(
            Arc::new(InMemoryDocumentStore::new()),
            objects.clone(),
            Arc::new(InMemoryReconciliationJournal::new()),
            Arc::new(CategoryCatalog::new(&config.menu.categories).unwrap()),
            Arc::new(EventBus::new(config.menu.event_bus_capacity)),
            LifecycleSettings {
                collection: config.menu.collection.clone(),
                max_image_bytes: config.storage.max_image_bytes,
            },
        );
        let provider = InMemoryAuthProvider::new(TokenService::new("route-tests".into()), 600);
        provider.add_admin(ADMIN_EMAIL, ADMIN_PASSWORD).unwrap();

        let lifecycle = Arc::new(lifecycle);
        let router = build_router(AppState::new(
            lifecycle.clone(),
            Arc::new(AuthService::new(Arc::new(provider))),
            objects,
            config,
        ));
        (router, lifecycle)
    }

    fn multipart(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Body {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                    BOUNDARY, name, value
                )
                .as_bytes(),
            );
        }
        if let Some((filename, bytes)) = image {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                    BOUNDARY, filename
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        Body::from(body)
    }

    fn form_request(method: Method, uri: &str, token: &str, body: Body) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(body)
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn get_uri(app: &Router, uri: &str) -> Response {
        app.clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn login(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(
                Request::post("/api/v1/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        body["data"]["access_token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_and_categories() {
        let app = app();
        assert_eq!(get_uri(&app, "/health").await.status(), StatusCode::OK);

        let body = json_body(get_uri(&app, "/api/v1/categories").await).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["filters"][0], "All Items");
        assert_eq!(body["data"]["categories"][0], "Breakfast");
        assert!(body["data"]["in_use"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_admin_routes_require_session() {
        let app = app();
        let response = app
            .clone()
            .oneshot(
                Request::delete("/api/v1/admin/menu-items/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .clone()
            .oneshot(
                Request::get("/api/v1/auth/me")
                    .header(header::AUTHORIZATION, "Bearer forged")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized() {
        let app = app();
        let response = app
            .oneshot(
                Request::post("/api/v1/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({ "email": ADMIN_EMAIL, "password": "nope" }).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_item_lifecycle_over_http() {
        let app = app();
        let token = login(&app).await;

        // Create with image
        let response = app
            .clone()
            .oneshot(form_request(
                Method::POST,
                "/api/v1/admin/menu-items",
                &token,
                multipart(
                    &[("name", " Burger "), ("price", "150"), ("category", "Burgers")],
                    Some(("a.jpg", &[0xFFu8, 0xD8, 0xFF, 0xE0, 1, 2, 3][..])),
                ),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = json_body(response).await["data"].clone();
        let id = created["id"].as_str().unwrap().to_string();
        let image_path = created["imagePath"].as_str().unwrap().to_string();
        assert_eq!(created["name"], "Burger");
        assert_eq!(image_path, format!("menuItems/{}/a.jpg", id));

        // Image is served under /media
        let response = get_uri(&app, &format!("/media/{}", image_path)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");

        // Update without a new image keeps the stored one
        let response = app
            .clone()
            .oneshot(form_request(
                Method::PUT,
                &format!("/api/v1/admin/menu-items/{}", id),
                &token,
                multipart(
                    &[
                        ("name", "Cheeseburger"),
                        ("price", "170"),
                        ("category", "Burgers"),
                        ("existing_image_path", image_path.as_str()),
                    ],
                    None,
                ),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated = json_body(response).await["data"].clone();
        assert_eq!(updated["imagePath"], image_path.as_str());

        let body = json_body(get_uri(&app, "/api/v1/categories").await).await;
        assert_eq!(body["data"]["in_use"], json!(["Burgers"]));

        // Filtered listing
        let body = json_body(get_uri(&app, "/api/v1/menu-items?category=Burgers").await).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        let body = json_body(get_uri(&app, "/api/v1/menu-items?category=Pizza").await).await;
        assert!(body["data"].as_array().unwrap().is_empty());

        // Delete
        let response = app
            .clone()
            .oneshot(
                Request::delete(format!(
                    "/api/v1/admin/menu-items/{}?image_path={}",
                    id, image_path
                ))
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(get_uri(&app, "/api/v1/menu-items").await).await;
        assert!(body["data"].as_array().unwrap().is_empty());
        assert_eq!(
            get_uri(&app, &format!("/media/{}", image_path)).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_create_completes_after_client_disconnects() {
        let (app, lifecycle) = app_with_lifecycle();
        let token = login(&app).await;
        let mut events = lifecycle.events().subscribe();
        let image = [7u8; 4096];

        let request = form_request(
            Method::POST,
            "/api/v1/admin/menu-items",
            &token,
            multipart(
                &[("name", "Latte"), ("price", "95"), ("category", "Beverages")],
                Some(("latte.jpg", &image[..])),
            ),
        );
        // Drop the request as soon as the upload starts reporting progress
        tokio::select! {
            _ = app.clone().oneshot(request) => panic!("request finished before upload progress"),
            _ = events.recv() => {}
        }

        let mut items = Vec::new();
        for _ in 0..200 {
            items = lifecycle.list().await.unwrap();
            if !items.is_empty() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Latte");
        assert!(items[0].image_path.ends_with("/latte.jpg"));
    }

    #[tokio::test]
    async fn test_invalid_input_is_bad_request() {
        let app = app();
        let token = login(&app).await;

        let response = app
            .clone()
            .oneshot(form_request(
                Method::POST,
                "/api/v1/admin/menu-items",
                &token,
                multipart(&[("name", "Sushi"), ("price", "90"), ("category", "Sushi")], None),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .clone()
            .oneshot(form_request(
                Method::PUT,
                "/api/v1/admin/menu-items/missing",
                &token,
                multipart(&[("name", "Tea"), ("price", "20"), ("category", "Beverages")], None),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_logout_revokes_token() {
        let app = app();
        let token = login(&app).await;

        let me = Request::get("/api/v1/auth/me")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        assert_eq!(app.clone().oneshot(me).await.unwrap().status(), StatusCode::OK);

        let logout = Request::post("/api/v1/auth/logout")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        assert_eq!(app.clone().oneshot(logout).await.unwrap().status(), StatusCode::OK);

        let me = Request::get("/api/v1/auth/me")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        assert_eq!(
            app.clone().oneshot(me).await.unwrap().status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
