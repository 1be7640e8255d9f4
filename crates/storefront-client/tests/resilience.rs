#![allow(clippy::expect_used, reason = "integration test — panics are the assertion mechanism")]

use std::sync::Arc;
use std::time::{Duration, Instant};
use storefront_client::{ApiError, StorefrontClient};
use storefront_core::{CookieEntry, MemorySessionStore, SessionStore};
use storefront_types::config::storage_keys;
use storefront_types::{ClientConfig, Credentials, RetryConfig, StoreSettings};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(base_url: String) -> ClientConfig {
    ClientConfig {
        base_url,
        retry: RetryConfig {
            transport_retries: 2,
            transport_delay_ms: 25,
            csrf_retries: 1,
        },
        ..ClientConfig::default()
    }
}

fn test_client(base_url: String) -> (StorefrontClient, Arc<MemorySessionStore>) {
    let store = Arc::new(MemorySessionStore::new());
    let client =
        StorefrontClient::new(test_config(base_url), store.clone()).expect("client builds");
    (client, store)
}

fn products_body() -> serde_json::Value {
    serde_json::json!([{
        "id": 1,
        "name": "Mug",
        "slug": "mug",
        "price_cents": 900,
        "category_id": 1,
        "available": true
    }])
}

fn settings_body() -> serde_json::Value {
    serde_json::json!({
        "store_name": "Shop",
        "contact_email": "owner@shop.test",
        "currency": "EUR"
    })
}

fn csrf_bootstrap(token: &str) -> ResponseTemplate {
    ResponseTemplate::new(204).insert_header(
        "set-cookie",
        format!("XSRF-TOKEN={token}; Path=/").as_str(),
    )
}

#[tokio::test]
async fn test_431_prunes_route_cookies_and_retries() {
    let server = MockServer::start().await;
    let (client, _store) = test_client(server.uri());

    client.with_cookies(|jar| {
        for i in 0..5 {
            jar.set(CookieEntry::new(format!("rt_{i}"), format!("{i:03}")));
        }
    });

    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(431))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products_body()))
        .expect(1)
        .mount(&server)
        .await;

    let products = client.products().await.expect("retry succeeds");
    assert_eq!(products.len(), 1);

    let route_cookies =
        client.with_cookies(|jar| jar.iter().filter(|e| e.name.starts_with("rt_")).count());
    assert_eq!(route_cookies, 2, "route cookies pruned to the configured keep");
}

#[tokio::test]
async fn test_read_degrades_to_empty_after_exhausted_retries() {
    // Nothing is listening here: every attempt is the status-0 analogue.
    let (client, _store) = test_client("http://127.0.0.1:1".to_string());

    let started = Instant::now();
    let products = client.products().await.expect("read degrades, not fails");

    assert!(products.is_empty());
    assert!(
        started.elapsed() >= Duration::from_millis(50),
        "two retries must wait out the configured delay"
    );
}

#[tokio::test]
async fn test_write_propagates_transport_failure() {
    let (client, _store) = test_client("http://127.0.0.1:1".to_string());

    let result = client.update_settings(&StoreSettings::default()).await;
    assert!(matches!(result, Err(ApiError::Network(_))));
}

#[tokio::test]
async fn test_419_refreshes_token_and_replays_once() {
    let server = MockServer::start().await;
    let (client, _store) = test_client(server.uri());

    Mock::given(method("GET"))
        .and(path("/sanctum/csrf-cookie"))
        .respond_with(csrf_bootstrap("fresh-token"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/settings"))
        .respond_with(ResponseTemplate::new(419))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    // The replay must carry the refreshed token.
    Mock::given(method("PUT"))
        .and(path("/api/settings"))
        .and(header("X-XSRF-TOKEN", "fresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(settings_body()))
        .expect(1)
        .mount(&server)
        .await;

    let settings = client
        .update_settings(&StoreSettings::default())
        .await
        .expect("419 recovered by one refresh + replay");
    assert_eq!(settings.store_name, "Shop");
}

#[tokio::test]
async fn test_second_419_propagates() {
    let server = MockServer::start().await;
    let (client, _store) = test_client(server.uri());

    Mock::given(method("GET"))
        .and(path("/sanctum/csrf-cookie"))
        .respond_with(csrf_bootstrap("fresh-token"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/settings"))
        .respond_with(ResponseTemplate::new(419))
        .expect(2)
        .mount(&server)
        .await;

    let result = client.update_settings(&StoreSettings::default()).await;
    assert!(matches!(result, Err(ApiError::CsrfMismatch)));
}

#[tokio::test]
async fn test_concurrent_refresh_collapses_to_one_bootstrap() {
    let server = MockServer::start().await;
    let (client, _store) = test_client(server.uri());

    Mock::given(method("GET"))
        .and(path("/sanctum/csrf-cookie"))
        .respond_with(csrf_bootstrap("token").set_delay(Duration::from_millis(150)))
        .expect(1)
        .mount(&server)
        .await;

    let refreshes = futures::future::join_all((0..8).map(|_| client.csrf().refresh())).await;
    assert!(refreshes.iter().all(Result::is_ok));
}

#[tokio::test]
async fn test_bootstrap_falls_back_to_alternate_endpoint() {
    let server = MockServer::start().await;
    let (client, _store) = test_client(server.uri());

    Mock::given(method("GET"))
        .and(path("/sanctum/csrf-cookie"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/csrf-cookie"))
        .respond_with(csrf_bootstrap("alt-token"))
        .expect(1)
        .mount(&server)
        .await;

    client.csrf().initialize().await.expect("alternate endpoint succeeds");
    assert_eq!(client.csrf().token().as_deref(), Some("alt-token"));
}

#[tokio::test]
async fn test_401_clears_local_session() {
    let server = MockServer::start().await;
    let (client, store) = test_client(server.uri());
    store.put(storage_keys::ACCESS_TOKEN, "tok");
    store.put(storage_keys::CURRENT_USER, r#"{"id":1,"name":"A","email":"a@b.c"}"#);

    Mock::given(method("GET"))
        .and(path("/api/user"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.current_user().await;
    assert!(matches!(result, Err(ApiError::Unauthorized)));
    assert!(store.get(storage_keys::ACCESS_TOKEN).is_none());
    assert!(store.get(storage_keys::CURRENT_USER).is_none());
}

#[tokio::test]
async fn test_422_surfaces_validation_verbatim() {
    let server = MockServer::start().await;
    let (client, _store) = test_client(server.uri());

    Mock::given(method("POST"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
            "message": "The name field is required.",
            "errors": {"name": ["The name field is required."]}
        })))
        .mount(&server)
        .await;

    let result = client
        .create_category(&storefront_client::CategoryInput {
            name: String::new(),
            slug: "x".to_string(),
            image_url: None,
        })
        .await;

    match result {
        Err(ApiError::Validation { message, errors }) => {
            assert_eq!(message, "The name field is required.");
            assert_eq!(errors["name"], vec!["The name field is required."]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_login_bootstraps_csrf_and_persists_session() {
    let server = MockServer::start().await;
    let (client, store) = test_client(server.uri());

    Mock::given(method("GET"))
        .and(path("/sanctum/csrf-cookie"))
        .respond_with(csrf_bootstrap("boot-token"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(header("X-XSRF-TOKEN", "boot-token"))
        .and(header("X-Requested-With", "XMLHttpRequest"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "storefront_session=abc; Path=/")
                .set_body_json(serde_json::json!({
                    "user": {"id": 1, "name": "Admin", "email": "admin@shop.test", "is_admin": true},
                    "token": "bearer-123"
                })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let user = client
        .login(&Credentials {
            email: "admin@shop.test".to_string(),
            password: "secret".to_string(),
        })
        .await
        .expect("login succeeds");

    assert!(user.is_admin);
    assert_eq!(store.get(storage_keys::ACCESS_TOKEN).as_deref(), Some("bearer-123"));
    assert!(store.get(storage_keys::CURRENT_USER).is_some());
    assert_eq!(
        client.with_cookies(|jar| jar.get_value("storefront_session").map(String::from)),
        Some("abc".to_string())
    );
}
