use axum::{Router, routing::get};
use reqwest::{Client, StatusCode, header, redirect::Policy};
use serde_json::Value;
use tokio::net::TcpListener;
use warden_adapters::{HashMapSessionStore, StaticTokenBackend};
use warden_axum::{CurrentPrincipal, MaybePrincipal, WardenExtension};
use warden_core::{GateOptions, Mode, Principal, Whitelist};

async fn repos(CurrentPrincipal(principal): CurrentPrincipal) -> String {
    principal.id().to_string()
}

async fn health(MaybePrincipal(principal): MaybePrincipal) -> String {
    match principal {
        Some(principal) => format!("ok {}", principal.id()),
        None => "ok".to_string(),
    }
}

fn router() -> Router {
    Router::new()
        .route("/repos", get(repos))
        .route("/status", get(repos))
        .route("/health", get(health))
}

fn backend() -> StaticTokenBackend {
    StaticTokenBackend::new("x-auth").with_token("valid", Principal::new("42"))
}

async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{address}")
}

fn client() -> Client {
    Client::builder().redirect(Policy::none()).build().unwrap()
}

#[tokio::test]
async fn test_single_page_health_scenario() {
    let app = WardenExtension::new(false)
        .protect(
            router(),
            GateOptions::new()
                .whitelist(Whitelist::literal("/health"))
                .backend(backend()),
        )
        .unwrap();
    let base = spawn(app).await;
    let client = client();

    let health = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(health.status(), StatusCode::OK);
    assert_eq!(health.text().await.unwrap(), "ok");

    let status = client.get(format!("{base}/status")).send().await.unwrap();
    assert_eq!(status.status(), StatusCode::UNAUTHORIZED);
    assert!(status.headers().get(header::LOCATION).is_none());
    assert_eq!(
        status
            .headers()
            .get(header::WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok()),
        Some("Bearer realm=\"warden\"")
    );
    let body: Value = status.json().await.unwrap();
    assert_eq!(body["error"], "unauthorized");

    let authorized = client
        .get(format!("{base}/status"))
        .header("x-auth", "valid")
        .send()
        .await
        .unwrap();
    assert_eq!(authorized.status(), StatusCode::OK);
    assert_eq!(authorized.text().await.unwrap(), "42");
}

#[tokio::test]
async fn test_session_scenario() {
    let app = WardenExtension::new(true)
        .protect(
            router(),
            GateOptions::new()
                .session_store(HashMapSessionStore::new())
                .backend(backend()),
        )
        .unwrap();
    let base = spawn(app).await;
    let client = client();

    let first = client.get(format!("{base}/repos")).send().await.unwrap();
    assert_eq!(first.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        first
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("/auth/login?origin=%2Frepos")
    );
    assert!(first.headers().get(header::SET_COOKIE).is_none());

    let second = client
        .get(format!("{base}/repos"))
        .header("x-auth", "valid")
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    let session = second
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("session cookie")
        .to_string();
    assert!(session.starts_with("warden.session="));
    assert_eq!(second.text().await.unwrap(), "42");

    let third = client
        .get(format!("{base}/repos"))
        .header(header::COOKIE, &session)
        .send()
        .await
        .unwrap();
    assert_eq!(third.status(), StatusCode::OK);
    assert!(third.headers().get(header::SET_COOKIE).is_none());
    assert_eq!(third.text().await.unwrap(), "42");
}

#[tokio::test]
async fn test_session_redirect_keeps_query() {
    let app = WardenExtension::new(true)
        .protect(
            router(),
            GateOptions::new()
                .mode(Mode::Session)
                .session_store(HashMapSessionStore::new()),
        )
        .unwrap();
    let base = spawn(app).await;

    let response = client()
        .get(format!("{base}/repos?page=2"))
        .send()
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("/auth/login?origin=%2Frepos%3Fpage%3D2")
    );
}

#[tokio::test]
async fn test_whitelisted_route_sees_no_principal() {
    let app = WardenExtension::new(false)
        .protect(
            router(),
            GateOptions::new()
                .whitelist(Whitelist::glob("/hea*").unwrap())
                .backend(backend()),
        )
        .unwrap();
    let base = spawn(app).await;

    let response = client()
        .get(format!("{base}/health"))
        .header("x-auth", "valid")
        .send()
        .await
        .unwrap();

    assert_eq!(response.text().await.unwrap(), "ok");
}
