//! End-to-end tests for the country firewall.

use std::net::SocketAddr;

use axum::middleware;
use axum::routing::get;
use axum::Router;

use legacykit::{firewall_middleware, App, KitConfig};

mod common;

async fn serve(app: App) -> SocketAddr {
    let router = Router::new()
        .route("/", get(|| async { "home" }))
        .layer(middleware::from_fn_with_state(app.clone(), firewall_middleware))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(app);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });
    addr
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn banned_country_is_blocked() {
    let geo_addr = common::start_mock_api(|target, _| async move {
        assert!(target.contains("apiKey=geo-key"));
        assert!(target.contains("ip=127.0.0.1"));
        (
            200,
            r#"{"ip": "127.0.0.1", "country_code2": "RU", "country_code3": "RUS"}"#.to_string(),
        )
    })
    .await;

    let mut config = KitConfig::default();
    config.log.file = String::new();
    config.firewall.banned_countries = vec!["RU".to_string()];
    config.firewall.ip2loc.endpoint = format!("http://{geo_addr}/ipgeo");
    config.firewall.ip2loc.api_key = "geo-key".to_string();

    let addr = serve(App::from_config(config).unwrap()).await;
    let response = client()
        .get(format!("http://{addr}/"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 403);
    assert_eq!(response.text().await.unwrap(), "Forbidden");
}

#[tokio::test]
async fn three_letter_code_matches_too() {
    let geo_addr = common::start_mock_api(|_, _| async move {
        (
            200,
            r#"{"country_code2": "KP", "country_code3": "PRK"}"#.to_string(),
        )
    })
    .await;

    let mut config = KitConfig::default();
    config.log.file = String::new();
    config.firewall.banned_countries = vec!["PRK".to_string()];
    config.firewall.ip2loc.endpoint = format!("http://{geo_addr}/ipgeo");

    let addr = serve(App::from_config(config).unwrap()).await;
    let response = client()
        .get(format!("http://{addr}/"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 403);
}

#[tokio::test]
async fn allowed_country_passes_through() {
    let geo_addr = common::start_mock_api(|_, _| async move {
        (
            200,
            r#"{"country_code2": "AU", "country_code3": "AUS"}"#.to_string(),
        )
    })
    .await;

    let mut config = KitConfig::default();
    config.log.file = String::new();
    config.firewall.banned_countries = vec!["RU".to_string()];
    config.firewall.ip2loc.endpoint = format!("http://{geo_addr}/ipgeo");

    let addr = serve(App::from_config(config).unwrap()).await;
    let response = client()
        .get(format!("http://{addr}/"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "home");
}

#[tokio::test]
async fn empty_ban_list_skips_the_lookup() {
    // No geolocation backend at all: the middleware must not call out.
    let mut config = KitConfig::default();
    config.log.file = String::new();
    config.firewall.ip2loc.endpoint = "http://127.0.0.1:9/ipgeo".to_string();

    let addr = serve(App::from_config(config).unwrap()).await;
    let response = client()
        .get(format!("http://{addr}/"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn lookup_failure_is_a_server_error() {
    let mut config = KitConfig::default();
    config.log.file = String::new();
    config.firewall.banned_countries = vec!["RU".to_string()];
    // Unroutable endpoint: the single lookup fails, nothing retries.
    config.firewall.ip2loc.endpoint = "http://127.0.0.1:9/ipgeo".to_string();

    let addr = serve(App::from_config(config).unwrap()).await;
    let response = client()
        .get(format!("http://{addr}/"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
}

#[tokio::test]
async fn blocks_are_recorded_in_the_event_log() {
    let geo_addr = common::start_mock_api(|_, _| async move {
        (
            200,
            r#"{"country_code2": "RU", "country_code3": "RUS"}"#.to_string(),
        )
    })
    .await;

    let log_dir = std::env::temp_dir().join("legacykit-firewall-test");
    std::fs::create_dir_all(&log_dir).unwrap();
    let log_path = log_dir.join(format!("events-{}.log", std::process::id()));
    let _ = std::fs::remove_file(&log_path);

    let mut config = KitConfig::default();
    config.log.file = log_path.to_string_lossy().into_owned();
    config.firewall.banned_countries = vec!["RU".to_string()];
    config.firewall.ip2loc.endpoint = format!("http://{geo_addr}/ipgeo");

    let addr = serve(App::from_config(config).unwrap()).await;
    client()
        .get(format!("http://{addr}/"))
        .send()
        .await
        .unwrap();

    let contents = std::fs::read_to_string(&log_path).unwrap();
    assert!(contents.contains("\tNOTICE\tBlocked access from 127.0.0.1"));
    assert!(contents.contains("\tip=127.0.0.1"));
}
