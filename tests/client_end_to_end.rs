//! Client layer driving a live endpoint.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use widget_scout::client::{
    FileStore, HttpParserApi, ParserCache, ParserSubscription, ResultCache, SubscriptionState,
};
use widget_scout::clock::SystemClock;
use widget_scout::DetectionMode;

use helpers::{closed_port, spawn_endpoint};

#[tokio::test]
async fn test_subscription_settles_with_endpoint_result() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<script src="https://mc.yandex.ru/metrika/tag.js"></script>"#),
        )
        .expect(1)
        .mount(&site)
        .await;
    let endpoint = spawn_endpoint(Duration::from_secs(5)).await;

    let cache_dir = tempfile::tempdir().expect("tempdir");
    let store = Arc::new(FileStore::open(cache_dir.path()).expect("store"));
    let cache = Arc::new(ParserCache::new(store, Arc::new(SystemClock)));
    let api = Arc::new(HttpParserApi::new(reqwest::Client::new(), &endpoint.base_url));
    let notifier = widget_scout::client::DetectionNotifier::default();
    let mut events = notifier.subscribe();

    let subscription = ParserSubscription::new(api, cache.clone(), notifier)
        .with_debounce(Duration::from_millis(20));
    let mut rx = subscription.watch();

    subscription.set_input(site.uri(), DetectionMode::All);
    let snapshot = tokio::time::timeout(
        Duration::from_secs(10),
        rx.wait_for(|s| s.state == SubscriptionState::Settled),
    )
    .await
    .expect("settles in time")
    .expect("sender alive")
    .clone();

    let data = snapshot.data.expect("detection data");
    assert_eq!(data.detected.len(), 1);
    assert_eq!(data.detected[0].id, "yandexMetrika");

    let event = events.recv().await.expect("broadcast");
    assert_eq!(event.result, data);

    // Written through to the file-backed cache
    assert_eq!(cache.get(&site.uri()), Some(data));

    // Same input again is served from cache: the site mock expects one hit
    subscription.set_input(site.uri(), DetectionMode::All);
    tokio::time::timeout(
        Duration::from_secs(10),
        rx.wait_for(|s| s.state == SubscriptionState::Settled),
    )
    .await
    .expect("settles in time")
    .expect("sender alive");

    endpoint.stop().await;
}

#[tokio::test]
async fn test_subscription_receives_fallback_body() {
    let endpoint = spawn_endpoint(Duration::from_secs(5)).await;
    let api = Arc::new(HttpParserApi::new(reqwest::Client::new(), &endpoint.base_url));
    let cache = Arc::new(ParserCache::new(
        Arc::new(widget_scout::client::MemoryStore::new()),
        Arc::new(SystemClock),
    ));

    let subscription = ParserSubscription::new(api, cache, Default::default())
        .with_debounce(Duration::from_millis(20));
    let mut rx = subscription.watch();

    // Passes client-side normalization but the endpoint cannot reach it
    subscription.set_input(format!("http://127.0.0.1:{}", closed_port()), DetectionMode::All);
    let snapshot = tokio::time::timeout(
        Duration::from_secs(10),
        rx.wait_for(|s| s.state == SubscriptionState::Settled),
    )
    .await
    .expect("settles in time")
    .expect("sender alive")
    .clone();

    // Graceful fallback body is a valid, empty result and is not cached
    let data = snapshot.data.expect("fallback body");
    assert!(data.detected.is_empty());
    assert!(data.error.is_some());

    endpoint.stop().await;
}
