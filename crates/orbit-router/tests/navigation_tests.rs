//! Explicit navigation: target resolution, payload replacement, history
//! pushes, and error surfacing.

use orbit_core::{Payload, RouterConfig};
use orbit_router::{NavigationRequest, RouterError};
use orbit_testkit::{init_tracing, TestBench, TopicCollector};

fn two_route_bench() -> TestBench {
    let bench = TestBench::new();
    bench.install_view("homeVM", "<h1>home</h1>");
    bench.install_view("userVM", "<h1>user</h1>");
    bench.router.route("home").to("homeVM").unwrap();
    bench.router.route("user/:id").to("userVM").unwrap();
    bench
}

/// Navigate pushes the location and renders the target
#[tokio::test]
async fn test_navigate_renders_target_view() {
    init_tracing();
    let bench = two_route_bench();

    bench.router.navigate("home").await.unwrap();

    assert!(bench.dom.id_visible(&bench.region_of("homeVM")));
    assert!(!bench.dom.id_visible(&bench.region_of("userVM")));
    assert_eq!(bench.history.pushed(), vec!["home".to_string()]);
}

/// A concrete target resolves a parameterized route and extracts params
#[tokio::test]
async fn test_navigate_resolves_parameterized_target() {
    let bench = two_route_bench();
    let collector = TopicCollector::new();
    bench.router.channel().subscribe("*", collector.subscriber());

    bench.router.navigate("home").await.unwrap();
    bench.router.navigate("user/7").await.unwrap();

    assert!(bench.dom.id_visible(&bench.region_of("userVM")));
    assert!(!bench.dom.id_visible(&bench.region_of("homeVM")));
    assert_eq!(bench.router.payload().get("id"), Some("7"));
    let docked = collector.last_payload_of("userVM.docked").unwrap();
    assert_eq!(docked.get("id"), Some("7"));
    assert_eq!(
        bench.history.pushed(),
        vec!["home".to_string(), "user/7".to_string()]
    );
}

/// Navigation to an unregistered target fails and pushes nothing
#[tokio::test]
async fn test_navigate_unknown_target_fails() {
    let bench = two_route_bench();

    let err = bench.router.navigate("nowhere").await.unwrap_err();
    assert!(matches!(err, RouterError::RouteNotFound(loc) if loc == "nowhere"));
    assert!(bench.history.pushed().is_empty());
}

/// Config can let unmatched navigation through
#[tokio::test]
async fn test_navigate_unmatched_allowed_by_config() {
    let config = RouterConfig {
        allow_unmatched_navigation: true,
        ..RouterConfig::default()
    };
    let bench = TestBench::with_config(config);
    bench.install_view("navVM", "<nav></nav>");
    bench.router.static_view("navVM");

    bench.router.navigate("nowhere").await.unwrap();

    assert_eq!(bench.history.pushed(), vec!["nowhere".to_string()]);
    // The scan still ran: the black hole rendered
    assert!(bench.dom.id_visible(&bench.region_of("navVM")));
}

/// A structured request without a location is rejected
#[tokio::test]
async fn test_structured_request_requires_location() {
    let bench = two_route_bench();

    let request = NavigationRequest::Detailed {
        location: None,
        payload: Some(Payload::from_iter([("id", "1")])),
    };
    let err = bench.router.navigate(request).await.unwrap_err();
    assert!(matches!(err, RouterError::MissingLocation));
}

/// An explicit navigation payload replaces, scan extraction merges
#[tokio::test]
async fn test_explicit_payload_replaces_wholesale() {
    let bench = two_route_bench();

    bench
        .router
        .navigate(NavigationRequest::with_payload(
            "home",
            Payload::from_iter([("tab", "main"), ("sort", "asc")]),
        ))
        .await
        .unwrap();
    assert_eq!(bench.router.payload().get("tab"), Some("main"));

    // Unlike scan extraction, an explicit payload does not merge
    bench
        .router
        .navigate(NavigationRequest::with_payload(
            "user/7",
            Payload::from_iter([("tab", "profile")]),
        ))
        .await
        .unwrap();

    let payload = bench.router.payload();
    assert_eq!(payload.get("tab"), Some("profile"));
    assert_eq!(payload.get("sort"), None);
    // The scan then merged the extracted param on top
    assert_eq!(payload.get("id"), Some("7"));
}

/// Attaching a callback to an unknown pattern fails
#[tokio::test]
async fn test_update_route_on_unknown_pattern_fails() {
    let bench = two_route_bench();

    let err = bench
        .router
        .update_route("missing/:id", std::sync::Arc::new(|| {}))
        .unwrap_err();
    assert!(matches!(err, RouterError::RouteNotFound(_)));
}

/// A path changed outside navigate is picked up by the next scan
#[tokio::test]
async fn test_external_location_change_rescans() {
    let bench = two_route_bench();
    let collector = TopicCollector::new();
    bench
        .router
        .channel()
        .subscribe("userVM.docked", collector.subscriber());

    // Browser back/forward changes the path without a push
    bench.history.set_path("/user/9");
    bench.router.scan().await;

    assert_eq!(collector.count_of("userVM.docked"), 1);
    assert_eq!(bench.router.payload().get("id"), Some("9"));
    assert!(bench.history.pushed().is_empty());
}
