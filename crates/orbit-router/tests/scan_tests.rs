//! Location scanning: arity matching, param extraction, black holes,
//! callback timing, payload persistence.

use orbit_testkit::{init_tracing, TestBench, TopicCollector};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

/// Scan dispatches on module id and exact segment count
#[tokio::test]
async fn test_scan_matches_by_arity() {
    init_tracing();
    let bench = TestBench::new();
    bench.install_view("listVM", "<ul></ul>");
    bench.install_view("userVM", "<div></div>");
    bench.router.route("user").to("listVM").unwrap();
    bench.router.route("user/:id").to("userVM").unwrap();

    let collector = TopicCollector::new();
    bench.router.channel().subscribe("*", collector.subscriber());

    bench.history.set_path("/user/42");
    bench.router.scan().await;

    // Only the two-segment route matches a two-segment location
    assert_eq!(collector.count_of("userVM.docked"), 1);
    assert_eq!(collector.count_of("listVM.docked"), 0);
    assert!(bench.dom.id_visible(&bench.region_of("userVM")));
    assert!(!bench.dom.id_visible(&bench.region_of("listVM")));
}

/// Positional `:param` segments land in the smuggled payload
#[tokio::test]
async fn test_scan_extracts_positional_params() {
    let bench = TestBench::new();
    bench.install_view("userVM", "<div></div>");
    bench.router.route("user/:id").to("userVM").unwrap();

    let collector = TopicCollector::new();
    bench
        .router
        .channel()
        .subscribe("userVM.docked", collector.subscriber());

    bench.history.set_path("/user/42");
    bench.router.scan().await;

    assert_eq!(bench.router.payload().get("id"), Some("42"));
    let docked = collector.last_payload_of("userVM.docked").unwrap();
    assert_eq!(docked.get("id"), Some("42"));
}

/// A literal mid-pattern segment must equal the path segment
#[tokio::test]
async fn test_scan_requires_literal_segments_to_match() {
    let bench = TestBench::new();
    bench.install_view("editVM", "<div></div>");
    bench.router.route("user/:id/edit").to("editVM").unwrap();

    let collector = TopicCollector::new();
    bench.router.channel().subscribe("*", collector.subscriber());

    bench.history.set_path("/user/42/delete");
    bench.router.scan().await;

    assert_eq!(collector.count_of("editVM.docked"), 0);

    bench.history.set_path("/user/42/edit");
    bench.router.scan().await;

    assert_eq!(collector.count_of("editVM.docked"), 1);
    assert_eq!(bench.router.payload().get("id"), Some("42"));
}

/// Black-hole views render whether or not a route matched
#[tokio::test]
async fn test_static_views_render_on_every_scan() {
    let bench = TestBench::new();
    bench.install_view("navVM", "<nav></nav>");
    bench.router.static_view("navVM");

    let collector = TopicCollector::new();
    bench.router.channel().subscribe("*", collector.subscriber());

    // No route matches this path, the black hole still renders
    bench.history.set_path("/nowhere");
    bench.router.scan().await;
    assert_eq!(collector.count_of("navVM.docked"), 1);
    assert!(bench.dom.id_visible(&bench.region_of("navVM")));

    bench.history.set_path("/elsewhere");
    bench.router.scan().await;
    assert_eq!(collector.count_of("navVM.docked"), 2);
}

/// A route callback fires on every matching scan
#[tokio::test]
async fn test_route_callback_fires_per_match() {
    let bench = TestBench::new();
    bench.install_view("homeVM", "<div></div>");

    let fired = Arc::new(AtomicU32::new(0));
    let fired_clone = fired.clone();
    bench
        .router
        .route("home")
        .to("homeVM")
        .unwrap()
        .then(move || {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

    bench.history.set_path("/home");
    bench.router.scan().await;
    bench.router.scan().await;

    assert_eq!(fired.load(Ordering::SeqCst), 2);
}

/// Callback timing is dispatch, not render completion
#[tokio::test]
async fn test_callback_fires_even_when_render_fails() {
    let bench = TestBench::new();
    // View model known to the loader but bound to no DOM element
    bench
        .loader
        .register(orbit_core::ViewModelSpec::new("ghostVM", "#missing", "ghost.html"));
    let fired = Arc::new(AtomicBool::new(false));
    let fired_clone = fired.clone();
    bench
        .router
        .route("ghost")
        .to("ghostVM")
        .unwrap()
        .then(move || {
            fired_clone.store(true, Ordering::SeqCst);
        })
        .unwrap();

    bench.history.set_path("/ghost");
    bench.router.scan().await;

    // Dispatch happened; the pipeline failure stayed inside the pipeline
    assert!(fired.load(Ordering::SeqCst));
}

/// Smuggled payload outlives the scan that produced it
#[tokio::test]
async fn test_payload_persists_across_scans() {
    let bench = TestBench::new();
    bench.install_view("userVM", "<div></div>");
    bench.install_view("homeVM", "<div></div>");
    bench.router.route("user/:id").to("userVM").unwrap();
    bench.router.route("home").to("homeVM").unwrap();

    bench.history.set_path("/user/42");
    bench.router.scan().await;
    assert_eq!(bench.router.payload().get("id"), Some("42"));

    // A scan with nothing to extract leaves earlier entries in place
    bench.history.set_path("/home");
    bench.router.scan().await;
    assert_eq!(bench.router.payload().get("id"), Some("42"));
}

/// A newer extraction overwrites an older value for the same key
#[tokio::test]
async fn test_later_extraction_overwrites_same_key() {
    let bench = TestBench::new();
    bench.install_view("userVM", "<div></div>");
    bench.router.route("user/:id").to("userVM").unwrap();

    bench.history.set_path("/user/42");
    bench.router.scan().await;
    bench.history.set_path("/user/7");
    bench.router.scan().await;

    assert_eq!(bench.router.payload().get("id"), Some("7"));
}
