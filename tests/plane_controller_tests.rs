//! Integration tests for the data plane controller.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use dvr_data_plane::{DEFAULT_METRIC, DeleteOutcome, PlaneConfig, PlaneController, Route};

fn sorted(mut routes: Vec<Route>) -> Vec<Route> {
    routes.sort_by(|a, b| a.destination.cmp(&b.destination));
    routes
}

#[tokio::test]
async fn initialize_seeds_two_default_routes() {
    let plane = PlaneController::default();
    assert_eq!(plane.initialize().await.unwrap(), 2);

    let routes = sorted(plane.get_routes().await);
    assert_eq!(
        routes,
        vec![
            Route::with_metric("10.0.0.0/24", "192.168.1.1", 100),
            Route::with_metric("172.16.0.0/16", "192.168.1.2", 200),
        ]
    );
    assert_eq!(plane.routes_updated(), 2);
}

#[tokio::test]
async fn add_route_replaces_existing_destination() {
    let plane = PlaneController::default();
    plane.initialize().await.unwrap();

    plane.add_route("10.0.0.0/24", "10.0.0.9", 50).await.unwrap();

    let routes = plane.get_routes().await;
    assert_eq!(routes.len(), 2);
    let matching: Vec<_> = routes
        .iter()
        .filter(|r| r.destination == "10.0.0.0/24")
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].next_hop, "10.0.0.9");
    assert_eq!(matching[0].metric, 50);
    assert_eq!(plane.routes_updated(), 3);
}

#[tokio::test]
async fn delete_unknown_route_is_not_found() {
    let plane = PlaneController::default();
    plane.initialize().await.unwrap();
    let before = plane.routes_updated();

    assert_eq!(plane.delete_route("192.0.2.0/24").await, DeleteOutcome::NotFound);
    assert_eq!(plane.routes_updated(), before);
    assert_eq!(plane.get_routes().await.len(), 2);
}

#[tokio::test]
async fn routes_updated_counts_only_successful_mutations() {
    let plane = PlaneController::default();

    plane.add_route("198.51.100.0/24", "192.168.1.3", DEFAULT_METRIC).await.unwrap();
    assert_eq!(plane.routes_updated(), 1);

    plane.add_route("198.51.100.0/24", "192.168.1.4", DEFAULT_METRIC).await.unwrap();
    assert_eq!(plane.routes_updated(), 2);

    assert!(plane.delete_route("198.51.100.0/24").await.is_removed());
    assert_eq!(plane.routes_updated(), 3);

    assert!(!plane.delete_route("198.51.100.0/24").await.is_removed());
    assert_eq!(plane.routes_updated(), 3);
}

#[tokio::test]
async fn get_route_looks_up_by_destination() {
    let plane = PlaneController::default();
    plane.initialize().await.unwrap();

    let route = plane.get_route("172.16.0.0/16").await.unwrap();
    assert_eq!(route.next_hop, "192.168.1.2");
    assert_eq!(route.metric, 200);
    assert!(plane.get_route("192.0.2.0/24").await.is_none());
}

#[tokio::test]
async fn show_stats_reports_counters_and_route_count() {
    let plane = PlaneController::default();
    plane.initialize().await.unwrap();
    plane.delete_route("172.16.0.0/16").await;

    let stats = plane.show_stats().await;
    assert_eq!(stats.packets_processed, 0);
    assert_eq!(stats.routes_updated, 3);
    assert_eq!(stats.active_routes, 1);
    assert!(stats.started_at.is_none());

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["routes_updated"], 3);
    assert_eq!(json["active_routes"], 1);
}

#[tokio::test(start_paused = true)]
async fn packets_increase_while_running_and_freeze_after_stop() {
    let plane = PlaneController::default();
    plane.initialize().await.unwrap();
    plane.start().await;
    assert!(plane.is_running());

    tokio::time::sleep(Duration::from_millis(2500)).await;
    let first = plane.packets_processed();
    tokio::time::sleep(Duration::from_millis(2000)).await;
    let second = plane.packets_processed();
    assert!(first > 0);
    assert!(second > first);

    plane.stop().await;
    assert!(!plane.is_running());
    let stopped_at = plane.packets_processed();

    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(plane.packets_processed(), stopped_at);
}

#[tokio::test(start_paused = true)]
async fn worker_follows_configured_cadence() {
    let config = PlaneConfig::default()
        .with_interval_ms(100)
        .with_packet_increment(3)
        .with_report_every(1);
    let plane = PlaneController::new(config);
    plane.start().await;

    tokio::time::sleep(Duration::from_millis(450)).await;
    assert_eq!(plane.packets_processed(), 12);

    plane.stop().await;
}

#[tokio::test(start_paused = true)]
async fn start_twice_runs_a_single_worker() {
    let plane = PlaneController::default();
    plane.start().await;
    plane.start().await;

    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(plane.packets_processed(), 5);

    plane.stop().await;
}

#[tokio::test]
async fn stop_before_start_is_a_no_op() {
    let plane = PlaneController::default();
    plane.stop().await;
    plane.stop().await;
    assert!(!plane.is_running());
}

#[tokio::test(start_paused = true)]
async fn stop_twice_does_not_block() {
    let plane = PlaneController::default();
    plane.start().await;
    plane.stop().await;
    plane.stop().await;
    assert!(!plane.is_running());
}

#[tokio::test(start_paused = true)]
async fn controller_can_restart_and_keeps_counters() {
    let plane = PlaneController::default();
    plane.start().await;
    tokio::time::sleep(Duration::from_millis(2500)).await;
    plane.stop().await;
    let after_first_run = plane.packets_processed();
    assert_eq!(after_first_run, 5);

    plane.start().await;
    tokio::time::sleep(Duration::from_millis(2500)).await;
    plane.stop().await;
    assert_eq!(plane.packets_processed(), 10);
}

#[tokio::test(start_paused = true)]
async fn stop_from_another_task() {
    let plane = Arc::new(PlaneController::default());
    plane.start().await;

    let handle = plane.clone();
    tokio::spawn(async move { handle.stop().await })
        .await
        .unwrap();

    assert!(!plane.is_running());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_mutations_match_serial_execution() {
    let plane = Arc::new(PlaneController::default());
    plane.initialize().await.unwrap();

    let mut tasks = Vec::new();
    for i in 0..64u32 {
        let plane = plane.clone();
        tasks.push(tokio::spawn(async move {
            let destination = format!("10.{}.0.0/16", i + 1);
            plane.add_route(&destination, "192.168.1.1", i).await.unwrap();
            plane.add_route(&destination, "192.168.1.9", i + 1).await.unwrap();
            if i % 2 == 0 {
                assert!(plane.delete_route(&destination).await.is_removed());
            }
            assert_eq!(
                plane.delete_route("192.0.2.0/24").await,
                DeleteOutcome::NotFound
            );

            let snapshot = plane.get_routes().await;
            let unique: HashSet<_> = snapshot.iter().map(|r| r.destination.clone()).collect();
            assert_eq!(unique.len(), snapshot.len());
        }));
    }

    for task in tasks {
        task.await.unwrap();
    }

    // 2 seeded + 64 * 2 adds + 32 deletes
    assert_eq!(plane.routes_updated(), 2 + 128 + 32);

    let routes = plane.get_routes().await;
    assert_eq!(routes.len(), 2 + 32);
    for i in (1..64u32).step_by(2) {
        let route = plane.get_route(&format!("10.{}.0.0/16", i + 1)).await.unwrap();
        assert_eq!(route.next_hop, "192.168.1.9");
        assert_eq!(route.metric, i + 1);
    }
}
