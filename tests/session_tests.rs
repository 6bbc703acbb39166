use std::time::Duration;

use fleet_monitor::config::environment::MonitorConfig;
use fleet_monitor::map::headless::HeadlessSurfaceFactory;
use fleet_monitor::map::view::MapViewState;
use fleet_monitor::models::vehicle::{VehicleFilters, VehicleId, VehicleStatus};
use fleet_monitor::session::{DashboardUpdate, MonitoringSession, SessionEvent, SessionRuntime};
use tokio::sync::watch;

const PERIOD: Duration = Duration::from_secs(5);

fn config(fleet_size: u32) -> MonitorConfig {
    MonitorConfig {
        fleet_size,
        route_count: 3,
        seed: Some(2024),
        ..Default::default()
    }
}

async fn wait_for_revision(updates: &mut watch::Receiver<DashboardUpdate>, revision: u64) {
    while updates.borrow_and_update().revision < revision {
        updates.changed().await.unwrap();
    }
}

#[tokio::test(start_paused = true)]
async fn test_teardown_stops_refresh_and_marker_creation() {
    let factory = HeadlessSurfaceFactory::new();
    let journal = factory.journal();
    let session = MonitoringSession::new(&config(6), factory);

    let handle = SessionRuntime::spawn(session, PERIOD);
    let mut updates = handle.subscribe();
    assert_eq!(handle.latest().revision, 0);
    assert_eq!(handle.latest().map.markers, 6);

    wait_for_revision(&mut updates, 3).await;
    assert_eq!(handle.latest().revision, 3);

    let session = handle.shutdown().await.unwrap();
    let after_shutdown = journal.snapshot();
    let vehicles = session.state().vehicles().to_vec();
    assert_eq!(session.state().revision(), 3);
    assert_eq!(after_shutdown.active_surfaces(), 0);
    assert_eq!(after_shutdown.live_marker_count(), 0);

    // Tres periodos más: nada cambia
    tokio::time::sleep(PERIOD * 3 + Duration::from_millis(100)).await;
    assert_eq!(journal.snapshot(), after_shutdown);
    assert_eq!(session.state().vehicles(), vehicles.as_slice());
    assert_eq!(session.state().revision(), 3);
    assert_eq!(session.map().state(), MapViewState::Uninitialized);
}

#[tokio::test(start_paused = true)]
async fn test_first_refresh_after_one_period() {
    let session = MonitoringSession::new(&config(4), HeadlessSurfaceFactory::new());
    let handle = SessionRuntime::spawn(session, PERIOD);

    tokio::time::sleep(PERIOD - Duration::from_millis(10)).await;
    assert_eq!(handle.latest().revision, 0);

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(handle.latest().revision, 1);

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_ui_events_do_not_mutate_collection() {
    let session = MonitoringSession::new(&config(10), HeadlessSurfaceFactory::new());
    let handle = SessionRuntime::spawn(session, Duration::from_secs(3600));
    let mut updates = handle.subscribe();

    handle
        .send(SessionEvent::ApplyFilters(VehicleFilters {
            status: Some(VehicleStatus::Inactive),
            ..Default::default()
        }))
        .await
        .unwrap();
    handle
        .send(SessionEvent::SelectVehicle(Some(VehicleId::new("vehicle-3"))))
        .await
        .unwrap();

    while handle.latest().selected.is_none() {
        updates.changed().await.unwrap();
    }

    let update = handle.latest();
    assert_eq!(update.revision, 0);
    assert_eq!(update.visible_vehicles, 0);
    assert_eq!(update.snapshot.vehicle_count(), 10);
    assert_eq!(update.selected, Some(VehicleId::new("vehicle-3")));

    let session = handle.shutdown().await.unwrap();
    assert_eq!(session.state().vehicles().len(), 10);
    assert_eq!(session.state().revision(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_degraded_map_keeps_aggregating() {
    let factory = HeadlessSurfaceFactory::unavailable("no map container");
    let session = MonitoringSession::new(&config(5), factory);
    let handle = SessionRuntime::spawn(session, PERIOD);
    let mut updates = handle.subscribe();

    assert_eq!(
        handle.latest().map.state,
        MapViewState::Degraded {
            reason: "no map container".to_string()
        }
    );

    wait_for_revision(&mut updates, 2).await;
    let update = handle.latest();
    assert_eq!(update.snapshot.vehicle_count(), 5);
    assert_eq!(update.map.markers, 0);
    assert!(handle.timer().is_active());

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_replace_fleet_reconciles_immediately() {
    let factory = HeadlessSurfaceFactory::new();
    let journal = factory.journal();
    let session = MonitoringSession::new(&config(8), factory);
    let handle = SessionRuntime::spawn(session, Duration::from_secs(3600));
    let mut updates = handle.subscribe();

    let mut generator = fleet_monitor::services::telemetry_generator::FleetGenerator::new(
        config(2).generator_config(),
    );
    handle
        .send(SessionEvent::ReplaceFleet(generator.generate(2)))
        .await
        .unwrap();
    wait_for_revision(&mut updates, 1).await;

    assert_eq!(handle.latest().map.markers, 2);
    assert_eq!(journal.snapshot().live_marker_count(), 2);
    assert_eq!(journal.snapshot().surfaces_created, 1);

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_dropping_handle_tears_down() {
    let factory = HeadlessSurfaceFactory::new();
    let journal = factory.journal();
    let session = MonitoringSession::new(&config(3), factory);
    let handle = SessionRuntime::spawn(session, PERIOD);
    assert_eq!(journal.snapshot().live_marker_count(), 3);

    drop(handle);
    tokio::time::sleep(PERIOD * 2).await;

    let snapshot = journal.snapshot();
    assert_eq!(snapshot.surfaces_released, 1);
    assert_eq!(snapshot.live_marker_count(), 0);
    assert_eq!(snapshot.markers_created, 3);
}
