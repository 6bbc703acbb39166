//! Sesión de monitorización
//!
//! Dueña de la colección autoritativa, del generador y de la vista de mapa.
//! `step` es el único punto donde la colección cambia y corre hasta el final
//! (mutar, agregar, reconciliar) antes de aceptar el siguiente evento.

use tracing::{debug, info, warn};

use crate::config::environment::MonitorConfig;
use crate::map::surface::SurfaceFactory;
use crate::map::view::LiveMapView;
use crate::services::aggregation::aggregate;
use crate::services::telemetry_generator::FleetGenerator;
use crate::session::events::{DashboardUpdate, MapStatus, SessionEvent};
use crate::state::FleetState;

pub struct MonitoringSession<F: SurfaceFactory> {
    state: FleetState,
    generator: FleetGenerator,
    map: LiveMapView<F>,
    last_skipped: usize,
}

impl<F: SurfaceFactory> MonitoringSession<F> {
    /// Crear la sesión con una flota y un catálogo de rutas generados
    pub fn new(config: &MonitorConfig, factory: F) -> Self {
        let mut generator = FleetGenerator::new(config.generator_config());
        let vehicles = generator.generate(config.fleet_size as usize);
        let routes = generator.generate_routes(config.route_count as usize);
        let map = LiveMapView::new(factory, config.map_view_config());
        Self::from_parts(FleetState::new(vehicles, routes), generator, map)
    }

    pub fn from_parts(state: FleetState, generator: FleetGenerator, map: LiveMapView<F>) -> Self {
        Self {
            state,
            generator,
            map,
            last_skipped: 0,
        }
    }

    pub fn state(&self) -> &FleetState {
        &self.state
    }

    pub fn map(&self) -> &LiveMapView<F> {
        &self.map
    }

    /// Montar (o reconciliar) el mapa con la colección actual sin mutarla
    pub fn render(&mut self) -> DashboardUpdate {
        self.reconcile_map();
        self.update()
    }

    /// Procesar un evento y devolver la actualización resultante
    pub fn step(&mut self, event: SessionEvent) -> DashboardUpdate {
        let mutates = event.mutates_collection();
        debug!("🚚 Procesando evento {}", event.name());

        match event {
            SessionEvent::Refresh => {
                let generator = &mut self.generator;
                let report = self.state.mutate_vehicles(|vehicles| generator.refresh(vehicles));
                info!(
                    "🔄 Refresco #{}: {} vehículos actualizados",
                    self.state.revision(),
                    report.updated
                );
            }
            SessionEvent::ReplaceFleet(vehicles) => {
                info!("🚚 Flota reemplazada: {} vehículos", vehicles.len());
                self.state.replace_vehicles(vehicles);
            }
            SessionEvent::SelectVehicle(id) => {
                let requested = id.clone();
                if !self.state.select(id) {
                    warn!("⚠️ Vehículo desconocido: {:?}", requested);
                }
            }
            SessionEvent::ApplyFilters(filters) => {
                self.state.set_filters(filters);
            }
        }

        if mutates {
            self.reconcile_map();
        }
        self.update()
    }

    /// Liberar la superficie de mapa
    pub fn teardown(&mut self) {
        self.map.unmount();
        info!("🚚 Sesión terminada en la revisión {}", self.state.revision());
    }

    fn reconcile_map(&mut self) {
        match self.map.sync(self.state.vehicles()) {
            Ok(report) => self.last_skipped = report.skipped.len(),
            Err(e) => warn!("⚠️ Mapa no sincronizado: {}", e),
        }
    }

    fn update(&self) -> DashboardUpdate {
        let snapshot = aggregate(self.state.vehicles());
        debug!(
            "📊 Agregados: {} activos, {} en mantenimiento, {} inactivos",
            snapshot.status_counts.active,
            snapshot.status_counts.maintenance,
            snapshot.status_counts.inactive
        );

        DashboardUpdate {
            revision: self.state.revision(),
            snapshot,
            visible_vehicles: self.state.filtered_vehicles().len(),
            selected: self.state.selected().cloned(),
            map: MapStatus {
                state: self.map.state(),
                markers: self.map.marker_count(),
                skipped: self.last_skipped,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::headless::HeadlessSurfaceFactory;
    use crate::map::view::MapViewState;
    use crate::models::vehicle::VehicleId;

    fn config(fleet_size: u32) -> MonitorConfig {
        MonitorConfig {
            fleet_size,
            seed: Some(11),
            ..Default::default()
        }
    }

    #[test]
    fn test_render_mounts_map() {
        let factory = HeadlessSurfaceFactory::new();
        let journal = factory.journal();
        let mut session = MonitoringSession::new(&config(5), factory);

        let update = session.render();
        assert_eq!(update.revision, 0);
        assert_eq!(update.snapshot.vehicle_count(), 5);
        assert_eq!(update.map.state, MapViewState::Initialized);
        assert_eq!(update.map.markers, 5);
        assert_eq!(journal.snapshot().live_marker_count(), 5);
    }

    #[test]
    fn test_selection_does_not_reconcile() {
        let factory = HeadlessSurfaceFactory::new();
        let journal = factory.journal();
        let mut session = MonitoringSession::new(&config(3), factory);
        session.render();
        let created = journal.snapshot().markers_created;

        let update = session.step(SessionEvent::SelectVehicle(Some(VehicleId::new("vehicle-2"))));
        assert_eq!(update.selected, Some(VehicleId::new("vehicle-2")));
        assert_eq!(update.revision, 0);
        assert_eq!(journal.snapshot().markers_created, created);
    }

    #[test]
    fn test_replace_fleet_with_empty_collection() {
        let factory = HeadlessSurfaceFactory::new();
        let journal = factory.journal();
        let mut session = MonitoringSession::new(&config(3), factory);
        session.render();

        let update = session.step(SessionEvent::ReplaceFleet(Vec::new()));
        assert_eq!(update.snapshot.vehicle_count(), 0);
        assert_eq!(update.map.markers, 0);
        assert_eq!(journal.snapshot().live_marker_count(), 0);
        assert_eq!(journal.snapshot().surfaces_created, 1);
    }
}
