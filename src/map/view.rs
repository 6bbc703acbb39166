//! Vista de mapa en vivo
//!
//! Mantiene un marcador por vehículo sobre una superficie persistente. La
//! superficie se crea una sola vez por montaje; cada actualización es una
//! reconciliación de la capa de vehículos, nunca un destruir-y-recrear.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::map::geometry::{LatLng, LatLngBounds};
use crate::map::surface::{
    LayerId, MapError, MapSurface, MarkerOptions, MarkerStyle, SurfaceFactory, SurfaceId,
    TileLayerOptions, VehiclePopup,
};
use crate::models::vehicle::{Vehicle, VehicleId};

/// Configuración de la vista
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapViewConfig {
    pub center: LatLng,
    pub zoom: u8,
    /// Margen del encuadre, en fracción del alto/ancho del conjunto
    pub fit_padding: f64,
    pub tiles: TileLayerOptions,
}

impl Default for MapViewConfig {
    fn default() -> Self {
        Self {
            center: LatLng::new(40.7128, -74.0060),
            zoom: 10,
            fit_padding: 0.1,
            tiles: TileLayerOptions::default(),
        }
    }
}

/// Estado del ciclo de vida de la vista
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum MapViewState {
    Uninitialized,
    Initialized,
    Degraded { reason: String },
}

/// Resultado de una reconciliación
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileReport {
    pub rendered: usize,
    pub removed: usize,
    /// Vehículos sin marcador (ubicación inválida o fallo al añadirlo)
    pub skipped: Vec<VehicleId>,
    /// Encuadre aplicado, ya con margen
    pub bounds: Option<LatLngBounds>,
}

struct MountedSurface<S> {
    surface: S,
    vehicle_layer: LayerId,
    markers: usize,
}

/// Vista de mapa sincronizada con la colección de vehículos
pub struct LiveMapView<F: SurfaceFactory> {
    factory: F,
    config: MapViewConfig,
    mounted: Option<MountedSurface<F::Surface>>,
    degraded: Option<String>,
}

impl<F: SurfaceFactory> LiveMapView<F> {
    pub fn new(factory: F, config: MapViewConfig) -> Self {
        Self {
            factory,
            config,
            mounted: None,
            degraded: None,
        }
    }

    pub fn config(&self) -> &MapViewConfig {
        &self.config
    }

    pub fn state(&self) -> MapViewState {
        match (&self.degraded, &self.mounted) {
            (Some(reason), _) => MapViewState::Degraded {
                reason: reason.clone(),
            },
            (None, Some(_)) => MapViewState::Initialized,
            (None, None) => MapViewState::Uninitialized,
        }
    }

    pub fn marker_count(&self) -> usize {
        self.mounted.as_ref().map_or(0, |m| m.markers)
    }

    pub fn surface_id(&self) -> Option<SurfaceId> {
        self.mounted.as_ref().map(|m| m.surface.id())
    }

    /// Sincronizar los marcadores con la colección
    ///
    /// Al volver, la superficie tiene exactamente un marcador por vehículo
    /// con ubicación válida.
    pub fn sync(&mut self, vehicles: &[Vehicle]) -> Result<ReconcileReport, MapError> {
        if let Some(reason) = &self.degraded {
            return Err(MapError::SurfaceUnavailable(reason.clone()));
        }

        if self.mounted.is_none() {
            if vehicles.is_empty() {
                debug!("🗺️ Mapa sin vehículos todavía, superficie no creada");
                return Ok(ReconcileReport::default());
            }
            self.mount()?;
        }

        let padding = self.config.fit_padding;
        let mounted = self
            .mounted
            .as_mut()
            .ok_or(MapError::SurfaceReleased)?;
        let report = reconcile(mounted, vehicles, padding)?;

        debug!(
            "🗺️ Reconciliación: {} marcadores, {} quitados, {} omitidos",
            report.rendered,
            report.removed,
            report.skipped.len()
        );
        Ok(report)
    }

    fn mount(&mut self) -> Result<(), MapError> {
        let mut surface = match self.factory.create() {
            Ok(surface) => surface,
            Err(e) => {
                warn!("⚠️ Superficie de mapa no disponible: {}", e);
                let reason = match &e {
                    MapError::SurfaceUnavailable(reason) => reason.clone(),
                    other => other.to_string(),
                };
                self.degraded = Some(reason);
                return Err(e);
            }
        };

        surface.set_view(self.config.center, self.config.zoom);
        surface.add_tile_layer(&self.config.tiles);
        let vehicle_layer = surface.create_marker_layer();

        info!("🗺️ Superficie de mapa creada: {}", surface.id());
        self.mounted = Some(MountedSurface {
            surface,
            vehicle_layer,
            markers: 0,
        });
        Ok(())
    }

    /// Liberar la superficie y volver a `Uninitialized`
    pub fn unmount(&mut self) {
        self.degraded = None;
        if let Some(mut mounted) = self.mounted.take() {
            mounted.surface.release();
            info!(
                "🗺️ Superficie de mapa liberada ({} marcadores)",
                mounted.markers
            );
        }
    }
}

impl<F: SurfaceFactory> Drop for LiveMapView<F> {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn reconcile<S: MapSurface>(
    mounted: &mut MountedSurface<S>,
    vehicles: &[Vehicle],
    padding: f64,
) -> Result<ReconcileReport, MapError> {
    let mut report = ReconcileReport {
        removed: mounted.surface.clear_layer(mounted.vehicle_layer)?,
        ..Default::default()
    };
    mounted.markers = 0;

    let mut positions = Vec::with_capacity(vehicles.len());
    for vehicle in vehicles {
        let position = match LatLng::try_from(&vehicle.location) {
            Ok(position) => position,
            Err(_) => {
                let error = MapError::MalformedLocation {
                    vehicle_id: vehicle.id().clone(),
                    lat: vehicle.location.lat,
                    lng: vehicle.location.lng,
                };
                warn!("⚠️ {}", error);
                report.skipped.push(vehicle.id().clone());
                continue;
            }
        };

        let marker = MarkerOptions {
            vehicle_id: vehicle.id().clone(),
            position,
            style: MarkerStyle::for_status(vehicle.status),
            popup: VehiclePopup::from_vehicle(vehicle),
        };
        match mounted.surface.add_marker(mounted.vehicle_layer, marker) {
            Ok(_) => {
                report.rendered += 1;
                mounted.markers += 1;
                positions.push(position);
            }
            Err(e) => {
                warn!("⚠️ Marcador omitido para {}: {}", vehicle.id(), e);
                report.skipped.push(vehicle.id().clone());
            }
        }
    }

    if let Some(bounds) = LatLngBounds::from_points(positions) {
        let padded = bounds.pad(padding);
        mounted.surface.fit_bounds(padded);
        report.bounds = Some(padded);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::headless::HeadlessSurfaceFactory;
    use crate::models::vehicle::{Location, VehicleStatus};

    fn vehicle(n: usize, status: VehicleStatus, lat: f64, lng: f64) -> Vehicle {
        Vehicle::new(
            VehicleId::new(format!("vehicle-{}", n)),
            "Mercedes",
            "Sprinter",
            status,
            Location::new(lat, lng, "1 Main St"),
        )
    }

    #[test]
    fn test_empty_sync_creates_no_surface() {
        let factory = HeadlessSurfaceFactory::new();
        let journal = factory.journal();
        let mut view = LiveMapView::new(factory, MapViewConfig::default());

        let report = view.sync(&[]).unwrap();
        assert_eq!(report, ReconcileReport::default());
        assert_eq!(view.state(), MapViewState::Uninitialized);
        assert_eq!(journal.snapshot().surfaces_created, 0);
    }

    #[test]
    fn test_sync_resync_replaces_markers() {
        let factory = HeadlessSurfaceFactory::new();
        let journal = factory.journal();
        let mut view = LiveMapView::new(factory, MapViewConfig::default());

        let fleet = vec![
            vehicle(1, VehicleStatus::Active, 40.0, -74.0),
            vehicle(2, VehicleStatus::Maintenance, 41.0, -73.0),
        ];
        view.sync(&fleet).unwrap();
        let report = view.sync(&fleet[..1]).unwrap();

        assert_eq!(report.removed, 2);
        assert_eq!(report.rendered, 1);
        assert_eq!(view.marker_count(), 1);
        let snapshot = journal.snapshot();
        assert_eq!(snapshot.surfaces_created, 1);
        assert_eq!(snapshot.live_marker_count(), 1);
        assert_eq!(snapshot.viewport, Some((LatLng::new(40.7128, -74.0060), 10)));
    }

    #[test]
    fn test_all_malformed_keeps_viewport() {
        let factory = HeadlessSurfaceFactory::new();
        let journal = factory.journal();
        let mut view = LiveMapView::new(factory, MapViewConfig::default());

        let report = view
            .sync(&[vehicle(1, VehicleStatus::Active, f64::NAN, -74.0)])
            .unwrap();
        assert_eq!(report.rendered, 0);
        assert_eq!(report.skipped, vec![VehicleId::new("vehicle-1")]);
        assert!(report.bounds.is_none());
        assert_eq!(journal.snapshot().fits, 0);
        assert_eq!(view.state(), MapViewState::Initialized);
    }

    #[test]
    fn test_drop_releases_surface() {
        let factory = HeadlessSurfaceFactory::new();
        let journal = factory.journal();
        {
            let mut view = LiveMapView::new(factory, MapViewConfig::default());
            view.sync(&[vehicle(1, VehicleStatus::Inactive, 40.0, -74.0)])
                .unwrap();
        }
        let snapshot = journal.snapshot();
        assert_eq!(snapshot.surfaces_released, 1);
        assert_eq!(snapshot.live_marker_count(), 0);
    }
}
