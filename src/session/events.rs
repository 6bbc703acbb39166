//! Eventos de entrada y actualizaciones publicadas por la sesión

use serde::Serialize;

use crate::map::view::MapViewState;
use crate::models::analytics::AggregateSnapshot;
use crate::models::vehicle::{Vehicle, VehicleFilters, VehicleId};

/// Eventos que la sesión procesa en orden, uno a la vez
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Tick del temporizador de refresco
    Refresh,
    /// Snapshot nuevo entregado por el backend
    ReplaceFleet(Vec<Vehicle>),
    SelectVehicle(Option<VehicleId>),
    ApplyFilters(VehicleFilters),
}

impl SessionEvent {
    /// Los eventos de interfaz no cambian la colección
    pub fn mutates_collection(&self) -> bool {
        matches!(self, SessionEvent::Refresh | SessionEvent::ReplaceFleet(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::Refresh => "refresh",
            SessionEvent::ReplaceFleet(_) => "replace_fleet",
            SessionEvent::SelectVehicle(_) => "select_vehicle",
            SessionEvent::ApplyFilters(_) => "apply_filters",
        }
    }
}

/// Estado del mapa tal como lo ve el dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapStatus {
    pub state: MapViewState,
    pub markers: usize,
    /// Vehículos omitidos en la última reconciliación
    pub skipped: usize,
}

/// Lo que el compositor del dashboard recibe tras cada paso
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardUpdate {
    pub revision: u64,
    pub snapshot: AggregateSnapshot,
    /// Vehículos visibles con los filtros actuales
    pub visible_vehicles: usize,
    pub selected: Option<VehicleId>,
    pub map: MapStatus,
}
