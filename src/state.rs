//! Estado de la flota
//!
//! Este módulo define la colección autoritativa de vehículos, el catálogo de
//! rutas y el estado de interfaz (filtros y selección). Solo la sesión de
//! monitorización lo modifica. Los agregados no se guardan aquí.

use crate::models::route::Route;
use crate::models::vehicle::{Vehicle, VehicleFilters, VehicleId};

#[derive(Debug, Clone, Default)]
pub struct FleetState {
    vehicles: Vec<Vehicle>,
    routes: Vec<Route>,
    filters: VehicleFilters,
    selected: Option<VehicleId>,
    revision: u64,
}

impl FleetState {
    pub fn new(vehicles: Vec<Vehicle>, routes: Vec<Route>) -> Self {
        Self {
            vehicles,
            routes,
            ..Default::default()
        }
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn filters(&self) -> &VehicleFilters {
        &self.filters
    }

    /// Número de cambios aplicados a la colección
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Reemplazar la colección completa
    ///
    /// Si el vehículo seleccionado ya no existe, la selección se limpia.
    pub fn replace_vehicles(&mut self, vehicles: Vec<Vehicle>) {
        self.vehicles = vehicles;
        if let Some(id) = &self.selected {
            if !self.vehicles.iter().any(|v| v.id() == id) {
                self.selected = None;
            }
        }
        self.revision += 1;
    }

    /// Mutar la colección en sitio
    pub fn mutate_vehicles<R>(&mut self, f: impl FnOnce(&mut [Vehicle]) -> R) -> R {
        let result = f(&mut self.vehicles);
        self.revision += 1;
        result
    }

    /// Seleccionar un vehículo; los ids desconocidos se ignoran
    pub fn select(&mut self, id: Option<VehicleId>) -> bool {
        match id {
            Some(id) if !self.vehicles.iter().any(|v| v.id() == &id) => false,
            other => {
                self.selected = other;
                true
            }
        }
    }

    pub fn set_filters(&mut self, filters: VehicleFilters) {
        self.filters = filters;
    }

    pub fn filtered_vehicles(&self) -> Vec<&Vehicle> {
        self.filters.apply(&self.vehicles)
    }

    pub fn selected(&self) -> Option<&VehicleId> {
        self.selected.as_ref()
    }

    pub fn selected_vehicle(&self) -> Option<&Vehicle> {
        let id = self.selected.as_ref()?;
        self.vehicles.iter().find(|v| v.id() == id)
    }
}
