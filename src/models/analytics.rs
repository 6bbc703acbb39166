//! Modelos de Analytics
//!
//! Este módulo contiene el snapshot agregado que el dashboard muestra:
//! conteos por estado operativo y por salud de mantenimiento.

use serde::{Deserialize, Serialize};

use crate::models::vehicle::{HealthStatus, VehicleStatus};

/// Conteo de vehículos por estado operativo
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub active: usize,
    pub maintenance: usize,
    pub inactive: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: VehicleStatus) {
        match status {
            VehicleStatus::Active => self.active += 1,
            VehicleStatus::Maintenance => self.maintenance += 1,
            VehicleStatus::Inactive => self.inactive += 1,
        }
    }

    pub fn get(&self, status: VehicleStatus) -> usize {
        match status {
            VehicleStatus::Active => self.active,
            VehicleStatus::Maintenance => self.maintenance,
            VehicleStatus::Inactive => self.inactive,
        }
    }

    pub fn total(&self) -> usize {
        self.active + self.maintenance + self.inactive
    }
}

/// Conteo de vehículos por salud `overall`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceCounts {
    pub healthy: usize,
    pub due: usize,
    pub critical: usize,
}

impl MaintenanceCounts {
    pub fn record(&mut self, health: HealthStatus) {
        match health {
            HealthStatus::Healthy => self.healthy += 1,
            HealthStatus::Due => self.due += 1,
            HealthStatus::Critical => self.critical += 1,
        }
    }

    pub fn get(&self, health: HealthStatus) -> usize {
        match health {
            HealthStatus::Healthy => self.healthy,
            HealthStatus::Due => self.due,
            HealthStatus::Critical => self.critical,
        }
    }

    pub fn total(&self) -> usize {
        self.healthy + self.due + self.critical
    }
}

/// Snapshot agregado de la flota
///
/// Siempre derivado de una colección; nunca se guarda por separado.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateSnapshot {
    pub status_counts: StatusCounts,
    pub maintenance_counts: MaintenanceCounts,
}

impl AggregateSnapshot {
    /// Tamaño de la colección de la que se derivó
    pub fn vehicle_count(&self) -> usize {
        self.status_counts.total()
    }
}
