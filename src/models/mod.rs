//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos de la flota: vehículos,
//! rutas y el snapshot agregado del dashboard.

pub mod analytics;
pub mod route;
pub mod vehicle;

pub use analytics::{AggregateSnapshot, MaintenanceCounts, StatusCounts};
pub use route::{Route, Waypoint, OPTIMIZATION_INSIGHT};
pub use vehicle::{
    HealthStatus, Location, MaintenanceStatus, Vehicle, VehicleFilters, VehicleId,
    VehicleStatus, VehicleTelemetry, VehicleType,
};
