//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle con su telemetría en vivo,
//! el paquete de mantenimiento y los filtros que usa el dashboard.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::ValidationError;

use crate::utils::validation::validate_coordinates;

/// Identificador opaco y estable de un vehículo
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(String);

impl VehicleId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tipo de vehículo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Truck,
    Van,
    Sedan,
    Suv,
}

impl VehicleType {
    pub const ALL: [VehicleType; 4] = [
        VehicleType::Truck,
        VehicleType::Van,
        VehicleType::Sedan,
        VehicleType::Suv,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Truck => "truck",
            VehicleType::Van => "van",
            VehicleType::Sedan => "sedan",
            VehicleType::Suv => "suv",
        }
    }
}

/// Estado operativo del vehículo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    Active,
    Maintenance,
    Inactive,
}

impl VehicleStatus {
    pub const ALL: [VehicleStatus; 3] = [
        VehicleStatus::Active,
        VehicleStatus::Maintenance,
        VehicleStatus::Inactive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Active => "active",
            VehicleStatus::Maintenance => "maintenance",
            VehicleStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Indicador de salud de mantenimiento
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Due,
    Critical,
}

impl HealthStatus {
    pub const ALL: [HealthStatus; 3] = [
        HealthStatus::Healthy,
        HealthStatus::Due,
        HealthStatus::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Due => "due",
            HealthStatus::Critical => "critical",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Posición actual del vehículo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

impl Location {
    pub fn new(lat: f64, lng: f64, address: impl Into<String>) -> Self {
        Self {
            lat,
            lng,
            address: address.into(),
        }
    }

    /// Una ubicación no finita o fuera de rango no se puede dibujar
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_coordinates(self.lat, self.lng)
    }
}

/// Telemetría en vivo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleTelemetry {
    /// °F
    pub engine_temp: f64,
    /// PSI, una lectura por neumático
    pub tire_pressure: [f64; 4],
    /// 0-100
    pub fuel_level: f64,
    /// 0-100
    pub battery_level: f64,
    pub battery_voltage: f64,
    pub mileage: Decimal,
    /// mph
    pub speed: f64,
    pub last_updated: DateTime<Utc>,
}

impl Default for VehicleTelemetry {
    fn default() -> Self {
        Self {
            engine_temp: 180.0,
            tire_pressure: [32.0, 33.0, 31.0, 32.0],
            fuel_level: 100.0,
            battery_level: 100.0,
            battery_voltage: 12.6,
            mileage: Decimal::ZERO,
            speed: 0.0,
            last_updated: Utc::now(),
        }
    }
}

/// Paquete de mantenimiento
///
/// `overall` se asigna de forma independiente: no es el mínimo ni el máximo
/// de `engine`, `tires` y `battery`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceStatus {
    pub overall: HealthStatus,
    pub engine: HealthStatus,
    pub tires: HealthStatus,
    pub battery: HealthStatus,
    pub next_service: DateTime<Utc>,
    pub last_service: DateTime<Utc>,
}

impl Default for MaintenanceStatus {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            overall: HealthStatus::Healthy,
            engine: HealthStatus::Healthy,
            tires: HealthStatus::Healthy,
            battery: HealthStatus::Healthy,
            next_service: now,
            last_service: now,
        }
    }
}

/// Vehicle principal
///
/// El `id` no tiene setter: es inmutable durante toda la vida del vehículo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    id: VehicleId,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub vin: String,
    pub license_plate: String,
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    pub status: VehicleStatus,
    pub location: Location,
    pub telemetry: VehicleTelemetry,
    pub maintenance: MaintenanceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    /// Crear un vehículo con telemetría y mantenimiento por defecto
    pub fn new(
        id: VehicleId,
        make: impl Into<String>,
        model: impl Into<String>,
        status: VehicleStatus,
        location: Location,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            make: make.into(),
            model: model.into(),
            year: 2020,
            vin: String::new(),
            license_plate: String::new(),
            vehicle_type: VehicleType::Van,
            status,
            location,
            telemetry: VehicleTelemetry::default(),
            maintenance: MaintenanceStatus::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &VehicleId {
        &self.id
    }

    pub fn is_active(&self) -> bool {
        self.status == VehicleStatus::Active
    }
}

/// Filtros del dashboard (búsqueda, estado, tipo, salud)
///
/// Aplicarlos nunca modifica la colección.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleFilters {
    pub search: Option<String>,
    pub status: Option<VehicleStatus>,
    pub vehicle_type: Option<VehicleType>,
    pub maintenance: Option<HealthStatus>,
}

impl VehicleFilters {
    pub fn is_empty(&self) -> bool {
        self.search.as_deref().map_or(true, |s| s.trim().is_empty())
            && self.status.is_none()
            && self.vehicle_type.is_none()
            && self.maintenance.is_none()
    }

    /// La búsqueda compara marca, modelo y matrícula sin distinguir mayúsculas
    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                vehicle.make.to_lowercase().contains(&term)
                    || vehicle.model.to_lowercase().contains(&term)
                    || vehicle.license_plate.to_lowercase().contains(&term)
            }
            _ => true,
        };

        matches_search
            && self.status.map_or(true, |s| vehicle.status == s)
            && self.vehicle_type.map_or(true, |t| vehicle.vehicle_type == t)
            && self
                .maintenance
                .map_or(true, |m| vehicle.maintenance.overall == m)
    }

    pub fn apply<'a>(&self, vehicles: &'a [Vehicle]) -> Vec<&'a Vehicle> {
        vehicles.iter().filter(|v| self.matches(v)).collect()
    }
}
