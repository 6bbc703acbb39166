//! Generador de snapshots de telemetría
//!
//! Produce la colección inicial de vehículos y rutas con valores simulados
//! y aplica el refresco periódico sobre los vehículos activos.

use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::route::{Route, Waypoint};
use crate::models::vehicle::{
    HealthStatus, Location, MaintenanceStatus, Vehicle, VehicleId, VehicleStatus,
    VehicleTelemetry, VehicleType,
};
use crate::utils::validation::clamp_percentage;

const MAKES: [&str; 5] = ["Ford", "Chevrolet", "Toyota", "Mercedes", "Volvo"];
const MODELS: [&str; 5] = ["Transit", "Express", "Prius", "Sprinter", "VNL"];
const CITIES: [&str; 8] = [
    "New York, NY",
    "Los Angeles, CA",
    "Chicago, IL",
    "Houston, TX",
    "Phoenix, AZ",
    "Philadelphia, PA",
    "San Antonio, TX",
    "San Diego, CA",
];

const HOME_LAT: f64 = 40.7128;
const HOME_LNG: f64 = -74.0060;
const BASE_TIRE_PRESSURE: [f64; 4] = [32.0, 33.0, 31.0, 32.0];

/// Depósitos candidatos para el refresco de ubicación
pub const REFRESH_DEPOTS: [(f64, f64, &str); 5] = [
    (40.7549, -73.9840, "Midtown Manhattan, New York, NY"),
    (40.6928, -73.9903, "Downtown Brooklyn, Brooklyn, NY"),
    (40.7447, -73.9485, "Long Island City, Queens, NY"),
    (40.6840, -74.1502, "Port Newark, Newark, NJ"),
    (40.8094, -73.8803, "Hunts Point, Bronx, NY"),
];

/// Configuración del generador
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Cuánto bajan combustible y batería por refresco
    pub drain_step: f64,
    /// Probabilidad de que un vehículo nuevo esté activo
    pub active_ratio: f64,
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            drain_step: 5.0,
            active_ratio: 0.8,
            seed: None,
        }
    }
}

/// Resultado de un refresco
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub updated: usize,
    pub untouched: usize,
}

/// Generador de telemetría simulada
pub struct FleetGenerator {
    rng: StdRng,
    config: GeneratorConfig,
}

impl FleetGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng, config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generar `count` vehículos con ids únicos `vehicle-1..vehicle-N`
    pub fn generate(&mut self, count: usize) -> Vec<Vehicle> {
        let vehicles: Vec<Vehicle> = (1..=count).map(|n| self.generate_vehicle(n)).collect();
        log::info!("🚚 Flota generada: {} vehículos", vehicles.len());
        vehicles
    }

    fn generate_vehicle(&mut self, n: usize) -> Vehicle {
        let now = Utc::now();
        let active_ratio = if self.config.active_ratio.is_nan() {
            GeneratorConfig::default().active_ratio
        } else {
            self.config.active_ratio.clamp(0.0, 1.0)
        };
        let status = if self.rng.gen_bool(active_ratio) {
            VehicleStatus::Active
        } else {
            VehicleStatus::Maintenance
        };

        let location = Location::new(
            HOME_LAT + (self.rng.gen::<f64>() - 0.5) * 0.2,
            HOME_LNG + (self.rng.gen::<f64>() - 0.5) * 0.2,
            format!("{} Main St, New York, NY", self.rng.gen_range(0..999)),
        );

        let mut vehicle = Vehicle::new(
            VehicleId::new(format!("vehicle-{}", n)),
            self.pick(&MAKES),
            self.pick(&MODELS),
            status,
            location,
        );
        vehicle.year = 2018 + self.rng.gen_range(0..6);
        vehicle.vin = format!("1HGBH41JXMN{:06}", self.rng.gen_range(0..1_000_000));
        vehicle.license_plate = format!("ABC-{:03}", self.rng.gen_range(0..1_000));
        vehicle.vehicle_type = *VehicleType::ALL
            .choose(&mut self.rng)
            .unwrap_or(&VehicleType::Van);

        let mut tire_pressure = BASE_TIRE_PRESSURE;
        for psi in tire_pressure.iter_mut() {
            *psi += (self.rng.gen::<f64>() - 0.5) * 4.0;
        }

        vehicle.telemetry = VehicleTelemetry {
            engine_temp: self.rng.gen_range(180.0..220.0),
            tire_pressure,
            fuel_level: clamp_percentage(self.rng.gen_range(0.0..100.0)),
            battery_level: clamp_percentage(self.rng.gen_range(0.0..100.0)),
            battery_voltage: self.rng.gen_range(12.0..14.0),
            mileage: Decimal::new(self.rng.gen_range(500_000..1_500_000), 1),
            speed: self.rng.gen_range(0.0..70.0),
            last_updated: now,
        };

        // Cada indicador se sortea por separado, `overall` incluido
        vehicle.maintenance = MaintenanceStatus {
            overall: self.health(),
            engine: self.health(),
            tires: self.health(),
            battery: self.health(),
            next_service: now + Duration::minutes(self.rng.gen_range(0..30 * 24 * 60)),
            last_service: now - Duration::minutes(self.rng.gen_range(0..90 * 24 * 60)),
        };

        vehicle
    }

    /// Generar el catálogo de rutas `route-1..route-N`
    pub fn generate_routes(&mut self, count: usize) -> Vec<Route> {
        let routes: Vec<Route> = (1..=count)
            .map(|n| {
                let waypoint_count = self.rng.gen_range(0..5);
                let waypoints = (0..waypoint_count)
                    .map(|_| Waypoint {
                        lat: HOME_LAT + (self.rng.gen::<f64>() - 0.5) * 10.0,
                        lng: HOME_LNG + (self.rng.gen::<f64>() - 0.5) * 20.0,
                        address: format!("{} Street, City, State", self.rng.gen_range(0..999)),
                    })
                    .collect();

                Route {
                    id: format!("route-{}", n),
                    name: format!("Route {}", n),
                    start_location: self.pick(&CITIES).to_string(),
                    end_location: self.pick(&CITIES).to_string(),
                    waypoints,
                    distance: self.rng.gen_range(100.0..600.0),
                    estimated_time: self.rng.gen_range(2.0..10.0),
                    fuel_efficiency: self.rng.gen_range(6.0..10.0),
                    created_at: Utc::now(),
                }
            })
            .collect();
        log::info!("🛣️ Catálogo de rutas generado: {} rutas", routes.len());
        routes
    }

    /// Refrescar la telemetría de los vehículos activos
    ///
    /// Solo toca combustible, batería y ubicación de los vehículos en estado
    /// `Active`; nunca el id, la marca/modelo ni el mantenimiento.
    pub fn refresh(&mut self, vehicles: &mut [Vehicle]) -> RefreshReport {
        let mut report = RefreshReport::default();
        let step = self.config.drain_step;

        for vehicle in vehicles.iter_mut() {
            if !vehicle.is_active() {
                report.untouched += 1;
                continue;
            }

            let telemetry = &mut vehicle.telemetry;
            telemetry.fuel_level = drain(telemetry.fuel_level, step);
            telemetry.battery_level = drain(telemetry.battery_level, step);

            let (lat, lng, address) = *REFRESH_DEPOTS
                .choose(&mut self.rng)
                .unwrap_or(&REFRESH_DEPOTS[0]);
            vehicle.location = Location::new(lat, lng, address);
            report.updated += 1;
        }

        log::debug!(
            "🔄 Refresco aplicado: {} actualizados, {} sin cambios",
            report.updated,
            report.untouched
        );
        report
    }

    fn pick<'a>(&mut self, values: &[&'a str]) -> &'a str {
        values.choose(&mut self.rng).copied().unwrap_or_default()
    }

    fn health(&mut self) -> HealthStatus {
        *HealthStatus::ALL
            .choose(&mut self.rng)
            .unwrap_or(&HealthStatus::Healthy)
    }
}

/// Bajar un porcentaje hacia cero sin pasar de 0
fn drain(value: f64, step: f64) -> f64 {
    if value > 0.0 {
        clamp_percentage(value - step)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn seeded() -> FleetGenerator {
        FleetGenerator::new(GeneratorConfig {
            seed: Some(42),
            ..Default::default()
        })
    }

    fn fixed(n: usize, status: VehicleStatus) -> Vehicle {
        let mut v = Vehicle::new(
            VehicleId::new(format!("vehicle-{}", n)),
            "Volvo",
            "VNL",
            status,
            Location::new(40.70, -74.01, "9 Main St, New York, NY"),
        );
        v.telemetry.fuel_level = 40.0;
        v.telemetry.battery_level = 60.0;
        v
    }

    #[test]
    fn test_generate_produces_unique_ids() {
        let vehicles = seeded().generate(25);
        assert_eq!(vehicles.len(), 25);
        let ids: HashSet<_> = vehicles.iter().map(|v| v.id().clone()).collect();
        assert_eq!(ids.len(), 25);
        assert_eq!(vehicles[0].id().as_str(), "vehicle-1");
    }

    #[test]
    fn test_generated_fields_stay_in_domain() {
        for v in seeded().generate(200) {
            assert_ne!(v.status, VehicleStatus::Inactive);
            assert!((0.0..=100.0).contains(&v.telemetry.fuel_level));
            assert!((0.0..=100.0).contains(&v.telemetry.battery_level));
            assert!((12.0..14.0).contains(&v.telemetry.battery_voltage));
            assert!((2018..2024).contains(&v.year));
            assert!(v.vin.starts_with("1HGBH41JXMN"));
            assert!(v.license_plate.starts_with("ABC-"));
            assert!(v.location.validate().is_ok());
            assert!(v.maintenance.last_service <= v.maintenance.next_service);
        }
    }

    #[test]
    fn test_same_seed_same_fleet() {
        let a = seeded().generate(5);
        let b = seeded().generate(5);
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.make, y.make);
            assert_eq!(x.status, y.status);
            assert_eq!(x.location, y.location);
            assert_eq!(x.maintenance.overall, y.maintenance.overall);
        }
    }

    #[test]
    fn test_generate_routes() {
        let routes = seeded().generate_routes(15);
        assert_eq!(routes.len(), 15);
        assert_eq!(routes[14].name, "Route 15");
        for route in &routes {
            assert!(route.waypoints.len() < 5);
            assert!((100.0..600.0).contains(&route.distance));
            assert!(CITIES.contains(&route.start_location.as_str()));
        }
    }

    #[test]
    fn test_refresh_skips_non_active_vehicles() {
        let mut fleet = vec![
            fixed(1, VehicleStatus::Maintenance),
            fixed(2, VehicleStatus::Inactive),
            fixed(3, VehicleStatus::Maintenance),
        ];
        let before = fleet.clone();
        let report = seeded().refresh(&mut fleet);

        assert_eq!(report, RefreshReport { updated: 0, untouched: 3 });
        assert_eq!(fleet, before);
    }

    #[test]
    fn test_refresh_drains_to_zero_without_underflow() {
        let mut fleet = vec![fixed(1, VehicleStatus::Active)];
        fleet[0].telemetry.battery_level = 3.0;
        let mut generator = seeded();

        let mut seen = vec![fleet[0].telemetry.battery_level];
        for _ in 0..3 {
            generator.refresh(&mut fleet);
            seen.push(fleet[0].telemetry.battery_level);
        }
        assert_eq!(seen, vec![3.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_refresh_keeps_identity_and_maintenance() {
        let mut fleet = vec![fixed(1, VehicleStatus::Active)];
        fleet[0].maintenance.overall = HealthStatus::Critical;
        let before = fleet[0].clone();

        seeded().refresh(&mut fleet);
        let after = &fleet[0];

        assert_eq!(after.id(), before.id());
        assert_eq!(after.make, before.make);
        assert_eq!(after.model, before.model);
        assert_eq!(after.maintenance, before.maintenance);
        assert_eq!(after.telemetry.mileage, before.telemetry.mileage);
        assert_eq!(after.telemetry.fuel_level, 35.0);
        assert_eq!(after.telemetry.battery_level, 55.0);
        assert!(REFRESH_DEPOTS
            .iter()
            .any(|(lat, lng, _)| *lat == after.location.lat && *lng == after.location.lng));
    }
}
