//! Exportación de datos de la flota
//!
//! Produce el contenido de exportación en memoria; guardarlo o descargarlo
//! es cosa del llamador.

use rust_decimal::Decimal;

use crate::models::route::Route;
use crate::models::vehicle::Vehicle;
use crate::utils::errors::AppResult;

pub const VEHICLE_HEADERS: [&str; 17] = [
    "ID",
    "Make",
    "Model",
    "Year",
    "VIN",
    "License Plate",
    "Type",
    "Status",
    "Location",
    "Fuel Level",
    "Battery Voltage",
    "Speed",
    "Mileage",
    "Maintenance Status",
    "Engine Status",
    "Tire Status",
    "Battery Status",
];

pub const ROUTE_HEADERS: [&str; 8] = [
    "ID",
    "Name",
    "Start Location",
    "End Location",
    "Distance",
    "Estimated Time",
    "Fuel Efficiency",
    "Waypoints",
];

/// Colaborador de exportación del dashboard
pub trait FleetExporter {
    fn content_type(&self) -> &'static str;

    fn export_vehicles(&self, vehicles: &[Vehicle]) -> AppResult<String>;

    fn export_routes(&self, routes: &[Route]) -> AppResult<String>;
}

/// Exportador CSV: todos los campos entre comillas, filas separadas por `\n`
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl CsvExporter {
    pub fn new() -> Self {
        Self
    }

    fn vehicle_row(vehicle: &Vehicle) -> Vec<String> {
        vec![
            vehicle.id().to_string(),
            vehicle.make.clone(),
            vehicle.model.clone(),
            vehicle.year.to_string(),
            vehicle.vin.clone(),
            vehicle.license_plate.clone(),
            vehicle.vehicle_type.as_str().to_string(),
            vehicle.status.as_str().to_string(),
            vehicle.location.address.clone(),
            format!("{:.1}%", vehicle.telemetry.fuel_level),
            format!("{:.1}V", vehicle.telemetry.battery_voltage),
            format!("{:.1} mph", vehicle.telemetry.speed),
            group_thousands(vehicle.telemetry.mileage),
            vehicle.maintenance.overall.as_str().to_string(),
            vehicle.maintenance.engine.as_str().to_string(),
            vehicle.maintenance.tires.as_str().to_string(),
            vehicle.maintenance.battery.as_str().to_string(),
        ]
    }

    fn route_row(route: &Route) -> Vec<String> {
        vec![
            route.id.clone(),
            route.name.clone(),
            route.start_location.clone(),
            route.end_location.clone(),
            format!("{:.1} miles", route.distance),
            format!("{:.1} hours", route.estimated_time),
            format!("{:.1} mpg", route.fuel_efficiency),
            route.waypoints.len().to_string(),
        ]
    }
}

impl FleetExporter for CsvExporter {
    fn content_type(&self) -> &'static str {
        "text/csv;charset=utf-8"
    }

    fn export_vehicles(&self, vehicles: &[Vehicle]) -> AppResult<String> {
        let rows = vehicles.iter().map(Self::vehicle_row);
        Ok(to_csv(&VEHICLE_HEADERS, rows))
    }

    fn export_routes(&self, routes: &[Route]) -> AppResult<String> {
        let rows = routes.iter().map(Self::route_row);
        Ok(to_csv(&ROUTE_HEADERS, rows))
    }
}

fn to_csv<I>(headers: &[&str], rows: I) -> String
where
    I: Iterator<Item = Vec<String>>,
{
    let header = headers.iter().map(|h| quote(h)).collect::<Vec<_>>().join(",");
    std::iter::once(header)
        .chain(rows.map(|row| row.iter().map(|f| quote(f)).collect::<Vec<_>>().join(",")))
        .collect::<Vec<_>>()
        .join("\n")
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// "123456.7" -> "123,456.7"
fn group_thousands(value: Decimal) -> String {
    let text = value.normalize().to_string();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (integer, fraction) = match digits.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match fraction {
        Some(fraction) => format!("{}{}.{}", sign, grouped, fraction),
        None => format!("{}{}", sign, grouped),
    }
}
