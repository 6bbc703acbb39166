//! Superficie de mapa
//!
//! Este módulo define la superficie imperativa y persistente sobre la que la
//! vista dibuja sus marcadores, la fábrica que la crea y los estilos de marcador.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::map::geometry::{LatLng, LatLngBounds};
use crate::models::vehicle::{Vehicle, VehicleId, VehicleStatus};

/// Errores de la superficie de mapa
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapError {
    #[error("Map surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("Vehicle '{vehicle_id}' has a malformed location ({lat}, {lng})")]
    MalformedLocation {
        vehicle_id: VehicleId,
        lat: f64,
        lng: f64,
    },

    #[error("Unknown layer {0}")]
    UnknownLayer(LayerId),

    #[error("Map surface already released")]
    SurfaceReleased,
}

/// Identificador de una superficie creada por la fábrica
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceId(Uuid);

impl SurfaceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SurfaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(pub u64);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MarkerId(pub u64);

/// Capa base de teselas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayerOptions {
    pub url_template: String,
    pub attribution: String,
}

impl Default for TileLayerOptions {
    fn default() -> Self {
        Self {
            url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "© OpenStreetMap contributors".to_string(),
        }
    }
}

/// Color del marcador según el estado operativo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Green,
    Orange,
    Red,
}

impl MarkerColor {
    pub fn for_status(status: VehicleStatus) -> Self {
        match status {
            VehicleStatus::Active => MarkerColor::Green,
            VehicleStatus::Maintenance => MarkerColor::Orange,
            VehicleStatus::Inactive => MarkerColor::Red,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerColor::Green => "green",
            MarkerColor::Orange => "orange",
            MarkerColor::Red => "red",
        }
    }
}

/// Estilo de marcador circular
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub radius: f64,
    pub fill_color: MarkerColor,
    pub stroke_color: String,
    pub weight: f64,
    pub opacity: f64,
    pub fill_opacity: f64,
}

impl MarkerStyle {
    pub fn for_status(status: VehicleStatus) -> Self {
        Self {
            radius: 8.0,
            fill_color: MarkerColor::for_status(status),
            stroke_color: "#fff".to_string(),
            weight: 2.0,
            opacity: 1.0,
            fill_opacity: 0.8,
        }
    }
}

/// Popup de detalle, copiado del vehículo al crear el marcador
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehiclePopup {
    pub make: String,
    pub model: String,
    pub license_plate: String,
    pub status: VehicleStatus,
    pub speed: f64,
    pub fuel_level: f64,
}

impl VehiclePopup {
    pub fn from_vehicle(vehicle: &Vehicle) -> Self {
        Self {
            make: vehicle.make.clone(),
            model: vehicle.model.clone(),
            license_plate: vehicle.license_plate.clone(),
            status: vehicle.status,
            speed: vehicle.telemetry.speed,
            fuel_level: vehicle.telemetry.fuel_level,
        }
    }

    pub fn render(&self) -> String {
        format!(
            "{} {}\n{}\nStatus: {}\nSpeed: {:.0} mph\nFuel: {:.0}%",
            self.make, self.model, self.license_plate, self.status, self.speed, self.fuel_level
        )
    }
}

/// Todo lo que la superficie necesita para dibujar un marcador
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerOptions {
    pub vehicle_id: VehicleId,
    pub position: LatLng,
    pub style: MarkerStyle,
    pub popup: VehiclePopup,
}

/// Superficie de mapa persistente
///
/// Se crea una vez por montaje de la vista y se libera en el desmontaje.
pub trait MapSurface: Send {
    fn id(&self) -> SurfaceId;

    fn set_view(&mut self, center: LatLng, zoom: u8);

    fn add_tile_layer(&mut self, options: &TileLayerOptions) -> LayerId;

    fn create_marker_layer(&mut self) -> LayerId;

    fn add_marker(&mut self, layer: LayerId, marker: MarkerOptions) -> Result<MarkerId, MapError>;

    /// Quitar todos los marcadores de una capa; devuelve cuántos se quitaron
    fn clear_layer(&mut self, layer: LayerId) -> Result<usize, MapError>;

    fn fit_bounds(&mut self, bounds: LatLngBounds);

    /// Liberar la superficie con todos sus listeners y marcadores
    fn release(&mut self);
}

/// Fábrica de superficies (el contenedor puede no estar disponible)
pub trait SurfaceFactory: Send {
    type Surface: MapSurface;

    fn create(&mut self) -> Result<Self::Surface, MapError>;
}
