//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del monitor: tamaño de la flota,
//! intervalo de refresco, generador y vista de mapa.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::map::geometry::LatLng;
use crate::map::view::MapViewConfig;
use crate::services::telemetry_generator::GeneratorConfig;
use crate::utils::errors::{configuration_error, AppResult};
use crate::utils::validation::validate_coordinates;

/// Configuración del monitor
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_map_center", skip_on_field_errors = false))]
pub struct MonitorConfig {
    pub environment: String,
    #[validate(range(max = 10000))]
    pub fleet_size: u32,
    #[validate(range(max = 1000))]
    pub route_count: u32,
    #[validate(range(min = 100, max = 3600000))]
    pub refresh_interval_ms: u64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub drain_step: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub active_ratio: f64,
    pub seed: Option<u64>,
    pub map_center_lat: f64,
    pub map_center_lng: f64,
    #[validate(range(max = 19))]
    pub map_zoom: u8,
    #[validate(range(min = 0.0, max = 1.0))]
    pub fit_padding: f64,
    /// Número de actualizaciones tras el que el binario se detiene
    pub run_ticks: Option<u64>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            fleet_size: 25,
            route_count: 15,
            refresh_interval_ms: 5000,
            drain_step: 5.0,
            active_ratio: 0.8,
            seed: None,
            map_center_lat: 40.7128,
            map_center_lng: -74.0060,
            map_zoom: 10,
            fit_padding: 0.1,
            run_ticks: None,
        }
    }
}

fn validate_map_center(config: &MonitorConfig) -> Result<(), ValidationError> {
    validate_coordinates(config.map_center_lat, config.map_center_lng)
}

impl MonitorConfig {
    /// Cargar desde variables de entorno (el `.env` ya debe estar cargado)
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Cargar con una función de búsqueda arbitraria
    ///
    /// Las variables ausentes toman el valor por defecto; las que no se
    /// pueden parsear dan `AppError::Configuration`.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
            fleet_size: parse_var(&lookup, "FLEET_SIZE")?.unwrap_or(defaults.fleet_size),
            route_count: parse_var(&lookup, "ROUTE_COUNT")?.unwrap_or(defaults.route_count),
            refresh_interval_ms: parse_var(&lookup, "REFRESH_INTERVAL_MS")?
                .unwrap_or(defaults.refresh_interval_ms),
            drain_step: parse_var(&lookup, "DRAIN_STEP")?.unwrap_or(defaults.drain_step),
            active_ratio: parse_var(&lookup, "ACTIVE_RATIO")?.unwrap_or(defaults.active_ratio),
            seed: parse_var(&lookup, "FLEET_SEED")?,
            map_center_lat: parse_var(&lookup, "MAP_CENTER_LAT")?
                .unwrap_or(defaults.map_center_lat),
            map_center_lng: parse_var(&lookup, "MAP_CENTER_LNG")?
                .unwrap_or(defaults.map_center_lng),
            map_zoom: parse_var(&lookup, "MAP_ZOOM")?.unwrap_or(defaults.map_zoom),
            fit_padding: parse_var(&lookup, "MAP_FIT_PADDING")?.unwrap_or(defaults.fit_padding),
            run_ticks: parse_var(&lookup, "RUN_TICKS")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            drain_step: self.drain_step,
            active_ratio: self.active_ratio,
            seed: self.seed,
        }
    }

    pub fn map_view_config(&self) -> MapViewConfig {
        MapViewConfig {
            center: LatLng::new(self.map_center_lat, self.map_center_lng),
            zoom: self.map_zoom,
            fit_padding: self.fit_padding,
            ..Default::default()
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> AppResult<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| configuration_error(key, &raw)),
    }
}
