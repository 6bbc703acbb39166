//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validar coordenadas y
//! normalizar los campos porcentuales de la telemetría.

use validator::ValidationError;

/// Validar formato de coordenadas GPS
///
/// Rechaza valores no finitos además de los que salen del rango WGS84.
pub fn validate_coordinates(lat: f64, lng: f64) -> Result<(), ValidationError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        let mut error = ValidationError::new("latitude");
        error.add_param("value".into(), &lat.to_string());
        error.add_param("range".into(), &"-90.0 to 90.0".to_string());
        return Err(error);
    }

    if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        let mut error = ValidationError::new("longitude");
        error.add_param("value".into(), &lng.to_string());
        error.add_param("range".into(), &"-180.0 to 180.0".to_string());
        return Err(error);
    }

    Ok(())
}

/// Validar que un valor porcentual esté en [0, 100]
pub fn validate_percentage(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        let mut error = ValidationError::new("percentage");
        error.add_param("value".into(), &value.to_string());
        error.add_param("range".into(), &"0 to 100".to_string());
        return Err(error);
    }
    Ok(())
}

/// Normalizar un porcentaje a [0, 100]
///
/// `NaN` se trata como 0.
pub fn clamp_percentage(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}
