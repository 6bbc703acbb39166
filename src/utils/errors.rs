//! Sistema de manejo de errores
//!
//! Este módulo define los tipos de errores del monitor de flota
//! y su código estable para logs y para el compositor del dashboard.

use thiserror::Error;

use crate::map::MapError;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Map error: {0}")]
    Map(#[from] MapError),

    #[error("Session closed: {0}")]
    SessionClosed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Código estable del error, útil para logs y para la UI
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Configuration(_) => "CONFIG_ERROR",
            AppError::Map(_) => "MAP_ERROR",
            AppError::SessionClosed(_) => "SESSION_CLOSED",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Los errores de mapa solo degradan la vista, nunca el dashboard completo
    pub fn is_fatal(&self) -> bool {
        !matches!(self, AppError::Map(_))
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de configuración
pub fn configuration_error(key: &str, value: &str) -> AppError {
    AppError::Configuration(format!("{} has an invalid value '{}'", key, value))
}

/// Función helper para crear errores de sesión cerrada
pub fn session_closed_error(operation: &str) -> AppError {
    AppError::SessionClosed(format!("cannot {}: session already torn down", operation))
}

/// Función helper para crear errores internos
pub fn internal_error(message: &str) -> AppError {
    AppError::Internal(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(configuration_error("FLEET_SIZE", "abc").code(), "CONFIG_ERROR");
        assert_eq!(session_closed_error("send event").code(), "SESSION_CLOSED");
        assert_eq!(internal_error("boom").code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_map_errors_are_not_fatal() {
        let err: AppError = MapError::SurfaceUnavailable("no container".to_string()).into();
        assert_eq!(err.code(), "MAP_ERROR");
        assert!(!err.is_fatal());
        assert!(internal_error("boom").is_fatal());
    }

    #[test]
    fn test_configuration_error_message() {
        let err = configuration_error("MAP_ZOOM", "high");
        assert_eq!(
            err.to_string(),
            "Configuration error: MAP_ZOOM has an invalid value 'high'"
        );
    }
}
