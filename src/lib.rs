//! Fleet Monitor
//!
//! Núcleo de monitorización de flota: generación de telemetría, agregación
//! de estados y mapa en vivo reconciliado con la colección de vehículos.

pub mod config;
pub mod map;
pub mod models;
pub mod services;
pub mod session;
pub mod state;
pub mod utils;

pub use config::environment::MonitorConfig;
pub use utils::errors::{AppError, AppResult};
