//! Sesión de monitorización
//!
//! Planificador cooperativo de un solo hilo lógico: eventos de entrada,
//! paso síncrono de la sesión, temporizador de refresco y publicación de
//! `DashboardUpdate`s.

pub mod events;
pub mod monitor;
pub mod runtime;

pub use events::{DashboardUpdate, MapStatus, SessionEvent};
pub use monitor::MonitoringSession;
pub use runtime::{RefreshTimer, SessionHandle, SessionRuntime};
