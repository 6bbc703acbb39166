//! Services module
//!
//! Este módulo contiene la lógica de negocio del monitor: generación de
//! telemetría, agregación y exportación.

pub mod aggregation;
pub mod export;
pub mod telemetry_generator;

pub use aggregation::aggregate;
pub use export::{CsvExporter, FleetExporter};
pub use telemetry_generator::{FleetGenerator, GeneratorConfig, RefreshReport};
