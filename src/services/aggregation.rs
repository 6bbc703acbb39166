//! Motor de agregación
//!
//! Función pura sobre la colección de vehículos: dos folds independientes
//! (estado operativo y salud `overall`). Se recalcula desde cero en cada cambio.

use crate::models::analytics::AggregateSnapshot;
use crate::models::vehicle::Vehicle;

/// Calcular el snapshot agregado de una colección (o de una vista filtrada)
pub fn aggregate<'a, I>(vehicles: I) -> AggregateSnapshot
where
    I: IntoIterator<Item = &'a Vehicle>,
{
    vehicles
        .into_iter()
        .fold(AggregateSnapshot::default(), |mut snapshot, vehicle| {
            snapshot.status_counts.record(vehicle.status);
            snapshot.maintenance_counts.record(vehicle.maintenance.overall);
            snapshot
        })
}
