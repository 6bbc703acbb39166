//! Superficie de mapa en memoria
//!
//! Implementación sin pantalla de `MapSurface`: registra todo lo que se le
//! pide en un `SurfaceJournal` compartido. La usan el binario y los tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError};

use crate::map::geometry::{LatLng, LatLngBounds};
use crate::map::surface::{
    LayerId, MapError, MapSurface, MarkerId, MarkerOptions, SurfaceFactory, SurfaceId,
    TileLayerOptions,
};
use crate::models::vehicle::VehicleId;

/// Registro de lo que han hecho todas las superficies de una fábrica
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceJournal {
    pub surfaces_created: usize,
    pub surfaces_released: usize,
    pub markers_created: usize,
    pub markers_removed: usize,
    pub fits: usize,
    /// Marcadores vivos en superficies no liberadas
    pub live_markers: BTreeMap<MarkerId, MarkerOptions>,
    pub tile_layers: Vec<TileLayerOptions>,
    pub viewport: Option<(LatLng, u8)>,
    pub fitted_bounds: Option<LatLngBounds>,
    next_marker: u64,
}

impl SurfaceJournal {
    pub fn live_marker_count(&self) -> usize {
        self.live_markers.len()
    }

    pub fn active_surfaces(&self) -> usize {
        self.surfaces_created.saturating_sub(self.surfaces_released)
    }

    /// Marcadores vivos de un vehículo
    pub fn markers_for(&self, vehicle_id: &VehicleId) -> Vec<&MarkerOptions> {
        self.live_markers
            .values()
            .filter(|marker| &marker.vehicle_id == vehicle_id)
            .collect()
    }
}

/// Journal compartido entre la fábrica, sus superficies y quien observa
#[derive(Debug, Clone, Default)]
pub struct SharedJournal(Arc<Mutex<SurfaceJournal>>);

impl SharedJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copia del estado actual
    pub fn snapshot(&self) -> SurfaceJournal {
        self.record(|journal| journal.clone())
    }

    fn record<R>(&self, f: impl FnOnce(&mut SurfaceJournal) -> R) -> R {
        let mut journal = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut journal)
    }
}

/// Superficie en memoria
#[derive(Debug)]
pub struct HeadlessSurface {
    id: SurfaceId,
    journal: SharedJournal,
    next_layer: u64,
    tile_layers: Vec<(LayerId, TileLayerOptions)>,
    marker_layers: HashMap<LayerId, Vec<MarkerId>>,
    released: bool,
}

impl HeadlessSurface {
    fn new(journal: SharedJournal) -> Self {
        journal.record(|j| j.surfaces_created += 1);
        Self {
            id: SurfaceId::new(),
            journal,
            next_layer: 0,
            tile_layers: Vec::new(),
            marker_layers: HashMap::new(),
            released: false,
        }
    }

    fn next_layer_id(&mut self) -> LayerId {
        self.next_layer += 1;
        LayerId(self.next_layer)
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    fn remove_markers(&self, markers: &[MarkerId]) {
        self.journal.record(|j| {
            for marker in markers {
                if j.live_markers.remove(marker).is_some() {
                    j.markers_removed += 1;
                }
            }
        });
    }
}

impl MapSurface for HeadlessSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn set_view(&mut self, center: LatLng, zoom: u8) {
        if self.released {
            return;
        }
        self.journal.record(|j| j.viewport = Some((center, zoom)));
    }

    fn add_tile_layer(&mut self, options: &TileLayerOptions) -> LayerId {
        let layer = self.next_layer_id();
        if !self.released {
            self.tile_layers.push((layer, options.clone()));
            self.journal.record(|j| j.tile_layers.push(options.clone()));
        }
        layer
    }

    fn create_marker_layer(&mut self) -> LayerId {
        let layer = self.next_layer_id();
        self.marker_layers.insert(layer, Vec::new());
        layer
    }

    fn add_marker(&mut self, layer: LayerId, marker: MarkerOptions) -> Result<MarkerId, MapError> {
        if self.released {
            return Err(MapError::SurfaceReleased);
        }
        let markers = self
            .marker_layers
            .get_mut(&layer)
            .ok_or(MapError::UnknownLayer(layer))?;

        let id = self.journal.record(|j| {
            j.next_marker += 1;
            let id = MarkerId(j.next_marker);
            j.live_markers.insert(id, marker);
            j.markers_created += 1;
            id
        });
        markers.push(id);
        Ok(id)
    }

    fn clear_layer(&mut self, layer: LayerId) -> Result<usize, MapError> {
        if self.released {
            return Err(MapError::SurfaceReleased);
        }
        let markers = self
            .marker_layers
            .get_mut(&layer)
            .map(std::mem::take)
            .ok_or(MapError::UnknownLayer(layer))?;
        self.remove_markers(&markers);
        Ok(markers.len())
    }

    fn fit_bounds(&mut self, bounds: LatLngBounds) {
        if self.released {
            return;
        }
        self.journal.record(|j| {
            j.fitted_bounds = Some(bounds);
            j.fits += 1;
        });
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        let markers: Vec<MarkerId> = self
            .marker_layers
            .drain()
            .flat_map(|(_, markers)| markers)
            .collect();
        self.remove_markers(&markers);

        let tiles: Vec<TileLayerOptions> =
            self.tile_layers.drain(..).map(|(_, options)| options).collect();
        self.journal.record(|j| {
            for options in &tiles {
                if let Some(pos) = j.tile_layers.iter().position(|t| t == options) {
                    j.tile_layers.remove(pos);
                }
            }
            j.surfaces_released += 1;
        });
    }
}

impl Drop for HeadlessSurface {
    fn drop(&mut self) {
        self.release();
    }
}

/// Fábrica de superficies en memoria
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurfaceFactory {
    journal: SharedJournal,
    unavailable: Option<String>,
}

impl HeadlessSurfaceFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fábrica cuyo contenedor nunca está disponible
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            journal: SharedJournal::new(),
            unavailable: Some(reason.into()),
        }
    }

    pub fn journal(&self) -> SharedJournal {
        self.journal.clone()
    }
}

impl SurfaceFactory for HeadlessSurfaceFactory {
    type Surface = HeadlessSurface;

    fn create(&mut self) -> Result<Self::Surface, MapError> {
        match &self.unavailable {
            Some(reason) => Err(MapError::SurfaceUnavailable(reason.clone())),
            None => Ok(HeadlessSurface::new(self.journal.clone())),
        }
    }
}
