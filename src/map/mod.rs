//! Mapa en vivo
//!
//! Geometría, superficie imperativa (trait + implementación en memoria) y la
//! vista que reconcilia los marcadores con la colección de vehículos.

pub mod geometry;
pub mod headless;
pub mod surface;
pub mod view;

pub use geometry::{LatLng, LatLngBounds};
pub use headless::{HeadlessSurface, HeadlessSurfaceFactory, SharedJournal, SurfaceJournal};
pub use surface::{
    LayerId, MapError, MapSurface, MarkerColor, MarkerId, MarkerOptions, MarkerStyle,
    SurfaceFactory, SurfaceId, TileLayerOptions, VehiclePopup,
};
pub use view::{LiveMapView, MapViewConfig, MapViewState, ReconcileReport};
