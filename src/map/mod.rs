//! Map rendering: tile sources, the shared map view and viewport math.
//!
//! The rotation engine drives the map through [`view::EguiMapSurface`];
//! the UI thread reads the same [`view::MapView`] every frame.

pub mod tiles;
pub mod view;
pub mod viewport;

pub use tiles::SceneTileSource;
pub use view::{EguiMapSurface, MapView, SharedMapView};
pub use viewport::{Camera, CameraAnimation};
