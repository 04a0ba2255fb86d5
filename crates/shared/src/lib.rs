//! Mesh model and view logic shared by the browser viewer and the server.
//!
//! Everything here is DOM-free: data files are parsed and validated into
//! [`Mesh`]es, zones are turned into shrunk SVG paths, and the view box,
//! pan/zoom transform and fan-in loader are plain state machines.

pub mod config;
pub mod error;
pub mod fixtures;
pub mod geometry;
pub mod harness;
pub mod loader;
pub mod mesh;
pub mod palette;
pub mod scene;
pub mod tooltip;
pub mod view;
pub mod viewer;
pub mod zoom;

pub use config::ViewerConfig;
pub use error::{ConfigError, DataIntegrityError, LoadError, LoadResult};
pub use mesh::{BBox, Mesh, MeshRecord, Zone};
pub use scene::{Scene, ZoneElement, ZoneId};
pub use view::{ViewBox, ViewBoxController};
pub use viewer::{Delivery, Phase, ViewerCore};
pub use zoom::{ZoomBehavior, ZoomTransform};

// Geometry types in the public API.
pub use kurbo::{Point, Size};
