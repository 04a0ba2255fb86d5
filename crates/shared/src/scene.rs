//! Render model of a loaded mesh collection.
//!
//! `Scene` joins every zone of every mesh under a [`ZoneId`] and precomputes
//! what the DOM layer needs per element (id, path data, fill). It also owns
//! the view-box controller and zoom behaviour so the whole view state can be
//! driven without a browser.

use std::collections::HashMap;
use std::fmt;

use kurbo::Size;

use crate::config::ViewerConfig;
use crate::error::DataIntegrityError;
use crate::geometry::zone_path_data;
use crate::mesh::{Mesh, Zone};
use crate::palette::color_for_rank;
use crate::tooltip::tooltip_text;
use crate::view::{union_bbox, ViewBox, ViewBoxController};
use crate::zoom::{ZoomBehavior, ZoomTransform};

/// A zone across the loaded collection: (mesh index, zone id).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZoneId {
    pub mesh: usize,
    pub zone: String,
}

impl ZoneId {
    pub fn new(mesh: usize, zone: impl Into<String>) -> Self {
        Self {
            mesh,
            zone: zone.into(),
        }
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.mesh, self.zone)
    }
}

/// One drawable zone.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneElement {
    pub id: ZoneId,
    /// DOM id, unique across meshes.
    pub dom_id: String,
    /// SVG path data of the shrunk polygon.
    pub path: String,
    pub fill: String,
}

pub struct Scene {
    name: String,
    config: ViewerConfig,
    meshes: Vec<Mesh>,
    elements: Vec<ZoneElement>,
    by_dom_id: HashMap<String, usize>,
    view: ViewBoxController,
    zoom: ZoomBehavior,
}

impl Scene {
    /// Build the render model for `meshes` (in request order).
    pub fn build(name: &str, meshes: Vec<Mesh>, config: ViewerConfig) -> Result<Self, DataIntegrityError> {
        let mut elements = Vec::new();
        for (index, mesh) in meshes.iter().enumerate() {
            let fill = color_for_rank(&config.palette, mesh.rank());
            for zone in mesh.zones() {
                elements.push(ZoneElement {
                    id: ZoneId::new(index, zone.id()),
                    dom_id: format!("{name}_z_{index}_{}", zone.id()),
                    path: zone_path_data(mesh, zone, config.shrink)?,
                    fill: fill.to_string(),
                });
            }
        }
        let by_dom_id = elements
            .iter()
            .enumerate()
            .map(|(i, e)| (e.dom_id.clone(), i))
            .collect();

        let view_box = union_bbox(&meshes)
            .map(ViewBox::from_world_bbox)
            .unwrap_or_default();

        tracing::info!(
            meshes = meshes.len(),
            zones = elements.len(),
            "scene built"
        );

        Ok(Self {
            name: name.to_string(),
            zoom: ZoomBehavior::new(config.scale_extent),
            config,
            meshes,
            elements,
            by_dom_id,
            view: ViewBoxController::new(view_box),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn elements(&self) -> &[ZoneElement] {
        &self.elements
    }

    pub fn element_by_dom_id(&self, dom_id: &str) -> Option<&ZoneElement> {
        self.by_dom_id.get(dom_id).map(|&i| &self.elements[i])
    }

    pub fn lookup(&self, id: &ZoneId) -> Option<(&Mesh, &Zone)> {
        let mesh = self.meshes.get(id.mesh)?;
        Some((mesh, mesh.zone(&id.zone)?))
    }

    pub fn tooltip_for(&self, id: &ZoneId) -> Option<String> {
        self.lookup(id)
            .map(|(mesh, zone)| tooltip_text(mesh.rank(), zone.id()))
    }

    pub fn view_box(&self) -> ViewBox {
        self.view.view_box()
    }

    pub fn view(&self) -> &ViewBoxController {
        &self.view
    }

    pub fn zoom(&self) -> &ZoomBehavior {
        &self.zoom
    }

    pub fn zoom_mut(&mut self) -> &mut ZoomBehavior {
        &mut self.zoom
    }

    /// Initial fit of the union bounding box to the viewport. Returns the
    /// fitted view box and the transform to apply to the mesh group.
    pub fn setup_view_box(&mut self, viewport: Size) -> (ViewBox, ZoomTransform) {
        let view_box = self.view.update(viewport);
        (view_box, self.zoom.transform())
    }

    /// Resize handling after the initial fit.
    pub fn update_view_box(&mut self, viewport: Size) -> ViewBox {
        self.view.update(viewport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_dom_ids_unique_across_meshes() {
        let meshes = vec![
            fixtures::triangle_mesh(0, [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]),
            fixtures::triangle_mesh(1, [[1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]),
        ];
        let scene = Scene::build("mv", meshes, ViewerConfig::default()).unwrap();
        let ids: Vec<_> = scene.elements().iter().map(|e| e.dom_id.as_str()).collect();
        assert_eq!(ids, ["mv_z_0_0", "mv_z_1_0"]);

        let el = scene.element_by_dom_id("mv_z_1_0").unwrap();
        assert_eq!(el.id, ZoneId::new(1, "0"));
        assert_eq!(scene.tooltip_for(&el.id).unwrap(), "Rank: 1  Zone: 0");
        assert!(scene.tooltip_for(&ZoneId::new(5, "0")).is_none());
    }

    #[test]
    fn test_empty_scene_has_default_view_box() {
        let scene = Scene::build("mv", vec![], ViewerConfig::default()).unwrap();
        assert!(scene.elements().is_empty());
        assert_eq!(scene.view_box(), ViewBox::default());
    }
}
