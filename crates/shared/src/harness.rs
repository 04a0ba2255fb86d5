//! Headless viewer harness.
//!
//! Drives a [`ViewerCore`] the way the browser binding does (fetch results
//! arriving one by one, a viewport that can be resized, pointer gestures)
//! and records how often the render pipeline would have run.

use kurbo::{Point, Size};

use crate::config::ViewerConfig;
use crate::error::{LoadError, LoadResult};
use crate::scene::{Scene, ZoneElement};
use crate::view::ViewBox;
use crate::viewer::{Delivery, ViewerCore};
use crate::zoom::ZoomTransform;

/// Headless viewer — core state plus a simulated viewport
pub struct ViewerHarness {
    core: ViewerCore,
    viewport: Size,
    pipeline_runs: usize,
    transform: Option<ZoomTransform>,
}

impl ViewerHarness {
    /// Harness with the default config and an 800x600 viewport.
    pub fn new(name: &str) -> Self {
        Self::with_config(name, ViewerConfig::default(), Size::new(800.0, 600.0))
            .unwrap_or_else(|_| unreachable!("default config is valid"))
    }

    pub fn with_config(name: &str, config: ViewerConfig, viewport: Size) -> Result<Self, String> {
        let core = ViewerCore::new(name, config).map_err(|e| e.to_string())?;
        Ok(Self {
            core,
            viewport,
            pipeline_runs: 0,
            transform: None,
        })
    }

    // ── Loading ───────────────────────────────────────────────

    pub fn load_data(&mut self, sources: &[&str]) -> LoadResult<()> {
        self.core
            .begin_load(sources.iter().map(|s| s.to_string()).collect())
    }

    /// Deliver a successful fetch of source `index`.
    pub fn arrive(&mut self, index: usize, payload: &str) -> Delivery {
        self.deliver(index, Ok(payload.to_string()))
    }

    /// Deliver a transport failure for source `index`.
    pub fn fail(&mut self, index: usize, reason: &str) -> Delivery {
        let source_id = self.core.source(index).unwrap_or_default().to_string();
        self.deliver(
            index,
            Err(LoadError::Fetch {
                source_id,
                reason: reason.to_string(),
            }),
        )
    }

    fn deliver(&mut self, index: usize, payload: LoadResult<String>) -> Delivery {
        let delivery = self.core.deliver(index, payload);
        if delivery == Delivery::Ready {
            self.run_pipeline();
        }
        delivery
    }

    /// Equivalent of the DOM scaffold + zones + initial view box.
    fn run_pipeline(&mut self) {
        let viewport = self.viewport;
        if let Some(scene) = self.core.scene_mut() {
            let (_, transform) = scene.setup_view_box(viewport);
            self.transform = Some(transform);
            self.pipeline_runs += 1;
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn pipeline_runs(&self) -> usize {
        self.pipeline_runs
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.core.scene()
    }

    pub fn error(&self) -> Option<&str> {
        self.core.error()
    }

    pub fn elements(&self) -> &[ZoneElement] {
        self.core.scene().map(Scene::elements).unwrap_or(&[])
    }

    pub fn view_box(&self) -> Option<ViewBox> {
        self.core.scene().map(Scene::view_box)
    }

    /// Transform last applied to the mesh group.
    pub fn transform(&self) -> Option<ZoomTransform> {
        self.transform
    }

    /// Tooltip text for the element with `dom_id`.
    pub fn hover(&self, dom_id: &str) -> Option<String> {
        let scene = self.core.scene()?;
        let element = scene.element_by_dom_id(dom_id)?;
        scene.tooltip_for(&element.id)
    }

    // ── Interaction ───────────────────────────────────────────

    pub fn resize(&mut self, width: f64, height: f64) -> Option<ViewBox> {
        self.viewport = Size::new(width, height);
        let viewport = self.viewport;
        self.core
            .scene_mut()
            .map(|scene| scene.update_view_box(viewport))
    }

    /// Wheel at a pixel offset inside the viewport.
    pub fn wheel(&mut self, at_px: Point, delta_y: f64) -> Option<ZoomTransform> {
        let viewport = self.viewport;
        let scene = self.core.scene_mut()?;
        let anchor = scene.view_box().pixel_to_user(at_px, viewport);
        let t = scene.zoom_mut().wheel(delta_y, false, anchor);
        self.transform = Some(t);
        Some(t)
    }

    /// Drag between two pixel offsets.
    pub fn drag(&mut self, from_px: Point, to_px: Point) -> Option<ZoomTransform> {
        let viewport = self.viewport;
        let scene = self.core.scene_mut()?;
        let view_box = scene.view_box();
        let zoom = scene.zoom_mut();
        zoom.drag_start(view_box.pixel_to_user(from_px, viewport));
        let t = zoom.drag_move(view_box.pixel_to_user(to_px, viewport));
        zoom.drag_end();
        if t.is_some() {
            self.transform = t;
        }
        t
    }
}
