//! View box of the SVG canvas and its fit-then-fixed-resolution controller.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

use crate::mesh::Mesh;

/// World-space rectangle shown in the viewport, in SVG `viewBox` order.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    /// Convert a world bounding box, flipping Y so world "up" is screen "up".
    pub fn from_world_bbox(bbox: Rect) -> Self {
        Self {
            x: bbox.x0,
            y: -bbox.y1,
            width: bbox.width(),
            height: bbox.height(),
        }
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    /// Value for the SVG `viewBox` attribute.
    pub fn to_attr(&self) -> String {
        format!("{} {} {} {}", self.x, self.y, self.width, self.height)
    }

    /// Map a pixel offset inside a viewport of `viewport` size to view-box
    /// (user) units. Assumes the aspect ratios match, which the controller
    /// guarantees after the initial fit.
    pub fn pixel_to_user(&self, offset: Point, viewport: Size) -> Point {
        if viewport.width <= 0.0 {
            return Point::new(self.x, self.y);
        }
        let res = self.width / viewport.width;
        Point::new(self.x + offset.x * res, self.y + offset.y * res)
    }
}

/// World extent used when the meshes span a single point.
const DEGENERATE_EXTENT: f64 = 1.0;

/// Resolution state of the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// No fit has happened yet.
    Unset,
    /// World units per viewport pixel, fixed after the first fit.
    Fixed(f64),
}

/// Keeps the view box in step with the viewport size.
///
/// The first update stretches the view box to the viewport aspect ratio and
/// fixes the world-per-pixel resolution; later updates (window resizes) grow
/// or shrink the view box at that resolution instead of re-fitting.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewBoxController {
    view_box: ViewBox,
    resolution: Resolution,
}

impl ViewBoxController {
    pub fn new(view_box: ViewBox) -> Self {
        Self {
            view_box,
            resolution: Resolution::Unset,
        }
    }

    pub fn view_box(&self) -> ViewBox {
        self.view_box
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Apply the current viewport size in pixels and return the new view box.
    ///
    /// A viewport without a positive finite size is ignored.
    pub fn update(&mut self, viewport: Size) -> ViewBox {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(viewport.width) || !valid(viewport.height) {
            tracing::debug!(?viewport, "viewport not laid out, view box unchanged");
            return self.view_box;
        }

        let vbox = &mut self.view_box;
        match self.resolution {
            Resolution::Unset => {
                if !(vbox.width > 0.0 || vbox.height > 0.0) {
                    // Single-point extent: fit a unit square centred on it.
                    vbox.x -= 0.5 * (DEGENERATE_EXTENT - vbox.width);
                    vbox.y -= 0.5 * (DEGENERATE_EXTENT - vbox.height);
                    vbox.width = DEGENERATE_EXTENT;
                    vbox.height = DEGENERATE_EXTENT;
                }
                let rect_ar = viewport.width / viewport.height;
                let vbox_ar = vbox.aspect_ratio();

                if rect_ar < vbox_ar {
                    vbox.height = vbox.width / rect_ar; // keep width, grow height
                } else if rect_ar > vbox_ar {
                    vbox.width = vbox.height * rect_ar; // keep height, grow width
                }
                let res = vbox.width / viewport.width;
                self.resolution = Resolution::Fixed(res);
                tracing::debug!(res, "view resolution fixed");
            }
            Resolution::Fixed(res) => {
                vbox.width = viewport.width * res;
                vbox.height = viewport.height * res;
            }
        }
        self.view_box
    }
}

/// Union of the bounding boxes of all meshes, `None` when there are none.
pub fn union_bbox(meshes: &[Mesh]) -> Option<Rect> {
    meshes
        .iter()
        .map(|m| m.bbox().to_rect())
        .reduce(|acc, r| acc.union(r))
}
