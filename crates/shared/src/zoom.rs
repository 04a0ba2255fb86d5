//! Pan/zoom behaviour for the mesh group, independent of any DOM.
//!
//! Positions are in view-box (user) units, the same space the group's
//! `transform` attribute is expressed in.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Wheel delta (pixels) to scale exponent, matching the browser zoom feel.
const WHEEL_SENSITIVITY: f64 = 0.002;
/// Multiplier applied to line-based wheel deltas.
const WHEEL_LINE_PIXELS: f64 = 120.0;

/// Current translate and uniform scale of the mesh group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomTransform {
    pub translate: Vec2,
    pub scale: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl ZoomTransform {
    /// World to view-box mapping. Y is negated on every update so that world
    /// "up" stays screen "up" together with the flipped view box.
    pub fn affine(&self) -> Affine {
        Affine::translate(self.translate) * Affine::scale_non_uniform(self.scale, -self.scale)
    }

    /// Value for the SVG `transform` attribute of the mesh group.
    pub fn to_svg(&self) -> String {
        format!(
            "translate({},{})scale({},-{})",
            self.translate.x, self.translate.y, self.scale, self.scale
        )
    }

    /// View-box point back to world coordinates.
    pub fn invert(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.translate.x) / self.scale,
            -(p.y - self.translate.y) / self.scale,
        )
    }
}

/// Drag-and-scale gesture state with a clamped scale extent.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomBehavior {
    extent: [f64; 2],
    transform: ZoomTransform,
    drag_origin: Option<Point>,
}

impl ZoomBehavior {
    pub fn new(extent: [f64; 2]) -> Self {
        Self {
            extent,
            transform: ZoomTransform::default(),
            drag_origin: None,
        }
    }

    pub fn transform(&self) -> ZoomTransform {
        self.transform
    }

    pub fn extent(&self) -> [f64; 2] {
        self.extent
    }

    /// Scale to `k` (clamped) keeping the view-box point `anchor` fixed.
    pub fn scale_to(&mut self, k: f64, anchor: Point) -> ZoomTransform {
        let k = k.clamp(self.extent[0], self.extent[1]);
        let t = self.transform;
        // Anchor in the untransformed frame, then re-project at the new scale.
        let local = (anchor.to_vec2() - t.translate) / t.scale;
        self.transform = ZoomTransform {
            translate: anchor.to_vec2() - local * k,
            scale: k,
        };
        self.transform
    }

    /// Wheel gesture. `delta_y` is the raw event delta, `line_mode` true when
    /// the browser reports it in lines instead of pixels.
    pub fn wheel(&mut self, delta_y: f64, line_mode: bool, anchor: Point) -> ZoomTransform {
        let delta = if line_mode { delta_y * WHEEL_LINE_PIXELS } else { delta_y };
        let k = self.transform.scale * 2f64.powf(-delta * WHEEL_SENSITIVITY);
        self.scale_to(k, anchor)
    }

    /// Double click zooms in by 2, or out by 2 with shift held.
    pub fn double_click(&mut self, zoom_out: bool, anchor: Point) -> ZoomTransform {
        let factor = if zoom_out { 0.5 } else { 2.0 };
        self.scale_to(self.transform.scale * factor, anchor)
    }

    pub fn drag_start(&mut self, at: Point) {
        self.drag_origin = Some(at);
    }

    /// Pan by the pointer movement since the last drag event. Returns `None`
    /// when no drag is active.
    pub fn drag_move(&mut self, at: Point) -> Option<ZoomTransform> {
        let origin = self.drag_origin.replace(at)?;
        self.transform.translate += at - origin;
        Some(self.transform)
    }

    pub fn drag_end(&mut self) {
        self.drag_origin = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_origin.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_transform_flips_y() {
        let t = ZoomTransform::default();
        assert_eq!(t.to_svg(), "translate(0,0)scale(1,-1)");
        assert_eq!(t.affine() * Point::new(2.0, 3.0), Point::new(2.0, -3.0));
    }

    #[test]
    fn test_scale_is_clamped() {
        let mut zoom = ZoomBehavior::new([0.1, 100.0]);
        assert_eq!(zoom.scale_to(1000.0, Point::ORIGIN).scale, 100.0);
        assert_eq!(zoom.scale_to(0.0001, Point::ORIGIN).scale, 0.1);

        for _ in 0..50 {
            zoom.wheel(-500.0, false, Point::new(3.0, 4.0));
        }
        assert_eq!(zoom.transform().scale, 100.0);
    }

    #[test]
    fn test_wheel_keeps_anchor_fixed() {
        let mut zoom = ZoomBehavior::new([0.1, 100.0]);
        let anchor = Point::new(12.0, -7.0);
        let world = zoom.transform().invert(anchor);

        let t = zoom.wheel(-300.0, false, anchor);
        assert!(t.scale > 1.0);

        let back = t.affine() * world;
        assert_relative_eq!(back.x, anchor.x, epsilon = 1e-9);
        assert_relative_eq!(back.y, anchor.y, epsilon = 1e-9);
    }

    #[test]
    fn test_line_mode_wheel_scales_more() {
        let mut px = ZoomBehavior::new([0.1, 100.0]);
        let mut ln = ZoomBehavior::new([0.1, 100.0]);
        let a = px.wheel(-1.0, false, Point::ORIGIN).scale;
        let b = ln.wheel(-1.0, true, Point::ORIGIN).scale;
        assert!(b > a);
    }

    #[test]
    fn test_double_click() {
        let mut zoom = ZoomBehavior::new([0.1, 100.0]);
        assert_eq!(zoom.double_click(false, Point::ORIGIN).scale, 2.0);
        assert_eq!(zoom.double_click(true, Point::ORIGIN).scale, 1.0);
    }

    #[test]
    fn test_drag_pans_by_pointer_delta() {
        let mut zoom = ZoomBehavior::new([0.1, 100.0]);
        assert!(zoom.drag_move(Point::new(5.0, 5.0)).is_none());

        zoom.drag_start(Point::new(1.0, 1.0));
        zoom.drag_move(Point::new(4.0, 3.0));
        let t = zoom.drag_move(Point::new(5.0, 5.0)).unwrap();
        assert_eq!(t.translate, Vec2::new(4.0, 4.0));
        assert_eq!(t.to_svg(), "translate(4,4)scale(1,-1)");

        zoom.drag_end();
        assert!(!zoom.is_dragging());
    }
}
