//! Zone geometry: centroids, shrinking toward the centroid and SVG paths.

use kurbo::{BezPath, Point};

use crate::error::DataIntegrityError;
use crate::mesh::{Mesh, Zone};

/// Default fraction of the node position kept when shrinking a zone.
pub const SHRINK_FACTOR: f64 = 0.9;

/// Arithmetic mean of `points`, `None` for an empty slice.
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point::new(sx / n, sy / n))
}

/// Linear interpolation between centroid and node:
/// `factor * node + (1 - factor) * centroid`.
pub fn shrink_node(centroid: Point, node: Point, factor: f64) -> Point {
    centroid.lerp(node, factor)
}

/// Boundary of `zone` pulled toward its centroid, in `nids` order.
pub fn zone_polygon(mesh: &Mesh, zone: &Zone, factor: f64) -> Result<Vec<Point>, DataIntegrityError> {
    let mid = zone.centroid();
    zone.nids()
        .iter()
        .map(|nid| {
            mesh.node(nid)
                .map(|pos| shrink_node(mid, pos, factor))
                .ok_or_else(|| DataIntegrityError::MissingNode {
                    zone: zone.id().to_string(),
                    node: nid.clone(),
                })
        })
        .collect()
}

/// Closed polyline through `points` with straight segments.
pub fn closed_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        path.move_to(*first);
        for p in iter {
            path.line_to(*p);
        }
        path.close_path();
    }
    path
}

/// SVG `d` attribute for the shrunk polygon of `zone`.
pub fn zone_path_data(mesh: &Mesh, zone: &Zone, factor: f64) -> Result<String, DataIntegrityError> {
    let polygon = zone_polygon(mesh, zone, factor)?;
    Ok(closed_path(&polygon).to_svg())
}
