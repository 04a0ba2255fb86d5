//! Factory functions for creating test meshes.
//!
//! Used by unit tests, the integration tests and the headless harness.

use std::collections::HashMap;

use kurbo::{Point, Rect};

use crate::mesh::{BBox, Mesh, MeshRecord, NodeKey, NodeRecord, ZoneRecord};

// ── Records ─────────────────────────────────────────────────────

/// Single-zone record whose polygon runs through `points` in order.
/// Node ids are `0..n`, the zone id is `"0"`.
pub fn polygon_record(rank: u32, points: &[[f64; 2]]) -> MeshRecord {
    let nodes: HashMap<String, NodeRecord> = points
        .iter()
        .enumerate()
        .map(|(i, &pos)| (i.to_string(), NodeRecord { pos }))
        .collect();
    let nids = (0..points.len()).map(|i| NodeKey(i.to_string())).collect();

    MeshRecord {
        rank,
        nodes,
        zones: vec![("0".to_string(), ZoneRecord { nids })],
        bbox: bbox_of(points),
    }
}

/// Bounding box of `points` (zero box at the origin when empty).
pub fn bbox_of(points: &[[f64; 2]]) -> BBox {
    let rect = points
        .iter()
        .map(|&[x, y]| Rect::from_points(Point::new(x, y), Point::new(x, y)))
        .reduce(|a, b| a.union(b))
        .unwrap_or(Rect::ZERO);
    BBox::from_rect(rect)
}

// ── JSON payloads ───────────────────────────────────────────────

pub fn triangle_json(rank: u32, points: [[f64; 2]; 3]) -> String {
    record_json(&polygon_record(rank, &points))
}

pub fn record_json(record: &MeshRecord) -> String {
    serde_json::to_string(record).unwrap_or_default()
}

// ── Validated meshes ────────────────────────────────────────────

/// Single-triangle mesh.
///
/// # Panics
/// If the points produce an invalid mesh (never for finite input).
pub fn triangle_mesh(rank: u32, points: [[f64; 2]; 3]) -> Mesh {
    Mesh::from_record(polygon_record(rank, &points)).expect("triangle fixture is valid")
}

/// Axis-aligned square zone with corner `(x, y)` and edge `size`,
/// counter-clockwise from the corner.
///
/// # Panics
/// If `size` is negative.
pub fn square_mesh(rank: u32, x: f64, y: f64, size: f64) -> Mesh {
    let points = [[x, y], [x + size, y], [x + size, y + size], [x, y + size]];
    Mesh::from_record(polygon_record(rank, &points)).expect("square fixture is valid")
}

/// Two triangles sharing an edge in one rank, zone ids `"0"` and `"1"`.
pub fn two_zone_json(rank: u32) -> String {
    format!(
        r#"{{
            "rank": {rank},
            "nodes": {{
                "0": {{"pos": [0.0, 0.0]}},
                "1": {{"pos": [1.0, 0.0]}},
                "2": {{"pos": [1.0, 1.0]}},
                "3": {{"pos": [0.0, 1.0]}}
            }},
            "zones": {{
                "0": {{"nids": [0, 1, 2]}},
                "1": {{"nids": [0, 2, 3]}}
            }},
            "bbox": {{"min0": 0.0, "max0": 1.0, "min1": 0.0, "max1": 1.0}}
        }}"#
    )
}
