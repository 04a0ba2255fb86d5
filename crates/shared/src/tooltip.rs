//! Hover tooltip text and placement.

use kurbo::{Point, Size};

/// Label shown for a hovered zone.
pub fn tooltip_text(rank: u32, zone: &str) -> String {
    format!("Rank: {rank}  Zone: {zone}")
}

/// Top-left corner (page pixels) that centres a tooltip of `size` above
/// the pointer, leaving `offset` pixels between them.
pub fn tooltip_position(pointer: Point, size: Size, offset: f64) -> Point {
    Point::new(pointer.x - 0.5 * size.width, pointer.y - size.height - offset)
}
