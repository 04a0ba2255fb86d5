//! Rank colours.

/// Sixteen well-separated fill colours, one per rank before wrapping.
pub const DEFAULT_COLORS: [&str; 16] = [
    "#4a6fb9", "#77b341", "#b05fd3", "#52a976",
    "#c84aa9", "#cda549", "#6666d6", "#797832",
    "#9098df", "#ce423e", "#46b3d1", "#ce417a",
    "#c9713c", "#8b5494", "#c1656e", "#d989c3",
];

/// Palette index for `rank`; ranks beyond the palette wrap around.
pub fn palette_index(rank: u32, len: usize) -> usize {
    debug_assert!(len > 0, "palette must not be empty");
    rank as usize % len
}

/// Fill colour for `rank` from `colors`.
pub fn color_for_rank(colors: &[String], rank: u32) -> &str {
    &colors[palette_index(rank, colors.len())]
}

pub fn default_palette() -> Vec<String> {
    DEFAULT_COLORS.iter().map(|c| c.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ranks_map_to_distinct_colors() {
        let palette = default_palette();
        let colors: HashSet<_> = (0..16).map(|r| color_for_rank(&palette, r)).collect();
        assert_eq!(colors.len(), 16);
        for r in 0..16 {
            assert_eq!(palette_index(r, 16), r as usize);
        }
    }

    #[test]
    fn test_rank_wraps_around() {
        let palette = default_palette();
        assert_eq!(palette_index(16, 16), 0);
        assert_eq!(color_for_rank(&palette, 16), "#4a6fb9");
        assert_eq!(color_for_rank(&palette, 33), "#77b341");
    }
}
