//! Baseplate decomposition: partition the drawer grid into printable tiles
//! bounded by a maximum edge length.

use crate::error::PlannerError;
use crate::types::{
    BaseplateSizeCount, BaseplateStrategy, BaseplateSummary, BaseplateTile, DrawerUnits,
};

/// Largest printable baseplate edge, in grid units.
pub const DEFAULT_MAX_TILE_UNITS: u32 = 5;

/// Split one axis of length `total` into pieces of at most `max_piece`.
/// Both strategies emit exactly ceil(total / max_piece) pieces summing to
/// `total`; they differ only in how the length is distributed.
fn split_axis(total: u32, max_piece: u32, strategy: BaseplateStrategy) -> Vec<u32> {
    match strategy {
        BaseplateStrategy::MaxFirst => {
            let mut pieces = Vec::new();
            let mut remaining = total;
            while remaining > 0 {
                let size = max_piece.min(remaining);
                pieces.push(size);
                remaining -= size;
            }
            pieces
        }
        BaseplateStrategy::Balanced => {
            let count = total.div_ceil(max_piece);
            if count == 0 {
                return Vec::new();
            }
            let base = total / count;
            let remainder = total % count;
            // The earliest pieces take the extra unit; the tie-break is
            // arbitrary but fixed for output compatibility.
            (0..count)
                .map(|i| if i < remainder { base + 1 } else { base })
                .collect()
        }
    }
}

/// Partition a `width_units` x `depth_units` footprint into tiles no larger
/// than `max_tile_units` per edge, in row-major order.
///
/// A zero-sized footprint is an expected transient state while the user is
/// editing inputs and yields an empty list; a zero `max_tile_units` is a
/// caller bug and fails.
pub fn decompose_footprint(
    width_units: u32,
    depth_units: u32,
    max_tile_units: u32,
    strategy: BaseplateStrategy,
) -> Result<Vec<BaseplateTile>, PlannerError> {
    if max_tile_units == 0 {
        return Err(PlannerError::InvalidArgument(
            "maxTileUnits must be a positive integer".to_string(),
        ));
    }
    if width_units == 0 || depth_units == 0 {
        return Ok(Vec::new());
    }

    let rows = split_axis(depth_units, max_tile_units, strategy);
    let cols = split_axis(width_units, max_tile_units, strategy);
    let mut tiles = Vec::with_capacity(rows.len() * cols.len());

    let mut y_offset = 0;
    for &row_height in &rows {
        let mut x_offset = 0;
        for &col_width in &cols {
            tiles.push(BaseplateTile {
                x: x_offset,
                y: y_offset,
                width_units: col_width,
                depth_units: row_height,
            });
            x_offset += col_width;
        }
        y_offset += row_height;
    }

    Ok(tiles)
}

/// Decompose the drawer grid and aggregate the tiles into per-size counts,
/// sorted by descending area, count, width, then depth.
pub fn slice_baseplates(
    drawer: DrawerUnits,
    max_tile_units: u32,
    strategy: BaseplateStrategy,
) -> Result<BaseplateSummary, PlannerError> {
    let tiles = decompose_footprint(
        drawer.width_units,
        drawer.depth_units,
        max_tile_units,
        strategy,
    )?;

    let mut size_counts: Vec<BaseplateSizeCount> = Vec::new();
    for tile in &tiles {
        match size_counts
            .iter_mut()
            .find(|c| c.width_units == tile.width_units && c.depth_units == tile.depth_units)
        {
            Some(entry) => entry.count += 1,
            None => size_counts.push(BaseplateSizeCount {
                width_units: tile.width_units,
                depth_units: tile.depth_units,
                count: 1,
            }),
        }
    }
    size_counts.sort_by(|a, b| {
        let area_a = a.width_units * a.depth_units;
        let area_b = b.width_units * b.depth_units;
        area_b
            .cmp(&area_a)
            .then(b.count.cmp(&a.count))
            .then(b.width_units.cmp(&a.width_units))
            .then(b.depth_units.cmp(&a.depth_units))
    });

    let covered_area_units = tiles
        .iter()
        .map(|t| t.width_units as u64 * t.depth_units as u64)
        .sum();

    Ok(BaseplateSummary {
        max_tile_units,
        total_tiles: tiles.len() as u32,
        covered_area_units,
        size_counts,
        tiles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drawer(width_units: u32, depth_units: u32) -> DrawerUnits {
        DrawerUnits {
            width_units,
            depth_units,
        }
    }

    fn tile(x: u32, y: u32, width_units: u32, depth_units: u32) -> BaseplateTile {
        BaseplateTile {
            x,
            y,
            width_units,
            depth_units,
        }
    }

    fn assert_exact_partition(tiles: &[BaseplateTile], width: u32, depth: u32, max: u32) {
        let area: u64 = tiles
            .iter()
            .map(|t| t.width_units as u64 * t.depth_units as u64)
            .sum();
        assert_eq!(area, width as u64 * depth as u64);
        for t in tiles {
            assert!(t.width_units >= 1 && t.width_units <= max);
            assert!(t.depth_units >= 1 && t.depth_units <= max);
            assert!(t.x + t.width_units <= width);
            assert!(t.y + t.depth_units <= depth);
        }
        for (i, a) in tiles.iter().enumerate() {
            for b in &tiles[i + 1..] {
                let disjoint = a.x + a.width_units <= b.x
                    || b.x + b.width_units <= a.x
                    || a.y + a.depth_units <= b.y
                    || b.y + b.depth_units <= a.y;
                assert!(disjoint, "tiles {a:?} and {b:?} overlap");
            }
        }
    }

    #[test]
    fn empty_footprint_yields_no_tiles() {
        for (w, d) in [(0, 10), (10, 0), (0, 0)] {
            let tiles = decompose_footprint(w, d, 5, BaseplateStrategy::MaxFirst).unwrap();
            assert!(tiles.is_empty());
        }
    }

    #[test]
    fn zero_max_tile_is_rejected() {
        let err = decompose_footprint(4, 4, 0, BaseplateStrategy::MaxFirst).unwrap_err();
        assert!(matches!(err, PlannerError::InvalidArgument(_)));
    }

    #[test]
    fn single_tile_when_footprint_fits() {
        let tiles = decompose_footprint(5, 4, 5, BaseplateStrategy::MaxFirst).unwrap();
        assert_eq!(tiles, vec![tile(0, 0, 5, 4)]);
    }

    #[test]
    fn max_first_splits_row_major_with_remainders_last() {
        let tiles = decompose_footprint(12, 9, 5, BaseplateStrategy::MaxFirst).unwrap();
        assert_eq!(
            tiles,
            vec![
                tile(0, 0, 5, 5),
                tile(5, 0, 5, 5),
                tile(10, 0, 2, 5),
                tile(0, 5, 5, 4),
                tile(5, 5, 5, 4),
                tile(10, 5, 2, 4),
            ]
        );
        assert_exact_partition(&tiles, 12, 9, 5);
    }

    #[test]
    fn balanced_splits_minimize_size_disparity() {
        // 11 over max 5 -> 3 pieces of [4, 4, 3]; 12 -> [4, 4, 4].
        let tiles = decompose_footprint(12, 11, 5, BaseplateStrategy::Balanced).unwrap();
        let widths: Vec<u32> = tiles.iter().take(3).map(|t| t.width_units).collect();
        assert_eq!(widths, vec![4, 4, 4]);
        let heights: Vec<u32> = tiles.iter().step_by(3).map(|t| t.depth_units).collect();
        assert_eq!(heights, vec![4, 4, 3]);
        assert_exact_partition(&tiles, 12, 11, 5);
    }

    #[test]
    fn both_strategies_emit_the_same_piece_count() {
        for (w, d, m) in [(12, 11, 5), (7, 7, 3), (13, 1, 4), (25, 25, 5), (6, 5, 5)] {
            let max_first = decompose_footprint(w, d, m, BaseplateStrategy::MaxFirst).unwrap();
            let balanced = decompose_footprint(w, d, m, BaseplateStrategy::Balanced).unwrap();
            assert_eq!(max_first.len(), balanced.len());
            assert_exact_partition(&max_first, w, d, m);
            assert_exact_partition(&balanced, w, d, m);
        }
    }

    #[test]
    fn slice_counts_and_sorts_sizes() {
        let summary = slice_baseplates(drawer(12, 11), 5, BaseplateStrategy::MaxFirst).unwrap();

        assert_eq!(summary.max_tile_units, 5);
        assert_eq!(summary.total_tiles, 9);
        assert_eq!(summary.covered_area_units, 132);
        assert_eq!(
            summary.size_counts,
            vec![
                BaseplateSizeCount {
                    width_units: 5,
                    depth_units: 5,
                    count: 4
                },
                BaseplateSizeCount {
                    width_units: 2,
                    depth_units: 5,
                    count: 2
                },
                BaseplateSizeCount {
                    width_units: 5,
                    depth_units: 1,
                    count: 2
                },
                BaseplateSizeCount {
                    width_units: 2,
                    depth_units: 1,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn slice_of_empty_grid_is_empty() {
        let summary = slice_baseplates(drawer(0, 10), 5, BaseplateStrategy::MaxFirst).unwrap();
        assert_eq!(summary.total_tiles, 0);
        assert_eq!(summary.covered_area_units, 0);
        assert!(summary.tiles.is_empty());
        assert!(summary.size_counts.is_empty());
    }

    #[test]
    fn decomposition_is_idempotent() {
        let a = slice_baseplates(drawer(12, 9), 5, BaseplateStrategy::Balanced).unwrap();
        let b = slice_baseplates(drawer(12, 9), 5, BaseplateStrategy::Balanced).unwrap();
        assert_eq!(a, b);
    }
}
