//! # Connectivity
//!
//! Flood fills over the walkable tile set, used to verify that a generated
//! grid has no isolated pockets.

use crate::game::{Position, TileType};
use pathfinding::prelude::bfs_reach;
use std::collections::HashSet;

/// Looks up a tile without wrapping; out-of-range positions yield `None`.
pub fn tile_at(tiles: &[Vec<TileType>], pos: Position) -> Option<TileType> {
    if pos.x < 0 || pos.y < 0 {
        return None;
    }
    tiles
        .get(pos.y as usize)
        .and_then(|row| row.get(pos.x as usize))
        .copied()
}

/// Collects every walkable tile 4-connected to `start`.
///
/// With `wrap` set, moves off one edge re-enter on the opposite edge.
/// Returns an empty set when `start` itself is not walkable.
pub fn flood_walkable(tiles: &[Vec<TileType>], start: Position, wrap: bool) -> HashSet<Position> {
    let height = tiles.len() as u32;
    let width = tiles.first().map_or(0, |row| row.len()) as u32;
    let walkable = |pos: Position| tile_at(tiles, pos).map_or(false, TileType::is_walkable);

    if !walkable(start) {
        return HashSet::new();
    }

    bfs_reach(start, |&pos| {
        pos.cardinal_adjacent_positions()
            .into_iter()
            .map(|next| if wrap { next.wrapped(width, height) } else { next })
            .filter(|&next| walkable(next))
            .collect::<Vec<_>>()
    })
    .collect()
}

/// Returns the walkable tiles not reachable from `start`, skipping any tile
/// for which `ignore` returns true.
pub fn unreachable_walkable<F>(tiles: &[Vec<TileType>], start: Position, ignore: F) -> Vec<Position>
where
    F: Fn(Position) -> bool,
{
    let reached = flood_walkable(tiles, start, false);
    let mut stranded = Vec::new();

    for (y, row) in tiles.iter().enumerate() {
        for (x, tile) in row.iter().enumerate() {
            let pos = Position::new(x as i32, y as i32);
            if tile.is_walkable() && !reached.contains(&pos) && !ignore(pos) {
                stranded.push(pos);
            }
        }
    }

    stranded
}

/// Counts runs of consecutive positions satisfying `pred` along a closed loop.
///
/// Used to count distinct entry segments around a room perimeter.
pub fn count_runs<F>(ring: &[Position], pred: F) -> usize
where
    F: Fn(Position) -> bool,
{
    if ring.is_empty() {
        return 0;
    }

    let flags: Vec<bool> = ring.iter().map(|&pos| pred(pos)).collect();
    if flags.iter().all(|&flag| flag) {
        return 1;
    }

    (0..flags.len())
        .filter(|&i| {
            let previous = flags[(i + flags.len() - 1) % flags.len()];
            flags[i] && !previous
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from(rows: &[&str]) -> Vec<Vec<TileType>> {
        rows.iter()
            .map(|row| {
                row.chars()
                    .map(|c| match c {
                        '.' => TileType::Floor,
                        '$' => TileType::Chest,
                        '#' => TileType::Wall,
                        _ => TileType::Void,
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_flood_stops_at_walls() {
        let tiles = grid_from(&["..#..", "..#..", "#####"]);
        let reached = flood_walkable(&tiles, Position::new(0, 0), false);
        assert_eq!(reached.len(), 4);
        assert!(!reached.contains(&Position::new(3, 0)));
    }

    #[test]
    fn test_flood_wraps_when_asked() {
        let tiles = grid_from(&[".#.", "###"]);
        let plain = flood_walkable(&tiles, Position::new(0, 0), false);
        let wrapped = flood_walkable(&tiles, Position::new(0, 0), true);
        assert_eq!(plain.len(), 1);
        assert_eq!(wrapped.len(), 2);
    }

    #[test]
    fn test_flood_from_blocked_start_is_empty() {
        let tiles = grid_from(&["#.", ".."]);
        assert!(flood_walkable(&tiles, Position::new(0, 0), false).is_empty());
        assert!(flood_walkable(&tiles, Position::new(-3, 9), false).is_empty());
    }

    #[test]
    fn test_unreachable_walkable_respects_ignore() {
        let tiles = grid_from(&["..#.", "..#.", "####"]);
        let stranded = unreachable_walkable(&tiles, Position::new(0, 0), |_| false);
        assert_eq!(stranded.len(), 2);

        let none = unreachable_walkable(&tiles, Position::new(0, 0), |pos| pos.x == 3);
        assert!(none.is_empty());
    }

    #[test]
    fn test_chests_block_flood() {
        let tiles = grid_from(&[".$."]);
        let reached = flood_walkable(&tiles, Position::new(0, 0), false);
        assert_eq!(reached.len(), 1);
    }

    #[test]
    fn test_count_runs_on_loop() {
        let ring: Vec<Position> = (0..8).map(|x| Position::new(x, 0)).collect();
        assert_eq!(count_runs(&ring, |_| false), 0);
        assert_eq!(count_runs(&ring, |_| true), 1);
        assert_eq!(count_runs(&ring, |pos| pos.x == 2 || pos.x == 3), 1);
        assert_eq!(count_runs(&ring, |pos| pos.x == 1 || pos.x == 5), 2);
        // A run touching both ends of the slice is one segment on the loop
        assert_eq!(count_runs(&ring, |pos| pos.x == 0 || pos.x == 7), 1);
    }
}
