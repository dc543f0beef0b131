//! Property tests for the structural guarantees of generated levels.

use deluge::{
    count_runs, flood_walkable, DungeonConfig, DungeonGenerator, DungeonGrid, Position,
    SpawnKind, TileType, TunnelOrientation,
};
use proptest::prelude::*;

fn generate(seed: u64, floor: u32) -> DungeonGrid {
    DungeonGenerator::default().generate_seeded(floor, seed)
}

fn generate_small(seed: u64, floor: u32) -> DungeonGrid {
    DungeonGenerator::new(DungeonConfig::for_testing())
        .unwrap()
        .generate_seeded(floor, seed)
}

fn in_hidden_room(grid: &DungeonGrid, pos: Position) -> bool {
    grid.hidden_rooms
        .iter()
        .any(|hidden| hidden.room.contains(pos) || hidden.passage.contains(&pos))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn walkable_tiles_stay_connected(seed in any::<u64>(), floor in 1_u32..=20) {
        let grid = generate(seed, floor);
        let start = grid.start_room().unwrap().center();
        let reached = flood_walkable(&grid.tiles, start, false);

        for y in 0..grid.height as i32 {
            for x in 0..grid.width as i32 {
                let pos = Position::new(x, y);
                if grid.is_walkable(x, y) && !in_hidden_room(&grid, pos) {
                    prop_assert!(
                        reached.contains(&pos),
                        "seed {} floor {}: ({}, {}) unreachable",
                        seed, floor, x, y
                    );
                }
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn boss_room_is_never_breached(seed in any::<u64>(), floor in 1_u32..=20) {
        let grid = generate(seed, floor);
        let boss = grid.boss_room().unwrap();
        let ring = boss.perimeter();

        for pos in &ring {
            let tile = grid.get_tile(pos.x, pos.y);
            prop_assert!(tile != TileType::Void, "void at {:?}", pos);
        }
        prop_assert!(count_runs(&ring, |pos| grid.is_walkable(pos.x, pos.y)) >= 1);
    }

    #[test]
    fn wrap_tunnels_cross_the_edge(seed in any::<u64>()) {
        let grid = generate(seed, 1);
        let (w, h) = (grid.width as i32, grid.height as i32);

        for tunnel in &grid.wrap_tunnels {
            for mouth in tunnel.mouths(w, h) {
                for pos in mouth.positions() {
                    prop_assert!(grid.is_walkable(pos.x, pos.y));
                }
            }
            for offset in 0..tunnel.width {
                let lane = tunnel.position + offset;
                match tunnel.orientation {
                    TunnelOrientation::Vertical => {
                        prop_assert!(grid.is_walkable(lane, 0));
                        prop_assert!(grid.is_walkable(lane, -1));
                    }
                    TunnelOrientation::Horizontal => {
                        prop_assert!(grid.is_walkable(0, lane));
                        prop_assert!(grid.is_walkable(-1, lane));
                    }
                }
            }
        }
    }

    #[test]
    fn get_tile_is_periodic(seed in 0_u64..32, x in -2000_i32..2000, y in -2000_i32..2000) {
        let grid = generate_small(seed, 1);
        let (w, h) = (grid.width as i32, grid.height as i32);
        let tile = grid.get_tile(x, y);

        prop_assert_eq!(grid.get_tile(x + w, y), tile);
        prop_assert_eq!(grid.get_tile(x - w, y), tile);
        prop_assert_eq!(grid.get_tile(x, y + h), tile);
        prop_assert_eq!(grid.get_tile(x, y - h), tile);
    }

    #[test]
    fn spawns_keep_their_distance(seed in any::<u64>(), floor in 1_u32..=20) {
        let grid = generate(seed, floor);

        let players: Vec<_> = grid.spawn_points.iter().filter(|s| s.kind == SpawnKind::Player).collect();
        prop_assert_eq!(players.len(), 1);
        let player = players[0].position();
        prop_assert!(!grid.boss_room().unwrap().contains(player));
        prop_assert!(!grid.core_room().unwrap().contains(player));
        prop_assert!(grid.is_walkable(player.x, player.y));

        let hostile: Vec<Position> = grid
            .spawn_points
            .iter()
            .filter(|s| s.kind != SpawnKind::Player)
            .map(|s| s.position())
            .collect();
        for (i, a) in hostile.iter().enumerate() {
            prop_assert_eq!(grid.get_tile(a.x, a.y), TileType::Floor);
            for b in hostile.iter().skip(i + 1) {
                prop_assert!(a.chebyshev_distance(*b) > 2, "{:?} too close to {:?}", a, b);
            }
        }
    }

    #[test]
    fn hidden_rooms_stay_secret(seed in any::<u64>(), floor in 5_u32..=20) {
        let grid = generate(seed, floor);
        let start = grid.start_room().unwrap().center();
        let reached = flood_walkable(&grid.tiles, start, false);

        for hidden in &grid.hidden_rooms {
            prop_assert_eq!(grid.get_tile(hidden.entrance.x, hidden.entrance.y), TileType::Wall);
            prop_assert!(!hidden.room.is_revealed);

            let mut chests = 0;
            for pos in hidden.room.rect().positions() {
                match grid.get_tile(pos.x, pos.y) {
                    TileType::Floor => {}
                    TileType::Chest => chests += 1,
                    other => prop_assert!(false, "unexpected {:?} in hidden room", other),
                }
                prop_assert!(!reached.contains(&pos));
            }
            prop_assert!(chests >= 1);
            prop_assert_eq!(grid.get_tile(hidden.room.center_x(), hidden.room.center_y()), TileType::Chest);
        }
    }

    #[test]
    fn spawns_never_share_a_tile_with_props(seed in any::<u64>(), floor in 1_u32..=20) {
        let grid = generate(seed, floor);
        let props: Vec<Position> = grid.destructibles.iter().map(|prop| prop.position()).collect();

        for spawn in &grid.spawn_points {
            prop_assert!(
                !props.contains(&spawn.position()),
                "{:?} spawn on a prop at {:?}",
                spawn.kind,
                spawn.position()
            );
        }
    }

    #[test]
    fn destructibles_respect_clearance(seed in any::<u64>(), floor in 1_u32..=20) {
        let grid = generate(seed, floor);
        let boss = grid.boss_room().unwrap();

        for (i, prop) in grid.destructibles.iter().enumerate() {
            let pos = prop.position();
            prop_assert_eq!(grid.get_tile(pos.x, pos.y), TileType::Floor);
            prop_assert!(!boss.contains(pos));
            for next in pos.adjacent_positions() {
                prop_assert_ne!(grid.get_tile(next.x, next.y), TileType::Wall);
            }
            for other in grid.destructibles.iter().skip(i + 1) {
                prop_assert!(other.position().chebyshev_distance(pos) > 2);
            }
        }
    }
}
