//! End-to-end generation scenarios: the default level, configuration files,
//! degenerate configurations and persistence.

use deluge::{
    render_ascii, CoreAccess, DungeonConfig, DungeonError, DungeonGenerator, DungeonGrid,
    DungeonResult, Generator, RoomType, TileType,
};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_default_level_scenario() -> DungeonResult<()> {
    let generator = DungeonGenerator::new(DungeonConfig::new())?;
    let grid = generator.generate_seeded(1, 2024);

    let starts = grid.rooms.iter().filter(|r| r.room_type == RoomType::Start).count();
    let bosses = grid.rooms.iter().filter(|r| r.room_type == RoomType::Boss).count();
    assert_eq!(starts, 1);
    assert_eq!(bosses, 1);
    assert!(grid.rooms.len() >= 2);
    assert!(grid.rooms.len() <= 20);

    let boss = grid.boss_room().unwrap();
    assert_eq!((boss.width, boss.height), (50, 50));

    let core = grid.core_position.unwrap();
    assert_eq!(core.size, 4);
    assert_eq!((core.x, core.y), (boss.center_x(), boss.center_y()));
    assert_eq!(grid.count(TileType::DungeonCore), 16);
    assert_eq!(grid.core_room_index, grid.boss_room_index);

    let start = grid.start_room().unwrap();
    assert_eq!(grid.get_tile(start.center_x(), start.center_y()), TileType::StairsUp);
    assert_eq!(grid.count(TileType::StairsDown), 0);

    assert_eq!((grid.width, grid.height, grid.tile_size), (150, 120, 32));
    assert_eq!((grid.world_width, grid.world_height), (4800.0, 3840.0));
    assert_eq!(grid.discovery_radius, 8);
    assert!(grid.discovered_tiles.is_empty());
    assert!(grid.torch_positions.is_empty());
    assert!(grid.core_door_position.is_none());

    generator.validate(&grid)?;
    Ok(())
}

#[test]
fn test_seeds_reproduce_levels() -> DungeonResult<()> {
    let generator = DungeonGenerator::new(DungeonConfig::new())?;
    for seed in [0, 1, 77, u64::MAX] {
        assert_eq!(generator.generate_seeded(6, seed), generator.generate_seeded(6, seed));
    }
    let floor_one = generator.generate_seeded(1, 5);
    let floor_nine = generator.generate_seeded(9, 5);
    assert_eq!(floor_one.rooms[..2], floor_nine.rooms[..2]);
    Ok(())
}

#[test]
fn test_deep_floors_validate() -> DungeonResult<()> {
    let generator = DungeonGenerator::new(DungeonConfig::new())?;
    for floor in [1, 5, 10, 20, 100] {
        let grid = generator.generate_seeded(floor, 31 + floor as u64);
        generator.validate(&grid)?;
        assert_eq!(grid.floor, floor);
    }
    Ok(())
}

#[test]
fn test_config_file_overrides_only_named_keys() -> DungeonResult<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(
        file,
        r#"{{ "max_rooms": 6, "boss_room_size": 30, "core_access": "torch_gated" }}"#
    )?;

    let config = DungeonConfig::from_json_file(file.path())?;
    assert_eq!(config.max_rooms, 6);
    assert_eq!(config.boss_room_size, 30);
    assert_eq!(config.width, 150);
    assert_eq!(config.core_access, CoreAccess::TorchGated);

    let generator = DungeonGenerator::new(config)?;
    let grid = generator.generate_seeded(2, 12);
    assert!(grid.rooms.len() <= 6);
    assert_eq!(grid.boss_room().unwrap().width, 30);
    assert_eq!(grid.torch_positions.len(), 4);
    generator.validate(&grid)?;
    Ok(())
}

#[test]
fn test_bad_config_files_are_rejected() -> DungeonResult<()> {
    let mut malformed = NamedTempFile::new()?;
    writeln!(malformed, "{{ not json")?;
    assert!(matches!(
        DungeonConfig::from_json_file(malformed.path()),
        Err(DungeonError::Serde(_))
    ));

    let mut invalid = NamedTempFile::new()?;
    writeln!(invalid, r#"{{ "min_room_size": 9, "max_room_size": 4 }}"#)?;
    assert!(matches!(
        DungeonConfig::from_json_file(invalid.path()),
        Err(DungeonError::InvalidConfig(_))
    ));

    assert!(matches!(
        DungeonConfig::from_json_file("/definitely/not/here.json"),
        Err(DungeonError::Io(_))
    ));
    Ok(())
}

#[test]
fn test_degenerate_sizes_are_clamped() -> DungeonResult<()> {
    let mut config = DungeonConfig::new();
    config.width = 36;
    config.height = 36;
    config.min_room_size = 30;
    config.max_room_size = 400;
    config.boss_room_size = 400;
    config.max_rooms = 50;

    let generator = DungeonGenerator::new(config)?;
    for seed in 0..5 {
        let grid = generator.generate_seeded(1, seed);
        assert!(grid.start_room().is_some());
        let boss = grid.boss_room().unwrap();
        assert!(boss.x >= 1 && boss.y >= 1);
        assert!(boss.x + boss.width <= 35);
        assert!(grid.report.rooms.achieved <= grid.report.rooms.requested);
        assert_eq!(grid.player_spawn().map(|s| s.room), grid.start_room().map(|r| r.id));
    }
    Ok(())
}

#[test]
fn test_level_round_trips_through_a_file() -> DungeonResult<()> {
    let generator = DungeonGenerator::new(DungeonConfig::for_testing())?;
    let mut grid = generator.generate_seeded(3, 404);
    let spawn = grid.player_spawn().unwrap().position();
    let (wx, wy) = grid.tile_to_world(spawn.x, spawn.y);
    grid.discover_around(wx, wy);

    let file = NamedTempFile::new()?;
    std::fs::write(file.path(), grid.to_json()?)?;
    let restored = DungeonGrid::from_json(&std::fs::read_to_string(file.path())?)?;

    assert_eq!(restored, grid);
    assert!(restored.is_tile_discovered(spawn.x, spawn.y));
    assert_eq!(render_ascii(&restored), render_ascii(&grid));
    Ok(())
}

#[test]
fn test_gameplay_mutations() -> DungeonResult<()> {
    let generator = DungeonGenerator::new(DungeonConfig::new())?;
    let mut grid = (0..50)
        .map(|seed| generator.generate_seeded(20, seed))
        .find(|grid| !grid.hidden_rooms.is_empty())
        .expect("some seed yields a hidden room");

    let hidden = grid.hidden_rooms[0].clone();
    let chest = hidden.chests[0];
    assert!(grid.break_secret_wall(0));
    assert!(grid.open_chest(chest.x, chest.y));
    assert!(grid.room_at(chest.x, chest.y).unwrap().is_revealed);

    let inside_parent = hidden.entrance.step(hidden.side.opposite(), 1);
    assert!(grid.rooms[hidden.parent as usize].contains(inside_parent));
    let reached = deluge::flood_walkable(&grid.tiles, inside_parent, false);
    assert!(reached.contains(&chest));
    Ok(())
}
