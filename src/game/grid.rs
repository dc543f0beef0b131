//! # Dungeon Grid
//!
//! The finished level handed to gameplay and rendering. It owns every
//! structure the generator produced and answers tile queries with toroidal
//! wrapping, so callers never bounds-check.

use crate::game::{wrap_coord, wrap_world, Position, TileType};
use crate::generation::{
    CoreAccess, CorePosition, Corridor, Destructible, DungeonConfig, GenerationContext,
    GenerationReport, HiddenRoom, Room, SpawnKind, SpawnPoint, WrapTunnel,
};
use crate::DungeonResult;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A generated level plus its fog-of-war state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DungeonGrid {
    pub width: u32,
    pub height: u32,
    pub tile_size: u32,
    pub world_width: f64,
    pub world_height: f64,
    /// Floor depth this level was generated for
    pub floor: u32,
    /// Seed used, when the caller supplied one
    pub seed: Option<u64>,
    /// Row-major, `tiles[y][x]`
    pub tiles: Vec<Vec<TileType>>,
    pub rooms: Vec<Room>,
    pub corridors: Vec<Corridor>,
    pub wrap_tunnels: Vec<WrapTunnel>,
    pub destructibles: Vec<Destructible>,
    pub hidden_rooms: Vec<HiddenRoom>,
    pub start_room_index: Option<usize>,
    pub boss_room_index: Option<usize>,
    pub core_room_index: Option<usize>,
    pub core_position: Option<CorePosition>,
    pub core_access: CoreAccess,
    pub torch_positions: Vec<Position>,
    pub core_door_position: Option<Position>,
    pub boss_entries: Vec<Position>,
    pub spawn_points: Vec<SpawnPoint>,
    pub discovered_tiles: HashSet<Position>,
    /// Reveal radius in tiles used by [`DungeonGrid::discover_around`]
    pub discovery_radius: u32,
    pub report: GenerationReport,
}

impl DungeonGrid {
    /// Assembles the grid from a finished generation context.
    pub fn from_context(ctx: GenerationContext, config: &DungeonConfig, seed: Option<u64>) -> Self {
        let width = ctx.width as u32;
        let height = ctx.height as u32;
        Self {
            width,
            height,
            tile_size: config.tile_size,
            world_width: width as f64 * config.tile_size as f64,
            world_height: height as f64 * config.tile_size as f64,
            floor: ctx.floor,
            seed,
            tiles: ctx.tiles,
            rooms: ctx.rooms,
            corridors: ctx.corridors,
            wrap_tunnels: ctx.wrap_tunnels,
            destructibles: ctx.destructibles,
            hidden_rooms: ctx.hidden_rooms,
            start_room_index: ctx.start_room,
            boss_room_index: ctx.boss_room,
            core_room_index: ctx.core_room,
            core_position: ctx.core_position,
            core_access: config.core_access,
            torch_positions: ctx.torch_positions,
            core_door_position: ctx.core_door_position,
            boss_entries: ctx.boss_entries,
            spawn_points: ctx.spawn_points,
            discovered_tiles: HashSet::new(),
            discovery_radius: config.discovery_radius,
            report: ctx.report,
        }
    }

    /// Wraps a tile coordinate onto the map.
    pub fn wrap_tile(&self, x: i32, y: i32) -> Position {
        Position::new(wrap_coord(x, self.width), wrap_coord(y, self.height))
    }

    /// Tile at any integer coordinate, wrapped on both axes.
    ///
    /// Missing cells read as [`TileType::Wall`].
    pub fn get_tile(&self, x: i32, y: i32) -> TileType {
        let pos = self.wrap_tile(x, y);
        self.tiles
            .get(pos.y as usize)
            .and_then(|row| row.get(pos.x as usize))
            .copied()
            .unwrap_or(TileType::Wall)
    }

    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.get_tile(x, y).is_walkable()
    }

    /// Wraps a world-space point into `[0, world_width) x [0, world_height)`.
    pub fn wrap_position(&self, world_x: f64, world_y: f64) -> (f64, f64) {
        (
            wrap_world(world_x, self.world_width),
            wrap_world(world_y, self.world_height),
        )
    }

    /// The wrapped tile under a world-space point.
    pub fn world_to_tile(&self, world_x: f64, world_y: f64) -> Position {
        let size = self.tile_size.max(1) as f64;
        let x = (world_x / size).floor();
        let y = (world_y / size).floor();
        if !x.is_finite() || !y.is_finite() {
            return Position::origin();
        }
        self.wrap_tile(x as i32, y as i32)
    }

    /// World-space centre of a tile.
    pub fn tile_to_world(&self, x: i32, y: i32) -> (f64, f64) {
        let size = self.tile_size as f64;
        (x as f64 * size + size / 2.0, y as f64 * size + size / 2.0)
    }

    /// Marks every tile within `radius` tiles of a world point as discovered.
    ///
    /// The disc wraps around the map edges. Discovery only ever grows.
    /// Returns how many tiles were newly revealed.
    pub fn discover_area(&mut self, world_x: f64, world_y: f64, radius: u32) -> usize {
        let center = self.world_to_tile(world_x, world_y);
        let reach = radius as i32;
        let limit = (radius as i64).pow(2);
        let mut revealed = 0;

        for dy in -reach..=reach {
            for dx in -reach..=reach {
                if (dx as i64).pow(2) + (dy as i64).pow(2) > limit {
                    continue;
                }
                let pos = self.wrap_tile(center.x + dx, center.y + dy);
                if self.discovered_tiles.insert(pos) {
                    revealed += 1;
                }
            }
        }

        revealed
    }

    /// [`DungeonGrid::discover_area`] with the configured discovery radius.
    pub fn discover_around(&mut self, world_x: f64, world_y: f64) -> usize {
        self.discover_area(world_x, world_y, self.discovery_radius)
    }

    pub fn is_tile_discovered(&self, x: i32, y: i32) -> bool {
        self.discovered_tiles.contains(&self.wrap_tile(x, y))
    }

    pub fn discovered_count(&self) -> usize {
        self.discovered_tiles.len()
    }

    /// Writes a tile at a wrapped coordinate and returns the one it replaced.
    pub fn set_tile(&mut self, x: i32, y: i32, tile: TileType) -> Option<TileType> {
        let pos = self.wrap_tile(x, y);
        let cell = self
            .tiles
            .get_mut(pos.y as usize)
            .and_then(|row| row.get_mut(pos.x as usize))?;
        Some(std::mem::replace(cell, tile))
    }

    /// Turns a chest into floor. Returns false if there was no chest.
    pub fn open_chest(&mut self, x: i32, y: i32) -> bool {
        self.swap_if(x, y, TileType::Chest, TileType::Floor)
    }

    /// Lights an unlit torch. Returns false if there was no unlit torch.
    pub fn light_torch(&mut self, x: i32, y: i32) -> bool {
        self.swap_if(x, y, TileType::TorchUnlit, TileType::TorchLit)
    }

    fn swap_if(&mut self, x: i32, y: i32, from: TileType, to: TileType) -> bool {
        if self.get_tile(x, y) != from {
            return false;
        }
        self.set_tile(x, y, to).is_some()
    }

    /// Torches still waiting to be lit.
    pub fn torches_remaining(&self) -> usize {
        self.torch_positions
            .iter()
            .filter(|pos| self.get_tile(pos.x, pos.y) == TileType::TorchUnlit)
            .count()
    }

    /// True once no torch remains unlit; levels without torches count as lit.
    pub fn all_torches_lit(&self) -> bool {
        self.torches_remaining() == 0
    }

    /// Breaks a hidden room's secret wall, opening the passage.
    ///
    /// Returns false for an unknown index or a room already revealed.
    pub fn break_secret_wall(&mut self, hidden_index: usize) -> bool {
        let entrance = match self.hidden_rooms.get(hidden_index) {
            Some(hidden) if !hidden.room.is_revealed => hidden.entrance,
            _ => return false,
        };

        self.set_tile(entrance.x, entrance.y, TileType::Floor);
        if let Some(hidden) = self.hidden_rooms.get_mut(hidden_index) {
            hidden.room.is_revealed = true;
        }
        true
    }

    /// The room, hidden or not, containing a wrapped tile.
    pub fn room_at(&self, x: i32, y: i32) -> Option<&Room> {
        let pos = self.wrap_tile(x, y);
        self.rooms
            .iter()
            .chain(self.hidden_rooms.iter().map(|hidden| &hidden.room))
            .find(|room| room.contains(pos))
    }

    pub fn start_room(&self) -> Option<&Room> {
        self.start_room_index.and_then(|index| self.rooms.get(index))
    }

    pub fn boss_room(&self) -> Option<&Room> {
        self.boss_room_index.and_then(|index| self.rooms.get(index))
    }

    pub fn core_room(&self) -> Option<&Room> {
        self.core_room_index.and_then(|index| self.rooms.get(index))
    }

    pub fn player_spawn(&self) -> Option<&SpawnPoint> {
        self.spawn_points
            .iter()
            .find(|spawn| spawn.kind == SpawnKind::Player)
    }

    /// Number of tiles of one type.
    pub fn count(&self, tile: TileType) -> usize {
        self.tiles
            .iter()
            .flat_map(|row| row.iter())
            .filter(|candidate| **candidate == tile)
            .count()
    }

    pub fn to_json(&self) -> DungeonResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> DungeonResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
