//! # Generation Context
//!
//! The mutable state threaded through every generation stage, plus the
//! 3x3 "ninths" zoning used to keep the start and boss rooms apart.

use super::{Corridor, Rect, Room, WrapTunnel};
use crate::game::{Position, TileType};
use crate::generation::features::{CorePosition, Destructible, HiddenRoom};
use crate::generation::spawns::SpawnPoint;
use crate::utils::{tile_at, PlacementOutcome};
use serde::{Deserialize, Serialize};

/// One cell of the 3x3 zoning grid, labelled `A`..`I` in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Zone(u8);

impl Zone {
    pub const A: Zone = Zone(0);
    pub const B: Zone = Zone(1);
    pub const C: Zone = Zone(2);
    pub const D: Zone = Zone(3);
    pub const E: Zone = Zone(4);
    pub const F: Zone = Zone(5);
    pub const G: Zone = Zone(6);
    pub const H: Zone = Zone(7);
    pub const I: Zone = Zone(8);

    /// Zones the start room may use: the centre row and column, never a corner.
    pub const START_CANDIDATES: [Zone; 5] = [Zone::D, Zone::E, Zone::F, Zone::B, Zone::H];

    pub fn all() -> impl Iterator<Item = Zone> {
        (0..9).map(Zone)
    }

    /// Builds a zone from its grid column and row, both `0..3`.
    pub fn from_col_row(col: i32, row: i32) -> Option<Zone> {
        if (0..3).contains(&col) && (0..3).contains(&row) {
            Some(Zone((row * 3 + col) as u8))
        } else {
            None
        }
    }

    /// The zone a tile falls into on a map of the given size.
    pub fn containing(pos: Position, map_width: i32, map_height: i32) -> Zone {
        let col = zone_index(pos.x, map_width);
        let row = zone_index(pos.y, map_height);
        Zone((row * 3 + col) as u8)
    }

    pub fn col(self) -> i32 {
        (self.0 % 3) as i32
    }

    pub fn row(self) -> i32 {
        (self.0 / 3) as i32
    }

    pub fn label(self) -> char {
        (b'A' + self.0) as char
    }

    /// Manhattan distance in zone-grid units.
    pub fn distance(self, other: Zone) -> i32 {
        (self.col() - other.col()).abs() + (self.row() - other.row()).abs()
    }

    /// Zones at least two zone-steps away from `self`.
    ///
    /// # Examples
    ///
    /// ```
    /// use deluge::Zone;
    ///
    /// let far = Zone::E.furthest_ninths();
    /// assert_eq!(far, vec![Zone::A, Zone::C, Zone::G, Zone::I]);
    /// ```
    pub fn furthest_ninths(self) -> Vec<Zone> {
        Zone::all().filter(|zone| self.distance(*zone) >= 2).collect()
    }

    /// Tile bounds of this zone. The last row and column absorb any remainder.
    pub fn bounds(self, map_width: i32, map_height: i32) -> Rect {
        let (x, width) = zone_span(self.col(), map_width);
        let (y, height) = zone_span(self.row(), map_height);
        Rect::new(x, y, width, height)
    }

    /// Tile span of a zone column (`0..3`) along an axis of the given extent.
    pub fn span(index: i32, extent: i32) -> (i32, i32) {
        zone_span(index, extent)
    }
}

fn zone_span(index: i32, extent: i32) -> (i32, i32) {
    let step = extent / 3;
    let start = index * step;
    let length = if index == 2 { extent - start } else { step };
    (start, length)
}

fn zone_index(coord: i32, extent: i32) -> i32 {
    let step = (extent / 3).max(1);
    (coord / step).clamp(0, 2)
}

/// Per-stage counts collected during one generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Generic room packing (start and boss rooms are not counted)
    pub rooms: PlacementOutcome,
    pub corridors: usize,
    pub extra_corridors: usize,
    pub wrap_tunnels: PlacementOutcome,
    pub boss_entries: usize,
    pub chests: usize,
    pub trapped_chests: usize,
    pub hidden_rooms: PlacementOutcome,
    pub destructibles: PlacementOutcome,
    pub spawns: PlacementOutcome,
}

/// Shared mutable state for one generation call.
///
/// Room references are indices into `rooms`.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    pub width: i32,
    pub height: i32,
    /// Floor depth the level is generated for
    pub floor: u32,
    /// Row-major tile grid, `tiles[y][x]`
    pub tiles: Vec<Vec<TileType>>,
    pub rooms: Vec<Room>,
    pub corridors: Vec<Corridor>,
    pub wrap_tunnels: Vec<WrapTunnel>,
    pub hidden_rooms: Vec<HiddenRoom>,
    pub destructibles: Vec<Destructible>,
    pub spawn_points: Vec<SpawnPoint>,
    pub start_room: Option<usize>,
    pub boss_room: Option<usize>,
    pub core_room: Option<usize>,
    pub start_zone: Option<Zone>,
    pub boss_zone: Option<Zone>,
    /// Boss-room perimeter tiles opened as corridor entries
    pub boss_entries: Vec<Position>,
    pub core_position: Option<CorePosition>,
    pub torch_positions: Vec<Position>,
    pub core_door_position: Option<Position>,
    pub report: GenerationReport,
}

impl GenerationContext {
    /// Creates an all-void grid.
    pub fn new(width: i32, height: i32, floor: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            floor,
            tiles: vec![vec![TileType::Void; width as usize]; height as usize],
            rooms: Vec::new(),
            corridors: Vec::new(),
            wrap_tunnels: Vec::new(),
            hidden_rooms: Vec::new(),
            destructibles: Vec::new(),
            spawn_points: Vec::new(),
            start_room: None,
            boss_room: None,
            core_room: None,
            start_zone: None,
            boss_zone: None,
            boss_entries: Vec::new(),
            core_position: None,
            torch_positions: Vec::new(),
            core_door_position: None,
            report: GenerationReport::default(),
        }
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    /// Whether the whole rectangle lies on the map.
    pub fn rect_in_bounds(&self, rect: &Rect) -> bool {
        rect.x >= 0 && rect.y >= 0 && rect.right() <= self.width && rect.bottom() <= self.height
    }

    /// Unwrapped lookup; `None` off the map.
    pub fn tile(&self, pos: Position) -> Option<TileType> {
        tile_at(&self.tiles, pos)
    }

    pub fn is_tile(&self, pos: Position, tile: TileType) -> bool {
        self.tile(pos) == Some(tile)
    }

    /// Writes a tile; positions off the map are ignored.
    pub fn set_tile(&mut self, pos: Position, tile: TileType) -> bool {
        if !self.in_bounds(pos) {
            return false;
        }
        self.tiles[pos.y as usize][pos.x as usize] = tile;
        true
    }

    /// Fills the on-map part of a rectangle.
    pub fn fill_rect(&mut self, rect: &Rect, tile: TileType) {
        for pos in rect.positions() {
            self.set_tile(pos, tile);
        }
    }

    /// Whether every tile of the rectangle is on the map and void.
    pub fn is_rect_void(&self, rect: &Rect) -> bool {
        self.rect_in_bounds(rect)
            && rect
                .positions()
                .into_iter()
                .all(|pos| self.is_tile(pos, TileType::Void))
    }

    pub fn start(&self) -> Option<&Room> {
        self.start_room.and_then(|index| self.rooms.get(index))
    }

    pub fn boss(&self) -> Option<&Room> {
        self.boss_room.and_then(|index| self.rooms.get(index))
    }

    pub fn core(&self) -> Option<&Room> {
        self.core_room.and_then(|index| self.rooms.get(index))
    }

    /// Whether a tile lies in any wrap tunnel mouth.
    pub fn in_tunnel_mouth(&self, pos: Position) -> bool {
        self.wrap_tunnels
            .iter()
            .any(|tunnel| tunnel.covers(pos, self.width, self.height))
    }

    pub fn count_tiles(&self, tile: TileType) -> usize {
        self.tiles
            .iter()
            .flat_map(|row| row.iter())
            .filter(|candidate| **candidate == tile)
            .count()
    }
}
