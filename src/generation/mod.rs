//! # Generation Module
//!
//! Procedural dungeon generation: configuration, the shared geometry types,
//! and the stages that turn an empty grid into a playable level.
//!
//! Stages run in a fixed order over one [`GenerationContext`]:
//! rooms, tunnels, walls, features, spawns. Each stage is a free function
//! `(context, config, rng)` so it can be exercised on its own in tests.

pub mod context;
pub mod dungeon;
pub mod features;
pub mod rooms;
pub mod spawns;
pub mod tunnels;
pub mod walls;

pub use context::*;
pub use dungeon::*;
pub use features::*;
pub use spawns::*;
pub use tunnels::TunnelOrientation;

use crate::config;
use crate::game::Position;
use crate::{DungeonError, DungeonResult};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How the dungeon core in the boss room is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoreAccess {
    /// The core sits in the open boss room
    #[default]
    Direct,
    /// Unlit torches in the boss room and core doors on every boss-room entry
    TorchGated,
}

/// Construction-time options for the dungeon generator.
///
/// Every field has a default, and JSON config files only need to name the
/// keys they override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    /// Map width in tiles
    pub width: u32,
    /// Map height in tiles
    pub height: u32,
    /// Tile edge in pixels
    pub tile_size: u32,
    /// Minimum generic room edge
    pub min_room_size: u32,
    /// Maximum generic room edge
    pub max_room_size: u32,
    /// Upper bound on rooms, start and boss included
    pub max_rooms: u32,
    /// Corridor cross-section in tiles
    pub corridor_width: u32,
    /// Edge of the square boss room
    pub boss_room_size: u32,
    /// Fog-of-war reveal radius in tiles
    pub discovery_radius: u32,
    /// Boss-room core access variant
    pub core_access: CoreAccess,
}

impl DungeonConfig {
    /// Creates the default configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use deluge::DungeonConfig;
    ///
    /// let config = DungeonConfig::new();
    /// assert_eq!(config.width, 150);
    /// assert_eq!(config.boss_room_size, 50);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new() -> Self {
        Self {
            width: config::DEFAULT_WIDTH,
            height: config::DEFAULT_HEIGHT,
            tile_size: config::DEFAULT_TILE_SIZE,
            min_room_size: 6,
            max_room_size: 16,
            max_rooms: 20,
            corridor_width: 3,
            boss_room_size: 50,
            discovery_radius: 8,
            core_access: CoreAccess::Direct,
        }
    }

    /// Creates a configuration for testing with smaller, simpler levels.
    pub fn for_testing() -> Self {
        Self {
            width: 90,
            height: 72,
            tile_size: 16,
            min_room_size: 5,
            max_room_size: 9,
            max_rooms: 8,
            corridor_width: 3,
            boss_room_size: 20,
            discovery_radius: 6,
            core_access: CoreAccess::Direct,
        }
    }

    /// Parses a configuration from JSON, filling omitted keys with defaults.
    pub fn from_json_str(json: &str) -> DungeonResult<Self> {
        let config: DungeonConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> DungeonResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Rejects values no dungeon can be built from.
    ///
    /// Oversized rooms are not rejected here; the stages clamp them to the map.
    pub fn validate(&self) -> DungeonResult<()> {
        if self.width < config::MIN_MAP_EDGE || self.height < config::MIN_MAP_EDGE {
            return Err(DungeonError::InvalidConfig(format!(
                "map must be at least {0}x{0} tiles, got {1}x{2}",
                config::MIN_MAP_EDGE,
                self.width,
                self.height
            )));
        }
        if self.tile_size == 0 {
            return Err(DungeonError::InvalidConfig("tile_size must be positive".to_string()));
        }
        if self.corridor_width == 0 {
            return Err(DungeonError::InvalidConfig(
                "corridor_width must be positive".to_string(),
            ));
        }
        if self.min_room_size < 3 {
            return Err(DungeonError::InvalidConfig(format!(
                "min_room_size must be at least 3, got {}",
                self.min_room_size
            )));
        }
        if self.min_room_size > self.max_room_size {
            return Err(DungeonError::InvalidConfig(format!(
                "min_room_size {} exceeds max_room_size {}",
                self.min_room_size, self.max_room_size
            )));
        }
        if self.discovery_radius == 0 {
            return Err(DungeonError::InvalidConfig(
                "discovery_radius must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Axis-aligned tile rectangle. `x`/`y` is the top-left tile; the far edges are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// One past the last column.
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// One past the last row.
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn center(&self) -> Position {
        Position::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.x && pos.y >= self.y && pos.x < self.right() && pos.y < self.bottom()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Grows the rectangle by `amount` tiles on every side (shrinks when negative).
    pub fn expanded(&self, amount: i32) -> Rect {
        Rect::new(
            self.x - amount,
            self.y - amount,
            self.width + amount * 2,
            self.height + amount * 2,
        )
    }

    /// All tiles inside the rectangle, row by row.
    pub fn positions(&self) -> Vec<Position> {
        let mut positions = Vec::new();
        for y in self.y..self.bottom() {
            for x in self.x..self.right() {
                positions.push(Position::new(x, y));
            }
        }
        positions
    }

    /// The closed ring of tiles `offset` tiles outside the rectangle, walked clockwise
    /// from the top-left corner.
    pub fn ring(&self, offset: i32) -> Vec<Position> {
        let outer = self.expanded(offset);
        if outer.width <= 0 || outer.height <= 0 {
            return Vec::new();
        }
        if outer.width == 1 || outer.height == 1 {
            return outer.positions();
        }

        let (left, top) = (outer.x, outer.y);
        let (right, bottom) = (outer.right() - 1, outer.bottom() - 1);
        let mut ring = Vec::new();

        for x in left..right {
            ring.push(Position::new(x, top));
        }
        for y in top..bottom {
            ring.push(Position::new(right, y));
        }
        for x in ((left + 1)..=right).rev() {
            ring.push(Position::new(x, bottom));
        }
        for y in ((top + 1)..=bottom).rev() {
            ring.push(Position::new(left, y));
        }

        ring
    }
}

/// The role a room plays in the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomType {
    /// Generic room from random packing
    Normal,
    /// Where the player enters the level
    Start,
    /// The large room holding the boss and the dungeon core
    Boss,
    /// Secret side-room behind a breakable wall
    Hidden,
}

/// A rectangular room. Every tile of the rectangle is floor; walls sit one tile outside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Index of this room in its owning list
    pub id: u32,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub room_type: RoomType,
    /// Rooms joined to this one by a corridor
    pub connections: Vec<u32>,
    /// Set by gameplay once a hidden room's secret wall is broken
    pub is_revealed: bool,
}

impl Room {
    /// Creates a new room with the given parameters.
    ///
    /// # Examples
    ///
    /// ```
    /// use deluge::{Room, RoomType};
    ///
    /// let room = Room::new(1, 5, 5, 10, 8, RoomType::Normal);
    /// assert_eq!(room.id, 1);
    /// assert_eq!(room.center_x(), 10);
    /// assert_eq!(room.center_y(), 9);
    /// ```
    pub fn new(id: u32, x: i32, y: i32, width: i32, height: i32, room_type: RoomType) -> Self {
        Self {
            id,
            x,
            y,
            width,
            height,
            room_type,
            connections: Vec::new(),
            is_revealed: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn center(&self) -> Position {
        self.rect().center()
    }

    pub fn center_x(&self) -> i32 {
        self.center().x
    }

    pub fn center_y(&self) -> i32 {
        self.center().y
    }

    pub fn is_start_room(&self) -> bool {
        self.room_type == RoomType::Start
    }

    pub fn is_boss_room(&self) -> bool {
        self.room_type == RoomType::Boss
    }

    pub fn is_hidden(&self) -> bool {
        self.room_type == RoomType::Hidden
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.rect().contains(pos)
    }

    /// Tiles at least `margin` tiles in from the room's edge.
    pub fn interior(&self, margin: i32) -> Vec<Position> {
        let inner = self.rect().expanded(-margin);
        if inner.width <= 0 || inner.height <= 0 {
            return Vec::new();
        }
        inner.positions()
    }

    /// The wall ring one tile outside the room.
    pub fn perimeter(&self) -> Vec<Position> {
        self.rect().ring(1)
    }

    /// Whether the two rooms come closer than `padding` tiles.
    pub fn overlaps_with_padding(&self, other: &Room, padding: i32) -> bool {
        self.rect().expanded(padding).intersects(&other.rect())
    }

    /// Records a corridor link to another room.
    pub fn add_connection(&mut self, room_id: u32) {
        if !self.connections.contains(&room_id) {
            self.connections.push(room_id);
        }
    }

    pub fn is_connected_to(&self, room_id: u32) -> bool {
        self.connections.contains(&room_id)
    }
}

/// Floor tiles carved to join two rooms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corridor {
    pub from: u32,
    pub to: u32,
    /// Centre line of the corridor, in carve order
    pub points: Vec<Position>,
}

/// An edge-to-edge passage: walking off one map edge inside it re-enters at the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrapTunnel {
    pub orientation: TunnelOrientation,
    /// First column (vertical) or row (horizontal) of the cross-section
    pub position: i32,
    pub width: i32,
    /// How far each mouth reaches in from its edge
    pub depth: i32,
    /// Rooms the two mouths were linked to
    pub linked_rooms: Vec<u32>,
}

impl WrapTunnel {
    /// The two mouth footprints, one against each opposite edge.
    pub fn mouths(&self, map_width: i32, map_height: i32) -> [Rect; 2] {
        match self.orientation {
            TunnelOrientation::Vertical => [
                Rect::new(self.position, 0, self.width, self.depth),
                Rect::new(self.position, map_height - self.depth, self.width, self.depth),
            ],
            TunnelOrientation::Horizontal => [
                Rect::new(0, self.position, self.depth, self.width),
                Rect::new(map_width - self.depth, self.position, self.depth, self.width),
            ],
        }
    }

    /// Whether a tile lies in either mouth.
    pub fn covers(&self, pos: Position, map_width: i32, map_height: i32) -> bool {
        self.mouths(map_width, map_height)
            .iter()
            .any(|mouth| mouth.contains(pos))
    }
}

/// Trait for procedural generators.
///
/// The RNG is taken as a trait object so any seeded generator can stand in
/// for deterministic fixtures.
pub trait Generator<T> {
    /// Generates content for the given floor depth.
    fn generate(&self, floor: u32, rng: &mut dyn RngCore) -> DungeonResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T) -> DungeonResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}
