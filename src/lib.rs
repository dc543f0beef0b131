//! # Deluge Dungeon Generator
//!
//! Procedural, wrap-around dungeon generation for the Into The Deluge crawler.
//!
//! ## Architecture Overview
//!
//! Generation is a fixed pipeline of stages that all mutate one shared
//! [`GenerationContext`]:
//!
//! - **Room planning**: ninths zoning for the start and boss rooms, then random packing
//! - **Tunnel network**: MST corridors, redundant edges, and edge-to-edge wrap tunnels
//! - **Wall finishing**: wall pass, boss-room reinforcement, tunnel mouth clearing
//! - **Feature placement**: stairs, chests, traps, hidden rooms, the dungeon core, props
//! - **Spawn planning**: player, enemy and boss spawn points
//!
//! The finished [`DungeonGrid`] owns everything the generator produced and exposes a
//! wrap-aware query surface (`get_tile`, `is_walkable`, fog-of-war discovery) to
//! gameplay and rendering. The generator itself can be dropped once `generate` returns.

pub mod game;
pub mod generation;
pub mod rendering;
pub mod utils;

// Core module re-exports
pub use game::*;
pub use generation::*;
pub use rendering::*;
pub use utils::*;

pub use generation::{
    CoreAccess, DungeonConfig, DungeonGenerator, GenerationContext, GenerationReport, Generator,
    Room, WrapTunnel,
};

/// Core error type for the dungeon generator.
#[derive(thiserror::Error, Debug)]
pub enum DungeonError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Configuration was rejected at construction time
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A generated grid violates a structural invariant
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the crate.
pub type DungeonResult<T> = Result<T, DungeonError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generator defaults and fixed layout constants.
pub mod config {
    /// Default map width in tiles
    pub const DEFAULT_WIDTH: u32 = 150;

    /// Default map height in tiles
    pub const DEFAULT_HEIGHT: u32 = 120;

    /// Default tile edge in pixels
    pub const DEFAULT_TILE_SIZE: u32 = 32;

    /// Smallest map edge accepted by config validation
    pub const MIN_MAP_EDGE: u32 = 36;

    /// Room-packing attempt budget for generic rooms
    pub const ROOM_PLACEMENT_ATTEMPTS: u32 = 500;

    /// Padding (in tiles) enforced between generic rooms and any existing room
    pub const ROOM_PADDING: i32 = 2;

    /// Cross-section of every wrap tunnel
    pub const WRAP_TUNNEL_WIDTH: i32 = 5;

    /// How far each wrap tunnel stub reaches in from its map edge
    pub const WRAP_TUNNEL_DEPTH: i32 = 12;

    /// Edge length of the square dungeon-core footprint
    pub const CORE_SIZE: i32 = 4;

    /// Share of the room count added back as redundant corridors
    pub const EXTRA_CORRIDOR_RATIO: f64 = 0.3;
}
