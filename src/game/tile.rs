//! # Tile Types
//!
//! The closed set of tile codes stored in a dungeon grid.

use serde::{Deserialize, Serialize};

/// Every tile a generated grid can contain.
///
/// The discriminants are the stable integer codes handed to rendering, so the
/// order of the variants must not change.
///
/// # Examples
///
/// ```
/// use deluge::TileType;
///
/// assert_eq!(TileType::Floor.code(), 1);
/// assert_eq!(TileType::from_code(12), Some(TileType::DungeonCore));
/// assert!(TileType::Trap.is_walkable());
/// assert!(!TileType::Chest.is_walkable());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum TileType {
    /// Unallocated background, never walkable
    #[default]
    Void = 0,
    Floor = 1,
    Wall = 2,
    Door = 3,
    StairsDown = 4,
    StairsUp = 5,
    Chest = 6,
    /// Also used for trapped chests
    Trap = 7,
    Water = 8,
    Lava = 9,
    TorchUnlit = 10,
    TorchLit = 11,
    DungeonCore = 12,
    CoreDoor = 13,
}

impl TileType {
    /// All tile types in code order.
    pub const ALL: [TileType; 14] = [
        TileType::Void,
        TileType::Floor,
        TileType::Wall,
        TileType::Door,
        TileType::StairsDown,
        TileType::StairsUp,
        TileType::Chest,
        TileType::Trap,
        TileType::Water,
        TileType::Lava,
        TileType::TorchUnlit,
        TileType::TorchLit,
        TileType::DungeonCore,
        TileType::CoreDoor,
    ];

    /// Returns the integer code of this tile.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Looks up a tile by its integer code.
    pub fn from_code(code: u8) -> Option<TileType> {
        Self::ALL.get(code as usize).copied()
    }

    /// Whether actors can stand on this tile.
    pub fn is_walkable(self) -> bool {
        matches!(
            self,
            TileType::Floor
                | TileType::Door
                | TileType::StairsUp
                | TileType::StairsDown
                | TileType::Trap
                | TileType::TorchUnlit
                | TileType::TorchLit
                | TileType::DungeonCore
                | TileType::CoreDoor
        )
    }

    /// Returns the debug glyph used by the ASCII dump.
    pub fn glyph(self) -> char {
        match self {
            TileType::Void => ' ',
            TileType::Floor => '.',
            TileType::Wall => '#',
            TileType::Door => '+',
            TileType::StairsDown => '>',
            TileType::StairsUp => '<',
            TileType::Chest => '$',
            TileType::Trap => '^',
            TileType::Water => '~',
            TileType::Lava => '%',
            TileType::TorchUnlit => 'i',
            TileType::TorchLit => '!',
            TileType::DungeonCore => 'C',
            TileType::CoreDoor => 'D',
        }
    }
}

impl From<TileType> for u8 {
    fn from(tile: TileType) -> u8 {
        tile.code()
    }
}

impl TryFrom<u8> for TileType {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        TileType::from_code(code).ok_or_else(|| format!("unknown tile code {}", code))
    }
}
