//! ASCII dump of a [`DungeonGrid`], one character per tile.

use crate::game::{DungeonGrid, Position};
use crate::generation::{DestructibleKind, SpawnKind};
use std::collections::HashMap;

/// What to draw on top of the bare tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AsciiOptions {
    /// Draw spawn points (`@` player, `e` enemy, `B` boss)
    pub show_spawns: bool,
    /// Draw destructible props
    pub show_destructibles: bool,
    /// Blank out tiles the player has not discovered yet
    pub fog_of_war: bool,
}

impl Default for AsciiOptions {
    fn default() -> Self {
        Self {
            show_spawns: true,
            show_destructibles: true,
            fog_of_war: false,
        }
    }
}

impl AsciiOptions {
    /// Tiles only, no overlays, no fog.
    pub fn tiles_only() -> Self {
        Self {
            show_spawns: false,
            show_destructibles: false,
            fog_of_war: false,
        }
    }
}

pub fn spawn_glyph(kind: SpawnKind) -> char {
    match kind {
        SpawnKind::Player => '@',
        SpawnKind::Enemy => 'e',
        SpawnKind::Boss => 'B',
    }
}

pub fn destructible_glyph(kind: DestructibleKind) -> char {
    match kind {
        DestructibleKind::Barrel => 'o',
        DestructibleKind::Crate => 'x',
        DestructibleKind::Pot => 'u',
        DestructibleKind::ExplosiveBarrel => '*',
    }
}

/// Renders the grid with the default overlays.
pub fn render_ascii(grid: &DungeonGrid) -> String {
    render_ascii_with(grid, &AsciiOptions::default())
}

/// Renders the grid, one line per row.
///
/// # Examples
///
/// ```
/// use deluge::{render_ascii_with, AsciiOptions, DungeonConfig, DungeonGenerator};
///
/// let grid = DungeonGenerator::new(DungeonConfig::for_testing()).unwrap().generate_seeded(1, 3);
/// let text = render_ascii_with(&grid, &AsciiOptions::tiles_only());
/// assert_eq!(text.lines().count(), grid.height as usize);
/// assert!(text.contains('<'));
/// ```
pub fn render_ascii_with(grid: &DungeonGrid, options: &AsciiOptions) -> String {
    let mut overlay: HashMap<Position, char> = HashMap::new();

    if options.show_destructibles {
        for prop in &grid.destructibles {
            overlay.insert(prop.position(), destructible_glyph(prop.kind));
        }
    }
    if options.show_spawns {
        for spawn in &grid.spawn_points {
            overlay.insert(spawn.position(), spawn_glyph(spawn.kind));
        }
    }

    let mut out = String::with_capacity(((grid.width + 1) * grid.height) as usize);
    for y in 0..grid.height as i32 {
        for x in 0..grid.width as i32 {
            let pos = Position::new(x, y);
            if options.fog_of_war && !grid.is_tile_discovered(x, y) {
                out.push(' ');
                continue;
            }
            let glyph = overlay
                .get(&pos)
                .copied()
                .unwrap_or_else(|| grid.get_tile(x, y).glyph());
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}
