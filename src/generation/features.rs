//! # Feature Placement
//!
//! Special content injected after the walls are finished: stairs, chests,
//! trapped chests, hidden rooms behind secret walls, the dungeon core in the
//! boss room, and destructible props.
//!
//! Every placement here is best-effort. A routine that cannot find a valid
//! tile skips silently, so callers must treat all feature counts as optional.

use super::{CoreAccess, DungeonConfig, GenerationContext, Rect, Room, RoomType};
use super::spawns::player_spawn_tile;
use crate::config::CORE_SIZE;
use crate::game::{Direction, Position, TileType};
use crate::utils::{place_with_budget, PlacementOutcome, RandomUtils};
use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Base chance of a chest in a generic room.
const CHEST_CHANCE: f64 = 0.3;

/// Tries allowed when picking a free tile for a single chest or trap.
const FEATURE_TILE_TRIES: u32 = 10;

/// Hidden room edge range.
const HIDDEN_ROOM_MIN: i32 = 5;
const HIDDEN_ROOM_MAX: i32 = 8;

/// Chance of a second chest in a hidden room.
const HIDDEN_SECOND_CHEST_CHANCE: f64 = 0.5;

/// Torches sit this many tiles in from the boss room walls.
const TORCH_INSET: i32 = 4;

/// Props per room and explosive share.
const MAX_DESTRUCTIBLES_PER_ROOM: i32 = 3;
const EXPLOSIVE_CHANCE: f64 = 0.15;

/// Minimum Chebyshev gap between two props, exclusive.
const DESTRUCTIBLE_SPACING: u32 = 2;

/// Per-room trapped chest probability for a floor.
pub fn trapped_chest_chance(floor: u32) -> f64 {
    (0.03 + floor as f64 * 0.009).min(0.09)
}

/// Per-room hidden room probability for a floor.
pub fn hidden_room_chance(floor: u32) -> f64 {
    (0.1 + floor as f64 * 0.02).min(0.3)
}

/// The kinds of breakable props.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestructibleKind {
    Barrel,
    Crate,
    Pot,
    ExplosiveBarrel,
}

impl DestructibleKind {
    /// The non-explosive kinds, picked uniformly.
    pub const PLAIN: [DestructibleKind; 3] = [
        DestructibleKind::Barrel,
        DestructibleKind::Crate,
        DestructibleKind::Pot,
    ];

    pub fn max_health(self) -> u32 {
        match self {
            DestructibleKind::Barrel => 30,
            DestructibleKind::Crate => 20,
            DestructibleKind::Pot => 10,
            DestructibleKind::ExplosiveBarrel => 15,
        }
    }

    pub fn explodes(self) -> bool {
        self == DestructibleKind::ExplosiveBarrel
    }

    pub fn explosion_damage(self) -> u32 {
        if self.explodes() {
            40
        } else {
            0
        }
    }

    /// Blast radius in tiles; zero for kinds that do not explode.
    pub fn explosion_radius_tiles(self) -> f64 {
        if self.explodes() {
            2.5
        } else {
            0.0
        }
    }
}

/// A breakable prop standing on a floor tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destructible {
    pub kind: DestructibleKind,
    pub tile_x: i32,
    pub tile_y: i32,
    /// Pixel centre of the tile
    pub world_x: f64,
    pub world_y: f64,
    pub health: u32,
    pub max_health: u32,
    pub explodes: bool,
    pub explosion_damage: u32,
    /// Blast radius in pixels
    pub explosion_radius: f64,
}

impl Destructible {
    /// Creates a prop at full health on the given tile.
    ///
    /// # Examples
    ///
    /// ```
    /// use deluge::{Destructible, DestructibleKind};
    /// use deluge::game::Position;
    ///
    /// let barrel = Destructible::new(DestructibleKind::ExplosiveBarrel, Position::new(3, 4), 32);
    /// assert_eq!(barrel.world_x, 112.0);
    /// assert_eq!(barrel.explosion_radius, 80.0);
    /// assert!(barrel.explodes);
    /// ```
    pub fn new(kind: DestructibleKind, tile: Position, tile_size: u32) -> Self {
        let size = tile_size as f64;
        let health = kind.max_health();
        Self {
            kind,
            tile_x: tile.x,
            tile_y: tile.y,
            world_x: tile.x as f64 * size + size / 2.0,
            world_y: tile.y as f64 * size + size / 2.0,
            health,
            max_health: health,
            explodes: kind.explodes(),
            explosion_damage: kind.explosion_damage(),
            explosion_radius: kind.explosion_radius_tiles() * size,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.tile_x, self.tile_y)
    }

    pub fn is_destroyed(&self) -> bool {
        self.health == 0
    }

    /// Applies damage and returns true if this hit destroyed the prop.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if self.is_destroyed() {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        self.is_destroyed()
    }
}

/// A sealed side-room reachable only by breaking its secret wall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiddenRoom {
    pub room: Room,
    /// Id of the room the secret wall belongs to
    pub parent: u32,
    /// Side of the parent the hidden room hangs off
    pub side: Direction,
    /// The breakable wall tile on the parent's perimeter
    pub entrance: Position,
    /// Floor tiles between the entrance and the hidden room
    pub passage: Vec<Position>,
    pub chests: Vec<Position>,
}

/// Centre and edge of the dungeon core footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorePosition {
    pub x: i32,
    pub y: i32,
    pub size: i32,
}

impl CorePosition {
    /// The tiles stamped as dungeon core.
    pub fn footprint(&self) -> Rect {
        let half = self.size / 2;
        Rect::new(self.x - half, self.y - half, self.size, self.size)
    }
}

/// Runs the whole feature stage in order.
pub fn place_features<R: Rng + ?Sized>(
    ctx: &mut GenerationContext,
    config: &DungeonConfig,
    rng: &mut R,
) {
    place_special_tiles(ctx, rng);
    let hidden = place_hidden_rooms(ctx, rng);
    place_core(ctx, config);
    let props = place_destructibles(ctx, config, rng);

    debug!(
        "Features: {} chests, {} trapped chests, {}/{} hidden rooms, {}/{} destructibles",
        ctx.report.chests,
        ctx.report.trapped_chests,
        hidden.achieved,
        hidden.requested,
        props.achieved,
        props.requested
    );
}

/// Stairs, chests and trapped chests.
pub fn place_special_tiles<R: Rng + ?Sized>(ctx: &mut GenerationContext, rng: &mut R) {
    place_stairs(ctx);

    let trap_chance = trapped_chest_chance(ctx.floor);
    let mut chests = 0;
    let mut traps = 0;

    for index in generic_rooms(ctx) {
        if rng.chance(CHEST_CHANCE) {
            if let Some(pos) = random_free_tile(ctx, index, rng) {
                ctx.set_tile(pos, TileType::Chest);
                chests += 1;
            }
        }
        if rng.chance(trap_chance) {
            if let Some(pos) = random_free_tile(ctx, index, rng) {
                ctx.set_tile(pos, TileType::Trap);
                traps += 1;
            }
        }
    }

    ctx.report.chests = chests;
    ctx.report.trapped_chests = traps;
}

/// Up-stairs in the start room, down-stairs in the boss room.
pub fn place_stairs(ctx: &mut GenerationContext) {
    if let Some(center) = ctx.start().map(Room::center) {
        ctx.set_tile(center, TileType::StairsUp);
    }
    if let Some(center) = ctx.boss().map(Room::center) {
        ctx.set_tile(center, TileType::StairsDown);
    }
}

/// Indices of rooms that are neither start, boss nor core.
fn generic_rooms(ctx: &GenerationContext) -> Vec<usize> {
    (0..ctx.rooms.len())
        .filter(|&index| {
            Some(index) != ctx.start_room
                && Some(index) != ctx.boss_room
                && Some(index) != ctx.core_room
        })
        .collect()
}

/// A random floor tile one in from the room edge, outside any tunnel mouth.
fn random_free_tile<R: Rng + ?Sized>(
    ctx: &GenerationContext,
    room_index: usize,
    rng: &mut R,
) -> Option<Position> {
    let interior = ctx.rooms.get(room_index)?.interior(1);

    for _ in 0..FEATURE_TILE_TRIES {
        let pos = *rng.random_choice(&interior)?;
        if ctx.is_tile(pos, TileType::Floor) && !ctx.in_tunnel_mouth(pos) {
            return Some(pos);
        }
    }
    None
}

/// Rolls a hidden room for every generic room and tries each side in random order.
pub fn place_hidden_rooms<R: Rng + ?Sized>(
    ctx: &mut GenerationContext,
    rng: &mut R,
) -> PlacementOutcome {
    let chance = hidden_room_chance(ctx.floor);
    let mut outcome = PlacementOutcome::new(0);

    for parent in generic_rooms(ctx) {
        if !rng.chance(chance) {
            continue;
        }
        outcome.requested += 1;

        let mut sides = Direction::cardinal();
        sides.shuffle(rng);

        for side in sides {
            outcome.attempts += 1;
            if try_attach_hidden_room(ctx, parent, side, rng) {
                outcome.achieved += 1;
                break;
            }
        }
    }

    ctx.report.hidden_rooms = outcome;
    outcome
}

/// Tries to hang a hidden room off one side of a parent room.
///
/// The entrance is the parent perimeter tile in line with the parent's
/// centre. It stays wall; the two tiles beyond it become the passage, and
/// the hidden room starts three tiles out.
pub fn try_attach_hidden_room<R: Rng + ?Sized>(
    ctx: &mut GenerationContext,
    parent_index: usize,
    side: Direction,
    rng: &mut R,
) -> bool {
    let parent = match ctx.rooms.get(parent_index) {
        Some(room) => room.clone(),
        None => return false,
    };
    let rect = parent.rect();
    let center = parent.center();

    let entrance = match side {
        Direction::North => Position::new(center.x, rect.y - 1),
        Direction::South => Position::new(center.x, rect.bottom()),
        Direction::West => Position::new(rect.x - 1, center.y),
        Direction::East => Position::new(rect.right(), center.y),
    };
    let inward = entrance.step(side.opposite(), 1);
    let near = entrance.step(side, 1);
    let opening = entrance.step(side, 2);

    if !ctx.is_tile(entrance, TileType::Wall) || !ctx.is_tile(inward, TileType::Floor) {
        return false;
    }
    if !ctx.is_tile(near, TileType::Void) {
        return false;
    }

    let laterals = lateral_neighbours(near, side);
    let laterals_closed = laterals.iter().all(|&pos| {
        matches!(ctx.tile(pos), Some(TileType::Void) | Some(TileType::Wall))
    });
    if !laterals_closed {
        return false;
    }

    let width = rng.random_int(HIDDEN_ROOM_MIN, HIDDEN_ROOM_MAX);
    let height = rng.random_int(HIDDEN_ROOM_MIN, HIDDEN_ROOM_MAX);
    let (x, y) = match side {
        Direction::North => (entrance.x - width / 2, entrance.y - 2 - height),
        Direction::South => (entrance.x - width / 2, entrance.y + 3),
        Direction::West => (entrance.x - 2 - width, entrance.y - height / 2),
        Direction::East => (entrance.x + 3, entrance.y - height / 2),
    };
    let footprint = Rect::new(x, y, width, height);

    if !ctx.is_rect_void(&footprint.expanded(1)) {
        return false;
    }

    ctx.fill_rect(&footprint, TileType::Floor);
    for pos in footprint.ring(1) {
        ctx.set_tile(pos, TileType::Wall);
    }
    ctx.set_tile(opening, TileType::Floor);
    ctx.set_tile(near, TileType::Floor);
    for pos in laterals {
        ctx.set_tile(pos, TileType::Wall);
    }

    let id = ctx.hidden_rooms.len() as u32;
    let room = Room::new(id, x, y, width, height, RoomType::Hidden);

    let mut chests = vec![room.center()];
    if rng.chance(HIDDEN_SECOND_CHEST_CHANCE) {
        let spots: Vec<Position> = room
            .interior(1)
            .into_iter()
            .filter(|&pos| pos != room.center())
            .collect();
        if let Some(&spot) = rng.random_choice(&spots) {
            chests.push(spot);
        }
    }
    for &chest in &chests {
        ctx.set_tile(chest, TileType::Chest);
    }

    ctx.hidden_rooms.push(HiddenRoom {
        room,
        parent: parent.id,
        side,
        entrance,
        passage: vec![near, opening],
        chests,
    });
    true
}

fn lateral_neighbours(pos: Position, side: Direction) -> [Position; 2] {
    if side.is_vertical() {
        [pos.step(Direction::West, 1), pos.step(Direction::East, 1)]
    } else {
        [pos.step(Direction::North, 1), pos.step(Direction::South, 1)]
    }
}

/// Turns the boss room into the core room and stamps the core.
///
/// With [`CoreAccess::TorchGated`] this also lights the way for the older
/// puzzle: unlit torches near the boss room corners and core doors on every
/// boss entry.
pub fn place_core(ctx: &mut GenerationContext, config: &DungeonConfig) {
    let boss_index = match ctx.boss_room {
        Some(index) => index,
        None => {
            warn!("No boss room; skipping dungeon core");
            return;
        }
    };
    let boss = ctx.rooms[boss_index].rect();
    let center = boss.center();

    ctx.core_room = Some(boss_index);
    let core = CorePosition {
        x: center.x,
        y: center.y,
        size: CORE_SIZE,
    };
    ctx.fill_rect(&core.footprint(), TileType::DungeonCore);
    ctx.core_position = Some(core);

    if config.core_access == CoreAccess::TorchGated {
        place_torches(ctx, boss);
        place_core_doors(ctx);
    }
}

fn place_torches(ctx: &mut GenerationContext, boss: Rect) {
    let corners = [
        Position::new(boss.x + TORCH_INSET, boss.y + TORCH_INSET),
        Position::new(boss.right() - 1 - TORCH_INSET, boss.y + TORCH_INSET),
        Position::new(boss.x + TORCH_INSET, boss.bottom() - 1 - TORCH_INSET),
        Position::new(boss.right() - 1 - TORCH_INSET, boss.bottom() - 1 - TORCH_INSET),
    ];

    for pos in corners {
        if ctx.is_tile(pos, TileType::Floor) {
            ctx.set_tile(pos, TileType::TorchUnlit);
            ctx.torch_positions.push(pos);
        }
    }

    if ctx.torch_positions.len() < corners.len() {
        warn!(
            "Boss room too small for all torches; placed {}",
            ctx.torch_positions.len()
        );
    }
}

fn place_core_doors(ctx: &mut GenerationContext) {
    let entries = ctx.boss_entries.clone();
    for pos in entries {
        if ctx.tile(pos).map_or(false, TileType::is_walkable) {
            ctx.set_tile(pos, TileType::CoreDoor);
            if ctx.core_door_position.is_none() {
                ctx.core_door_position = Some(pos);
            }
        }
    }
}

/// Scatters 0-3 props in every room except the boss room.
pub fn place_destructibles<R: Rng + ?Sized>(
    ctx: &mut GenerationContext,
    config: &DungeonConfig,
    rng: &mut R,
) -> PlacementOutcome {
    let mut outcome = PlacementOutcome::new(0);

    for index in 0..ctx.rooms.len() {
        if Some(index) == ctx.boss_room || Some(index) == ctx.core_room {
            continue;
        }

        let count = rng.random_int(0, MAX_DESTRUCTIBLES_PER_ROOM) as u32;
        if count == 0 {
            continue;
        }

        let candidates = ctx.rooms[index].interior(2);
        let placed = place_with_budget(count, count * 10, |_| {
            let pos = match rng.random_choice(&candidates) {
                Some(&pos) => pos,
                None => return false,
            };
            if !destructible_fits(ctx, pos) {
                return false;
            }

            let kind = if rng.chance(EXPLOSIVE_CHANCE) {
                DestructibleKind::ExplosiveBarrel
            } else {
                rng.random_choice(&DestructibleKind::PLAIN)
                    .copied()
                    .unwrap_or(DestructibleKind::Barrel)
            };
            ctx.destructibles
                .push(Destructible::new(kind, pos, config.tile_size));
            true
        });
        outcome.absorb(placed);
    }

    ctx.report.destructibles = outcome;
    outcome
}

/// Floor, no wall touching it, clear of other props and off the player spawn.
fn destructible_fits(ctx: &GenerationContext, pos: Position) -> bool {
    ctx.is_tile(pos, TileType::Floor)
        && ctx.start().map(player_spawn_tile) != Some(pos)
        && !pos
            .adjacent_positions()
            .into_iter()
            .any(|next| ctx.is_tile(next, TileType::Wall))
        && !ctx
            .destructibles
            .iter()
            .any(|other| other.position().chebyshev_distance(pos) <= DESTRUCTIBLE_SPACING)
}
