//! # Wall Finishing
//!
//! Three passes, always in this order:
//!
//! 1. Void next to floor becomes wall.
//! 2. The boss room perimeter is sealed, keeping only corridor-backed entries.
//! 3. Walls inside wrap tunnel mouths are cleared back to floor.
//!
//! No pass ever turns floor into wall.

use super::GenerationContext;
use crate::game::{Direction, Position, TileType};
use log::{debug, warn};

/// Runs all three wall passes.
pub fn finish_walls(ctx: &mut GenerationContext) {
    let walls = wall_void_near_floor(ctx);
    let entries = reinforce_boss_room(ctx);
    let cleared = clear_tunnel_mouths(ctx);

    ctx.report.boss_entries = entries;
    debug!(
        "Walls: {} placed, {} boss entries, {} cleared from tunnel mouths",
        walls, entries, cleared
    );
}

/// Turns every void tile 8-adjacent to floor into wall. Returns the count.
pub fn wall_void_near_floor(ctx: &mut GenerationContext) -> usize {
    let mut targets = Vec::new();

    for y in 0..ctx.height {
        for x in 0..ctx.width {
            let pos = Position::new(x, y);
            if ctx.is_tile(pos, TileType::Void)
                && pos
                    .adjacent_positions()
                    .into_iter()
                    .any(|next| ctx.is_tile(next, TileType::Floor))
            {
                targets.push(pos);
            }
        }
    }

    for &pos in &targets {
        ctx.set_tile(pos, TileType::Wall);
    }
    targets.len()
}

/// Seals the boss room. Returns the number of corridor entries kept open.
///
/// A perimeter tile is an entry when the tile beyond it, away from the
/// room, is floor. Entries are forced to floor and recorded in
/// `ctx.boss_entries`; remaining void on the perimeter becomes wall. A
/// second sweep two tiles out walls any void still touching the room.
pub fn reinforce_boss_room(ctx: &mut GenerationContext) -> usize {
    let room = match ctx.boss() {
        Some(room) => room.rect(),
        None => {
            warn!("No boss room; skipping perimeter reinforcement");
            return 0;
        }
    };

    let outer = room.expanded(1);
    let mut entries = Vec::new();

    for pos in room.ring(1) {
        let beyond = outward_direction(pos, outer.x, outer.y, outer.right() - 1, outer.bottom() - 1)
            .map(|direction| pos.step(direction, 1));

        match beyond {
            Some(beyond) if ctx.is_tile(beyond, TileType::Floor) => {
                ctx.set_tile(pos, TileType::Floor);
                entries.push(pos);
            }
            _ => {
                if ctx.is_tile(pos, TileType::Void) {
                    ctx.set_tile(pos, TileType::Wall);
                }
            }
        }
    }

    let sweep: Vec<Position> = room.ring(1).into_iter().chain(room.ring(2)).collect();
    for pos in sweep {
        if !ctx.is_tile(pos, TileType::Void) {
            continue;
        }
        let touches_room = pos
            .adjacent_positions()
            .into_iter()
            .any(|next| outer.contains(next) && ctx.is_tile(next, TileType::Floor));
        if touches_room {
            ctx.set_tile(pos, TileType::Wall);
        }
    }

    let count = entries.len();
    ctx.boss_entries = entries;
    count
}

/// The direction pointing away from the room for a non-corner ring tile.
fn outward_direction(pos: Position, left: i32, top: i32, right: i32, bottom: i32) -> Option<Direction> {
    let on_x_edge = pos.x == left || pos.x == right;
    let on_y_edge = pos.y == top || pos.y == bottom;

    match (on_x_edge, on_y_edge) {
        (true, true) | (false, false) => None,
        (true, false) if pos.x == left => Some(Direction::West),
        (true, false) => Some(Direction::East),
        (false, true) if pos.y == top => Some(Direction::North),
        (false, true) => Some(Direction::South),
    }
}

/// Reopens any wall inside a wrap tunnel mouth. Returns the count.
pub fn clear_tunnel_mouths(ctx: &mut GenerationContext) -> usize {
    let mut blocked = Vec::new();

    for tunnel in &ctx.wrap_tunnels {
        for mouth in tunnel.mouths(ctx.width, ctx.height) {
            blocked.extend(
                mouth
                    .positions()
                    .into_iter()
                    .filter(|&pos| ctx.is_tile(pos, TileType::Wall)),
            );
        }
    }

    for &pos in &blocked {
        ctx.set_tile(pos, TileType::Floor);
    }
    blocked.len()
}
