//! # Tunnel Network
//!
//! Connects every room to every other room, then opens the wrap-around
//! tunnels that make the map non-Euclidean.
//!
//! Room connection is a greedy minimum spanning tree over room centres
//! (Prim's algorithm with Euclidean weights), followed by a handful of
//! redundant corridors so the layout is not a pure tree. Wrap tunnels are
//! pairs of mouths against opposite map edges; each mouth is linked to its
//! nearest room so no tunnel is left as an island.

use super::{Corridor, DungeonConfig, GenerationContext, WrapTunnel, Zone};
use crate::config::{EXTRA_CORRIDOR_RATIO, WRAP_TUNNEL_DEPTH, WRAP_TUNNEL_WIDTH};
use crate::game::{Position, TileType};
use crate::utils::{place_with_budget, PlacementOutcome, RandomUtils};
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Attempts allowed per requested wrap tunnel.
const TUNNEL_ATTEMPTS: u32 = 30;

/// Minimum gap between two parallel tunnels.
const TUNNEL_SPACING: i32 = 3;

/// Minimum gap between a tunnel mouth and the start or boss room.
const TUNNEL_ROOM_CLEARANCE: i32 = 2;

/// Which pair of opposite edges a wrap tunnel joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TunnelOrientation {
    /// Top edge to bottom edge
    Vertical,
    /// Left edge to right edge
    Horizontal,
}

/// Runs the whole tunnel stage: spanning tree, redundant corridors, wrap tunnels.
pub fn build_tunnel_network<R: Rng + ?Sized>(
    ctx: &mut GenerationContext,
    config: &DungeonConfig,
    rng: &mut R,
) {
    let tree_edges = connect_rooms(ctx, config, rng);
    let extra = add_redundant_corridors(ctx, config, rng);
    let tunnels = carve_wrap_tunnels(ctx, config, rng);

    ctx.report.corridors = ctx.corridors.len();
    ctx.report.extra_corridors = extra;

    debug!(
        "Tunnel network: {} tree corridors, {} redundant, {}/{} wrap tunnels",
        tree_edges, extra, tunnels.achieved, tunnels.requested
    );
}

/// Joins all rooms with a minimum spanning tree of L-shaped corridors.
///
/// Returns the number of corridors carved (rooms - 1).
pub fn connect_rooms<R: Rng + ?Sized>(
    ctx: &mut GenerationContext,
    config: &DungeonConfig,
    rng: &mut R,
) -> usize {
    let room_count = ctx.rooms.len();
    if room_count < 2 {
        return 0;
    }

    let width = config.corridor_width as i32;
    let mut connected = vec![0usize];
    let mut unconnected: Vec<usize> = (1..room_count).collect();
    let mut carved = 0;

    while !unconnected.is_empty() {
        let mut best: Option<(usize, usize, f64)> = None;

        for &from in &connected {
            let from_center = ctx.rooms[from].center();
            for (slot, &to) in unconnected.iter().enumerate() {
                let dist = from_center.euclidean_distance(ctx.rooms[to].center());
                if best.map_or(true, |(_, _, best_dist)| dist < best_dist) {
                    best = Some((from, slot, dist));
                }
            }
        }

        let (from, slot) = match best {
            Some((from, slot, _)) => (from, slot),
            None => break,
        };

        let to = unconnected.remove(slot);
        link_rooms(ctx, from, to, width, rng);
        connected.push(to);
        carved += 1;
    }

    carved
}

/// Adds `floor(rooms * 0.3)` random extra corridors, skipping pairs that are
/// already linked. Returns how many were carved.
pub fn add_redundant_corridors<R: Rng + ?Sized>(
    ctx: &mut GenerationContext,
    config: &DungeonConfig,
    rng: &mut R,
) -> usize {
    let room_count = ctx.rooms.len();
    if room_count < 2 {
        return 0;
    }

    let width = config.corridor_width as i32;
    let extra = (room_count as f64 * EXTRA_CORRIDOR_RATIO).floor() as usize;
    let mut carved = 0;

    for _ in 0..extra {
        let a = rng.random_int(0, room_count as i32 - 1) as usize;
        let b = rng.random_int(0, room_count as i32 - 1) as usize;

        if a == b || ctx.rooms[a].is_connected_to(b as u32) {
            continue;
        }

        link_rooms(ctx, a, b, width, rng);
        carved += 1;
    }

    carved
}

/// Carves a corridor between two room centres and records the link.
fn link_rooms<R: Rng + ?Sized>(
    ctx: &mut GenerationContext,
    from: usize,
    to: usize,
    width: i32,
    rng: &mut R,
) {
    let start = ctx.rooms[from].center();
    let end = ctx.rooms[to].center();
    let horizontal_first = rng.chance(0.5);

    let points = carve_l_corridor(ctx, start, end, width, horizontal_first);

    let from_id = ctx.rooms[from].id;
    let to_id = ctx.rooms[to].id;
    ctx.rooms[from].add_connection(to_id);
    ctx.rooms[to].add_connection(from_id);
    ctx.corridors.push(Corridor {
        from: from_id,
        to: to_id,
        points,
    });
}

/// Carves an L-shaped corridor of the given cross-section and returns its centre line.
pub fn carve_l_corridor(
    ctx: &mut GenerationContext,
    start: Position,
    end: Position,
    width: i32,
    horizontal_first: bool,
) -> Vec<Position> {
    let corner = if horizontal_first {
        Position::new(end.x, start.y)
    } else {
        Position::new(start.x, end.y)
    };

    let mut points = straight_line(start, corner);
    points.extend(straight_line(corner, end).into_iter().skip(1));

    for &point in &points {
        carve_brush(ctx, point, width);
    }

    points
}

/// Axis-aligned line from `from` to `to`, both ends included.
fn straight_line(from: Position, to: Position) -> Vec<Position> {
    let step = Position::new((to.x - from.x).signum(), (to.y - from.y).signum());
    let mut points = vec![from];
    let mut current = from;

    while current != to {
        current = current + step;
        points.push(current);
    }

    points
}

/// Carves a `width` x `width` square of floor around a point.
fn carve_brush(ctx: &mut GenerationContext, center: Position, width: i32) {
    let low = -(width - 1) / 2;
    let high = width / 2;
    for dy in low..=high {
        for dx in low..=high {
            ctx.set_tile(Position::new(center.x + dx, center.y + dy), TileType::Floor);
        }
    }
}

/// Opens 2-3 vertical and 2-3 horizontal wrap tunnels.
pub fn carve_wrap_tunnels<R: Rng + ?Sized>(
    ctx: &mut GenerationContext,
    config: &DungeonConfig,
    rng: &mut R,
) -> PlacementOutcome {
    let depth = WRAP_TUNNEL_DEPTH
        .min(ctx.height / 4)
        .min(ctx.width / 4)
        .max(1);
    let link_width = WRAP_TUNNEL_WIDTH.max(config.corridor_width as i32);
    let mut outcome = PlacementOutcome::new(0);

    for orientation in [TunnelOrientation::Vertical, TunnelOrientation::Horizontal] {
        let requested = rng.random_int(2, 3) as u32;
        let placed = place_with_budget(requested, requested * TUNNEL_ATTEMPTS, |_| {
            try_place_tunnel(ctx, orientation, depth, link_width, rng)
        });
        outcome.absorb(placed);
    }

    ctx.report.wrap_tunnels = outcome;
    outcome
}

/// Tries one tunnel position; on success carves both mouths and links them.
fn try_place_tunnel<R: Rng + ?Sized>(
    ctx: &mut GenerationContext,
    orientation: TunnelOrientation,
    depth: i32,
    link_width: i32,
    rng: &mut R,
) -> bool {
    let extent = match orientation {
        TunnelOrientation::Vertical => ctx.width,
        TunnelOrientation::Horizontal => ctx.height,
    };

    let blocked: Vec<i32> = [ctx.start_zone, ctx.boss_zone]
        .into_iter()
        .flatten()
        .map(|zone| match orientation {
            TunnelOrientation::Vertical => zone.col(),
            TunnelOrientation::Horizontal => zone.row(),
        })
        .collect();
    let bands: Vec<i32> = (0..3).filter(|band| !blocked.contains(band)).collect();

    let band = match rng.random_choice(&bands) {
        Some(&band) => band,
        None => return false,
    };
    let (band_start, band_length) = Zone::span(band, extent);
    let position = rng.random_int(
        band_start + 2,
        band_start + band_length - WRAP_TUNNEL_WIDTH - 2,
    );

    let mut tunnel = WrapTunnel {
        orientation,
        position,
        width: WRAP_TUNNEL_WIDTH,
        depth,
        linked_rooms: Vec::new(),
    };
    let mouths = tunnel.mouths(ctx.width, ctx.height);

    if mouths.iter().any(|mouth| !ctx.rect_in_bounds(mouth)) {
        return false;
    }

    let protected = [ctx.start(), ctx.boss()];
    let crowds_key_room = protected.iter().flatten().any(|room| {
        mouths
            .iter()
            .any(|mouth| mouth.expanded(TUNNEL_ROOM_CLEARANCE).intersects(&room.rect()))
    });
    if crowds_key_room {
        return false;
    }

    let too_close = ctx
        .wrap_tunnels
        .iter()
        .filter(|other| other.orientation == orientation)
        .any(|other| (other.position - position).abs() < WRAP_TUNNEL_WIDTH + TUNNEL_SPACING);
    if too_close {
        return false;
    }

    for mouth in &mouths {
        ctx.fill_rect(mouth, TileType::Floor);
    }

    for end in mouth_ends(&tunnel, ctx.width, ctx.height) {
        if let Some(room_id) = link_to_nearest_room(ctx, end, link_width, rng) {
            tunnel.linked_rooms.push(room_id);
        }
    }

    ctx.wrap_tunnels.push(tunnel);
    true
}

/// The innermost centre tile of each mouth, where the link corridor starts.
fn mouth_ends(tunnel: &WrapTunnel, map_width: i32, map_height: i32) -> [Position; 2] {
    let middle = tunnel.position + tunnel.width / 2;
    match tunnel.orientation {
        TunnelOrientation::Vertical => [
            Position::new(middle, tunnel.depth - 1),
            Position::new(middle, map_height - tunnel.depth),
        ],
        TunnelOrientation::Horizontal => [
            Position::new(tunnel.depth - 1, middle),
            Position::new(map_width - tunnel.depth, middle),
        ],
    }
}

/// Carves a wide corridor from a tunnel mouth to the closest room centre.
fn link_to_nearest_room<R: Rng + ?Sized>(
    ctx: &mut GenerationContext,
    from: Position,
    width: i32,
    rng: &mut R,
) -> Option<u32> {
    let (room_id, target) = ctx
        .rooms
        .iter()
        .map(|room| (room.id, room.center()))
        .min_by(|(_, a), (_, b)| {
            from.euclidean_distance(*a)
                .total_cmp(&from.euclidean_distance(*b))
        })?;

    let horizontal_first = rng.chance(0.5);
    carve_l_corridor(ctx, from, target, width, horizontal_first);
    Some(room_id)
}
