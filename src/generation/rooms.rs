//! # Room Planning
//!
//! Places the start room and the boss room in topologically distant ninths
//! of the map, then packs generic rooms into whatever space is left.
//! Rooms are carved as floor the moment they are accepted.

use super::{DungeonConfig, GenerationContext, Room, RoomType, Zone};
use crate::config::{ROOM_PADDING, ROOM_PLACEMENT_ATTEMPTS};
use crate::game::TileType;
use crate::utils::{place_with_budget, PlacementOutcome, RandomUtils};
use log::{debug, warn};
use rand::Rng;

/// Smallest and largest edge of the start room.
const START_ROOM_MIN: i32 = 8;
const START_ROOM_MAX: i32 = 12;

/// Gap kept between the start room and the edges of its zone.
const START_ZONE_INSET: i32 = 4;

/// Runs the whole room-planning stage.
///
/// Returns the generic-room packing outcome; the start and boss rooms are
/// always placed.
pub fn plan_rooms<R: Rng + ?Sized>(
    ctx: &mut GenerationContext,
    config: &DungeonConfig,
    rng: &mut R,
) -> PlacementOutcome {
    place_start_room(ctx, rng);
    place_boss_room(ctx, config, rng);
    let outcome = place_generic_rooms(ctx, config, rng);

    if !outcome.is_complete() {
        warn!(
            "Room packing stopped at {}/{} generic rooms after {} attempts",
            outcome.achieved, outcome.requested, outcome.attempts
        );
    }

    ctx.report.rooms = outcome;
    outcome
}

/// Places the start room in a random non-corner ninth.
pub fn place_start_room<R: Rng + ?Sized>(ctx: &mut GenerationContext, rng: &mut R) -> usize {
    let zone = rng
        .random_choice(&Zone::START_CANDIDATES)
        .copied()
        .unwrap_or(Zone::E);
    let bounds = zone.bounds(ctx.width, ctx.height);

    let max_width = (bounds.width - START_ZONE_INSET * 2).max(3);
    let max_height = (bounds.height - START_ZONE_INSET * 2).max(3);
    let width = rng.random_int(START_ROOM_MIN, START_ROOM_MAX).min(max_width);
    let height = rng.random_int(START_ROOM_MIN, START_ROOM_MAX).min(max_height);

    let center_x = rng.random_int(
        bounds.x + START_ZONE_INSET + width / 2,
        bounds.right() - START_ZONE_INSET - width + width / 2,
    );
    let center_y = rng.random_int(
        bounds.y + START_ZONE_INSET + height / 2,
        bounds.bottom() - START_ZONE_INSET - height + height / 2,
    );

    let x = clamp_origin(center_x - width / 2, width, ctx.width);
    let y = clamp_origin(center_y - height / 2, height, ctx.height);

    let index = push_room(ctx, x, y, width, height, RoomType::Start);
    ctx.start_room = Some(index);
    ctx.start_zone = Some(zone);

    debug!(
        "Start room {}x{} at ({}, {}) in zone {}",
        width,
        height,
        x,
        y,
        zone.label()
    );
    index
}

/// Picks the boss zone among the ninths furthest from the start zone.
pub fn pick_boss_zone<R: Rng + ?Sized>(start_zone: Zone, rng: &mut R) -> Zone {
    let candidates = start_zone.furthest_ninths();
    rng.random_choice(&candidates).copied().unwrap_or(Zone::I)
}

/// Places the square boss room centred in a zone far from the start room.
///
/// Must run after [`place_start_room`]; it reads the start zone from the context.
pub fn place_boss_room<R: Rng + ?Sized>(
    ctx: &mut GenerationContext,
    config: &DungeonConfig,
    rng: &mut R,
) -> usize {
    let start_zone = ctx.start_zone.unwrap_or(Zone::E);
    let zone = pick_boss_zone(start_zone, rng);
    place_boss_room_in_zone(ctx, config, zone)
}

/// Places the boss room centred in the given zone, clamped to the map.
pub fn place_boss_room_in_zone(
    ctx: &mut GenerationContext,
    config: &DungeonConfig,
    zone: Zone,
) -> usize {
    let size = (config.boss_room_size as i32)
        .min(ctx.width - 4)
        .min(ctx.height - 4)
        .max(5);
    let bounds = zone.bounds(ctx.width, ctx.height);
    let center = bounds.center();

    let x = clamp_origin(center.x - size / 2, size, ctx.width);
    let y = clamp_origin(center.y - size / 2, size, ctx.height);

    let candidate = Room::new(0, x, y, size, size, RoomType::Boss);
    if let Some(start) = ctx.start() {
        if candidate.overlaps_with_padding(start, 1) {
            warn!(
                "Boss room in zone {} touches the start room; map too small for a {}x{} boss room",
                zone.label(),
                size,
                size
            );
        }
    }

    let index = push_room(ctx, x, y, size, size, RoomType::Boss);
    ctx.boss_room = Some(index);
    ctx.boss_zone = Some(zone);

    debug!(
        "Boss room {}x{} at ({}, {}) in zone {}",
        size,
        size,
        x,
        y,
        zone.label()
    );
    index
}

/// Packs generic rooms until `max_rooms` is reached or the attempt budget runs out.
pub fn place_generic_rooms<R: Rng + ?Sized>(
    ctx: &mut GenerationContext,
    config: &DungeonConfig,
    rng: &mut R,
) -> PlacementOutcome {
    let requested = (config.max_rooms as usize).saturating_sub(ctx.rooms.len()) as u32;
    let max_edge = (config.max_room_size as i32)
        .min(ctx.width - 4)
        .min(ctx.height - 4)
        .max(3);
    let min_edge = (config.min_room_size as i32).min(max_edge);

    place_with_budget(requested, ROOM_PLACEMENT_ATTEMPTS, |_| {
        let width = rng.random_int(min_edge, max_edge);
        let height = rng.random_int(min_edge, max_edge);
        let x = rng.random_int(1, ctx.width - width - 1);
        let y = rng.random_int(1, ctx.height - height - 1);

        let candidate = Room::new(0, x, y, width, height, RoomType::Normal);
        if ctx
            .rooms
            .iter()
            .any(|existing| candidate.overlaps_with_padding(existing, ROOM_PADDING))
        {
            return false;
        }

        push_room(ctx, x, y, width, height, RoomType::Normal);
        true
    })
}

/// Appends a room, carves it as floor, and returns its index.
fn push_room(
    ctx: &mut GenerationContext,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    room_type: RoomType,
) -> usize {
    let index = ctx.rooms.len();
    let room = Room::new(index as u32, x, y, width, height, room_type);
    ctx.fill_rect(&room.rect(), TileType::Floor);
    ctx.rooms.push(room);
    index
}

/// Keeps a span of `size` tiles at least one tile away from both map edges.
fn clamp_origin(origin: i32, size: i32, extent: i32) -> i32 {
    let max = (extent - size - 1).max(1);
    origin.clamp(1, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::create_rng;

    fn planned(seed: u64) -> GenerationContext {
        let config = DungeonConfig::new();
        let mut ctx = GenerationContext::new(config.width as i32, config.height as i32, 1);
        let mut rng = create_rng(seed);
        plan_rooms(&mut ctx, &config, &mut rng);
        ctx
    }

    #[test]
    fn test_start_and_boss_rooms_always_placed() {
        for seed in 0..30 {
            let ctx = planned(seed);
            let start = ctx.start().unwrap();
            let boss = ctx.boss().unwrap();

            assert!(start.is_start_room());
            assert!(boss.is_boss_room());
            assert!((8..=12).contains(&start.width));
            assert!((8..=12).contains(&start.height));
            assert_eq!((boss.width, boss.height), (50, 50));
            assert!(!start.overlaps_with_padding(boss, 2), "seed {}", seed);
        }
    }

    #[test]
    fn test_start_zone_is_never_a_corner() {
        for seed in 0..50 {
            let ctx = planned(seed);
            let zone = ctx.start_zone.unwrap();
            assert!(Zone::START_CANDIDATES.contains(&zone));
            assert_eq!(
                Zone::containing(ctx.start().unwrap().center(), ctx.width, ctx.height),
                zone
            );
        }
    }

    #[test]
    fn test_boss_zone_is_far_from_start() {
        for seed in 0..50 {
            let ctx = planned(seed);
            let start_zone = ctx.start_zone.unwrap();
            let boss_zone = ctx.boss_zone.unwrap();
            assert!(start_zone.distance(boss_zone) >= 2);
        }
    }

    #[test]
    fn test_pick_boss_zone_uses_furthest_ninths() {
        let mut rng = create_rng(4);
        for _ in 0..50 {
            let zone = pick_boss_zone(Zone::D, &mut rng);
            assert!(Zone::D.distance(zone) >= 2);
        }
    }

    #[test]
    fn test_rooms_stay_in_bounds_and_apart() {
        for seed in 0..20 {
            let ctx = planned(seed);
            assert!(ctx.rooms.len() >= 2);
            assert!(ctx.rooms.len() <= 20);

            for (i, room) in ctx.rooms.iter().enumerate() {
                assert_eq!(room.id as usize, i);
                assert!(room.x >= 1 && room.y >= 1);
                assert!(room.x + room.width <= ctx.width - 1);
                assert!(room.y + room.height <= ctx.height - 1);
                for pos in room.rect().positions() {
                    assert_eq!(ctx.tile(pos), Some(TileType::Floor));
                }
            }

            for (i, a) in ctx.rooms.iter().enumerate().skip(2) {
                for b in ctx.rooms.iter().take(i) {
                    assert!(!a.overlaps_with_padding(b, ROOM_PADDING));
                }
            }
        }
    }

    #[test]
    fn test_packing_degrades_gracefully_when_crowded() {
        let mut config = DungeonConfig::for_testing();
        config.max_rooms = 200;
        let mut ctx = GenerationContext::new(config.width as i32, config.height as i32, 1);
        let mut rng = create_rng(8);

        let outcome = plan_rooms(&mut ctx, &config, &mut rng);
        assert_eq!(outcome.requested, 198);
        assert!(!outcome.is_complete());
        assert_eq!(outcome.attempts, ROOM_PLACEMENT_ATTEMPTS);
        assert_eq!(ctx.rooms.len() as u32, 2 + outcome.achieved);
    }

    #[test]
    fn test_oversized_boss_room_is_clamped() {
        let mut config = DungeonConfig::for_testing();
        config.boss_room_size = 500;
        let mut ctx = GenerationContext::new(config.width as i32, config.height as i32, 1);
        let mut rng = create_rng(2);
        plan_rooms(&mut ctx, &config, &mut rng);

        let boss = ctx.boss().unwrap();
        assert!(boss.x >= 1 && boss.y >= 1);
        assert!(boss.x + boss.width <= ctx.width - 1);
        assert!(boss.y + boss.height <= ctx.height - 1);
    }

    #[test]
    fn test_clamp_origin() {
        assert_eq!(clamp_origin(-5, 10, 100), 1);
        assert_eq!(clamp_origin(95, 10, 100), 89);
        assert_eq!(clamp_origin(40, 10, 100), 40);
        assert_eq!(clamp_origin(3, 200, 100), 1);
    }
}
