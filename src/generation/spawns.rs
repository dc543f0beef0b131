//! # Spawn Planning
//!
//! Derives the player spawn and per-room enemy and boss spawns from the
//! finished grid.

use super::{GenerationContext, Room, RoomType};
use crate::game::{Position, TileType};
use crate::utils::{place_with_budget, PlacementOutcome, RandomUtils};
use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Spawns closer than this (Chebyshev) to an existing spawn are rejected.
const SPAWN_SPACING: u32 = 2;

/// Upper bound on enemies per generic room.
const MAX_ENEMIES_PER_ROOM: i32 = 5;

/// What appears at a spawn point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnKind {
    Player,
    Enemy,
    Boss,
}

/// A tile-coordinate spawn marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub x: i32,
    pub y: i32,
    pub kind: SpawnKind,
    /// Id of the room the spawn belongs to
    pub room: u32,
}

impl SpawnPoint {
    pub fn new(position: Position, kind: SpawnKind, room: u32) -> Self {
        Self {
            x: position.x,
            y: position.y,
            kind,
            room,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub fn is_hostile(&self) -> bool {
        self.kind != SpawnKind::Player
    }
}

/// Highest enemy count a generic room can roll on a floor.
pub fn max_enemies_for_floor(floor: u32) -> i32 {
    let scaled = 3i64 + floor as i64 * 2;
    scaled.min(MAX_ENEMIES_PER_ROOM as i64) as i32
}

/// Places the player spawn, then enemies and the boss.
pub fn plan_spawns<R: Rng + ?Sized>(ctx: &mut GenerationContext, rng: &mut R) -> PlacementOutcome {
    place_player_spawn(ctx);
    let outcome = place_room_spawns(ctx, rng);
    ctx.report.spawns = outcome;

    debug!(
        "Spawns: {} points, {}/{} hostile placements",
        ctx.spawn_points.len(),
        outcome.achieved,
        outcome.requested
    );
    outcome
}

/// Puts the player one tile south of the start room centre.
///
/// A start room that is missing, or doubles as the boss or core room, is
/// replaced by the first room that is neither.
pub fn place_player_spawn(ctx: &mut GenerationContext) -> Option<Position> {
    let (boss, core) = (ctx.boss_room, ctx.core_room);
    let excluded = |index: usize| Some(index) == boss || Some(index) == core;

    let start = match ctx.start_room {
        Some(index) if index < ctx.rooms.len() && !excluded(index) => index,
        _ => {
            let fallback = (0..ctx.rooms.len()).find(|&index| !excluded(index))?;
            warn!(
                "Start room unusable for the player spawn; promoting room {}",
                ctx.rooms[fallback].id
            );
            if let Some(previous) = ctx.start_room.and_then(|index| ctx.rooms.get_mut(index)) {
                if previous.room_type == RoomType::Start {
                    previous.room_type = RoomType::Normal;
                }
            }
            let room = &mut ctx.rooms[fallback];
            if room.room_type == RoomType::Normal {
                room.room_type = RoomType::Start;
            }
            ctx.start_room = Some(fallback);
            fallback
        }
    };

    let room_id = ctx.rooms[start].id;
    let position = player_spawn_tile(&ctx.rooms[start]);

    let props = ctx.destructibles.len();
    ctx.destructibles.retain(|prop| prop.position() != position);
    let cleared = (props - ctx.destructibles.len()) as u32;
    if cleared > 0 {
        debug!("Cleared {} prop(s) from the player spawn", cleared);
        ctx.report.destructibles.achieved =
            ctx.report.destructibles.achieved.saturating_sub(cleared);
    }

    ctx.spawn_points
        .push(SpawnPoint::new(position, SpawnKind::Player, room_id));
    Some(position)
}

/// The tile the player appears on: one south of the room centre.
pub fn player_spawn_tile(room: &Room) -> Position {
    room.center() + Position::new(0, 1)
}

/// Enemy spawns in every room but the start room, and the boss spawn.
pub fn place_room_spawns<R: Rng + ?Sized>(
    ctx: &mut GenerationContext,
    rng: &mut R,
) -> PlacementOutcome {
    let max_enemies = max_enemies_for_floor(ctx.floor);
    let mut outcome = PlacementOutcome::new(0);

    for index in 0..ctx.rooms.len() {
        let is_boss = Some(index) == ctx.boss_room;
        if Some(index) == ctx.start_room {
            continue;
        }
        if Some(index) == ctx.core_room && !is_boss {
            continue;
        }

        let (count, kind) = if is_boss {
            (1, SpawnKind::Boss)
        } else {
            (rng.random_int(2, max_enemies) as u32, SpawnKind::Enemy)
        };

        let room_id = ctx.rooms[index].id;
        let candidates = ctx.rooms[index].interior(1);
        let placed = place_with_budget(count, count * 10, |_| {
            let pos = match rng.random_choice(&candidates) {
                Some(&pos) => pos,
                None => return false,
            };
            if !ctx.is_tile(pos, TileType::Floor) || crowded(ctx, pos) || holds_prop(ctx, pos)
            {
                return false;
            }
            ctx.spawn_points.push(SpawnPoint::new(pos, kind, room_id));
            true
        });
        outcome.absorb(placed);
    }

    outcome
}

fn holds_prop(ctx: &GenerationContext, pos: Position) -> bool {
    ctx.destructibles.iter().any(|prop| prop.position() == pos)
}

fn crowded(ctx: &GenerationContext, pos: Position) -> bool {
    ctx.spawn_points
        .iter()
        .any(|spawn| spawn.position().chebyshev_distance(pos) <= SPAWN_SPACING)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{Destructible, DestructibleKind};
    use crate::utils::create_rng;

    fn three_rooms() -> GenerationContext {
        let mut ctx = GenerationContext::new(80, 80, 1);
        let rooms = [
            Room::new(0, 5, 5, 10, 10, RoomType::Start),
            Room::new(1, 40, 40, 30, 30, RoomType::Boss),
            Room::new(2, 20, 5, 12, 12, RoomType::Normal),
        ];
        for room in rooms {
            ctx.fill_rect(&room.rect(), TileType::Floor);
            ctx.rooms.push(room);
        }
        ctx.start_room = Some(0);
        ctx.boss_room = Some(1);
        ctx.core_room = Some(1);
        ctx
    }

    #[test]
    fn test_enemy_cap_scales_with_floor() {
        assert_eq!(max_enemies_for_floor(0), 3);
        assert_eq!(max_enemies_for_floor(1), 5);
        assert_eq!(max_enemies_for_floor(20), 5);
        assert_eq!(max_enemies_for_floor(u32::MAX), 5);
    }

    #[test]
    fn test_player_spawn_south_of_start_centre() {
        let mut ctx = three_rooms();
        let pos = place_player_spawn(&mut ctx).unwrap();
        assert_eq!(pos, Position::new(10, 11));
        assert_eq!(ctx.spawn_points[0].kind, SpawnKind::Player);
        assert_eq!(ctx.spawn_points[0].room, 0);
    }

    #[test]
    fn test_player_spawn_falls_back_when_start_is_boss() {
        let mut ctx = three_rooms();
        ctx.start_room = Some(1);

        let pos = place_player_spawn(&mut ctx).unwrap();
        assert_eq!(ctx.start_room, Some(0));
        assert_eq!(pos, Position::new(10, 11));
        assert!(!ctx.rooms[1].contains(pos));
    }

    #[test]
    fn test_player_spawn_promotes_generic_room() {
        let mut ctx = three_rooms();
        ctx.rooms.remove(0);
        ctx.start_room = None;
        ctx.boss_room = Some(0);
        ctx.core_room = Some(0);

        place_player_spawn(&mut ctx).unwrap();
        assert_eq!(ctx.start_room, Some(1));
        assert!(ctx.rooms[1].is_start_room());
    }

    #[test]
    fn test_no_player_spawn_without_rooms() {
        let mut ctx = GenerationContext::new(40, 40, 1);
        assert!(place_player_spawn(&mut ctx).is_none());
        assert!(ctx.spawn_points.is_empty());
    }

    #[test]
    fn test_room_spawns_respect_spacing_and_rooms() {
        for seed in 0..30 {
            let mut ctx = three_rooms();
            let mut rng = create_rng(seed);
            let outcome = plan_spawns(&mut ctx, &mut rng);

            let bosses: Vec<_> = ctx
                .spawn_points
                .iter()
                .filter(|spawn| spawn.kind == SpawnKind::Boss)
                .collect();
            assert_eq!(bosses.len(), 1);
            assert_eq!(bosses[0].room, 1);

            let enemies = ctx
                .spawn_points
                .iter()
                .filter(|spawn| spawn.kind == SpawnKind::Enemy)
                .count();
            assert!((2..=5).contains(&enemies), "seed {}: {}", seed, enemies);
            assert!(ctx
                .spawn_points
                .iter()
                .filter(|spawn| spawn.is_hostile())
                .all(|spawn| spawn.room != 0));
            assert_eq!(outcome.achieved as usize, ctx.spawn_points.len() - 1);

            for (i, a) in ctx.spawn_points.iter().enumerate() {
                let room = &ctx.rooms[a.room as usize];
                if a.is_hostile() {
                    assert!(room.interior(1).contains(&a.position()));
                }
                for b in ctx.spawn_points.iter().skip(i + 1) {
                    assert!(a.position().chebyshev_distance(b.position()) > 2);
                }
            }
        }
    }

    #[test]
    fn test_player_spawn_clears_prop_underneath() {
        let mut ctx = three_rooms();
        let spot = player_spawn_tile(&ctx.rooms[0]);
        ctx.destructibles
            .push(Destructible::new(DestructibleKind::Crate, spot, 32));
        ctx.destructibles
            .push(Destructible::new(DestructibleKind::Pot, Position::new(7, 7), 32));
        ctx.report.destructibles.achieved = 2;

        assert_eq!(place_player_spawn(&mut ctx), Some(spot));
        assert_eq!(ctx.destructibles.len(), 1);
        assert_eq!(ctx.destructibles[0].position(), Position::new(7, 7));
        assert_eq!(ctx.report.destructibles.achieved, 1);
    }

    #[test]
    fn test_enemies_never_spawn_on_props() {
        let free = Position::new(26, 11);
        for seed in 0..20 {
            let mut ctx = three_rooms();
            let blocked: Vec<Position> = ctx.rooms[2]
                .interior(1)
                .into_iter()
                .filter(|&pos| pos != free)
                .collect();
            for pos in blocked {
                ctx.destructibles
                    .push(Destructible::new(DestructibleKind::Barrel, pos, 32));
            }

            let mut rng = create_rng(seed);
            plan_spawns(&mut ctx, &mut rng);

            for spawn in &ctx.spawn_points {
                assert!(
                    ctx.destructibles.iter().all(|prop| prop.position() != spawn.position()),
                    "seed {}: spawn on a prop at {:?}",
                    seed,
                    spawn.position()
                );
                if spawn.room == 2 {
                    assert_eq!(spawn.position(), free);
                }
            }
        }
    }

    #[test]
    fn test_tiny_room_ends_under_populated() {
        let mut ctx = three_rooms();
        let tiny = Room::new(3, 60, 5, 3, 3, RoomType::Normal);
        ctx.fill_rect(&tiny.rect(), TileType::Floor);
        ctx.rooms.push(tiny);

        let mut rng = create_rng(1);
        let outcome = place_room_spawns(&mut ctx, &mut rng);
        let in_tiny = ctx.spawn_points.iter().filter(|spawn| spawn.room == 3).count();
        assert_eq!(in_tiny, 1);
        assert!(!outcome.is_complete());
    }
}
