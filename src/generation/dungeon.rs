//! # Dungeon Generation
//!
//! The full generation pipeline and the structural checks run against its
//! output.
//!
//! This module ties the stages together in their fixed order:
//! 1. Plan the start, boss and generic rooms
//! 2. Connect rooms and open the wrap tunnels
//! 3. Finish walls, seal the boss room, clear tunnel mouths
//! 4. Place stairs, chests, traps, hidden rooms, the core and props
//! 5. Derive spawn points
//!
//! Generation never fails once the configuration has been accepted; stages
//! that run out of room degrade to a sparser level instead.

use super::features::place_features;
use super::rooms::plan_rooms;
use super::spawns::plan_spawns;
use super::tunnels::build_tunnel_network;
use super::walls::finish_walls;
use super::{DungeonConfig, GenerationContext, Generator};
use crate::game::{DungeonGrid, Position};
use crate::utils::{count_runs, create_rng, unreachable_walkable};
use crate::{DungeonError, DungeonResult};
use log::info;
use rand::{Rng, RngCore};

/// Builds complete levels from a validated [`DungeonConfig`].
#[derive(Debug, Clone)]
pub struct DungeonGenerator {
    config: DungeonConfig,
}

impl DungeonGenerator {
    /// Creates a generator, rejecting configurations no level can be built from.
    ///
    /// # Examples
    ///
    /// ```
    /// use deluge::{DungeonConfig, DungeonGenerator};
    ///
    /// let generator = DungeonGenerator::new(DungeonConfig::for_testing()).unwrap();
    /// let grid = generator.generate_seeded(1, 42);
    /// assert!(grid.start_room().is_some());
    ///
    /// let mut bad = DungeonConfig::new();
    /// bad.corridor_width = 0;
    /// assert!(DungeonGenerator::new(bad).is_err());
    /// ```
    pub fn new(config: DungeonConfig) -> DungeonResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DungeonConfig {
        &self.config
    }

    /// Generates a level from a fixed seed. Same seed, config and floor give the same grid.
    pub fn generate_seeded(&self, floor: u32, seed: u64) -> DungeonGrid {
        let mut rng = create_rng(seed);
        let ctx = self.run_stages(floor, &mut rng);
        DungeonGrid::from_context(ctx, &self.config, Some(seed))
    }

    /// Generates a level with any random source.
    pub fn generate_with<R: Rng + ?Sized>(&self, floor: u32, rng: &mut R) -> DungeonGrid {
        let ctx = self.run_stages(floor, rng);
        DungeonGrid::from_context(ctx, &self.config, None)
    }

    /// Runs every stage over a fresh context.
    pub fn run_stages<R: Rng + ?Sized>(&self, floor: u32, rng: &mut R) -> GenerationContext {
        let config = &self.config;
        let mut ctx = GenerationContext::new(config.width as i32, config.height as i32, floor);

        plan_rooms(&mut ctx, config, rng);
        build_tunnel_network(&mut ctx, config, rng);
        finish_walls(&mut ctx);
        place_features(&mut ctx, config, rng);
        plan_spawns(&mut ctx, rng);

        info!(
            "Generated floor {}: {} rooms, {} corridors, {} wrap tunnels, {} hidden rooms, {} spawn points",
            floor,
            ctx.rooms.len(),
            ctx.corridors.len(),
            ctx.wrap_tunnels.len(),
            ctx.hidden_rooms.len(),
            ctx.spawn_points.len()
        );
        ctx
    }
}

impl Default for DungeonGenerator {
    fn default() -> Self {
        Self {
            config: DungeonConfig::default(),
        }
    }
}

impl Generator<DungeonGrid> for DungeonGenerator {
    fn generate(&self, floor: u32, rng: &mut dyn RngCore) -> DungeonResult<DungeonGrid> {
        Ok(self.generate_with(floor, rng))
    }

    fn validate(&self, grid: &DungeonGrid) -> DungeonResult<()> {
        validate_connectivity(grid)?;
        validate_boss_perimeter(grid)?;
        validate_wrap_tunnels(grid)
    }

    fn generator_type(&self) -> &'static str {
        "DungeonGenerator"
    }
}

/// Every walkable tile outside hidden rooms is reachable from the start room centre.
pub fn validate_connectivity(grid: &DungeonGrid) -> DungeonResult<()> {
    let start = grid
        .start_room()
        .map(|room| room.center())
        .ok_or_else(|| DungeonError::GenerationFailed("level has no start room".to_string()))?;

    let sealed = |pos: Position| {
        grid.hidden_rooms
            .iter()
            .any(|hidden| hidden.room.contains(pos) || hidden.passage.contains(&pos))
    };

    let stranded = unreachable_walkable(&grid.tiles, start, sealed);
    match stranded.first() {
        None => Ok(()),
        Some(pos) => Err(DungeonError::GenerationFailed(format!(
            "{} walkable tiles unreachable from the start room, first at ({}, {})",
            stranded.len(),
            pos.x,
            pos.y
        ))),
    }
}

/// The boss room perimeter holds no void and has at least one entry.
pub fn validate_boss_perimeter(grid: &DungeonGrid) -> DungeonResult<()> {
    let boss = match grid.boss_room() {
        Some(room) => room,
        None => return Ok(()),
    };
    let ring = boss.perimeter();

    if let Some(pos) = ring
        .iter()
        .find(|pos| grid.get_tile(pos.x, pos.y) == crate::game::TileType::Void)
    {
        return Err(DungeonError::GenerationFailed(format!(
            "boss room perimeter breached at ({}, {})",
            pos.x, pos.y
        )));
    }

    if count_runs(&ring, |pos| grid.is_walkable(pos.x, pos.y)) == 0 {
        return Err(DungeonError::GenerationFailed(
            "boss room has no entry".to_string(),
        ));
    }
    Ok(())
}

/// Every wrap tunnel mouth is walkable from edge to edge.
pub fn validate_wrap_tunnels(grid: &DungeonGrid) -> DungeonResult<()> {
    for tunnel in &grid.wrap_tunnels {
        for mouth in tunnel.mouths(grid.width as i32, grid.height as i32) {
            if let Some(pos) = mouth
                .positions()
                .into_iter()
                .find(|pos| !grid.is_walkable(pos.x, pos.y))
            {
                return Err(DungeonError::GenerationFailed(format!(
                    "wrap tunnel at {} blocked at ({}, {})",
                    tunnel.position, pos.x, pos.y
                )));
            }
        }
    }
    Ok(())
}
