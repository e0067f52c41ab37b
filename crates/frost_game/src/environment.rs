//! Procedural winter environment: a one-shot, seed-reproducible scatter of
//! trees and ice blocks around the starting clearing.
//!
//! Generation is a pure function of the seed and tuning, so the same seed
//! lays out the same forest on every run. Positions inside the clearing
//! radius are redrawn; with the clearing strictly smaller than the field the
//! rejection loop terminates with probability 1 and in practice in a couple
//! of draws.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use frost_core::tuning::Tuning;

#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    pub position: Vec2,
    pub radius: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IceBlock {
    pub position: Vec2,
    pub size: f32,
    pub yaw_deg: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    pub trees: Vec<Tree>,
    pub ice_blocks: Vec<IceBlock>,
}

pub fn generate(seed: u64, tuning: &Tuning) -> Environment {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let trees = (0..tuning.tree_count)
        .map(|_| Tree {
            position: scatter_position(&mut rng, tuning),
            radius: rng.random_range(tuning.tree_radius_min..=tuning.tree_radius_max),
            height: rng.random_range(tuning.tree_height_min..=tuning.tree_height_max),
        })
        .collect();

    let ice_blocks = (0..tuning.ice_block_count)
        .map(|_| IceBlock {
            position: scatter_position(&mut rng, tuning),
            size: rng.random_range(tuning.ice_block_size_min..=tuning.ice_block_size_max),
            yaw_deg: rng.random_range(0.0..360.0),
        })
        .collect();

    let env = Environment { trees, ice_blocks };
    log::info!(
        "Environment seed {}: scattered {} trees and {} ice blocks",
        seed,
        env.trees.len(),
        env.ice_blocks.len()
    );
    env
}

fn scatter_position(rng: &mut ChaCha8Rng, tuning: &Tuning) -> Vec2 {
    let half = tuning.field_half_extent;
    loop {
        let candidate = Vec2::new(rng.random_range(-half..=half), rng.random_range(-half..=half));
        if candidate.length() >= tuning.clearing_radius {
            return candidate;
        }
    }
}
