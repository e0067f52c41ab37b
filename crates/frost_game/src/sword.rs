//! The diamond sword voxel sprite, kept as a static data asset.
//!
//! A 17x17 grid of palette indices, extruded `THICKNESS` cells deep; every
//! filled cell becomes one small cube. Offsets are expressed relative to the
//! grip cell so the sprite can be parented straight onto the branch tip
//! without per-draw recentering math.

use glam::Vec3;

pub const SPRITE_SIZE: usize = 17;
pub const THICKNESS: usize = 2;
/// Edge length of one voxel cell in world units.
pub const VOXEL_SIZE: f32 = 0.14;
/// Cell the hand holds; the sprite is positioned so this cell lands on the
/// attachment point.
pub const GRIP_CELL: (usize, usize) = (4, 14);

/// Palette indices: 0 = empty, 1 = teal-black edge, 2 = diamond blue,
/// 3 = brown handle, 4 = pale diamond.
const SPRITE: [[u8; SPRITE_SIZE]; SPRITE_SIZE] = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 2, 4, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 2, 4, 2, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 2, 4, 2, 1, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 2, 4, 2, 1, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 2, 4, 2, 1, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 1, 2, 4, 2, 1, 0, 0, 0, 0],
    [0, 0, 1, 1, 0, 0, 0, 1, 2, 4, 2, 1, 0, 0, 0, 0, 0],
    [0, 0, 1, 4, 1, 0, 1, 2, 4, 2, 1, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 1, 4, 1, 2, 4, 2, 1, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 1, 4, 1, 4, 2, 1, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 1, 4, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 3, 3, 1, 4, 4, 1, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 3, 3, 3, 0, 1, 1, 4, 1, 0, 0, 0, 0, 0, 0, 0],
    [1, 1, 3, 3, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0, 0],
    [1, 4, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
];

/// RGB per palette index; index 0 is never drawn.
const PALETTE: [[f32; 3]; 5] = [
    [0.0, 0.0, 0.0],
    [0.07, 0.26, 0.26],
    [0.23, 0.98, 0.91],
    [0.45, 0.32, 0.11],
    [0.1608, 0.7725, 0.6588],
];

#[derive(Debug, Clone, Copy)]
pub struct SwordVoxel {
    /// Cube center relative to the grip cell, in world units.
    pub offset: Vec3,
    pub color: [f32; 3],
}

/// Filled cells in the base 17x17 bitmap (one layer).
pub fn filled_cell_count() -> usize {
    SPRITE
        .iter()
        .flatten()
        .filter(|&&cell| cell != 0)
        .count()
}

/// Expand the bitmap into voxel cubes, `THICKNESS` layers deep.
pub fn voxels() -> Vec<SwordVoxel> {
    let grip = Vec3::new(
        GRIP_CELL.0 as f32,
        GRIP_CELL.1 as f32,
        (THICKNESS as f32 - 1.0) / 2.0,
    );
    let mut out = Vec::with_capacity(filled_cell_count() * THICKNESS);
    for (y, row) in SPRITE.iter().enumerate() {
        for (x, &cell) in row.iter().enumerate() {
            if cell == 0 {
                continue;
            }
            for z in 0..THICKNESS {
                let cell_pos = Vec3::new(x as f32, y as f32, z as f32);
                out.push(SwordVoxel {
                    offset: (cell_pos - grip) * VOXEL_SIZE,
                    color: PALETTE[cell as usize],
                });
            }
        }
    }
    out
}
