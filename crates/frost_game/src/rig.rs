//! Scene composer: turns simulation state into an ordered list of draw
//! commands with resolved world transforms.
//!
//! Every part of the snowman hangs off one root transform (translate to the
//! actor, then yaw), so walking and turning move the whole rig coherently.
//! Local-to-parent transforms are composed into world space in a single pass
//! here; nothing downstream needs a matrix stack.
//!
//! Emission order doubles as draw order: opaque geometry first (ground,
//! trees, snowman), translucent geometry last (ice blocks, footprints) so
//! alpha blending composites over a finished opaque scene.

use glam::{Mat4, Vec2, Vec3};

use frost_core::actor::ActorState;
use frost_core::footsteps::Footprint;
use frost_core::tuning::Tuning;

use crate::environment::Environment;
use crate::sword;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Cuboid { half_extents: Vec3 },
    WireCuboid { half_extents: Vec3 },
    Sphere { radius: f32 },
    Cylinder { base_radius: f32, top_radius: f32, height: f32 },
    Disk { radius: f32 },
    Cube { size: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub shape: Shape,
    pub transform: Mat4,
    pub color: [f32; 4],
}

const SNOW: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const SNOW_WIRE: [f32; 4] = [0.9, 0.9, 0.9, 1.0];
const EYE_BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
const CARROT_ORANGE: [f32; 4] = [1.0, 0.55, 0.1, 1.0];
const WOOD_BROWN: [f32; 4] = [0.45, 0.29, 0.1, 1.0];
const HAT_BLACK: [f32; 4] = [0.07, 0.07, 0.07, 1.0];
const ICE_WHITE: [f32; 4] = [0.87, 0.93, 0.97, 1.0];
const ICE_BLUE: [f32; 4] = [0.66, 0.88, 1.0, 1.0];
const ICE_BLOCK_FILL: [f32; 4] = [0.66, 0.88, 1.0, 0.55];
const TRUNK_BROWN: [f32; 4] = [0.36, 0.23, 0.10, 1.0];
const PINE_GREEN: [f32; 4] = [0.10, 0.42, 0.18, 1.0];
const FOOTPRINT_SNOW: [f32; 3] = [0.97, 0.99, 1.0];

/// Full-size epsilon added to wire overlays to dodge z-fighting.
const WIRE_EPSILON: f32 = 0.001;
const GROUND_HALF_THICKNESS: f32 = 0.01;
const FOOTPRINT_RADIUS: f32 = 0.12;

pub fn compose(
    actor: &ActorState,
    particles: &[Footprint],
    environment: &Environment,
    tuning: &Tuning,
) -> Vec<DrawCommand> {
    let mut out = Vec::new();
    ground_commands(&mut out, actor, tuning);
    tree_commands(&mut out, environment);
    snowman_commands(&mut out, actor, tuning);
    ice_block_commands(&mut out, environment);
    footprint_commands(&mut out, particles);
    out
}

/// Index of the ground tile nearest a world position.
pub fn nearest_tile(position: Vec2, tile_size: f32) -> (i32, i32) {
    (
        (position.x / tile_size).round() as i32,
        (position.y / tile_size).round() as i32,
    )
}

/// Root transform of the snowman rig. The sculpted model faces +Z while
/// heading 0 walks toward -Z, hence the half-turn baked into the yaw.
pub fn root_transform(actor: &ActorState) -> Mat4 {
    let heading = actor.heading_deg.to_radians();
    Mat4::from_translation(Vec3::new(actor.position.x, 0.0, actor.position.y))
        * Mat4::from_rotation_y(std::f32::consts::PI - heading)
}

/// Endless-ground illusion: a fixed grid of checkerboard tiles recentered on
/// whichever tile the actor currently occupies.
pub fn ground_commands(out: &mut Vec<DrawCommand>, actor: &ActorState, tuning: &Tuning) {
    let (tile_x, tile_z) = nearest_tile(actor.position, tuning.tile_size);
    let reach = (tuning.tile_repeat / 2) as i32;
    let strips = tuning.tile_strips as i32;
    let cell = tuning.tile_size / strips as f32;

    for tx in (tile_x - reach)..=(tile_x + reach) {
        for tz in (tile_z - reach)..=(tile_z + reach) {
            let tint = tile_tint(tx, tz);
            let corner_x = tx as f32 * tuning.tile_size - tuning.tile_size / 2.0;
            let corner_z = tz as f32 * tuning.tile_size - tuning.tile_size / 2.0;
            for cx in 0..strips {
                for cz in 0..strips {
                    let base = if (cx + cz) % 2 == 0 { ICE_WHITE } else { ICE_BLUE };
                    let center = Vec3::new(
                        corner_x + (cx as f32 + 0.5) * cell,
                        -GROUND_HALF_THICKNESS,
                        corner_z + (cz as f32 + 0.5) * cell,
                    );
                    out.push(DrawCommand {
                        shape: Shape::Cuboid {
                            half_extents: Vec3::new(cell / 2.0, GROUND_HALF_THICKNESS, cell / 2.0),
                        },
                        transform: Mat4::from_translation(center),
                        color: [base[0] * tint, base[1] * tint, base[2] * tint, 1.0],
                    });
                }
            }
        }
    }
}

/// Deterministic per-tile brightness in [0.96, 1.0], breaking up the exact
/// repetition of the checker pattern across tiles.
fn tile_tint(tx: i32, tz: i32) -> f32 {
    let mut h = (tx as u32).wrapping_mul(0x9E37_79B9) ^ (tz as u32).wrapping_mul(0x85EB_CA6B);
    h ^= h >> 16;
    h = h.wrapping_mul(0x045D_9F3B);
    h ^= h >> 16;
    0.96 + (h % 1024) as f32 / 1024.0 * 0.04
}

pub fn snowman_commands(out: &mut Vec<DrawCommand>, actor: &ActorState, tuning: &Tuning) {
    let root = root_transform(actor);
    let base = tuning.base_size;
    let torso = tuning.torso_size;
    let head = tuning.head_size;
    let overlap = tuning.stack_overlap;

    let torso_y = base + torso / 2.0 - overlap;
    let head_y = base + torso - 2.0 * overlap + head / 2.0;

    snow_cube(out, root, Vec3::new(0.0, base / 2.0, 0.0), base);
    snow_cube(out, root, Vec3::new(0.0, torso_y, 0.0), torso);
    snow_cube(out, root, Vec3::new(0.0, head_y, 0.0), head);

    // Eyes sit on the front face, mirrored about the centerline.
    for side in [-1.0f32, 1.0] {
        out.push(DrawCommand {
            shape: Shape::Sphere {
                radius: 0.08 * head,
            },
            transform: root
                * Mat4::from_translation(Vec3::new(
                    side * 0.21 * head,
                    head_y + 0.18 * head,
                    head / 2.0 + 0.01,
                )),
            color: EYE_BLACK,
        });
    }

    // Carrot nose, a cone pointing out of the face along +Z.
    out.push(DrawCommand {
        shape: Shape::Cylinder {
            base_radius: 0.10,
            top_radius: 0.0,
            height: 0.43,
        },
        transform: root * Mat4::from_translation(Vec3::new(0.0, head_y, head / 2.0)),
        color: CARROT_ORANGE,
    });

    // Arms: point the branch down, rotate it outward, then apply the live
    // walk swing. The right arm mirrors the left through a negative Z scale.
    let arm_y = base + torso * 0.5 - 0.05;
    let arm_x = torso / 2.0 + 0.01;
    let swing = actor.arm_swing_angle_deg(tuning);

    let left_arm = root
        * Mat4::from_translation(Vec3::new(-arm_x, arm_y, 0.0))
        * Mat4::from_rotation_x(90f32.to_radians())
        * Mat4::from_axis_angle(Vec3::new(-3.0, -3.0, -2.0).normalize(), 90f32.to_radians())
        * Mat4::from_rotation_x(swing.to_radians());
    branch_commands(out, left_arm, tuning.arm_length, tuning.arm_radius);

    let right_arm = root
        * Mat4::from_translation(Vec3::new(arm_x, arm_y, 0.0))
        * Mat4::from_rotation_x(-90f32.to_radians())
        * Mat4::from_axis_angle(Vec3::new(-3.0, 3.0, 2.0).normalize(), -90f32.to_radians())
        * Mat4::from_rotation_x(-swing.to_radians())
        * Mat4::from_scale(Vec3::new(1.0, 1.0, -1.0));
    if tuning.sword_enabled {
        sword_commands(out, right_arm, actor, tuning);
    }
    branch_commands(out, right_arm, tuning.arm_length, tuning.arm_radius);

    // Top hat: flat wide brim, tall narrow top.
    let brim_height = head * 0.07;
    let top_height = head * 0.62;
    let brim_y = head_y + head / 2.0 + 0.01;
    let stand_up = Mat4::from_rotation_x(-90f32.to_radians());
    out.push(DrawCommand {
        shape: Shape::Cylinder {
            base_radius: head * 0.56,
            top_radius: head * 0.56,
            height: brim_height,
        },
        transform: root * Mat4::from_translation(Vec3::new(0.0, brim_y, 0.0)) * stand_up,
        color: HAT_BLACK,
    });
    out.push(DrawCommand {
        shape: Shape::Cylinder {
            base_radius: head * 0.32,
            top_radius: head * 0.32,
            height: top_height,
        },
        transform: root * Mat4::from_translation(Vec3::new(0.0, brim_y + brim_height, 0.0))
            * stand_up,
        color: HAT_BLACK,
    });
}

/// White faces with a slightly oversized gray wire overlay for the faceted
/// snow-cube look.
fn snow_cube(out: &mut Vec<DrawCommand>, root: Mat4, center: Vec3, size: f32) {
    let transform = root * Mat4::from_translation(center);
    out.push(DrawCommand {
        shape: Shape::Cuboid {
            half_extents: Vec3::splat(size / 2.0),
        },
        transform,
        color: SNOW,
    });
    out.push(DrawCommand {
        shape: Shape::WireCuboid {
            half_extents: Vec3::splat((size + WIRE_EPSILON) / 2.0),
        },
        transform,
        color: SNOW_WIRE,
    });
}

/// One branch arm: tapered main limb plus two child twigs partway along it.
fn branch_commands(out: &mut Vec<DrawCommand>, transform: Mat4, length: f32, radius: f32) {
    out.push(DrawCommand {
        shape: Shape::Cylinder {
            base_radius: radius,
            top_radius: radius * 0.8,
            height: length,
        },
        transform,
        color: WOOD_BROWN,
    });

    out.push(DrawCommand {
        shape: Shape::Cylinder {
            base_radius: radius * 0.3,
            top_radius: radius * 0.2,
            height: length * 0.25,
        },
        transform: transform
            * Mat4::from_translation(Vec3::new(0.0, 0.0, length * 0.75))
            * Mat4::from_rotation_x(-40f32.to_radians()),
        color: WOOD_BROWN,
    });

    out.push(DrawCommand {
        shape: Shape::Cylinder {
            base_radius: radius * 0.2,
            top_radius: radius * 0.08,
            height: length * 0.22,
        },
        transform: transform
            * Mat4::from_translation(Vec3::new(0.0, 0.0, length * 0.55))
            * Mat4::from_rotation_x(45f32.to_radians()),
        color: WOOD_BROWN,
    });
}

/// Voxel-sprite sword at the branch tip. The blade hangs at the classic -40
/// degree tilt; an active slash sweeps it further around the branch's long
/// axis by the actor's transient slash angle.
fn sword_commands(out: &mut Vec<DrawCommand>, arm: Mat4, actor: &ActorState, tuning: &Tuning) {
    let tilt_deg = -40.0 - actor.slash_extra_angle_deg(tuning);
    let attach = arm
        * Mat4::from_translation(Vec3::new(0.0, 0.0, tuning.arm_length * 0.88))
        * Mat4::from_rotation_z(tilt_deg.to_radians());

    for voxel in sword::voxels() {
        out.push(DrawCommand {
            shape: Shape::Cube {
                size: sword::VOXEL_SIZE * 0.98,
            },
            transform: attach * Mat4::from_translation(voxel.offset),
            color: [voxel.color[0], voxel.color[1], voxel.color[2], 1.0],
        });
    }
}

pub fn tree_commands(out: &mut Vec<DrawCommand>, environment: &Environment) {
    let stand_up = Mat4::from_rotation_x(-90f32.to_radians());
    for tree in &environment.trees {
        let at = |y: f32| {
            Mat4::from_translation(Vec3::new(tree.position.x, y, tree.position.y)) * stand_up
        };
        let trunk_height = tree.height * 0.3;
        out.push(DrawCommand {
            shape: Shape::Cylinder {
                base_radius: tree.radius * 0.3,
                top_radius: tree.radius * 0.25,
                height: trunk_height,
            },
            transform: at(0.0),
            color: TRUNK_BROWN,
        });
        out.push(DrawCommand {
            shape: Shape::Cylinder {
                base_radius: tree.radius,
                top_radius: 0.0,
                height: tree.height - trunk_height,
            },
            transform: at(trunk_height),
            color: PINE_GREEN,
        });
    }
}

pub fn ice_block_commands(out: &mut Vec<DrawCommand>, environment: &Environment) {
    for block in &environment.ice_blocks {
        let transform = Mat4::from_translation(Vec3::new(
            block.position.x,
            block.size / 2.0,
            block.position.y,
        )) * Mat4::from_rotation_y(block.yaw_deg.to_radians());
        out.push(DrawCommand {
            shape: Shape::Cuboid {
                half_extents: Vec3::splat(block.size / 2.0),
            },
            transform,
            color: ICE_BLOCK_FILL,
        });
        out.push(DrawCommand {
            shape: Shape::WireCuboid {
                half_extents: Vec3::splat((block.size + WIRE_EPSILON) / 2.0),
            },
            transform,
            color: ICE_WHITE,
        });
    }
}

pub fn footprint_commands(out: &mut Vec<DrawCommand>, particles: &[Footprint]) {
    let lie_flat = Mat4::from_rotation_x(-90f32.to_radians());
    for particle in particles {
        // Nudged just above the ground plane so the disk never z-fights it.
        let lifted = particle.position + Vec3::Y * 0.01;
        out.push(DrawCommand {
            shape: Shape::Disk {
                radius: FOOTPRINT_RADIUS,
            },
            transform: Mat4::from_translation(lifted) * lie_flat,
            color: [
                FOOTPRINT_SNOW[0],
                FOOTPRINT_SNOW[1],
                FOOTPRINT_SNOW[2],
                particle.alpha(),
            ],
        });
    }
}
