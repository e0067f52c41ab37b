//! Build-time gameplay and scene constants.
//!
//! Everything tunable lives in one struct threaded through update and compose
//! calls. There is no runtime config file; `Default` is the shipped tuning and
//! `validate()` runs once at startup. Division by any of these sizes or
//! durations happens throughout the simulation, so a non-positive constant is
//! a fatal configuration error, not something to detect per tick.

#[derive(Debug, Clone)]
pub struct Tuning {
    // --- Locomotion ---------------------------------------------------------
    /// World units per second while walking.
    pub move_speed: f32,
    /// Heading change in degrees per second while turning.
    pub rotation_speed_deg: f32,

    // --- Walk-cycle animation ----------------------------------------------
    /// Peak arm deflection in degrees.
    pub swing_amplitude_deg: f32,
    /// Arm-swing phase advance per second of movement.
    pub swing_rate: f32,

    // --- Footstep particles -------------------------------------------------
    /// Footstep phase advance per second of movement.
    pub footstep_rate: f32,
    /// Emission fires on an upward crossing of `sin(pi * phase)` through this.
    pub footstep_threshold: f32,
    /// Sideways distance from the actor's centerline to each footprint.
    pub footstep_lateral_offset: f32,
    /// Footprint lifetime band, seconds.
    pub footstep_lifetime_min: f32,
    pub footstep_lifetime_max: f32,
    /// Upward drift of a footprint in units per second.
    pub footstep_drift_rate: f32,

    // --- Sword slash --------------------------------------------------------
    pub slash_duration: f32,
    pub slash_max_angle_deg: f32,
    pub sword_enabled: bool,

    // --- Ground tiling ------------------------------------------------------
    /// Edge length of one repeating ground tile.
    pub tile_size: f32,
    /// Checker cells along one tile edge.
    pub tile_strips: u32,
    /// Tiles per side of the grid recentered around the actor. Must be odd so
    /// the actor's own tile sits in the middle.
    pub tile_repeat: u32,

    // --- Environment scatter ------------------------------------------------
    pub tree_count: usize,
    pub ice_block_count: usize,
    /// Half edge length of the square scatter region.
    pub field_half_extent: f32,
    /// No obstacle spawns within this radius of the origin.
    pub clearing_radius: f32,
    pub tree_radius_min: f32,
    pub tree_radius_max: f32,
    pub tree_height_min: f32,
    pub tree_height_max: f32,
    pub ice_block_size_min: f32,
    pub ice_block_size_max: f32,

    // --- Snowman proportions ------------------------------------------------
    pub base_size: f32,
    pub torso_size: f32,
    pub head_size: f32,
    /// Vertical overlap where stacked cubes sink into each other.
    pub stack_overlap: f32,
    pub arm_length: f32,
    pub arm_radius: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            move_speed: 2.5,
            rotation_speed_deg: 120.0,

            swing_amplitude_deg: 28.0,
            swing_rate: 7.0,

            footstep_rate: 3.0,
            footstep_threshold: 0.45,
            footstep_lateral_offset: 0.35,
            footstep_lifetime_min: 0.84,
            footstep_lifetime_max: 0.96,
            footstep_drift_rate: 0.25,

            slash_duration: 0.35,
            slash_max_angle_deg: 100.0,
            sword_enabled: true,

            tile_size: 13.0,
            tile_strips: 18,
            tile_repeat: 3,

            tree_count: 24,
            ice_block_count: 8,
            field_half_extent: 40.0,
            clearing_radius: 6.0,
            tree_radius_min: 0.35,
            tree_radius_max: 0.8,
            tree_height_min: 1.8,
            tree_height_max: 3.6,
            ice_block_size_min: 0.6,
            ice_block_size_max: 1.4,

            base_size: 2.0,
            torso_size: 1.5,
            head_size: 1.1,
            stack_overlap: 0.12,
            arm_length: 1.25,
            arm_radius: 0.09,
        }
    }
}

impl Tuning {
    pub fn validate(&self) -> Result<(), String> {
        let positives: &[(&str, f32)] = &[
            ("move_speed", self.move_speed),
            ("rotation_speed_deg", self.rotation_speed_deg),
            ("swing_amplitude_deg", self.swing_amplitude_deg),
            ("swing_rate", self.swing_rate),
            ("footstep_rate", self.footstep_rate),
            ("footstep_lateral_offset", self.footstep_lateral_offset),
            ("footstep_lifetime_min", self.footstep_lifetime_min),
            ("footstep_lifetime_max", self.footstep_lifetime_max),
            ("slash_duration", self.slash_duration),
            ("slash_max_angle_deg", self.slash_max_angle_deg),
            ("tile_size", self.tile_size),
            ("field_half_extent", self.field_half_extent),
            ("clearing_radius", self.clearing_radius),
            ("tree_radius_min", self.tree_radius_min),
            ("tree_radius_max", self.tree_radius_max),
            ("tree_height_min", self.tree_height_min),
            ("tree_height_max", self.tree_height_max),
            ("ice_block_size_min", self.ice_block_size_min),
            ("ice_block_size_max", self.ice_block_size_max),
            ("base_size", self.base_size),
            ("torso_size", self.torso_size),
            ("head_size", self.head_size),
            ("arm_length", self.arm_length),
            ("arm_radius", self.arm_radius),
        ];
        for &(name, value) in positives {
            if value <= 0.0 {
                return Err(format!(
                    "Tuning validation failed: {name} must be > 0 (got {value})"
                ));
            }
        }

        if self.footstep_drift_rate < 0.0 {
            return Err(format!(
                "Tuning validation failed: footstep_drift_rate must be >= 0 (got {})",
                self.footstep_drift_rate
            ));
        }
        if !(self.footstep_threshold > 0.0 && self.footstep_threshold < 1.0) {
            return Err(format!(
                "Tuning validation failed: footstep_threshold must lie in (0, 1) (got {})",
                self.footstep_threshold
            ));
        }

        let bands: &[(&str, f32, f32)] = &[
            (
                "footstep_lifetime",
                self.footstep_lifetime_min,
                self.footstep_lifetime_max,
            ),
            ("tree_radius", self.tree_radius_min, self.tree_radius_max),
            ("tree_height", self.tree_height_min, self.tree_height_max),
            (
                "ice_block_size",
                self.ice_block_size_min,
                self.ice_block_size_max,
            ),
        ];
        for &(name, min, max) in bands {
            if min > max {
                return Err(format!(
                    "Tuning validation failed: {name} band is inverted ({min} > {max})"
                ));
            }
        }

        if self.tile_strips == 0 {
            return Err("Tuning validation failed: tile_strips must be > 0".to_string());
        }
        if self.tile_repeat == 0 || self.tile_repeat % 2 == 0 {
            return Err(format!(
                "Tuning validation failed: tile_repeat must be odd and > 0 (got {})",
                self.tile_repeat
            ));
        }
        if self.clearing_radius >= self.field_half_extent {
            return Err(format!(
                "Tuning validation failed: clearing_radius ({}) must be smaller than field_half_extent ({})",
                self.clearing_radius, self.field_half_extent
            ));
        }

        Ok(())
    }
}
