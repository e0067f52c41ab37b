//! Actor locomotion and animation state.
//!
//! One `ActorState` instance is stepped once per fixed tick from an
//! `ActorIntent` snapshot. Heading and the two walk-cycle phases are plain
//! accumulators consumed only through periodic trig, so none of them are
//! normalized or wrapped. The caller guarantees `dt >= 0` (the fixed-timestep
//! clock always hands out non-negative slices).
//!
//! The sword slash is the one edge-triggered piece of state: the actor keeps
//! the previous tick's trigger level itself, so a held button starts exactly
//! one slash no matter how the frame loop samples input.

use glam::Vec2;

use crate::tuning::Tuning;

/// Desired motion for one tick. Opposing intents cancel deterministically:
/// forward+backward (or left+right) net to zero, and a net-zero tick counts
/// as standing still for phase-advance purposes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActorIntent {
    pub turn_left: bool,
    pub turn_right: bool,
    pub move_forward: bool,
    pub move_backward: bool,
    pub slash_held: bool,
}

impl ActorIntent {
    /// Signed movement input: +1 forward, -1 backward, 0 when idle or canceled.
    pub fn move_sign(&self) -> f32 {
        (self.move_forward as i8 - self.move_backward as i8) as f32
    }

    /// Signed turn input: +1 right, -1 left, 0 when idle or canceled.
    pub fn turn_sign(&self) -> f32 {
        (self.turn_right as i8 - self.turn_left as i8) as f32
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlashState {
    Idle,
    Slashing { elapsed: f32 },
}

#[derive(Debug, Clone)]
pub struct ActorState {
    /// World-plane position; the actor is ground-locked (y = 0).
    pub position: Vec2,
    /// Yaw in degrees. Heading 0 faces -Z; turning right increases it.
    pub heading_deg: f32,
    /// Accumulates only while moving; read through `sin` only.
    pub arm_swing_phase: f32,
    /// Accumulates only while moving; drives footstep emission timing.
    pub footstep_phase: f32,
    pub slash: SlashState,
    slash_was_held: bool,
}

impl ActorState {
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            heading_deg: 0.0,
            arm_swing_phase: 0.0,
            footstep_phase: 0.0,
            slash: SlashState::Idle,
            slash_was_held: false,
        }
    }

    /// Unit step direction for the current heading: `(sin h, -cos h)`, so
    /// heading 0 walks toward -Z and heading 90 toward +X.
    pub fn forward(&self) -> Vec2 {
        let h = self.heading_deg.to_radians();
        Vec2::new(h.sin(), -h.cos())
    }

    /// Unit vector to the actor's right, perpendicular to `forward()`.
    pub fn right(&self) -> Vec2 {
        let h = self.heading_deg.to_radians();
        Vec2::new(h.cos(), h.sin())
    }

    /// True when a net movement intent is active this tick.
    pub fn is_moving(intent: ActorIntent) -> bool {
        intent.move_sign() != 0.0
    }

    pub fn step(&mut self, intent: ActorIntent, dt: f32, tuning: &Tuning) {
        self.heading_deg += intent.turn_sign() * tuning.rotation_speed_deg * dt;

        let sign = intent.move_sign();
        if sign != 0.0 {
            self.position += self.forward() * tuning.move_speed * dt * sign;
            // Limb motion is tied strictly to locomotion; the phases freeze
            // the moment the actor stands still.
            self.arm_swing_phase += dt * tuning.swing_rate;
            self.footstep_phase += dt * tuning.footstep_rate;
        }

        let rising = intent.slash_held && !self.slash_was_held;
        self.slash_was_held = intent.slash_held;
        match &mut self.slash {
            SlashState::Idle => {
                if rising {
                    self.slash = SlashState::Slashing { elapsed: 0.0 };
                }
            }
            SlashState::Slashing { elapsed } => {
                // A rising edge mid-slash is ignored; the sweep neither
                // restarts nor extends.
                *elapsed += dt;
                if *elapsed >= tuning.slash_duration {
                    self.slash = SlashState::Idle;
                }
            }
        }
    }

    /// Walk-cycle arm deflection in degrees.
    pub fn arm_swing_angle_deg(&self, tuning: &Tuning) -> f32 {
        tuning.swing_amplitude_deg * self.arm_swing_phase.sin()
    }

    /// Extra sword deflection in degrees: a single sine hump over the slash
    /// duration, zero at both ends, peaking at the midpoint. Zero while idle.
    pub fn slash_extra_angle_deg(&self, tuning: &Tuning) -> f32 {
        match self.slash {
            SlashState::Idle => 0.0,
            SlashState::Slashing { elapsed } => {
                let t = elapsed / tuning.slash_duration;
                tuning.slash_max_angle_deg * (std::f32::consts::PI * t).sin()
            }
        }
    }
}

impl Default for ActorState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn step_for(actor: &mut ActorState, intent: ActorIntent, seconds: f32, tuning: &Tuning) {
        let steps = (seconds / DT).round() as u32;
        for _ in 0..steps {
            actor.step(intent, DT, tuning);
        }
    }

    #[test]
    fn idle_ticks_change_nothing() {
        let tuning = Tuning::default();
        let mut actor = ActorState::new();
        step_for(&mut actor, ActorIntent::default(), 3.0, &tuning);

        assert_eq!(actor.position, Vec2::ZERO);
        assert_eq!(actor.heading_deg, 0.0);
        assert_eq!(actor.arm_swing_phase, 0.0);
        assert_eq!(actor.footstep_phase, 0.0);
        assert_eq!(actor.slash, SlashState::Idle);
    }

    #[test]
    fn forward_at_heading_zero_walks_negative_z() {
        let tuning = Tuning {
            move_speed: 2.5,
            ..Tuning::default()
        };
        let mut actor = ActorState::new();
        let intent = ActorIntent {
            move_forward: true,
            ..Default::default()
        };
        step_for(&mut actor, intent, 2.0, &tuning);

        assert!(actor.position.x.abs() < 1e-4);
        assert!((actor.position.y - (-5.0)).abs() < 1e-3);
    }

    #[test]
    fn heading_ninety_walks_positive_x() {
        let tuning = Tuning::default();
        let mut actor = ActorState::new();
        actor.heading_deg = 90.0;
        let intent = ActorIntent {
            move_forward: true,
            ..Default::default()
        };
        step_for(&mut actor, intent, 1.0, &tuning);

        assert!((actor.position.x - tuning.move_speed).abs() < 1e-3);
        assert!(actor.position.y.abs() < 1e-4);
    }

    #[test]
    fn backward_negates_forward() {
        let tuning = Tuning::default();
        let mut actor = ActorState::new();
        let intent = ActorIntent {
            move_backward: true,
            ..Default::default()
        };
        step_for(&mut actor, intent, 1.0, &tuning);
        assert!((actor.position.y - tuning.move_speed).abs() < 1e-3);
    }

    #[test]
    fn turning_integrates_heading() {
        let tuning = Tuning {
            rotation_speed_deg: 120.0,
            ..Tuning::default()
        };
        let mut actor = ActorState::new();
        let right = ActorIntent {
            turn_right: true,
            ..Default::default()
        };
        step_for(&mut actor, right, 0.5, &tuning);
        assert!((actor.heading_deg - 60.0).abs() < 1e-3);

        let left = ActorIntent {
            turn_left: true,
            ..Default::default()
        };
        step_for(&mut actor, left, 1.0, &tuning);
        assert!((actor.heading_deg - (-60.0)).abs() < 1e-3);
    }

    #[test]
    fn opposing_intents_cancel() {
        let tuning = Tuning::default();
        let mut actor = ActorState::new();
        let intent = ActorIntent {
            move_forward: true,
            move_backward: true,
            turn_left: true,
            turn_right: true,
            ..Default::default()
        };
        step_for(&mut actor, intent, 2.0, &tuning);

        assert_eq!(actor.position, Vec2::ZERO);
        assert_eq!(actor.heading_deg, 0.0);
        // Canceled movement counts as standing still: phases stay frozen.
        assert_eq!(actor.arm_swing_phase, 0.0);
        assert_eq!(actor.footstep_phase, 0.0);
    }

    #[test]
    fn phases_advance_only_while_moving() {
        let tuning = Tuning::default();
        let mut actor = ActorState::new();

        // Turning in place passes time but is not locomotion.
        let turn_only = ActorIntent {
            turn_right: true,
            ..Default::default()
        };
        step_for(&mut actor, turn_only, 1.0, &tuning);
        assert_eq!(actor.arm_swing_phase, 0.0);
        assert_eq!(actor.footstep_phase, 0.0);

        let walk = ActorIntent {
            move_forward: true,
            ..Default::default()
        };
        step_for(&mut actor, walk, 1.0, &tuning);
        assert!((actor.arm_swing_phase - tuning.swing_rate).abs() < 1e-3);
        assert!((actor.footstep_phase - tuning.footstep_rate).abs() < 1e-3);

        // Stopping freezes both phases exactly where they were.
        let frozen_swing = actor.arm_swing_phase;
        let frozen_step = actor.footstep_phase;
        step_for(&mut actor, ActorIntent::default(), 1.0, &tuning);
        assert_eq!(actor.arm_swing_phase, frozen_swing);
        assert_eq!(actor.footstep_phase, frozen_step);
    }

    #[test]
    fn walking_backward_also_animates() {
        let tuning = Tuning::default();
        let mut actor = ActorState::new();
        let intent = ActorIntent {
            move_backward: true,
            ..Default::default()
        };
        step_for(&mut actor, intent, 0.5, &tuning);
        assert!(actor.arm_swing_phase > 0.0);
    }

    #[test]
    fn swing_angle_follows_sine_of_phase() {
        let tuning = Tuning::default();
        let mut actor = ActorState::new();
        actor.arm_swing_phase = std::f32::consts::FRAC_PI_2;
        assert!((actor.arm_swing_angle_deg(&tuning) - tuning.swing_amplitude_deg).abs() < 1e-4);
    }

    #[test]
    fn slash_starts_on_rising_edge_only() {
        let tuning = Tuning::default();
        let mut actor = ActorState::new();

        let held = ActorIntent {
            slash_held: true,
            ..Default::default()
        };
        actor.step(held, DT, &tuning);
        assert!(matches!(actor.slash, SlashState::Slashing { .. }));

        // Holding through the whole sweep must not chain a second slash.
        step_for(&mut actor, held, 1.0, &tuning);
        assert_eq!(actor.slash, SlashState::Idle);

        // Release, then press again: a fresh edge starts a fresh slash.
        actor.step(ActorIntent::default(), DT, &tuning);
        actor.step(held, DT, &tuning);
        assert!(matches!(actor.slash, SlashState::Slashing { .. }));
    }

    #[test]
    fn retrigger_during_slash_does_not_restart() {
        let tuning = Tuning::default();
        let mut actor = ActorState::new();

        let held = ActorIntent {
            slash_held: true,
            ..Default::default()
        };
        actor.step(held, DT, &tuning);
        // Advance partway with the trigger released.
        step_for(&mut actor, ActorIntent::default(), 0.1, &tuning);
        let before = match actor.slash {
            SlashState::Slashing { elapsed } => elapsed,
            SlashState::Idle => panic!("slash should still be running"),
        };

        // Press again mid-slash: elapsed keeps counting from where it was.
        actor.step(held, DT, &tuning);
        match actor.slash {
            SlashState::Slashing { elapsed } => {
                assert!((elapsed - (before + DT)).abs() < 1e-5);
            }
            SlashState::Idle => panic!("retrigger must not end the slash"),
        }
    }

    #[test]
    fn slash_peaks_at_midpoint_and_ends_at_duration() {
        let tuning = Tuning {
            slash_duration: 0.35,
            slash_max_angle_deg: 100.0,
            ..Tuning::default()
        };
        let mut actor = ActorState::new();
        let held = ActorIntent {
            slash_held: true,
            ..Default::default()
        };
        actor.step(held, DT, &tuning);

        // Drive elapsed to exactly the midpoint.
        actor.slash = SlashState::Slashing { elapsed: 0.175 };
        assert!((actor.slash_extra_angle_deg(&tuning) - 100.0).abs() < 1e-3);

        // One step that carries elapsed past the duration returns to Idle,
        // where the extra angle is exactly zero again.
        actor.slash = SlashState::Slashing { elapsed: 0.34 };
        actor.step(ActorIntent::default(), 0.02, &tuning);
        assert_eq!(actor.slash, SlashState::Idle);
        assert_eq!(actor.slash_extra_angle_deg(&tuning), 0.0);
    }

    #[test]
    fn zero_dt_step_is_a_no_op_for_motion() {
        let tuning = Tuning::default();
        let mut actor = ActorState::new();
        let intent = ActorIntent {
            move_forward: true,
            turn_right: true,
            ..Default::default()
        };
        actor.step(intent, 0.0, &tuning);
        assert_eq!(actor.position, Vec2::ZERO);
        assert_eq!(actor.heading_deg, 0.0);
    }

    #[test]
    fn forward_and_right_are_perpendicular() {
        let mut actor = ActorState::new();
        for heading in [0.0f32, 37.0, 90.0, 210.0, -45.0] {
            actor.heading_deg = heading;
            assert!(actor.forward().dot(actor.right()).abs() < 1e-5);
            assert!((actor.forward().length() - 1.0).abs() < 1e-5);
        }
    }
}
