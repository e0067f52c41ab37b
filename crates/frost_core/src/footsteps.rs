//! Footstep particle system: short-lived snow puffs stamped by the walk cycle.
//!
//! Emission treats `sin(pi * footstep_phase)` as a periodic step signal and
//! fires on each upward crossing of a threshold, alternating left/right foot.
//! The phase only advances while the actor moves, so the detector needs no
//! extra gating to stay quiet when standing still; the `moving` flag is still
//! required so a crossing can never fire off a stale sample on the tick
//! movement resumes.
//!
//! Particles are aged and pruned the same tick they expire. There is no
//! population cap: spawn rate and lifetime are both bounded constants, so the
//! steady-state count is bounded by their product.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::actor::ActorState;
use crate::tuning::Tuning;

#[derive(Debug, Clone)]
pub struct Footprint {
    pub position: Vec3,
    pub age: f32,
    pub lifetime: f32,
}

impl Footprint {
    /// Fade factor in `[0, 1]`, monotonically decreasing over the lifetime.
    pub fn alpha(&self) -> f32 {
        (1.0 - self.age / self.lifetime).max(0.0)
    }
}

pub struct FootstepSystem {
    particles: Vec<Footprint>,
    prev_signal: f32,
    last_foot_left: bool,
    rng: ChaCha8Rng,
}

impl FootstepSystem {
    /// Lifetime jitter is drawn from a seeded stream so a replay of the same
    /// inputs reproduces the same particle field.
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            prev_signal: 0.0,
            last_foot_left: false,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// One fixed tick: age and prune existing particles, then emit a new one
    /// if the walk-cycle signal crossed the threshold this tick.
    pub fn update(&mut self, actor: &ActorState, moving: bool, dt: f32, tuning: &Tuning) {
        for p in &mut self.particles {
            p.age += dt;
            p.position.y += dt * tuning.footstep_drift_rate;
        }
        self.particles.retain(|p| p.age <= p.lifetime);

        let signal = (std::f32::consts::PI * actor.footstep_phase).sin();
        let crossed =
            self.prev_signal <= tuning.footstep_threshold && signal > tuning.footstep_threshold;
        if moving && crossed {
            self.emit(actor, tuning);
        }
        self.prev_signal = signal;
    }

    fn emit(&mut self, actor: &ActorState, tuning: &Tuning) {
        self.last_foot_left = !self.last_foot_left;
        let side = if self.last_foot_left { -1.0 } else { 1.0 };
        let spot = actor.position + actor.right() * (side * tuning.footstep_lateral_offset);

        let lifetime = self
            .rng
            .random_range(tuning.footstep_lifetime_min..=tuning.footstep_lifetime_max);
        self.particles.push(Footprint {
            position: Vec3::new(spot.x, 0.0, spot.y),
            age: 0.0,
            lifetime,
        });
    }

    pub fn live_particles(&self) -> &[Footprint] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorIntent;

    const DT: f32 = 1.0 / 60.0;

    fn walking_intent() -> ActorIntent {
        ActorIntent {
            move_forward: true,
            ..Default::default()
        }
    }

    /// Drive actor and footsteps together for `steps` fixed ticks, counting
    /// emissions and recording spawn positions.
    fn walk(
        actor: &mut ActorState,
        system: &mut FootstepSystem,
        steps: u32,
        tuning: &Tuning,
    ) -> Vec<Vec3> {
        let mut spawned = Vec::new();
        for _ in 0..steps {
            let before = system.len();
            actor.step(walking_intent(), DT, tuning);
            system.update(actor, true, DT, tuning);
            if system.len() > before {
                spawned.push(system.live_particles().last().unwrap().position);
            }
        }
        spawned
    }

    #[test]
    fn two_emissions_per_gait_cycle_alternating_sides() {
        let tuning = Tuning::default();
        let mut actor = ActorState::new();
        let mut system = FootstepSystem::new(7);

        // One full gait cycle (left + right) spans two signal periods of
        // sin(pi * phase), i.e. a phase advance of 4.
        let cycle_seconds = 4.0 / tuning.footstep_rate;
        let steps = (cycle_seconds / DT).round() as u32;
        let spawned = walk(&mut actor, &mut system, steps, &tuning);

        assert_eq!(spawned.len(), 2, "one step per foot per gait cycle");

        // The two footprints land on opposite sides of the path. Walking
        // along -Z, sides separate in x.
        assert!(spawned[0].x * spawned[1].x < 0.0);
        assert!(
            (spawned[0].x.abs() - tuning.footstep_lateral_offset).abs() < 1e-4,
            "lateral offset should match tuning"
        );
    }

    #[test]
    fn emission_rate_is_stable_over_many_cycles() {
        let tuning = Tuning::default();
        let mut actor = ActorState::new();
        let mut system = FootstepSystem::new(7);

        let cycles = 6;
        let steps = (cycles as f32 * 4.0 / tuning.footstep_rate / DT).round() as u32;
        let spawned = walk(&mut actor, &mut system, steps, &tuning);
        assert_eq!(spawned.len(), cycles * 2);
    }

    #[test]
    fn no_emission_while_standing_still() {
        let tuning = Tuning::default();
        let actor = ActorState::new();
        let mut system = FootstepSystem::new(7);

        for _ in 0..240 {
            system.update(&actor, false, DT, &tuning);
        }
        assert!(system.is_empty());
    }

    #[test]
    fn particle_lives_exactly_its_lifetime() {
        // Pin the lifetime band so expiry timing is exact.
        let tuning = Tuning {
            footstep_lifetime_min: 0.5,
            footstep_lifetime_max: 0.5,
            ..Tuning::default()
        };
        let mut actor = ActorState::new();
        let mut system = FootstepSystem::new(7);

        // Walk just long enough to get the first footprint out.
        let mut steps_until_spawn = 0;
        while system.is_empty() {
            actor.step(walking_intent(), DT, &tuning);
            system.update(&actor, true, DT, &tuning);
            steps_until_spawn += 1;
            assert!(steps_until_spawn < 600, "first footstep never fired");
        }

        // Stand still and age it out. Present while age <= lifetime, gone the
        // first tick age exceeds it.
        let idle = ActorState::new();
        let mut last_alpha = f32::INFINITY;
        loop {
            let p = &system.live_particles()[0];
            assert!(p.age <= p.lifetime);
            let alpha = p.alpha();
            assert!(alpha < last_alpha, "alpha must decrease monotonically");
            assert!((0.0..=1.0).contains(&alpha));
            last_alpha = alpha;

            let age_after = p.age + DT;
            let lifetime = p.lifetime;
            system.update(&idle, false, DT, &tuning);
            if age_after > lifetime {
                assert!(system.is_empty(), "expired particle must prune same tick");
                break;
            }
        }
    }

    #[test]
    fn particles_drift_upward_as_they_age() {
        let tuning = Tuning {
            footstep_lifetime_min: 1.0,
            footstep_lifetime_max: 1.0,
            ..Tuning::default()
        };
        let mut actor = ActorState::new();
        let mut system = FootstepSystem::new(7);
        while system.is_empty() {
            actor.step(walking_intent(), DT, &tuning);
            system.update(&actor, true, DT, &tuning);
        }
        let y0 = system.live_particles()[0].position.y;
        assert_eq!(y0, 0.0, "footprints spawn on the ground");

        let idle = ActorState::new();
        for _ in 0..12 {
            system.update(&idle, false, DT, &tuning);
        }
        let y1 = system.live_particles()[0].position.y;
        assert!((y1 - 12.0 * DT * tuning.footstep_drift_rate).abs() < 1e-5);
    }

    #[test]
    fn same_seed_reproduces_lifetimes() {
        let tuning = Tuning::default();

        let mut lifetimes = Vec::new();
        for _ in 0..2 {
            let mut actor = ActorState::new();
            let mut system = FootstepSystem::new(99);
            walk(&mut actor, &mut system, 600, &tuning);
            lifetimes.push(
                system
                    .live_particles()
                    .iter()
                    .map(|p| p.lifetime)
                    .collect::<Vec<_>>(),
            );
        }
        assert!(!lifetimes[0].is_empty());
        assert_eq!(lifetimes[0], lifetimes[1]);
    }
}
