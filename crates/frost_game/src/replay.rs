//! Replay harness: JSON intent sequences driving the full simulation stack.
//!
//! Used by integration-style tests to prove the core is deterministic and to
//! pin the locomotion integration laws without a window or GPU.

use frost_core::actor::ActorIntent;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_dt")]
    pub fixed_dt: f32,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub turn_left: bool,
    #[serde(default)]
    pub turn_right: bool,
    #[serde(default)]
    pub move_forward: bool,
    #[serde(default)]
    pub move_backward: bool,
    #[serde(default)]
    pub slash: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplaySequence {
    pub fn expanded_intents(&self) -> Vec<ActorIntent> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for _ in 0..frame.repeat.max(1) {
                out.push(ActorIntent {
                    turn_left: frame.turn_left,
                    turn_right: frame.turn_right,
                    move_forward: frame.move_forward,
                    move_backward: frame.move_backward,
                    slash_held: frame.slash,
                });
            }
        }
        out
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.fixed_dt <= 0.0 {
        return Err("Replay validation failed: fixed_dt must be > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_dt() -> f32 {
    1.0 / 60.0
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use frost_core::actor::{ActorState, SlashState};
    use frost_core::footsteps::FootstepSystem;
    use frost_core::tuning::Tuning;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "frost_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    /// Run the whole core stack (actor + footsteps) over a replay; returns
    /// the final actor plus the total number of particles ever emitted.
    fn run_replay(
        replay: &ReplaySequence,
        footstep_seed: u64,
        tuning: &Tuning,
    ) -> (ActorState, FootstepSystem, usize) {
        let mut actor = ActorState::new();
        let mut footsteps = FootstepSystem::new(footstep_seed);
        let mut emitted = 0;
        for intent in replay.expanded_intents() {
            let before = footsteps.len();
            let moving = ActorState::is_moving(intent);
            actor.step(intent, replay.fixed_dt, tuning);
            footsteps.update(&actor, moving, replay.fixed_dt, tuning);
            if footsteps.len() > before {
                emitted += footsteps.len() - before;
            }
        }
        (actor, footsteps, emitted)
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let path = temp_file_path("parse");
        fs::write(
            &path,
            r#"{
              "fixed_dt": 0.016666667,
              "frames": [
                { "move_forward": true, "repeat": 3 },
                { "slash": true, "repeat": 1 },
                { "turn_left": true, "turn_right": true }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let expanded = replay.expanded_intents();
        assert_eq!(expanded.len(), 5);
        assert!(expanded[0].move_forward);
        assert!(expanded[3].slash_held);
        assert!(expanded[4].turn_left && expanded[4].turn_right);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_rejects_non_positive_dt() {
        let path = temp_file_path("bad_dt");
        fs::write(
            &path,
            r#"{ "fixed_dt": 0.0, "frames": [ { "move_forward": true } ] }"#,
        )
        .expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("zero dt should fail");
        assert!(err.contains("fixed_dt"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_rejects_empty_frames() {
        let path = temp_file_path("empty");
        fs::write(&path, r#"{ "frames": [] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("empty frames should fail");
        assert!(err.contains("frames list is empty"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_run_is_deterministic() {
        let path = temp_file_path("deterministic");
        fs::write(
            &path,
            r#"{
              "fixed_dt": 0.016666667,
              "frames": [
                { "move_forward": true, "repeat": 90 },
                { "move_forward": true, "turn_right": true, "repeat": 45 },
                { "slash": true, "repeat": 1 },
                { "repeat": 30 },
                { "move_backward": true, "repeat": 60 }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let tuning = Tuning::default();

        let (actor_a, steps_a, emitted_a) = run_replay(&replay, 11, &tuning);
        let (actor_b, steps_b, emitted_b) = run_replay(&replay, 11, &tuning);

        assert!((actor_a.position - actor_b.position).length() < 1e-6);
        assert_eq!(actor_a.heading_deg, actor_b.heading_deg);
        assert_eq!(actor_a.arm_swing_phase, actor_b.arm_swing_phase);
        assert_eq!(actor_a.footstep_phase, actor_b.footstep_phase);
        assert_eq!(emitted_a, emitted_b);
        assert_eq!(steps_a.len(), steps_b.len());
        for (a, b) in steps_a
            .live_particles()
            .iter()
            .zip(steps_b.live_particles())
        {
            assert_eq!(a.lifetime, b.lifetime);
            assert!((a.position - b.position).length() < 1e-6);
        }

        let _ = fs::remove_file(path);
    }

    #[test]
    fn straight_walk_integrates_exactly() {
        // 120 fixed steps of 1/60 s at 2.5 u/s => 5 units along -Z.
        let replay = ReplaySequence {
            fixed_dt: 1.0 / 60.0,
            frames: vec![ReplayFrame {
                move_forward: true,
                turn_left: false,
                turn_right: false,
                move_backward: false,
                slash: false,
                repeat: 120,
            }],
        };
        let tuning = Tuning {
            move_speed: 2.5,
            ..Tuning::default()
        };
        let (actor, _, _) = run_replay(&replay, 1, &tuning);
        assert!(actor.position.x.abs() < 1e-4);
        assert!((actor.position.y - (-5.0)).abs() < 1e-3);
    }

    #[test]
    fn slash_through_replay_peaks_and_finishes() {
        // dt chosen so ten idle frames land exactly on the sweep midpoint.
        let dt = 0.0175;
        let mut frames = vec![ReplayFrame {
            slash: true,
            turn_left: false,
            turn_right: false,
            move_forward: false,
            move_backward: false,
            repeat: 1,
        }];
        frames.push(ReplayFrame {
            slash: false,
            turn_left: false,
            turn_right: false,
            move_forward: false,
            move_backward: false,
            repeat: 10,
        });
        let replay = ReplaySequence {
            fixed_dt: dt,
            frames,
        };
        let tuning = Tuning {
            slash_duration: 0.35,
            slash_max_angle_deg: 100.0,
            ..Tuning::default()
        };

        let (actor, _, _) = run_replay(&replay, 1, &tuning);
        match actor.slash {
            SlashState::Slashing { elapsed } => {
                assert!((elapsed - 0.175).abs() < 1e-4);
                assert!((actor.slash_extra_angle_deg(&tuning) - 100.0).abs() < 0.1);
            }
            SlashState::Idle => panic!("slash should be at its midpoint"),
        }

        // Enough further idle frames complete the sweep.
        let mut full = replay.clone();
        full.frames.push(ReplayFrame {
            slash: false,
            turn_left: false,
            turn_right: false,
            move_forward: false,
            move_backward: false,
            repeat: 21,
        });
        let (done, _, _) = run_replay(&full, 1, &tuning);
        assert_eq!(done.slash, SlashState::Idle);
    }

    #[test]
    fn sustained_walk_emits_footsteps_at_the_gait_rate() {
        let tuning = Tuning::default();
        // Four full gait cycles of phase advance (4 per cycle).
        let seconds = 4.0 * 4.0 / tuning.footstep_rate;
        let steps = (seconds * 60.0).round() as u32;
        let replay = ReplaySequence {
            fixed_dt: 1.0 / 60.0,
            frames: vec![ReplayFrame {
                move_forward: true,
                turn_left: false,
                turn_right: false,
                move_backward: false,
                slash: false,
                repeat: steps,
            }],
        };
        let (_, _, emitted) = run_replay(&replay, 5, &tuning);
        assert_eq!(emitted, 8, "two footfalls per gait cycle");
    }
}
