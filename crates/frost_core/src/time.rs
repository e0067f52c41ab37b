//! Fixed-timestep frame clock.
//!
//! Wall-clock time feeds an accumulator; the simulation consumes it in
//! `fixed_dt` slices so actor motion and particle aging are identical at any
//! display refresh rate. A cap on the accumulator keeps a stalled frame (GPU
//! hitch, window drag, debugger break) from producing a huge burst of
//! catch-up steps; the stall is absorbed as one capped slice of simulated
//! time instead.

use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 48;

pub struct TimeState {
    pub fixed_dt: f64,
    pub max_accumulator: f64,
    accumulator: f64,
    pub total_time: f64,
    pub fixed_step_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
    pub real_dt: f64,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl TimeState {
    pub fn new() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_accumulator: 0.25,
            accumulator: 0.0,
            total_time: 0.0,
            fixed_step_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
            real_dt: 0.0,
            last_instant: Instant::now(),
            fps_samples: [1.0 / 60.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: 16.667,
        }
    }

    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        self.real_dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;

        if self.real_dt > self.max_accumulator {
            log::warn!(
                "Frame took {:.1}ms, capping accumulator to {}ms",
                self.real_dt * 1000.0,
                self.max_accumulator * 1000.0
            );
            self.real_dt = self.max_accumulator;
        }

        self.accumulator += self.real_dt;
        self.steps_this_frame = 0;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.total_time += self.fixed_dt;
            self.fixed_step_count += 1;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_clock_has_no_pending_steps() {
        let mut time = TimeState::new();
        assert!(!time.should_step());
        assert_eq!(time.fixed_step_count, 0);
    }

    #[test]
    fn accumulated_time_yields_bounded_steps() {
        let mut time = TimeState::new();
        // Simulate a frame that accumulated exactly 3.5 fixed slices.
        time.accumulator = time.fixed_dt * 3.5;
        let mut steps = 0;
        while time.should_step() {
            steps += 1;
        }
        assert_eq!(steps, 3);
        assert!(time.accumulator < time.fixed_dt);
        assert_eq!(time.fixed_step_count, 3);
    }

    #[test]
    fn total_time_advances_in_fixed_increments() {
        let mut time = TimeState::new();
        time.accumulator = time.fixed_dt * 2.0;
        while time.should_step() {}
        assert!((time.total_time - time.fixed_dt * 2.0).abs() < 1e-12);
    }
}
