//! Frame clock for the variable-delta game loop.
//!
//! The simulation is stepped once per displayed frame with a frame-normalised
//! `delta`: `1.0` means one 60 Hz frame elapsed, `2.0` means two. Movement,
//! falling tiles and timers all scale by it.

use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;

/// Duration of one reference frame.
pub const FRAME_SECS: f64 = 1.0 / 60.0;
pub const FRAME_MS: f64 = FRAME_SECS * 1000.0;
pub const FRAME_US: f64 = FRAME_SECS * 1_000_000.0;

/// Milliseconds represented by a frame-normalised delta.
pub fn delta_to_ms(delta: f32) -> f64 {
    delta.max(0.0) as f64 * FRAME_MS
}

/// Microseconds represented by a frame-normalised delta, for animation ticks.
pub fn delta_to_us(delta: f32) -> u64 {
    (delta.max(0.0) as f64 * FRAME_US).round() as u64
}

pub struct FrameClock {
    /// Longest wall-clock gap fed into one frame, in seconds.
    pub max_frame_secs: f64,
    pub total_time: f64,
    pub frame_count: u64,
    pub real_dt: f64,
    pub delta: f32,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            max_frame_secs: 0.25,
            total_time: 0.0,
            frame_count: 0,
            real_dt: 0.0,
            delta: 0.0,
            last_instant: Instant::now(),
            fps_samples: [FRAME_SECS; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: FRAME_MS,
        }
    }

    /// Measure the wall-clock gap since the previous call and return the
    /// frame-normalised delta.
    pub fn begin_frame(&mut self) -> f32 {
        let now = Instant::now();
        let real_dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(real_dt)
    }

    /// Feed an explicit wall-clock gap (seconds). Returns the normalised delta.
    pub fn advance(&mut self, real_dt: f64) -> f32 {
        let mut real_dt = real_dt.max(0.0);

        // Spiral-of-death cap
        if real_dt > self.max_frame_secs {
            log::warn!(
                "Frame took {:.1}ms, capping delta to {}ms",
                real_dt * 1000.0,
                self.max_frame_secs * 1000.0
            );
            real_dt = self.max_frame_secs;
        }

        self.real_dt = real_dt;
        self.total_time += real_dt;
        self.frame_count += 1;
        self.delta = (real_dt / FRAME_SECS) as f32;

        self.fps_samples[self.fps_sample_index] = real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };

        self.delta
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
