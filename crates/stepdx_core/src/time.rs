use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;

/// Wall-clock source for the simulation. Produces one non-negative delta per
/// frame; the step driver does its own substepping, so there is no
/// accumulator here.
pub struct FrameClock {
    /// Longest delta handed out for a single frame.
    pub max_frame_dt: f32,
    pub real_dt: f32,
    pub total_time: f64,
    pub frame_count: u64,
    last_instant: Instant,

    fps_samples: [f32; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f32,
    pub smoothed_frame_time_ms: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            max_frame_dt: 0.25,
            real_dt: 0.0,
            total_time: 0.0,
            frame_count: 0,
            last_instant: Instant::now(),
            fps_samples: [1.0 / 60.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: 16.667,
        }
    }

    /// Measure the time since the previous frame and return it as this
    /// frame's delta.
    pub fn begin_frame(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_instant).as_secs_f32();
        self.last_instant = now;
        self.advance_by(elapsed)
    }

    /// Use `dt` as this frame's delta instead of reading the wall clock.
    /// Scripted and headless runs drive the clock this way.
    pub fn advance_by(&mut self, dt: f32) -> f32 {
        let mut dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        // Spiral-of-death cap
        if dt > self.max_frame_dt {
            log::warn!(
                "Frame took {:.1}ms, capping to {}ms",
                dt * 1000.0,
                self.max_frame_dt * 1000.0
            );
            dt = self.max_frame_dt;
        }

        self.real_dt = dt;
        self.total_time += dt as f64;
        self.frame_count += 1;

        // FPS smoothing
        self.fps_samples[self.fps_sample_index] = dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt = self.fps_samples.iter().sum::<f32>() / FPS_SAMPLE_COUNT as f32;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };

        dt
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
