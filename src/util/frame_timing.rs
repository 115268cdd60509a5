//! Per-second frame counting and animation time.

use web_time::{Duration, Instant};

/// Length of one FPS counting window.
const WINDOW: Duration = Duration::from_secs(1);

/// Counts frames per one-second window and tracks time since start.
///
/// The reported FPS is the number of frames completed in the last full
/// window; it stays at zero until the first window closes.
pub struct FrameTiming {
    /// When the timer was created; drives shader animation time.
    start: Instant,
    /// Start of the current counting window.
    window_start: Instant,
    /// Frames finished in the current window.
    frames: u32,
    /// Frame count of the last closed window.
    fps: u32,
}

impl FrameTiming {
    /// Start timing now.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Start timing at a given instant.
    #[must_use]
    pub fn starting_at(now: Instant) -> Self {
        Self {
            start: now,
            window_start: now,
            frames: 0,
            fps: 0,
        }
    }

    /// Call after each rendered frame. Returns the new FPS when a window
    /// closes.
    pub fn end_frame(&mut self) -> Option<u32> {
        self.end_frame_at(Instant::now())
    }

    /// [`end_frame`](Self::end_frame) with an explicit clock reading.
    pub fn end_frame_at(&mut self, now: Instant) -> Option<u32> {
        self.frames += 1;
        if now.duration_since(self.window_start) < WINDOW {
            return None;
        }
        self.fps = self.frames;
        self.frames = 0;
        self.window_start = now;
        Some(self.fps)
    }

    /// Frames counted in the last full window.
    #[must_use]
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Seconds since the timer started.
    #[must_use]
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed_secs_at(Instant::now())
    }

    /// [`elapsed_secs`](Self::elapsed_secs) with an explicit clock reading.
    #[must_use]
    pub fn elapsed_secs_at(&self, now: Instant) -> f32 {
        now.duration_since(self.start).as_secs_f32()
    }
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_is_zero_until_first_window_closes() {
        let t0 = Instant::now();
        let mut timing = FrameTiming::starting_at(t0);
        for i in 1..=10 {
            let now = t0 + Duration::from_millis(i * 50);
            assert_eq!(timing.end_frame_at(now), None);
        }
        assert_eq!(timing.fps(), 0);
    }

    #[test]
    fn counts_frames_per_window() {
        let t0 = Instant::now();
        let mut timing = FrameTiming::starting_at(t0);
        let mut reported = None;
        for i in 1..=40 {
            let now = t0 + Duration::from_millis(i * 25);
            if let Some(fps) = timing.end_frame_at(now) {
                reported = Some(fps);
            }
        }
        assert_eq!(reported, Some(40));
        assert_eq!(timing.fps(), 40);

        // Next window starts counting from zero.
        let later = t0 + Duration::from_millis(1000 + 1000);
        assert_eq!(timing.end_frame_at(later), Some(1));
    }

    #[test]
    fn elapsed_tracks_start() {
        let t0 = Instant::now();
        let timing = FrameTiming::starting_at(t0);
        let secs = timing.elapsed_secs_at(t0 + Duration::from_millis(2500));
        assert!((secs - 2.5).abs() < 1e-6);
    }
}
