//! Wall-clock frame timing.
//!
//! The pendulum wave is a closed-form function of elapsed time and the
//! particle field's camera sweep is too, so elapsed seconds are kept in
//! `f64` to stay phase-accurate over long runs.

use std::time::{Duration, Instant};

/// Frame clock shared by both demos.
///
/// ```ignore
/// let mut clock = Clock::new();
/// // once per frame:
/// let t = clock.tick();
/// ```
#[derive(Debug)]
pub struct Clock {
    /// When the clock was (re)started.
    start: Instant,
    /// Elapsed seconds as of the last tick, excluding paused time.
    elapsed_secs: f64,
    /// Frames ticked while running.
    frame_count: u64,
    /// FPS estimate, refreshed every `fps_interval`.
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_interval: Duration,
    /// Set while paused; holds the instant the pause began.
    paused_at: Option<Instant>,
    /// Total time spent paused since `start`.
    paused_total: Duration,
}

impl Clock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    fn starting_at(now: Instant) -> Self {
        Self {
            start: now,
            elapsed_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_interval: Duration::from_millis(500),
            paused_at: None,
            paused_total: Duration::ZERO,
        }
    }

    /// Advance to now. Call once per frame; returns elapsed seconds.
    ///
    /// While paused the elapsed time is frozen and no frame is counted.
    pub fn tick(&mut self) -> f64 {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> f64 {
        if self.paused_at.is_some() {
            return self.elapsed_secs;
        }

        let running = now.saturating_duration_since(self.start).saturating_sub(self.paused_total);
        self.elapsed_secs = running.as_secs_f64();
        self.frame_count += 1;

        let since_fps = now.saturating_duration_since(self.fps_update_time);
        if since_fps >= self.fps_interval {
            let frames = self.frame_count - self.fps_frame_count;
            self.fps = frames as f32 / since_fps.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.elapsed_secs
    }

    /// Elapsed seconds as of the last tick.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed_secs
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn pause(&mut self) {
        if self.paused_at.is_none() {
            self.paused_at = Some(Instant::now());
        }
    }

    pub fn resume(&mut self) {
        self.resume_at(Instant::now());
    }

    fn resume_at(&mut self, now: Instant) {
        if let Some(paused_at) = self.paused_at.take() {
            self.paused_total += now.saturating_duration_since(paused_at);
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.is_paused() {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Restart from zero. A paused clock stays paused.
    pub fn restart(&mut self) {
        let now = Instant::now();
        let paused = self.is_paused();
        *self = Self::starting_at(now);
        if paused {
            self.paused_at = Some(now);
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clock_is_at_zero() {
        let clock = Clock::new();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.elapsed(), 0.0);
        assert!(!clock.is_paused());
    }

    #[test]
    fn tick_reports_elapsed_since_start() {
        let start = Instant::now();
        let mut clock = Clock::starting_at(start);
        let t = clock.tick_at(start + Duration::from_millis(1500));
        assert!((t - 1.5).abs() < 1e-9);
        assert_eq!(clock.frame(), 1);
    }

    #[test]
    fn paused_time_is_excluded() {
        let start = Instant::now();
        let mut clock = Clock::starting_at(start);
        clock.tick_at(start + Duration::from_secs(1));

        clock.paused_at = Some(start + Duration::from_secs(1));
        let frozen = clock.tick_at(start + Duration::from_secs(5));
        assert!((frozen - 1.0).abs() < 1e-9);
        assert_eq!(clock.frame(), 1);

        clock.resume_at(start + Duration::from_secs(5));
        let t = clock.tick_at(start + Duration::from_secs(6));
        assert!((t - 2.0).abs() < 1e-9);
    }

    #[test]
    fn fps_is_estimated_after_interval() {
        let start = Instant::now();
        let mut clock = Clock::starting_at(start);
        for i in 1..=30 {
            clock.tick_at(start + Duration::from_millis(i * 1000 / 60));
        }
        assert!((clock.fps() - 60.0).abs() < 1.0, "fps {}", clock.fps());
    }

    #[test]
    fn toggle_pause_round_trips() {
        let mut clock = Clock::new();
        clock.toggle_pause();
        assert!(clock.is_paused());
        clock.toggle_pause();
        assert!(!clock.is_paused());
    }

    #[test]
    fn restart_resets_counters() {
        let start = Instant::now();
        let mut clock = Clock::starting_at(start);
        clock.tick_at(start + Duration::from_secs(3));
        clock.restart();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.elapsed(), 0.0);
    }
}
