//! CorrelationFlashScheduler - occasional highlighted links between lattice nodes.
//!
//! State machine:
//!
//! ```text
//! Idle --(cadence + jitter elapsed, valid pair)--> Active --(progress >= 1)--> Idle
//! ```
//!
//! At most one flash is active per scheduler. Endpoints are drawn from a
//! coarse lattice over the canvas; a random pair whose distance falls
//! outside `(3 * cell, 8 * cell)` is discarded and the next tick tries again.

use rand::Rng;

/// Timing and lattice geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlashTiming {
    /// Minimum idle time between flashes, ms (default: 6000).
    pub cadence_ms: f64,
    /// Random extra idle time, ms (default: 2000).
    pub jitter_ms: f64,
    /// Lifetime of one flash, ms (default: 2400).
    pub duration_ms: f64,
    /// Lattice cell size, CSS px (default: 60).
    pub cell: f32,
}

impl Default for FlashTiming {
    fn default() -> Self {
        Self {
            cadence_ms: 6000.0,
            jitter_ms: 2000.0,
            duration_ms: 2400.0,
            cell: 60.0,
        }
    }
}

/// Opacity envelope: ramp up over `[0, 0.2]`, hold over `[0.2, 0.8]`,
/// ramp down over `[0.8, 1]`. Zero outside `(0, 1)`.
pub fn envelope(progress: f32) -> f32 {
    if progress <= 0.0 || progress >= 1.0 {
        0.0
    } else if progress < 0.2 {
        progress / 0.2
    } else if progress <= 0.8 {
        1.0
    } else {
        (1.0 - progress) / 0.2
    }
}

/// One active flash.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlashEvent {
    pub from: (f32, f32),
    pub to: (f32, f32),
    pub start_ms: f64,
    pub duration_ms: f64,
}

impl FlashEvent {
    /// Elapsed fraction of the lifetime, unclamped above 1.
    pub fn progress(&self, now_ms: f64) -> f32 {
        ((now_ms - self.start_ms) / self.duration_ms).max(0.0) as f32
    }

    pub fn opacity(&self, now_ms: f64) -> f32 {
        envelope(self.progress(now_ms))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum FlashState {
    Idle { since_ms: f64, wait_ms: f64 },
    Active(FlashEvent),
}

/// Schedules correlation flashes.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationFlashScheduler {
    timing: FlashTiming,
    state: FlashState,
}

impl CorrelationFlashScheduler {
    /// Start idle at `now_ms`.
    pub fn new(timing: FlashTiming, now_ms: f64, rng: &mut impl Rng) -> Self {
        Self {
            timing,
            state: FlashState::Idle {
                since_ms: now_ms,
                wait_ms: Self::next_wait(&timing, rng),
            },
        }
    }

    fn next_wait(timing: &FlashTiming, rng: &mut impl Rng) -> f64 {
        if timing.jitter_ms > 0.0 {
            timing.cadence_ms + rng.gen_range(0.0..timing.jitter_ms)
        } else {
            timing.cadence_ms
        }
    }

    pub fn timing(&self) -> &FlashTiming {
        &self.timing
    }

    /// The active flash, if any.
    pub fn active(&self) -> Option<&FlashEvent> {
        match &self.state {
            FlashState::Active(event) => Some(event),
            FlashState::Idle { .. } => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active().is_some()
    }

    /// Restart the idle timer, e.g. after the page was hidden. An active
    /// flash is left alone.
    pub fn restart_idle(&mut self, now_ms: f64) {
        if let FlashState::Idle { since_ms, .. } = &mut self.state {
            *since_ms = now_ms;
        }
    }

    /// Advance the state machine for a `width` x `height` canvas.
    pub fn tick(&mut self, now_ms: f64, width: f32, height: f32, rng: &mut impl Rng) {
        match self.state {
            FlashState::Active(event) => {
                if event.progress(now_ms) >= 1.0 {
                    self.state = FlashState::Idle {
                        since_ms: now_ms,
                        wait_ms: Self::next_wait(&self.timing, rng),
                    };
                }
            }
            FlashState::Idle { since_ms, wait_ms } => {
                if now_ms - since_ms <= wait_ms {
                    return;
                }
                if let Some((from, to)) = self.pick_pair(width, height, rng) {
                    self.state = FlashState::Active(FlashEvent {
                        from,
                        to,
                        start_ms: now_ms,
                        duration_ms: self.timing.duration_ms,
                    });
                }
            }
        }
    }

    /// One attempt at a lattice pair inside the distance band.
    fn pick_pair(
        &self,
        width: f32,
        height: f32,
        rng: &mut impl Rng,
    ) -> Option<((f32, f32), (f32, f32))> {
        let cell = self.timing.cell;
        if cell <= 0.0 {
            return None;
        }
        let cols = (width / cell).floor() as u32;
        let rows = (height / cell).floor() as u32;
        if cols == 0 || rows == 0 {
            return None;
        }

        let mut node = || {
            let col = rng.gen_range(0..=cols);
            let row = rng.gen_range(0..=rows);
            (col as f32 * cell, row as f32 * cell)
        };
        let a = node();
        let b = node();

        let distance = ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt();
        if distance > 3.0 * cell && distance < 8.0 * cell {
            Some((a, b))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn fixed_timing() -> FlashTiming {
        FlashTiming {
            cadence_ms: 1000.0,
            jitter_ms: 0.0,
            duration_ms: 500.0,
            cell: 50.0,
        }
    }

    #[test]
    fn test_envelope_shape() {
        assert_eq!(envelope(0.0), 0.0);
        assert!((envelope(0.1) - 0.5).abs() < 1e-6);
        for p in [0.2, 0.35, 0.5, 0.65, 0.8] {
            assert_eq!(envelope(p), 1.0, "progress {p}");
        }
        assert!((envelope(0.9) - 0.5).abs() < 1e-5);
        assert_eq!(envelope(1.0), 0.0);
        assert_eq!(envelope(1.7), 0.0);
    }

    #[test]
    fn test_stays_idle_until_cadence_elapses() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut flashes = CorrelationFlashScheduler::new(fixed_timing(), 0.0, &mut rng);
        for now in [0.0, 500.0, 1000.0] {
            flashes.tick(now, 1000.0, 800.0, &mut rng);
            assert!(!flashes.is_active());
        }
    }

    #[test]
    fn test_activates_within_band_and_expires() {
        let mut rng = SmallRng::seed_from_u64(11);
        let timing = fixed_timing();
        let mut flashes = CorrelationFlashScheduler::new(timing, 0.0, &mut rng);

        // Invalid pairs only skip a tick, so keep ticking until one lands.
        let mut now = 1001.0;
        while !flashes.is_active() {
            flashes.tick(now, 1000.0, 800.0, &mut rng);
            now += 16.0;
            assert!(now < 60_000.0, "no flash ever activated");
        }

        let event = *flashes.active().unwrap();
        let d = ((event.from.0 - event.to.0).powi(2) + (event.from.1 - event.to.1).powi(2)).sqrt();
        assert!(d > 3.0 * timing.cell && d < 8.0 * timing.cell);
        for (x, y) in [event.from, event.to] {
            assert!((0.0..=1000.0).contains(&x) && (0.0..=800.0).contains(&y));
        }

        assert_eq!(event.opacity(event.start_ms), 0.0);
        assert_eq!(event.opacity(event.start_ms + 250.0), 1.0);

        flashes.tick(event.start_ms + 499.0, 1000.0, 800.0, &mut rng);
        assert!(flashes.is_active());
        flashes.tick(event.start_ms + 500.0, 1000.0, 800.0, &mut rng);
        assert!(!flashes.is_active());
    }

    #[test]
    fn test_never_two_active() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut flashes = CorrelationFlashScheduler::new(fixed_timing(), 0.0, &mut rng);
        let mut current: Option<FlashEvent> = None;
        let mut activations = 0;

        let mut now = 0.0;
        while now < 30_000.0 {
            flashes.tick(now, 1200.0, 900.0, &mut rng);
            match (current, flashes.active().copied()) {
                (Some(prev), Some(next)) => {
                    // Still the same flash; a new one can't start while one is live.
                    assert_eq!(prev, next);
                }
                (None, Some(next)) => {
                    activations += 1;
                    current = Some(next);
                }
                (_, None) => current = None,
            }
            now += 16.0;
        }
        assert!(activations > 1);
    }

    #[test]
    fn test_tiny_canvas_never_flashes() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut flashes = CorrelationFlashScheduler::new(fixed_timing(), 0.0, &mut rng);
        for i in 0..100 {
            flashes.tick(2000.0 + i as f64 * 16.0, 40.0, 40.0, &mut rng);
        }
        assert!(!flashes.is_active());
    }

    #[test]
    fn test_restart_idle_defers_next_flash() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut flashes = CorrelationFlashScheduler::new(fixed_timing(), 0.0, &mut rng);
        flashes.restart_idle(5000.0);
        flashes.tick(5500.0, 1000.0, 800.0, &mut rng);
        assert!(!flashes.is_active());
    }
}
