use log::debug;

/// Sixty updates per second, in seconds.
pub const SIXTY_FPS: f32 = 1.0 / 60.0;

/// Frame clock. Each call to [`Time::advance`] records the wall time of one frame and the running
/// totals since the first frame.
#[derive(Debug, Default, Copy, Clone)]
pub struct Time {
    /// Seconds elapsed over the last frame.
    delta_seconds: f32,
    /// Seconds elapsed since the first frame.
    elapsed_seconds: f64,
    /// Frames advanced so far.
    frame_count: u64,
}

impl Time {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame of `delta_seconds`. Negative deltas are treated as zero.
    pub fn advance(&mut self, delta_seconds: f32) {
        let delta_seconds = delta_seconds.max(0.0);
        self.delta_seconds = delta_seconds;
        self.elapsed_seconds += delta_seconds as f64;
        self.frame_count += 1;
    }

    #[inline]
    pub fn delta_seconds(&self) -> f32 {
        self.delta_seconds
    }

    #[inline]
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Fixed time step accumulator.
///
/// Frame time is accumulated and consumed in whole steps of `step` seconds; the remainder carries
/// over to the next frame. When more than `max_sub_steps` steps are due in one frame the surplus
/// is dropped so a long stall cannot snowball into ever longer frames. A `max_sub_steps` of zero
/// disables the accumulator: every frame is simulated as a single step of its own length.
#[derive(Debug, Copy, Clone)]
pub struct FixedStep {
    step: f32,
    max_sub_steps: u32,
    accumulator: f32,
}

impl FixedStep {
    pub fn new(step: f32, max_sub_steps: u32) -> Self {
        Self {
            step,
            max_sub_steps,
            accumulator: 0.0,
        }
    }

    /// Accumulate a frame and return the steps to simulate along with each step's length.
    pub fn advance(&mut self, delta_seconds: f32) -> (u32, f32) {
        if self.max_sub_steps == 0 || self.step <= 0.0 {
            return if delta_seconds > f32::EPSILON {
                (1, delta_seconds)
            } else {
                (0, 0.0)
            };
        }

        self.accumulator += delta_seconds.max(0.0);
        if self.accumulator < self.step {
            return (0, self.step);
        }

        let due = (self.accumulator / self.step) as u32;
        self.accumulator -= due as f32 * self.step;

        if due > self.max_sub_steps {
            debug!(
                "dropping {} physics steps, {} due but capped at {}",
                due - self.max_sub_steps,
                due,
                self.max_sub_steps
            );
        }
        (due.min(self.max_sub_steps), self.step)
    }

    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }

    #[inline]
    pub fn max_sub_steps(&self) -> u32 {
        self.max_sub_steps
    }

    /// Time carried over to the next frame.
    #[inline]
    pub fn remainder(&self) -> f32 {
        self.accumulator
    }
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(SIXTY_FPS, 10)
    }
}
