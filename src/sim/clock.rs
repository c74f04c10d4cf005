/// A fixed-step simulation clock.
///
/// Counts integer steps of `dt_h` hours and derives simulated time from the
/// step index, so time never accumulates rounding drift.
///
/// # Examples
///
/// ```
/// use eps_sim::sim::clock::Clock;
///
/// let mut clock = Clock::new(3, 0.5);
/// let mut steps = Vec::new();
///
/// while let Some(step) = clock.tick() {
///     steps.push(step);
/// }
/// assert_eq!(steps, vec![0, 1, 2]);
/// assert_eq!(clock.elapsed_h(), 1.5);
/// ```
#[derive(Debug, Clone)]
pub struct Clock {
    /// Next step to hand out.
    current: usize,
    /// Total steps in the run.
    total: usize,
    /// Step length in hours.
    dt_h: f64,
}

impl Clock {
    /// Creates a clock for `total` steps of `dt_h` hours.
    pub fn new(total: usize, dt_h: f64) -> Self {
        Self {
            current: 0,
            total,
            dt_h,
        }
    }

    /// Hands out the next step index, or `None` once every step has run.
    pub fn tick(&mut self) -> Option<usize> {
        if self.current < self.total {
            let step = self.current;
            self.current += 1;
            Some(step)
        } else {
            None
        }
    }

    /// Simulated time at the end of step `step` (h).
    pub fn end_of_step_h(&self, step: usize) -> f64 {
        (step + 1) as f64 * self.dt_h
    }

    /// Simulated time covered by the steps handed out so far (h).
    pub fn elapsed_h(&self) -> f64 {
        self.current as f64 * self.dt_h
    }
}
