use serde::{Deserialize, Serialize};

/// Step and bounds for runtime instance-count changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountLimits {
    /// Amount added or removed per key press.
    pub step: u32,
    /// Lowest count reachable by decreasing.
    pub floor: u32,
    /// Highest count reachable by increasing.
    pub ceiling: u32,
}

impl CountLimits {
    /// Limits with the ceiling, and the floor if needed, lowered to `max`.
    #[must_use]
    pub fn capped(self, max: u32) -> Self {
        Self {
            ceiling: self.ceiling.min(max),
            floor: self.floor.min(max),
            ..self
        }
    }
}

impl Default for CountLimits {
    fn default() -> Self {
        Self {
            step: 10_000,
            floor: 10_000,
            ceiling: 1_000_000,
        }
    }
}

/// The live instance count plus the flag that forces a buffer rebuild.
///
/// Starts dirty so the first frame allocates its buffers. The initial value
/// may sit below `floor`; only `decrease` enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceCount {
    current: u32,
    limits: CountLimits,
    dirty: bool,
}

impl InstanceCount {
    /// Start at `initial`, clamped to the ceiling.
    #[must_use]
    pub fn new(initial: u32, limits: CountLimits) -> Self {
        Self {
            current: initial.min(limits.ceiling),
            limits,
            dirty: true,
        }
    }

    /// Current instance count.
    #[must_use]
    pub fn get(&self) -> u32 {
        self.current
    }

    /// The step/floor/ceiling in effect.
    #[must_use]
    pub fn limits(&self) -> CountLimits {
        self.limits
    }

    /// Add one step, clamped to the ceiling. Marks dirty.
    pub fn increase(&mut self) -> u32 {
        self.current = self
            .current
            .saturating_add(self.limits.step)
            .min(self.limits.ceiling);
        self.dirty = true;
        self.current
    }

    /// Remove one step, clamped to the floor. Marks dirty.
    pub fn decrease(&mut self) -> u32 {
        self.current = self
            .current
            .saturating_sub(self.limits.step)
            .max(self.limits.floor)
            .min(self.limits.ceiling);
        self.dirty = true;
        self.current
    }

    /// Set an explicit count, clamped to the ceiling. Marks dirty.
    pub fn set(&mut self, count: u32) {
        self.current = count.min(self.limits.ceiling);
        self.dirty = true;
    }

    /// Whether buffers must be rebuilt before the next draw.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Return the dirty flag and clear it.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Clear the dirty flag and return the new count if it differs from
    /// `current`, the length the buffers were last built for.
    pub fn take_resize(&mut self, current: usize) -> Option<usize> {
        if !self.take_dirty() {
            return None;
        }
        let wanted = self.current as usize;
        (wanted != current).then_some(wanted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_dirty_and_take_clears() {
        let mut c = InstanceCount::new(1000, CountLimits::default());
        assert!(c.is_dirty());
        assert!(c.take_dirty());
        assert!(!c.take_dirty());
        assert_eq!(c.get(), 1000);
    }

    #[test]
    fn increase_clamps_to_ceiling() {
        let mut c = InstanceCount::new(995_000, CountLimits::default());
        let _ = c.take_dirty();
        assert_eq!(c.increase(), 1_000_000);
        assert!(c.is_dirty());
        assert_eq!(c.increase(), 1_000_000);
    }

    #[test]
    fn decrease_below_floor_clamps_instead_of_wrapping() {
        let mut c = InstanceCount::new(1000, CountLimits::default());
        assert_eq!(c.decrease(), 10_000);
        assert_eq!(c.decrease(), 10_000);
        assert_eq!(c.increase(), 20_000);
        assert_eq!(c.decrease(), 10_000);
    }

    #[test]
    fn resize_only_when_dirty_and_changed() {
        let mut c = InstanceCount::new(1000, CountLimits::default());
        assert_eq!(c.take_resize(0), Some(1000));
        assert_eq!(c.take_resize(0), None);

        // Pressing `=` at the ceiling marks dirty but keeps the length.
        let mut full = InstanceCount::new(1_000_000, CountLimits::default());
        let _ = full.take_dirty();
        let _ = full.increase();
        assert!(full.is_dirty());
        assert_eq!(full.take_resize(1_000_000), None);
        assert!(!full.is_dirty());
    }

    #[test]
    fn capped_limits_fit_under_max() {
        let limits = CountLimits::default().capped(5_000);
        assert_eq!(limits.ceiling, 5_000);
        assert_eq!(limits.floor, 5_000);
        assert_eq!(limits.step, 10_000);

        assert_eq!(
            CountLimits::default().capped(2_000_000),
            CountLimits::default()
        );
    }

    #[test]
    fn initial_and_set_respect_ceiling() {
        let limits = CountLimits {
            step: 5,
            floor: 5,
            ceiling: 20,
        };
        let mut c = InstanceCount::new(100, limits);
        assert_eq!(c.get(), 20);
        let _ = c.take_dirty();
        c.set(7);
        assert_eq!(c.get(), 7);
        assert!(c.is_dirty());
    }
}
