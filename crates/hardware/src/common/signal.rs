//! Single-bit signal levels and edge detection.
//!
//! Edge detection is a two-state machine over [`Level`] with a pure transition
//! function. The bus uses it on the clock to latch writes on rising edges only;
//! the pixel sink uses it on vertical sync to find the end of a frame.

/// Logical level of a single-bit signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Level {
    /// Logic 0.
    #[default]
    Low,
    /// Logic 1.
    High,
}

impl Level {
    /// Returns `true` for [`Level::High`].
    #[inline]
    pub const fn is_high(self) -> bool {
        matches!(self, Self::High)
    }

    /// Returns the opposite level.
    #[inline]
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::High => Self::Low,
        }
    }
}

impl From<bool> for Level {
    fn from(bit: bool) -> Self {
        if bit { Self::High } else { Self::Low }
    }
}

impl From<Level> for bool {
    fn from(level: Level) -> Self {
        level.is_high()
    }
}

/// Transition observed between two consecutive samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    /// Low to high.
    Rising,
    /// High to low.
    Falling,
    /// Level unchanged.
    Steady,
}

/// Classifies the transition from `prev` to `next`.
#[inline]
pub const fn transition(prev: Level, next: Level) -> Edge {
    match (prev, next) {
        (Level::Low, Level::High) => Edge::Rising,
        (Level::High, Level::Low) => Edge::Falling,
        _ => Edge::Steady,
    }
}

/// Remembers the previous sample of a signal and reports edges.
#[derive(Clone, Copy, Debug, Default)]
pub struct EdgeDetector {
    level: Level,
}

impl EdgeDetector {
    /// Creates a detector whose previous sample is `initial`.
    pub const fn new(initial: Level) -> Self {
        Self { level: initial }
    }

    /// Returns the last sampled level.
    pub const fn level(&self) -> Level {
        self.level
    }

    /// Samples `next` and returns the edge relative to the previous sample.
    #[inline]
    pub fn sample(&mut self, next: Level) -> Edge {
        let edge = transition(self.level, next);
        self.level = next;
        edge
    }
}
