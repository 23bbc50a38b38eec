//! Circular layout of parsed trees.
//!
//! [CircularLayout] places every leaf on the unit circle and every internal
//! node inside it. How the result is scaled afterwards is part of the
//! [LayoutConfig] as well, and applied when the layout is finalized into a
//! [CircularTree](crate::CircularTree).

mod circular;

pub use circular::CircularLayout;

/// Default number of leaves up to which coordinates are not scaled
pub const DEFAULT_SCALE_THRESHOLD: usize = 5;

/// Default scale per leaf for trees above the threshold
pub const DEFAULT_SCALE_FACTOR: f64 = 0.1;

/// Default lower bound for `|1 - t|` in the layout recurrence
pub const DEFAULT_EPSILON: f64 = 1e-12;

// =#========================================================================#=
// LAYOUT CONFIG
// =#========================================================================#=
/// Configuration of the circular layout and its scaling.
///
/// # Configuration
/// * [`with_scale_threshold(n)`](Self::with_scale_threshold)
///     - Trees with more than `n` leaves are scaled (default 5)
/// * [`with_scale_factor(f)`](Self::with_scale_factor)
///     - Scale per leaf, coordinates are multiplied by `total_leaves * f` (default 0.1)
/// * [`with_epsilon(e)`](Self::with_epsilon)
///     - Denominators closer to zero than `e` make the layout fail (default 1e-12)
///
/// # Example
/// ```
/// use circlewick::layout::LayoutConfig;
///
/// let config = LayoutConfig::default().with_scale_threshold(10);
/// assert_eq!(config.scale_for(8), 1.0);
/// assert!((config.scale_for(20) - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    scale_threshold: usize,
    scale_factor: f64,
    epsilon: f64,
}

impl LayoutConfig {
    /// Creates a new [LayoutConfig] with default settings.
    pub fn new() -> Self {
        Self {
            scale_threshold: DEFAULT_SCALE_THRESHOLD,
            scale_factor: DEFAULT_SCALE_FACTOR,
            epsilon: DEFAULT_EPSILON,
        }
    }

    /// Sets the number of leaves up to which coordinates stay unscaled.
    pub fn with_scale_threshold(mut self, scale_threshold: usize) -> Self {
        self.scale_threshold = scale_threshold;
        self
    }

    /// Sets the scale per leaf used above the threshold.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Sets the lower bound for denominators in the layout recurrence.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn scale_threshold(&self) -> usize {
        self.scale_threshold
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Returns the factor coordinates are multiplied with for a tree with
    /// `total_leaves` leaves (1.0 up to the threshold).
    pub fn scale_for(&self, total_leaves: usize) -> f64 {
        if total_leaves > self.scale_threshold {
            total_leaves as f64 * self.scale_factor
        } else {
            1.0
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::new()
    }
}
