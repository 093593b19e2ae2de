//! Temporal smoothing filters.

use arrayvec::ArrayVec;

/// The default number of samples averaged by a [MeanFilter].
pub const DEFAULT_WINDOW: usize = 5;

/// A low-pass filter over a stream of scalar samples.
pub trait SmoothingFilter {
    /// Clears all history, returning the filter to its un-warmed state.
    fn reset(&mut self);

    /// Adds a sample and returns the filtered value for this step.
    fn update(&mut self, sample: f64) -> f64;

    /// Whether enough samples have been seen for the output to be trusted.
    fn is_full(&self) -> bool;
}

/// A moving average over the last `N` samples.
///
/// Non-finite samples are rejected and do not count towards warm-up.
#[derive(Clone, Debug)]
pub struct MeanFilter<const N: usize = DEFAULT_WINDOW> {
    window: ArrayVec<f64, N>,
    /// Index of the oldest sample once the window is full.
    next: usize,
}

impl<const N: usize> MeanFilter<N> {
    /// Creates an empty filter.
    pub fn new() -> Self {
        Self {
            window: ArrayVec::new(),
            next: 0,
        }
    }

    /// The number of samples currently held.
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// Returns true if no samples have been received since the last reset.
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// The current filtered value, or zero if no samples have been received.
    pub fn value(&self) -> f64 {
        if self.window.is_empty() {
            0.0
        } else {
            self.window.iter().sum::<f64>() / self.window.len() as f64
        }
    }
}

impl<const N: usize> Default for MeanFilter<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SmoothingFilter for MeanFilter<N> {
    fn reset(&mut self) {
        self.window.clear();
        self.next = 0;
    }

    fn update(&mut self, sample: f64) -> f64 {
        if !sample.is_finite() {
            log::warn!("mean filter rejected non-finite sample {}", sample);
            return self.value();
        }
        if N == 0 {
            return sample;
        }
        if self.window.is_full() {
            self.window[self.next] = sample;
            self.next = (self.next + 1) % N;
        } else {
            self.window.push(sample);
        }
        self.value()
    }

    fn is_full(&self) -> bool {
        self.window.is_full()
    }
}
