//! Message rate estimation
//!
//! Weighted moving average over the last [`RATE_FILTER_ORDER`] samples. The
//! weights halve from the newest sample to the oldest, so the estimate tracks
//! recent traffic while still damping single outliers.

use heapless::Deque;

use crate::config::RATE_FILTER_ORDER;

/// Order-K weighted moving average filter
#[derive(Debug, Clone)]
pub struct RateFilter<const K: usize = RATE_FILTER_ORDER> {
    /// Sample weights, newest first
    weights: [f32; K],
    /// Sample history, newest at the front
    history: Deque<f32, K>,
    /// Last computed average
    value: f32,
}

impl<const K: usize> RateFilter<K> {
    /// Create filter with geometric weights `1, 1/2, 1/4, ...`
    pub fn new() -> Self {
        let mut weights = [0.0; K];
        let mut weight = 1.0;
        for w in weights.iter_mut() {
            *w = weight;
            weight /= 2.0;
        }

        Self {
            weights,
            history: Deque::new(),
            value: 0.0,
        }
    }

    /// Add a sample and return the updated average
    pub fn add(&mut self, sample: f32) -> f32 {
        if self.history.is_full() {
            self.history.pop_back();
        }
        // Cannot fail, room was made above
        let _ = self.history.push_front(sample);

        let mut weighted = 0.0;
        let mut total = 0.0;
        for (sample, weight) in self.history.iter().zip(self.weights.iter()) {
            weighted += sample * weight;
            total += weight;
        }

        self.value = if total > 0.0 { weighted / total } else { 0.0 };
        self.value
    }

    /// Last computed average, zero when no sample has been added
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Number of samples contributing to the average
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Check if no samples have been added since creation or last clear
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Drop all history
    pub fn clear(&mut self) {
        self.history.clear();
        self.value = 0.0;
    }

    /// Filter weights, newest sample first
    pub fn weights(&self) -> &[f32; K] {
        &self.weights
    }
}

impl<const K: usize> Default for RateFilter<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        a - b < 1e-3 && b - a < 1e-3
    }

    #[test]
    fn test_weights_are_geometric() {
        let filter: RateFilter<5> = RateFilter::new();
        assert_eq!(filter.weights(), &[1.0, 0.5, 0.25, 0.125, 0.0625]);
        assert!(filter.is_empty());
        assert_eq!(filter.value(), 0.0);
    }

    #[test]
    fn test_constant_input_converges() {
        let mut filter: RateFilter = RateFilter::new();
        filter.add(500.0);
        filter.add(10.0);
        let mut value = 0.0;
        for _ in 0..RATE_FILTER_ORDER {
            value = filter.add(60.0);
        }
        assert!(close(value, 60.0));
        assert_eq!(filter.len(), RATE_FILTER_ORDER);
    }

    #[test]
    fn test_newest_sample_weighs_most() {
        let mut filter: RateFilter<2> = RateFilter::new();
        filter.add(0.0);
        // (1 * 30 + 0.5 * 0) / 1.5
        assert!(close(filter.add(30.0), 20.0));
        // Oldest sample drops out: (1 * 0 + 0.5 * 30) / 1.5
        assert!(close(filter.add(0.0), 10.0));
    }

    #[test]
    fn test_clear_discards_history() {
        let mut filter: RateFilter = RateFilter::new();
        for _ in 0..10 {
            filter.add(1000.0);
        }
        filter.clear();
        assert!(filter.is_empty());
        assert_eq!(filter.value(), 0.0);
        assert!(close(filter.add(12.0), 12.0));
    }
}
