//! Bounded trailing window of observations.

use std::collections::VecDeque;

/// Fixed-capacity FIFO of the most recent values
#[derive(Debug, Clone)]
pub struct RollingWindow {
    values: VecDeque<f64>,
    capacity: usize,
}

/// Mean and sample standard deviation of a window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    pub mean: f64,
    pub stddev: f64,
    pub points: usize,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a value, evicting the oldest once full
    pub fn push(&mut self, value: f64) {
        if self.capacity == 0 {
            return;
        }
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Statistics of the current contents
    ///
    /// `None` until at least two values are held, since a sample
    /// standard deviation needs n - 1 > 0.
    pub fn baseline(&self) -> Option<Baseline> {
        let n = self.values.len();
        if n < 2 {
            return None;
        }

        let mean = self.values.iter().sum::<f64>() / n as f64;
        let variance = self
            .values
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / (n - 1) as f64;

        Some(Baseline {
            mean,
            stddev: variance.sqrt(),
            points: n,
        })
    }
}
