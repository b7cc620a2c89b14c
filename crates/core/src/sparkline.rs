//! Bounded buffer of recent temperature points.

use std::collections::VecDeque;

use serde::Serialize;

/// Number of points retained for the sparkline.
pub const SPARKLINE_CAPACITY: usize = 30;

/// Rolling window of the most recent values; the oldest point is dropped
/// first once the window is full.
#[derive(Debug, Clone)]
pub struct Sparkline {
    points: VecDeque<f64>,
    capacity: usize,
}

/// Serializable view of the sparkline for renderers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SparklineSnapshot {
    pub points: Vec<f64>,
    /// Each point divided by `max(max_point, 1.0)`.
    pub normalized: Vec<f64>,
    pub capacity: usize,
}

impl Default for Sparkline {
    fn default() -> Self {
        Self::with_capacity(SPARKLINE_CAPACITY)
    }
}

impl Sparkline {
    pub fn new() -> Self {
        Self::default()
    }

    /// A window holding at most `capacity` points (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, value: f64) {
        self.points.push_back(value);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn points(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Scale factor used for plotting; never below 1.
    pub fn scale(&self) -> f64 {
        self.points.iter().copied().fold(1.0, f64::max)
    }

    /// Points scaled into `[0, 1]` relative to [`Sparkline::scale`].
    pub fn normalized(&self) -> Vec<f64> {
        let scale = self.scale();
        self.points.iter().map(|v| v / scale).collect()
    }

    pub fn snapshot(&self) -> SparklineSnapshot {
        SparklineSnapshot {
            points: self.points().collect(),
            normalized: self.normalized(),
            capacity: self.capacity,
        }
    }
}
