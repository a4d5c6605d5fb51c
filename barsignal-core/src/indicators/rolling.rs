//! Incremental rolling-window primitives.
//!
//! Every windowed indicator advances one bar at a time over a fixed-size
//! buffer instead of rescanning the whole window:
//! - `RollingWindow`: running sum and shifted sum of squares (mean, sample variance)
//! - `RollingExtreme`: monotonic deque for trailing max or min
//!
//! Missing samples (`None`) occupy a slot like any other value; any statistic
//! over a window that contains one is undefined. A window whose samples are
//! all identical reports that value as its mean and a variance of exactly 0,
//! whatever was added and evicted before.

use std::collections::VecDeque;

/// Fixed-capacity window with O(1) amortized mean and sample variance.
///
/// Sums are kept relative to a shift `k` taken from the window itself. The
/// shift is re-anchored to the oldest buffered value each time the window
/// turns over, so the sums stay small however far prices drift.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    capacity: usize,
    values: VecDeque<Option<f64>>,
    missing: usize,
    /// Length of the trailing run of identical defined samples.
    run: usize,
    shift: Option<f64>,
    since_anchor: usize,
    sum: f64,
    sum_sq: f64,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "rolling window capacity must be >= 1");
        Self {
            capacity,
            values: VecDeque::with_capacity(capacity),
            missing: 0,
            run: 0,
            shift: None,
            since_anchor: 0,
            sum: 0.0,
            sum_sq: 0.0,
        }
    }

    /// Push the next sample, evicting the oldest once the window is full.
    pub fn push(&mut self, value: Option<f64>) {
        if self.values.len() == self.capacity {
            if let Some(evicted) = self.values.pop_front() {
                self.remove(evicted);
            }
        }
        self.run = match (value, self.values.back()) {
            (Some(v), Some(Some(last))) if v == *last => self.run + 1,
            (Some(_), _) => 1,
            (None, _) => 0,
        };
        self.add(value);
        self.values.push_back(value);

        self.since_anchor += 1;
        if self.since_anchor >= self.capacity {
            self.reanchor();
        }
    }

    fn add(&mut self, value: Option<f64>) {
        match value {
            Some(v) => {
                let k = *self.shift.get_or_insert(v);
                let d = v - k;
                self.sum += d;
                self.sum_sq += d * d;
            }
            None => self.missing += 1,
        }
    }

    fn remove(&mut self, value: Option<f64>) {
        match value {
            Some(v) => {
                // shift is always set once a defined value has entered
                let k = self.shift.unwrap_or(v);
                let d = v - k;
                self.sum -= d;
                self.sum_sq -= d * d;
            }
            None => self.missing -= 1,
        }
    }

    /// Rebuild the sums around the oldest defined sample in the buffer.
    fn reanchor(&mut self) {
        self.since_anchor = 0;
        let Some(k) = self.values.iter().flatten().copied().next() else {
            return;
        };
        self.shift = Some(k);
        self.sum = 0.0;
        self.sum_sq = 0.0;
        for v in self.values.iter().flatten() {
            let d = v - k;
            self.sum += d;
            self.sum_sq += d * d;
        }
    }

    /// True once `capacity` samples have been pushed.
    pub fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }

    /// Full window with no missing samples.
    pub fn is_complete(&self) -> bool {
        self.is_full() && self.missing == 0
    }

    /// Every slot holds the same defined value.
    fn is_constant(&self) -> bool {
        self.run >= self.capacity
    }

    pub fn mean(&self) -> Option<f64> {
        if !self.is_complete() {
            return None;
        }
        if self.is_constant() {
            return self.values.back().copied().flatten();
        }
        let k = self.shift?;
        Some(k + self.sum / self.capacity as f64)
    }

    /// Sample variance (divide by n - 1). Undefined for a single-slot window.
    pub fn sample_variance(&self) -> Option<f64> {
        if !self.is_complete() || self.capacity < 2 {
            return None;
        }
        if self.is_constant() {
            return Some(0.0);
        }
        let n = self.capacity as f64;
        let variance = (self.sum_sq - self.sum * self.sum / n) / (n - 1.0);
        // Rounding can push a near-zero spread slightly negative.
        Some(variance.max(0.0))
    }

    pub fn sample_std(&self) -> Option<f64> {
        self.sample_variance().map(f64::sqrt)
    }
}

/// Which extreme a `RollingExtreme` tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Max,
    Min,
}

/// Trailing maximum or minimum over a fixed window, amortized O(1) per push.
#[derive(Debug, Clone)]
pub struct RollingExtreme {
    period: usize,
    kind: Extreme,
    /// (position, value), values monotonic from front to back.
    deque: VecDeque<(usize, f64)>,
    pushed: usize,
}

impl RollingExtreme {
    pub fn new(period: usize, kind: Extreme) -> Self {
        assert!(period >= 1, "rolling extreme period must be >= 1");
        Self {
            period,
            kind,
            deque: VecDeque::with_capacity(period),
            pushed: 0,
        }
    }

    pub fn max(period: usize) -> Self {
        Self::new(period, Extreme::Max)
    }

    pub fn min(period: usize) -> Self {
        Self::new(period, Extreme::Min)
    }

    /// Push the next value and return the extreme over the trailing window,
    /// or `None` while fewer than `period` values have been seen.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        let position = self.pushed;
        self.pushed += 1;

        while let Some(&(_, back)) = self.deque.back() {
            let dominated = match self.kind {
                Extreme::Max => back <= value,
                Extreme::Min => back >= value,
            };
            if !dominated {
                break;
            }
            self.deque.pop_back();
        }
        self.deque.push_back((position, value));

        while let Some(&(front, _)) = self.deque.front() {
            if front + self.period <= position {
                self.deque.pop_front();
            } else {
                break;
            }
        }

        if self.pushed < self.period {
            return None;
        }
        self.deque.front().map(|&(_, v)| v)
    }
}
