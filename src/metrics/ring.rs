//! Bounded, time-ordered heart-rate history.

use std::collections::VecDeque;

use crate::types::HeartRateSample;

/// Keeps the most recent `capacity` samples in ascending timestamp order.
#[derive(Debug, Clone)]
pub struct SampleRing {
    samples: VecDeque<HeartRateSample>,
    capacity: usize,
}

impl SampleRing {
    /// `capacity` is raised to 1 if zero.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<&HeartRateSample> {
        self.samples.back()
    }

    /// Append a sample, evicting the oldest once full. Returns false and
    /// stores nothing if the sample is invalid or not newer than the
    /// latest retained sample.
    pub fn push(&mut self, sample: HeartRateSample) -> bool {
        if !sample.is_valid() {
            return false;
        }
        if let Some(latest) = self.samples.back() {
            if sample.timestamp <= latest.timestamp {
                return false;
            }
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
        true
    }

    /// Push a batch in timestamp order. Returns how many were kept.
    pub fn extend<I>(&mut self, samples: I) -> usize
    where
        I: IntoIterator<Item = HeartRateSample>,
    {
        let mut batch: Vec<HeartRateSample> = samples.into_iter().collect();
        batch.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        let mut kept = 0;
        for sample in batch {
            if self.push(sample) {
                kept += 1;
            }
        }
        kept
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeartRateSample> {
        self.samples.iter()
    }

    pub fn to_vec(&self) -> Vec<HeartRateSample> {
        self.samples.iter().cloned().collect()
    }
}
