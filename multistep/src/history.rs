use std::ops::Deref;

use crate::Integrable;

/// Ordered record of the derivative samples of one integrated quantity,
/// oldest first. The last sample is the derivative for the step about to be
/// taken.
///
/// Without a limit the history grows by one sample per step for the life of
/// the simulation. With a limit the oldest samples are dropped once it is
/// exceeded; a limit of at least the integrator's max order gives identical
/// results since older samples never take part in a step.
#[derive(Clone, Debug)]
pub struct DerivativeHistory<T: Integrable> {
    samples: Vec<T>,
    limit: Option<usize>,
}

impl<T: Integrable> Default for DerivativeHistory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Integrable> DerivativeHistory<T> {
    /// Creates an empty, unbounded history.
    pub fn new() -> Self {
        Self {
            samples: Vec::new(),
            limit: None,
        }
    }

    /// Creates an empty history that keeps at most `limit` samples.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            samples: Vec::with_capacity(limit + 1),
            limit: Some(limit),
        }
    }

    /// Creates a history seeded with one sample.
    pub fn seeded(sample: T) -> Self {
        let mut history = Self::new();
        history.push(sample);
        history
    }

    /// Appends the newest sample.
    pub fn push(&mut self, sample: T) {
        self.samples.push(sample);
        if let Some(limit) = self.limit {
            if self.samples.len() > limit {
                let excess = self.samples.len() - limit;
                self.samples.drain(..excess);
            }
        }
    }

    pub fn latest(&self) -> Option<&T> {
        self.samples.last()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn as_slice(&self) -> &[T] {
        &self.samples
    }
}

impl<T: Integrable> Deref for DerivativeHistory<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.samples
    }
}
