use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

use crate::training::episode::Transition;

/// Fixed-capacity ring buffer for storing training transitions.
pub struct ReplayBuffer {
    buffer: Vec<Transition>,
    capacity: usize,
    position: usize,
    rng: StdRng,
}

impl ReplayBuffer {
    pub fn new(capacity: usize) -> Self {
        Self::with_rng(capacity, StdRng::from_os_rng())
    }

    pub fn with_seed(capacity: usize, seed: u64) -> Self {
        Self::with_rng(capacity, StdRng::seed_from_u64(seed))
    }

    fn with_rng(capacity: usize, rng: StdRng) -> Self {
        assert!(capacity > 0, "replay capacity must be > 0");
        ReplayBuffer {
            buffer: Vec::with_capacity(capacity),
            capacity,
            position: 0,
            rng,
        }
    }

    /// Add a transition to the buffer. Overwrites oldest when full.
    pub fn push(&mut self, transition: Transition) {
        if self.buffer.len() < self.capacity {
            self.buffer.push(transition);
        } else {
            self.buffer[self.position] = transition;
        }
        self.position = (self.position + 1) % self.capacity;
    }

    /// Sample a random batch of distinct transitions.
    pub fn sample(&mut self, batch_size: usize) -> Vec<Transition> {
        assert!(
            batch_size <= self.buffer.len(),
            "Not enough transitions to sample"
        );
        let indices = index::sample(&mut self.rng, self.buffer.len(), batch_size);
        indices.iter().map(|i| self.buffer[i].clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
