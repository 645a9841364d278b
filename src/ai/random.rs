use rand::rngs::StdRng;
use rand::SeedableRng;

use super::policy::Policy;
use crate::game::{Action, Board};

/// A policy that picks a direction uniformly at random and estimates
/// every position at zero.
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new() -> Self {
        RandomPolicy {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        RandomPolicy {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &str {
        "Random"
    }

    fn select_action(&mut self, _board: &Board) -> (Action, f32) {
        (Action::random(&mut self.rng), 0.0)
    }

    fn copy_weights(&mut self, _from: &Self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{BoardBuilder, Direction};

    #[test]
    fn test_random_policy_covers_every_direction() {
        let mut policy = RandomPolicy::with_seed(5);
        let board = BoardBuilder::new().set_size(4).set_unit(2).build().unwrap();
        let mut seen = [false; Direction::COUNT];

        for _ in 0..200 {
            let (action, value) = policy.select_action(&board);
            assert_eq!(value, 0.0);
            seen[action.data()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_random_policy_has_nothing_to_persist() {
        let policy = RandomPolicy::new();
        let dir = tempfile::tempdir().unwrap();
        assert!(policy.persist(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_random_policy_name() {
        assert_eq!(RandomPolicy::new().name(), "Random");
    }
}
