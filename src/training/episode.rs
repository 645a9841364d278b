use rand::Rng;

use crate::ai::Policy;
use crate::error::BoardError;
use crate::game::{Action, Board, BoardConfig, Tile};

/// A single step of experience for RL training.
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: Board,
    pub action: Action,
    pub reward: f32,
    pub next_state: Board,
    pub done: bool,
}

/// Per-episode knobs supplied by the trainer.
#[derive(Debug, Clone, Copy)]
pub struct EpisodeOptions {
    /// Probability of replacing the policy's choice with a random action.
    pub epsilon: f32,
    pub max_steps: usize,
    /// Reward for a move that leaves the board unchanged.
    pub invalid_move_penalty: f32,
}

impl Default for EpisodeOptions {
    fn default() -> Self {
        EpisodeOptions {
            epsilon: 0.0,
            max_steps: 10_000,
            invalid_move_penalty: -1.0,
        }
    }
}

/// Summary of a single episode.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeResult {
    pub moves: usize,
    pub merges: usize,
    pub max_tile: Tile,
    pub tile_sum: u64,
    /// True if the episode ended because no move could change the board.
    pub terminal: bool,
}

/// Result of playing a single episode.
pub struct EpisodeTrace {
    pub transitions: Vec<Transition>,
    pub result: EpisodeResult,
    pub final_board: Board,
}

/// Play one episode: seed a fresh board, then collapse and reseed until the
/// board is stuck or `max_steps` moves have been made.
///
/// The reward of a move is the number of merges it made (each merge frees
/// exactly one cell), or `invalid_move_penalty` if nothing moved.
pub fn play_episode<P, R>(
    policy: &mut P,
    board_config: &BoardConfig,
    options: &EpisodeOptions,
    rng: &mut R,
) -> Result<EpisodeTrace, BoardError>
where
    P: Policy + ?Sized,
    R: Rng + ?Sized,
{
    let mut board = board_config.new_episode_board(rng)?;
    let mut transitions = Vec::new();
    let mut merges = 0;
    let mut done = !board.is_collapsible();

    while !done && transitions.len() < options.max_steps {
        let action = if rng.random_range(0.0..1.0) < options.epsilon {
            Action::random(rng)
        } else {
            policy.select_action(&board).0
        };

        let state = board.clone();
        let free_before = board.empty_count();
        let reward = if board.collapsed(action.direction()) {
            let merged = board.empty_count() - free_before;
            merges += merged;
            board.seeded(rng);
            merged as f32
        } else {
            options.invalid_move_penalty
        };
        done = !board.is_collapsible();

        transitions.push(Transition {
            state,
            action,
            reward,
            next_state: board.clone(),
            done,
        });
    }

    let result = EpisodeResult {
        moves: transitions.len(),
        merges,
        max_tile: board.max_tile(),
        tile_sum: board.tile_sum(),
        terminal: done,
    };

    Ok(EpisodeTrace {
        transitions,
        result,
        final_board: board,
    })
}
