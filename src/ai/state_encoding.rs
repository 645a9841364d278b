use burn::prelude::*;
use burn::tensor::TensorData;

use crate::game::Board;

/// Encode a board as a tensor of shape [1, size * size].
///
/// Cells are read row-major. An empty cell encodes as 0.0 and a tile `t`
/// as `log2(t / unit) + 1`, so a fresh tile is 1.0 and each merge adds 1.0.
pub fn encode_board<B: Backend>(board: &Board, device: &B::Device) -> Tensor<B, 2> {
    let data = encode_board_flat(board);
    let width = data.len();
    Tensor::<B, 1>::from_data(TensorData::from(data.as_slice()), device).reshape([1, width as i32])
}

/// Encode multiple boards as a batched tensor of shape [batch, size * size].
/// All boards must share one size.
pub fn encode_boards_batch<B: Backend>(boards: &[&Board], device: &B::Device) -> Tensor<B, 2> {
    let batch_size = boards.len();
    let width = boards.first().map(|b| b.cells().len()).unwrap_or(0);
    let mut flat = Vec::with_capacity(batch_size * width);
    for board in boards {
        flat.extend(encode_board_flat(board));
    }
    Tensor::<B, 1>::from_data(TensorData::from(flat.as_slice()), device)
        .reshape([batch_size as i32, width as i32])
}

/// Produce the flat f32 encoding for a single board.
pub fn encode_board_flat(board: &Board) -> Vec<f32> {
    let unit = board.unit();
    board
        .cells()
        .iter()
        .map(|&tile| {
            if tile == Board::EMPTY {
                0.0
            } else {
                (tile as f32 / unit as f32).log2() + 1.0
            }
        })
        .collect()
}
