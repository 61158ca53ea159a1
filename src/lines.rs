use crate::board::{Board, SettledBlocks};

/// Removes every complete row, shifting everything above it down, and
/// returns how many rows went.
///
/// Rows are scanned from the floor upward and the scan restarts after each
/// removal, since a shift can complete a row that was already passed. Row 0
/// is never scanned.
pub fn clear_lines(board: &mut Board, blocks: &mut SettledBlocks) -> u32 {
    let mut cleared = 0;
    while let Some(row) = find_complete_row(board) {
        remove_row(board, blocks, row);
        cleared += 1;
    }
    cleared
}

/// The lowest complete row, excluding row 0.
pub fn find_complete_row(board: &Board) -> Option<usize> {
    (1..board.height()).rev().find(|&row| board.is_row_complete(row))
}

fn remove_row(board: &mut Board, blocks: &mut SettledBlocks, row: usize) {
    for id in board.row(row).iter().flatten() {
        blocks.remove(*id);
    }

    board.shift_down_above(row);
    blocks.shift_down_above(row as i16);

    // Blocks locked above the top edge only get a cell once they reach row 0.
    for block in blocks.iter().filter(|block| block.position.y == 0) {
        board.occupy(block.position, block.id);
    }
}
