use crate::board::{Board, Position};
use crate::piece::{absolute_positions, Orientation, PieceKind};

/// Whether a piece of `kind` in `orientation` anchored at `anchor` overlaps a
/// wall, the floor, or a settled block.
///
/// There is no ceiling: blocks above row 0 never collide.
pub fn has_collision(board: &Board, kind: PieceKind, orientation: Orientation, anchor: Position) -> bool {
    absolute_positions(kind, orientation, anchor)
        .iter()
        .any(|&pos| is_blocked(board, pos))
}

fn is_blocked(board: &Board, pos: Position) -> bool {
    if pos.x < 0 || pos.x as usize >= board.width() {
        return true;
    }
    if pos.y >= board.height() as i16 {
        return true;
    }
    board.is_occupied(pos)
}
