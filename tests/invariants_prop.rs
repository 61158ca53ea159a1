//! Property tests for the core rules.
//!
//! Invariants covered:
//! - The collision predicate agrees with a direct bounds-and-occupancy check.
//! - Rejected moves and rotations leave the active piece untouched.
//! - Every lock allocates exactly four consecutive ids at the landing cells.
//! - Clearing lines reaches a fixed point: a second pass changes nothing.
use std::collections::HashSet;

use blockfall::board::{Board, Position};
use blockfall::collision::has_collision;
use blockfall::game::{test_helpers::*, Game, GameEvent, DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH};
use blockfall::piece::{ActivePiece, Color, Orientation, PieceKind};
use proptest::prelude::*;

const W: i16 = DEFAULT_BOARD_WIDTH as i16;
const H: i16 = DEFAULT_BOARD_HEIGHT as i16;

fn kind_strategy() -> impl Strategy<Value = PieceKind> {
    (0usize..PieceKind::ALL.len()).prop_map(|i| PieceKind::ALL[i])
}

fn orientation_strategy() -> impl Strategy<Value = Orientation> {
    (0u8..4).prop_map(Orientation::new)
}

/// Cells in the lower part of the board, clear of the spawn area.
fn low_cells() -> impl Strategy<Value = Vec<(i16, i16)>> {
    prop::collection::vec((0..W, 6..H), 0..70)
}

/// Settles `cells` into a fresh game, leaving column `gap` of every row open.
fn game_with_cells(cells: &[(i16, i16)], gap: i16) -> Game {
    let mut game = game_with_sequence(PieceKind::ALL.to_vec());
    let mut seen = HashSet::new();
    for &(x, y) in cells {
        if x != gap && seen.insert((x, y)) {
            settle_block(&mut game, x, y, Color::Red);
        }
    }
    game.take_events();
    game
}

proptest! {
    #[test]
    fn collision_matches_bounds_and_occupancy(
        cells in prop::collection::vec((0..W, 0..H), 0..80),
        kind in kind_strategy(),
        orientation in orientation_strategy(),
        x in -3i16..W + 3,
        y in -4i16..H + 3,
    ) {
        let mut board = Board::new(DEFAULT_BOARD_WIDTH, DEFAULT_BOARD_HEIGHT);
        let occupied: HashSet<(i16, i16)> = cells.iter().copied().collect();
        for (id, &(cx, cy)) in occupied.iter().enumerate() {
            board.occupy(Position::new(cx, cy), id as u32);
        }

        let anchor = Position::new(x, y);
        let expected = ActivePiece::new_at(kind, orientation, x, y)
            .blocks()
            .iter()
            .any(|p| p.x < 0 || p.x >= W || p.y >= H || occupied.contains(&(p.x, p.y)));

        prop_assert_eq!(has_collision(&board, kind, orientation, anchor), expected);
    }

    #[test]
    fn rejected_commands_leave_piece_unchanged(
        cells in low_cells(),
        kind in kind_strategy(),
        orientation in orientation_strategy(),
        x in 0i16..W,
        y in 1i16..H - 1,
        command in 0u8..3,
    ) {
        let mut game = game_with_cells(&cells, -1);
        let before = ActivePiece::new_at(kind, orientation, x, y);
        prop_assume!(!game.collides(&before));
        place_piece(&mut game, before);

        let accepted = match command {
            0 => game.move_left(),
            1 => game.move_right(),
            _ => game.rotate(),
        };

        let after = *game.active_piece().expect("active piece");
        let events = game.take_events();
        if accepted {
            prop_assert!(!game.collides(&after));
            prop_assert_eq!(events.len(), 1);
        } else {
            prop_assert_eq!(after, before);
            prop_assert!(events.is_empty());
        }
    }

    #[test]
    fn lock_allocates_four_consecutive_ids(
        cells in low_cells(),
        gap in 0..W,
        moves in -4i16..5,
        turns in 0u8..4,
    ) {
        let mut game = game_with_cells(&cells, gap);
        for _ in 0..turns {
            game.rotate();
        }
        for _ in 0..moves.abs() {
            if moves < 0 { game.move_left(); } else { game.move_right(); }
        }
        game.take_events();

        let mut landing = *game.active_piece().expect("active piece");
        loop {
            let below = ActivePiece { anchor: landing.anchor.offset(0, 1), ..landing };
            if game.collides(&below) {
                break;
            }
            landing = below;
        }
        let first = game.next_block_id();

        let outcome = game.hard_drop().expect("lock outcome");
        prop_assume!(!outcome.game_over);

        prop_assert_eq!(outcome.first_id, first);
        prop_assert_eq!(game.next_block_id(), first + 4);

        let locked = game
            .take_events()
            .into_iter()
            .find_map(|e| match e {
                GameEvent::PieceLocked(blocks) => Some(blocks),
                _ => None,
            })
            .expect("PieceLocked event");
        let ids: Vec<u32> = locked.iter().map(|b| b.id).collect();
        let positions: Vec<Position> = locked.iter().map(|b| b.position).collect();
        prop_assert_eq!(ids, (first..first + 4).collect::<Vec<_>>());
        prop_assert_eq!(positions, landing.blocks().to_vec());
    }

    #[test]
    fn clearing_reaches_fixed_point(
        cells in low_cells(),
        full_rows in prop::collection::vec(6usize..DEFAULT_BOARD_HEIGHT, 0..4),
    ) {
        let mut game = game_with_cells(&cells, -1);
        for row in full_rows {
            for x in 0..W {
                if !game.board().is_occupied(Position::new(x, row as i16)) {
                    settle_block(&mut game, x, row as i16, Color::Blue);
                }
            }
        }

        game.clear_lines();
        game.take_events();
        let board = game.board().clone();
        let blocks = game.settled_blocks().clone();
        let score = game.score();

        prop_assert_eq!(game.clear_lines(), 0);
        prop_assert_eq!(game.board(), &board);
        prop_assert_eq!(game.settled_blocks(), &blocks);
        prop_assert_eq!(game.score(), score);
        prop_assert!(game.take_events().is_empty());

        for block in game.settled_blocks().iter() {
            prop_assert_eq!(game.board().get(block.position), Some(block.id));
        }
    }
}
