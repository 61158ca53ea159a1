use crate::board::{BlockId, Board, Position, SettledBlock, SettledBlocks};
use crate::collision::has_collision;
use crate::lines;
use crate::piece::{ActivePiece, Orientation, PieceKind, PieceProvider, RandomPieceProvider};
use crate::score::ScoreTracker;

// ============================================================================
// Configuration
// ============================================================================

pub const DEFAULT_BOARD_WIDTH: usize = 10;
pub const DEFAULT_BOARD_HEIGHT: usize = 15;

// Smallest board on which every kind spawns cleanly.
pub const MIN_BOARD_WIDTH: usize = 5;
pub const MIN_BOARD_HEIGHT: usize = 4;

// ============================================================================
// Types
// ============================================================================

/// Notifications for the presentation layer, drained with [`Game::take_events`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    PieceChanged {
        kind: PieceKind,
        orientation: Orientation,
        anchor: Position,
    },
    PieceLocked(Vec<SettledBlock>),
    RowsCleared {
        count: u32,
        blocks: Vec<SettledBlock>,
        board: Board,
    },
    ScoreChanged(u32),
    GameReset,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LockOutcome {
    /// Id of the first of the four blocks created by the lock.
    pub first_id: BlockId,
    pub rows_cleared: u32,
    /// The next piece could not spawn and the game was reset.
    pub game_over: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TickOutcome {
    /// No active piece to move.
    Idle,
    Fell,
    Locked(LockOutcome),
}

// ============================================================================
// Game
// ============================================================================

pub struct Game {
    board: Board,
    blocks: SettledBlocks,
    active: Option<ActivePiece>,
    next_block_id: BlockId,
    score: ScoreTracker,
    piece_provider: Box<dyn PieceProvider>,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new() -> Self {
        Self::with_provider(
            DEFAULT_BOARD_WIDTH,
            DEFAULT_BOARD_HEIGHT,
            Box::new(RandomPieceProvider::new()),
        )
    }

    pub fn with_provider(width: usize, height: usize, provider: Box<dyn PieceProvider>) -> Self {
        assert!(
            width >= MIN_BOARD_WIDTH && height >= MIN_BOARD_HEIGHT,
            "board must be at least {MIN_BOARD_WIDTH}x{MIN_BOARD_HEIGHT}, got {width}x{height}"
        );

        let mut game = Self {
            board: Board::new(width, height),
            blocks: SettledBlocks::new(),
            active: None,
            next_block_id: 0,
            score: ScoreTracker::new(),
            piece_provider: provider,
            events: Vec::new(),
        };
        game.reset_state();
        game
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn settled_blocks(&self) -> &SettledBlocks {
        &self.blocks
    }

    pub fn active_piece(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn next_block_id(&self) -> BlockId {
        self.next_block_id
    }

    pub fn score(&self) -> u32 {
        self.score.score()
    }

    /// Takes and clears all pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn collides(&self, piece: &ActivePiece) -> bool {
        has_collision(&self.board, piece.kind, piece.orientation, piece.anchor)
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    pub fn move_left(&mut self) -> bool {
        self.shift(-1)
    }

    pub fn move_right(&mut self) -> bool {
        self.shift(1)
    }

    pub fn rotate(&mut self) -> bool {
        let Some(piece) = self.active else {
            return false;
        };
        self.try_replace(piece.rotated())
    }

    /// Drops the piece as far as it goes and locks it there.
    pub fn hard_drop(&mut self) -> Option<LockOutcome> {
        let start = self.active?;
        let mut piece = start;
        loop {
            let below = piece.moved(0, 1);
            if self.collides(&below) {
                break;
            }
            piece = below;
        }

        if piece != start {
            self.active = Some(piece);
            self.push_piece_changed(piece);
        }
        Some(self.lock_and_spawn(piece))
    }

    pub fn tick(&mut self) -> TickOutcome {
        let Some(piece) = self.active else {
            return TickOutcome::Idle;
        };
        if self.try_replace(piece.moved(0, 1)) {
            TickOutcome::Fell
        } else {
            TickOutcome::Locked(self.lock_and_spawn(piece))
        }
    }

    /// Clears complete rows and scores them. Returns the number of rows cleared.
    pub fn clear_lines(&mut self) -> u32 {
        let count = lines::clear_lines(&mut self.board, &mut self.blocks);
        if count > 0 {
            self.events.push(GameEvent::RowsCleared {
                count,
                blocks: self.blocks.to_vec(),
                board: self.board.clone(),
            });
            let score = self.score.record_clear(count);
            self.events.push(GameEvent::ScoreChanged(score));
        }
        count
    }

    /// Starts over on an empty board.
    pub fn reset(&mut self) {
        self.events.push(GameEvent::GameReset);
        self.reset_state();
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn shift(&mut self, dx: i16) -> bool {
        let Some(piece) = self.active else {
            return false;
        };
        self.try_replace(piece.moved(dx, 0))
    }

    fn try_replace(&mut self, candidate: ActivePiece) -> bool {
        if self.collides(&candidate) {
            return false;
        }
        self.active = Some(candidate);
        self.push_piece_changed(candidate);
        true
    }

    fn push_piece_changed(&mut self, piece: ActivePiece) {
        self.events.push(GameEvent::PieceChanged {
            kind: piece.kind,
            orientation: piece.orientation,
            anchor: piece.anchor,
        });
    }

    fn lock_and_spawn(&mut self, piece: ActivePiece) -> LockOutcome {
        self.active = None;

        let first_id = self.next_block_id;
        let color = piece.kind.color();
        let locked: Vec<SettledBlock> = piece
            .blocks()
            .iter()
            .map(|&position| {
                let id = self.next_block_id;
                self.next_block_id += 1;
                SettledBlock { id, position, color }
            })
            .collect();

        for block in &locked {
            self.blocks.insert(*block);
            // Blocks above the top edge stay in the store without a cell.
            self.board.occupy(block.position, block.id);
        }
        self.events.push(GameEvent::PieceLocked(locked));

        let rows_cleared = self.clear_lines();

        let game_over = !self.spawn_piece();
        if game_over {
            self.reset();
        }

        LockOutcome {
            first_id,
            rows_cleared,
            game_over,
        }
    }

    /// Puts a new piece at the spawn point. Returns false, leaving no active
    /// piece, when the spawn point is blocked.
    fn spawn_piece(&mut self) -> bool {
        let kind = self.piece_provider.next_piece();
        let piece = ActivePiece::spawn(kind, self.board.width());
        if self.collides(&piece) {
            return false;
        }
        self.active = Some(piece);
        self.push_piece_changed(piece);
        true
    }

    fn reset_state(&mut self) {
        self.board.clear();
        self.blocks.clear();
        self.active = None;
        self.next_block_id = 0;
        self.score.reset();

        let spawned = self.spawn_piece();
        debug_assert!(spawned, "spawn blocked on an empty board");
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use super::*;
    use crate::piece::{Color, SequencePieceProvider};

    /// A default-sized game whose pieces come from `kinds`, in order.
    pub fn game_with_sequence(kinds: Vec<PieceKind>) -> Game {
        sized_game_with_sequence(DEFAULT_BOARD_WIDTH, DEFAULT_BOARD_HEIGHT, kinds)
    }

    pub fn sized_game_with_sequence(width: usize, height: usize, kinds: Vec<PieceKind>) -> Game {
        let mut game = Game::with_provider(width, height, Box::new(SequencePieceProvider::new(kinds)));
        game.take_events();
        game
    }

    /// Adds a settled block at (x, y) with the next id.
    pub fn settle_block(game: &mut Game, x: i16, y: i16, color: Color) -> BlockId {
        let id = game.next_block_id;
        game.next_block_id += 1;
        let position = Position::new(x, y);
        game.blocks.insert(SettledBlock { id, position, color });
        game.board.occupy(position, id);
        id
    }

    pub fn fill_row(game: &mut Game, y: usize) {
        for x in 0..game.board.width() {
            settle_block(game, x as i16, y as i16, Color::Red);
        }
    }

    pub fn fill_row_with_gap(game: &mut Game, y: usize, gap_x: usize) {
        for x in 0..game.board.width() {
            if x != gap_x {
                settle_block(game, x as i16, y as i16, Color::Red);
            }
        }
    }

    pub fn place_piece(game: &mut Game, piece: ActivePiece) {
        game.active = Some(piece);
    }

    pub fn remove_active(game: &mut Game) {
        game.active = None;
    }
}
