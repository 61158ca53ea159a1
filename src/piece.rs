use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::board::Position;

// ============================================================================
// Configuration
// ============================================================================

pub const BLOCKS_PER_PIECE: usize = 4;
pub const ORIENTATION_COUNT: u8 = 4;

/// Row every new piece is anchored on.
pub const SPAWN_ROW: i16 = 1;

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PieceKind {
    Square,
    Line,
    ZigzagDown,
    ZigzagUp,
    T,
    L,
    J,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Color {
    Green,
    Blue,
    Orange,
    Maroon,
    Red,
    Purple,
    OrangeRed,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::Square,
        PieceKind::Line,
        PieceKind::ZigzagDown,
        PieceKind::ZigzagUp,
        PieceKind::T,
        PieceKind::L,
        PieceKind::J,
    ];

    pub fn color(self) -> Color {
        match self {
            PieceKind::Square => Color::Green,
            PieceKind::Line => Color::Blue,
            PieceKind::ZigzagDown => Color::Orange,
            PieceKind::ZigzagUp => Color::Maroon,
            PieceKind::T => Color::Red,
            PieceKind::L => Color::Purple,
            PieceKind::J => Color::OrangeRed,
        }
    }

    fn table_index(self) -> usize {
        match self {
            PieceKind::Square => 0,
            PieceKind::Line => 1,
            PieceKind::ZigzagDown => 2,
            PieceKind::ZigzagUp => 3,
            PieceKind::T => 4,
            PieceKind::L => 5,
            PieceKind::J => 6,
        }
    }
}

/// One of the four rotation states of a piece.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Orientation(u8);

impl Orientation {
    pub const SPAWN: Orientation = Orientation(0);

    pub fn new(index: u8) -> Self {
        assert!(
            index < ORIENTATION_COUNT,
            "orientation index out of range: {index}"
        );
        Self(index)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn next(self) -> Self {
        Self((self.0 + 1) % ORIENTATION_COUNT)
    }

    pub fn prev(self) -> Self {
        Self((self.0 + ORIENTATION_COUNT - 1) % ORIENTATION_COUNT)
    }
}

// ============================================================================
// Geometry Table
// ============================================================================

pub type Offsets = [(i16, i16); BLOCKS_PER_PIECE];

// Hand-authored per orientation. Several entries are not 90 degree
// rotations of their neighbours; keep them as they are.
const SHAPES: [[Offsets; 4]; 7] = [
    // Square
    [
        [(0, 0), (1, 0), (0, 1), (1, 1)],
        [(1, 0), (1, 1), (0, 0), (0, 1)],
        [(1, 1), (0, 1), (1, 0), (0, 0)],
        [(0, 1), (0, 0), (1, 1), (1, 0)],
    ],
    // Line
    [
        [(-1, 0), (0, 0), (1, 0), (2, 0)],
        [(0, -1), (0, 0), (0, 1), (0, 2)],
        [(1, 0), (0, 0), (-1, 0), (-2, 0)],
        [(0, 1), (0, 0), (0, -1), (0, -2)],
    ],
    // ZigzagDown
    [
        [(-1, 0), (0, 0), (0, 1), (1, 1)],
        [(0, -1), (0, 0), (-1, 0), (-1, 1)],
        [(1, 0), (0, 0), (0, -1), (-1, -1)],
        [(0, 1), (0, 0), (1, 0), (1, -1)],
    ],
    // ZigzagUp
    [
        [(-1, 0), (0, 0), (0, -1), (1, -1)],
        [(0, -1), (0, 0), (1, 0), (1, 1)],
        [(1, 0), (0, 0), (0, 1), (-1, 1)],
        [(0, 1), (0, 0), (-1, 0), (-1, -1)],
    ],
    // T
    [
        [(-1, 0), (0, 0), (1, 0), (0, 1)],
        [(0, -1), (0, 0), (0, 1), (-1, 0)],
        [(1, 0), (0, 0), (-1, 0), (0, -1)],
        [(0, 1), (0, 0), (0, -1), (1, 0)],
    ],
    // L
    [
        [(0, -1), (0, 0), (0, 1), (1, 1)],
        [(1, 0), (0, 0), (-1, 0), (-1, 1)],
        [(0, 1), (0, 0), (0, -1), (-1, -1)],
        [(-1, 0), (0, 0), (1, 0), (1, -1)],
    ],
    // J
    [
        [(0, -1), (0, 0), (0, 1), (-1, 1)],
        [(1, 0), (0, 0), (-1, 0), (-1, -1)],
        [(0, 1), (0, 0), (0, -1), (1, -1)],
        [(-1, 0), (0, 0), (1, 0), (1, 1)],
    ],
];

pub fn offsets(kind: PieceKind, orientation: Orientation) -> &'static Offsets {
    &SHAPES[kind.table_index()][orientation.index() as usize]
}

/// Offset of one block of `kind` in `orientation`, relative to the anchor.
pub fn relative_offset(kind: PieceKind, orientation: Orientation, block_index: usize) -> (i16, i16) {
    assert!(
        block_index < BLOCKS_PER_PIECE,
        "block index out of range: {block_index}"
    );
    offsets(kind, orientation)[block_index]
}

pub fn absolute_positions(
    kind: PieceKind,
    orientation: Orientation,
    anchor: Position,
) -> [Position; BLOCKS_PER_PIECE] {
    let shape = *offsets(kind, orientation);
    shape.map(|(dx, dy)| anchor.offset(dx, dy))
}

// ============================================================================
// Active Piece
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub orientation: Orientation,
    pub anchor: Position,
}

impl ActivePiece {
    /// A fresh piece at the spawn point of a board `board_width` columns wide.
    pub fn spawn(kind: PieceKind, board_width: usize) -> Self {
        Self {
            kind,
            orientation: Orientation::SPAWN,
            anchor: Position::new((board_width / 2) as i16, SPAWN_ROW),
        }
    }

    pub fn new_at(kind: PieceKind, orientation: Orientation, x: i16, y: i16) -> Self {
        Self {
            kind,
            orientation,
            anchor: Position::new(x, y),
        }
    }

    pub fn blocks(&self) -> [Position; BLOCKS_PER_PIECE] {
        absolute_positions(self.kind, self.orientation, self.anchor)
    }

    pub(crate) fn moved(&self, dx: i16, dy: i16) -> Self {
        Self {
            anchor: self.anchor.offset(dx, dy),
            ..*self
        }
    }

    pub(crate) fn rotated(&self) -> Self {
        Self {
            orientation: self.orientation.next(),
            ..*self
        }
    }
}

// ============================================================================
// Piece Provider Trait
// ============================================================================

pub trait PieceProvider {
    fn next_piece(&mut self) -> PieceKind;
}

/// Six-kind spawn pool of the classic selection, which never deals `J`.
pub const LEGACY_SPAWN_POOL: [PieceKind; 6] = [
    PieceKind::Line,
    PieceKind::ZigzagDown,
    PieceKind::ZigzagUp,
    PieceKind::Square,
    PieceKind::T,
    PieceKind::L,
];

/// Draws kinds uniformly from a pool.
pub struct RandomPieceProvider {
    rng: StdRng,
    pool: &'static [PieceKind],
}

impl RandomPieceProvider {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            pool: &PieceKind::ALL,
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            pool: &PieceKind::ALL,
        }
    }

    /// Restricts draws to [`LEGACY_SPAWN_POOL`].
    pub fn legacy(mut self) -> Self {
        self.pool = &LEGACY_SPAWN_POOL;
        self
    }
}

impl Default for RandomPieceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceProvider for RandomPieceProvider {
    fn next_piece(&mut self) -> PieceKind {
        self.pool[self.rng.gen_range(0..self.pool.len())]
    }
}

pub struct SequencePieceProvider {
    pieces: Vec<PieceKind>,
    index: usize,
}

impl SequencePieceProvider {
    pub fn new(pieces: Vec<PieceKind>) -> Self {
        assert!(!pieces.is_empty(), "piece sequence must not be empty");
        Self { pieces, index: 0 }
    }
}

impl PieceProvider for SequencePieceProvider {
    fn next_piece(&mut self) -> PieceKind {
        let piece = self.pieces[self.index % self.pieces.len()];
        self.index += 1;
        piece
    }
}
