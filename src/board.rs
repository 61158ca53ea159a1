use crate::piece::Color;

// ============================================================================
// Types
// ============================================================================

pub type BlockId = u32;

/// A (column, row) cell coordinate. Row 0 is the top of the board.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

impl Position {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i16, dy: i16) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// A block frozen in place by a lock.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SettledBlock {
    pub id: BlockId,
    pub position: Position,
    pub color: Color,
}

// ============================================================================
// Board
// ============================================================================

/// Occupancy grid. Each cell is empty or holds the id of the settled block
/// sitting there.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Option<BlockId>>,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "board must have at least one cell");
        assert!(
            width <= i16::MAX as usize && height <= i16::MAX as usize,
            "board dimensions exceed the coordinate range"
        );
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.contains(pos)
            .then(|| pos.y as usize * self.width + pos.x as usize)
    }

    /// The block id at `pos`, or `None` for empty cells and cells off the grid.
    pub fn get(&self, pos: Position) -> Option<BlockId> {
        self.index(pos).and_then(|i| self.cells[i])
    }

    pub fn is_occupied(&self, pos: Position) -> bool {
        self.get(pos).is_some()
    }

    /// Marks `pos` with `id`. Returns false when `pos` is off the grid.
    pub fn occupy(&mut self, pos: Position, id: BlockId) -> bool {
        match self.index(pos) {
            Some(i) => {
                self.cells[i] = Some(id);
                true
            }
            None => false,
        }
    }

    pub fn vacate(&mut self, pos: Position) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = None;
        }
    }

    pub fn row(&self, row: usize) -> &[Option<BlockId>] {
        let start = row * self.width;
        &self.cells[start..start + self.width]
    }

    pub fn is_row_complete(&self, row: usize) -> bool {
        self.row(row).iter().all(Option::is_some)
    }

    /// Moves every row above `cleared_row` down by one, overwriting
    /// `cleared_row`. Row 0 is left empty.
    pub fn shift_down_above(&mut self, cleared_row: usize) {
        let width = self.width;
        for row in (1..=cleared_row).rev() {
            let src = (row - 1) * width;
            self.cells.copy_within(src..src + width, row * width);
        }
        self.cells[..width].fill(None);
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.occupied_count() == 0
    }
}

// ============================================================================
// Settled Block Store
// ============================================================================

#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct SettledBlocks {
    blocks: Vec<SettledBlock>,
}

impl SettledBlocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, block: SettledBlock) {
        self.blocks.push(block);
    }

    pub fn remove(&mut self, id: BlockId) -> Option<SettledBlock> {
        let index = self.blocks.iter().position(|block| block.id == id)?;
        Some(self.blocks.remove(index))
    }

    pub fn get(&self, id: BlockId) -> Option<&SettledBlock> {
        self.blocks.iter().find(|block| block.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SettledBlock> {
        self.blocks.iter()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    pub fn to_vec(&self) -> Vec<SettledBlock> {
        self.blocks.clone()
    }

    /// Moves every block above `cleared_row` down by one row.
    pub fn shift_down_above(&mut self, cleared_row: i16) {
        for block in self.blocks.iter_mut().filter(|b| b.position.y < cleared_row) {
            block.position.y += 1;
        }
    }
}
