/// Points for clearing `rows` rows in a single lock: `10n + 5n²`.
pub fn clear_bonus(rows: u32) -> u32 {
    10 * rows + 5 * rows * rows
}

#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct ScoreTracker {
    score: u32,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Adds the bonus for one clearing event and returns the new total.
    pub fn record_clear(&mut self, rows: u32) -> u32 {
        self.score = self.score.saturating_add(clear_bonus(rows));
        self.score
    }

    pub fn reset(&mut self) {
        self.score = 0;
    }
}
