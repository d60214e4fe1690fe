use serde::Serialize;

/// Points for landing a piece, before row bonuses.
const LANDING_POINTS: u64 = 1;
/// Points per completed row, counted once per row of a multi-row clear.
const ROW_POINTS: u64 = 100;

/// Longest run of rows a single piece can complete, plus one.
const HISTOGRAM_LEN: usize = 5;

/// Score and counters of one session.
///
/// # Scoring
///
/// Every landing scores `1 + 100 * rows`, where `rows` is the number of rows
/// the landing completed. There is no level or combo bonus.
///
/// # Example
///
/// ```
/// use bentris_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(0);
/// stats.complete_piece_drop(2);
///
/// assert_eq!(stats.score(), 202);
/// assert_eq!(stats.landed_pieces(), 2);
/// assert_eq!(stats.total_cleared_rows(), 2);
/// assert_eq!(stats.row_clear_histogram(), &[1, 0, 1, 0, 0]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: u64,
    landed_pieces: usize,
    total_cleared_rows: usize,
    row_clear_histogram: [usize; HISTOGRAM_LEN],
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            landed_pieces: 0,
            total_cleared_rows: 0,
            row_clear_histogram: [0; HISTOGRAM_LEN],
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub const fn landed_pieces(&self) -> usize {
        self.landed_pieces
    }

    #[must_use]
    pub const fn total_cleared_rows(&self) -> usize {
        self.total_cleared_rows
    }

    /// Landings by number of rows they completed: index `n` counts the
    /// landings that cleared exactly `n` rows.
    #[must_use]
    pub const fn row_clear_histogram(&self) -> &[usize; HISTOGRAM_LEN] {
        &self.row_clear_histogram
    }

    /// Records one landing that completed `cleared_rows` rows.
    pub const fn complete_piece_drop(&mut self, cleared_rows: usize) {
        self.landed_pieces += 1;
        self.total_cleared_rows += cleared_rows;
        if cleared_rows < self.row_clear_histogram.len() {
            self.row_clear_histogram[cleared_rows] += 1;
        }
        self.score += LANDING_POINTS + ROW_POINTS * cleared_rows as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_without_rows_scores_one() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(0);
        assert_eq!(stats.score(), 1);
        assert_eq!(stats.row_clear_histogram()[0], 1);
    }

    #[test]
    fn test_double_scores_two_hundred_one() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(2);
        assert_eq!(stats.score(), 201);
        assert_eq!(stats.total_cleared_rows(), 2);
    }

    #[test]
    fn test_accumulates() {
        let mut stats = GameStats::default();
        for rows in [0, 1, 4, 0, 3] {
            stats.complete_piece_drop(rows);
        }
        assert_eq!(stats.score(), 5 + 800);
        assert_eq!(stats.landed_pieces(), 5);
        assert_eq!(stats.total_cleared_rows(), 8);
        assert_eq!(stats.row_clear_histogram(), &[2, 1, 0, 1, 1]);
    }
}
