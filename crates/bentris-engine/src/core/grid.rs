use std::fmt;

use serde::{Serialize, Serializer};

use super::piece::{Piece, PieceKind};

/// Number of columns in the playfield.
pub const GRID_WIDTH: usize = 10;
/// Number of rows in the playfield.
pub const GRID_HEIGHT: usize = 20;

/// A single cell of the grid or of a piece matrix.
///
/// Serializes as its integer tag: `0` for empty, `1..=7` for the kind that
/// filled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(PieceKind),
}

impl Cell {
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Filled(kind) => kind.tag(),
        }
    }

    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        if tag == 0 {
            return Some(Cell::Empty);
        }
        match PieceKind::from_tag(tag) {
            Some(kind) => Some(Cell::Filled(kind)),
            None => None,
        }
    }
}

impl Serialize for Cell {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.tag())
    }
}

/// One row of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Row {
    cells: [Cell; GRID_WIDTH],
}

impl Default for Row {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Row {
    pub const EMPTY: Self = Self {
        cells: [Cell::Empty; GRID_WIDTH],
    };

    #[must_use]
    pub const fn from_cells(cells: [Cell; GRID_WIDTH]) -> Self {
        Self { cells }
    }

    /// A row with every cell filled by `kind`.
    #[must_use]
    pub const fn filled(kind: PieceKind) -> Self {
        Self {
            cells: [Cell::Filled(kind); GRID_WIDTH],
        }
    }

    #[must_use]
    pub const fn cells(&self) -> &[Cell; GRID_WIDTH] {
        &self.cells
    }

    /// Returns a copy of this row with the cell at column `x` replaced.
    #[must_use]
    pub const fn with_cell(mut self, x: usize, cell: Cell) -> Self {
        self.cells[x] = cell;
        self
    }

    /// Whether every cell in the row is occupied.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_empty())
    }
}

/// The 10×20 playfield, row-major with row 0 at the top.
///
/// All operations that change cells are pure: they borrow the grid and return
/// a new one, so a trial placement can never leak into the committed grid.
///
/// # Example
///
/// ```
/// use bentris_engine::{Grid, PieceKind};
///
/// let grid = Grid::EMPTY;
/// let square = PieceKind::O.shape();
///
/// assert!(grid.is_legal(&square, 0, 18));
/// assert!(!grid.is_legal(&square, 9, 18));
///
/// let landed = grid.merged(&square, 0, 18);
/// assert_eq!(landed.count_completed_rows(), 0);
/// assert_eq!(grid, Grid::EMPTY);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Grid {
    rows: [Row; GRID_HEIGHT],
}

impl Default for Grid {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Grid {
    pub const WIDTH: usize = GRID_WIDTH;
    pub const HEIGHT: usize = GRID_HEIGHT;

    pub const EMPTY: Self = Self {
        rows: [Row::EMPTY; GRID_HEIGHT],
    };

    #[must_use]
    pub const fn from_rows(rows: [Row; GRID_HEIGHT]) -> Self {
        Self { rows }
    }

    #[must_use]
    pub const fn rows(&self) -> &[Row; GRID_HEIGHT] {
        &self.rows
    }

    #[must_use]
    pub const fn row(&self, y: usize) -> &Row {
        &self.rows[y]
    }

    #[must_use]
    pub const fn cell(&self, x: usize, y: usize) -> Cell {
        self.rows[y].cells[x]
    }

    /// Returns a copy of this grid with row `y` replaced.
    #[must_use]
    pub fn with_row(&self, y: usize, row: Row) -> Self {
        let mut grid = self.clone();
        grid.rows[y] = row;
        grid
    }

    /// Checks whether `piece` may sit with its top-left corner at `(x, y)`.
    ///
    /// Every occupied piece cell must fall inside the columns and above the
    /// floor. Cells above the top edge are allowed and are not checked against
    /// grid content; cells inside the grid must land on empty cells.
    #[must_use]
    pub fn is_legal(&self, piece: &Piece, x: i32, y: i32) -> bool {
        piece.occupied_cells().all(|(px, py, _)| {
            let (gx, gy) = grid_position(x, y, px, py);
            let Some(col) = usize::try_from(gx).ok().filter(|&col| col < GRID_WIDTH) else {
                return false;
            };
            match usize::try_from(gy) {
                // still entering from above
                Err(_) => true,
                Ok(row) => row < GRID_HEIGHT && self.rows[row].cells[col].is_empty(),
            }
        })
    }

    /// Returns a new grid with the occupied cells of `piece` written at `(x, y)`.
    ///
    /// The placement is not re-checked: occupied cells overwrite whatever is
    /// underneath, and cells outside the grid are dropped.
    #[must_use]
    pub fn merged(&self, piece: &Piece, x: i32, y: i32) -> Self {
        let mut grid = self.clone();
        for (px, py, cell) in piece.occupied_cells() {
            let (gx, gy) = grid_position(x, y, px, py);
            if let (Ok(col), Ok(row)) = (usize::try_from(gx), usize::try_from(gy))
                && col < GRID_WIDTH
                && row < GRID_HEIGHT
            {
                grid.rows[row].cells[col] = cell;
            }
        }
        grid
    }

    /// Counts the rows with every cell occupied.
    #[must_use]
    pub fn count_completed_rows(&self) -> usize {
        self.rows.iter().filter(|row| row.is_complete()).count()
    }

    /// Returns a new grid with every completed row removed.
    ///
    /// Remaining rows keep their relative order and settle to the bottom; one
    /// empty row is inserted at the top for every row removed. All completed
    /// rows are removed at once.
    #[must_use]
    pub fn cleared_completed_rows(&self) -> Self {
        let mut grid = self.clone();
        let mut count = 0;
        for y in (0..GRID_HEIGHT).rev() {
            if self.rows[y].is_complete() {
                count += 1;
                continue;
            }
            if count > 0 {
                grid.rows[y + count] = self.rows[y];
            }
        }
        grid.rows[..count].fill(Row::EMPTY);
        grid
    }

    /// Counts the occupied cells of the whole grid.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter())
            .filter(|cell| !cell.is_empty())
            .count()
    }
}

/// One line per row, `X` for occupied and `O` for empty cells.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for cell in &row.cells {
                f.write_str(if cell.is_empty() { "O" } else { "X" })?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

#[expect(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
fn grid_position(x: i32, y: i32, px: usize, py: usize) -> (i32, i32) {
    // piece-local offsets are bounded by MAX_PIECE_SIZE
    (x + px as i32, y + py as i32)
}
