use crate::core::{grid::Grid, piece::Piece};

/// Translation and rotation of the active piece, as used by the schedulers.
///
/// Both methods commit the change only when the result is legal and report
/// whether they did.
pub trait PieceControl {
    fn move_piece(&mut self, dx: i32, dy: i32) -> bool;

    /// Rotates left once for a negative `direction`, right once for a
    /// positive one, and does nothing for zero.
    fn rotate_piece(&mut self, direction: i32) -> bool;
}

/// A piece together with the grid position of its bounding box's top-left
/// corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub piece: Piece,
    pub x: i32,
    pub y: i32,
}

impl Placement {
    /// Spawn position of `piece`: horizontally centered (rounding left) and
    /// one row above the grid when its top row is padding.
    #[must_use]
    pub fn spawn(piece: Piece) -> Self {
        let x = (Grid::WIDTH - piece.width()) / 2;
        let y = if piece.top_row_is_empty() { -1 } else { 0 };
        #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let x = x as i32;
        Self { piece, x, y }
    }

    #[must_use]
    pub const fn translated(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    #[must_use]
    pub fn with_piece(self, piece: Piece) -> Self {
        Self { piece, ..self }
    }

    #[must_use]
    pub fn is_legal_on(&self, grid: &Grid) -> bool {
        grid.is_legal(&self.piece, self.x, self.y)
    }
}

/// The committed grid and the piece currently falling on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Playfield {
    grid: Grid,
    active: Option<Placement>,
}

impl Playfield {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A playfield over an existing grid, with no active piece.
    #[must_use]
    pub fn with_grid(grid: Grid) -> Self {
        Self { grid, active: None }
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn active(&self) -> Option<&Placement> {
        self.active.as_ref()
    }

    /// Places `piece` at its spawn position if that is legal.
    ///
    /// On failure the previous active piece, if any, is left untouched.
    pub fn spawn(&mut self, piece: Piece) -> bool {
        self.place(Placement::spawn(piece))
    }

    /// Makes `placement` the active piece if it is legal on the grid.
    pub fn place(&mut self, placement: Placement) -> bool {
        if !placement.is_legal_on(&self.grid) {
            return false;
        }
        self.active = Some(placement);
        true
    }

    /// Merges the active piece into the grid and removes completed rows.
    ///
    /// Returns the number of rows cleared, or `None` without an active piece.
    pub fn lock(&mut self) -> Option<usize> {
        let placement = self.active.take()?;
        let merged = self
            .grid
            .merged(&placement.piece, placement.x, placement.y);
        let cleared = merged.count_completed_rows();
        self.grid = merged.cleared_completed_rows();
        Some(cleared)
    }

    pub fn clear_active(&mut self) {
        self.active = None;
    }

    /// The grid with the active piece drawn in.
    #[must_use]
    pub fn frame(&self) -> Grid {
        match &self.active {
            Some(placement) => self
                .grid
                .merged(&placement.piece, placement.x, placement.y),
            None => self.grid.clone(),
        }
    }
}

impl PieceControl for Playfield {
    fn move_piece(&mut self, dx: i32, dy: i32) -> bool {
        let Some(placement) = self.active else {
            return false;
        };
        self.place(placement.translated(dx, dy))
    }

    fn rotate_piece(&mut self, direction: i32) -> bool {
        let Some(placement) = self.active else {
            return false;
        };
        let piece = match direction.signum() {
            -1 => placement.piece.rotated_left(),
            1 => placement.piece.rotated_right(),
            _ => return false,
        };
        self.place(placement.with_piece(piece))
    }
}
