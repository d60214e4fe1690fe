use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use crate::PieceShapeError;

use super::grid::Cell;

/// Largest bounding box a piece may occupy, in cells per side.
pub const MAX_PIECE_SIZE: usize = 4;

type PieceCells = [[Cell; MAX_PIECE_SIZE]; MAX_PIECE_SIZE];

/// The seven playable shapes.
///
/// The discriminant doubles as the cell tag stored in the grid, so the
/// declaration order is the catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// Four-long bar.
    I = 1,
    /// Right-handed ell.
    L = 2,
    /// Left-handed ell.
    J = 3,
    /// Right-handed step.
    Z = 4,
    /// Left-handed step.
    S = 5,
    /// Square.
    O = 6,
    /// Tee.
    T = 7,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All kinds in catalog order.
    pub const ALL: [PieceKind; PieceKind::LEN] = [
        PieceKind::I,
        PieceKind::L,
        PieceKind::J,
        PieceKind::Z,
        PieceKind::S,
        PieceKind::O,
        PieceKind::T,
    ];

    /// Returns the grid cell tag (`1..=7`) used for this kind.
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Looks a kind up by its cell tag.
    ///
    /// # Examples
    ///
    /// ```
    /// use bentris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_tag(6), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_tag(0), None);
    /// assert_eq!(PieceKind::from_tag(8), None);
    /// ```
    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(PieceKind::I),
            2 => Some(PieceKind::L),
            3 => Some(PieceKind::J),
            4 => Some(PieceKind::Z),
            5 => Some(PieceKind::S),
            6 => Some(PieceKind::O),
            7 => Some(PieceKind::T),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::L => 'L',
            PieceKind::J => 'J',
            PieceKind::Z => 'Z',
            PieceKind::S => 'S',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
        }
    }

    /// Returns the catalog shape of this kind in its spawn orientation.
    #[must_use]
    pub fn shape(self) -> Piece {
        CATALOG[self as usize - 1]
    }
}

/// Returns the seven catalog shapes in their spawn orientation.
#[must_use]
pub fn all_shapes() -> &'static [Piece; PieceKind::LEN] {
    &CATALOG
}

/// Picks one of the catalog shapes uniformly at random.
pub fn random_shape<R>(rng: &mut R) -> Piece
where
    R: Rng + ?Sized,
{
    rng.random::<PieceKind>().shape()
}

/// A piece matrix: occupied cells carry the shape's tag, empty cells are
/// padding that keeps rotation a pure index transform.
///
/// Pieces are immutable values; rotation returns a new `Piece`. Cells outside
/// the `width`×`height` box are always [`Cell::Empty`], so derived equality is
/// value equality of the matrix.
///
/// # Example
///
/// ```
/// use bentris_engine::{Piece, PieceKind};
///
/// let tee = PieceKind::T.shape();
/// assert_eq!((tee.width(), tee.height()), (3, 3));
/// assert!(tee.top_row_is_empty());
///
/// let back = tee.rotated_left().rotated_left().rotated_left().rotated_left();
/// assert_eq!(back, tee);
///
/// let bar = Piece::from_tags(&[&[1, 1, 1, 1]]).unwrap();
/// assert_eq!((bar.rotated_left().width(), bar.rotated_left().height()), (1, 4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    width: u8,
    height: u8,
    cells: PieceCells,
}

impl Piece {
    /// Builds a piece from rows of cell tags (`0` = padding, `1..=7` = kind).
    ///
    /// Rows must be non-empty, of equal length, and fit in a
    /// [`MAX_PIECE_SIZE`]-square box. All occupied cells share one tag.
    pub fn from_tags(rows: &[&[u8]]) -> Result<Self, PieceShapeError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.len());
        if height == 0 || width == 0 {
            return Err(PieceShapeError::Empty);
        }
        if height > MAX_PIECE_SIZE || width > MAX_PIECE_SIZE {
            return Err(PieceShapeError::TooLarge { width, height });
        }

        #[expect(clippy::cast_possible_truncation)]
        let (width_u8, height_u8) = (width as u8, height as u8);

        let mut cells = [[Cell::Empty; MAX_PIECE_SIZE]; MAX_PIECE_SIZE];
        let mut kind_tag = None;
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(PieceShapeError::Ragged { row: y });
            }
            for (x, &tag) in row.iter().enumerate() {
                let cell = Cell::from_tag(tag).ok_or(PieceShapeError::InvalidTag { tag })?;
                if !cell.is_empty() {
                    match kind_tag {
                        None => kind_tag = Some(tag),
                        Some(first) if first != tag => {
                            return Err(PieceShapeError::MixedTags { first, other: tag });
                        }
                        Some(_) => {}
                    }
                }
                cells[y][x] = cell;
            }
        }

        Ok(Self {
            width: width_u8,
            height: height_u8,
            cells,
        })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        usize::from(self.width)
    }

    #[must_use]
    pub fn height(&self) -> usize {
        usize::from(self.height)
    }

    /// Returns the cell at piece-local `(x, y)`, or [`Cell::Empty`] outside the box.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        if x < self.width() && y < self.height() {
            self.cells[y][x]
        } else {
            Cell::Empty
        }
    }

    /// Iterates over the rows of the matrix, each trimmed to the piece width.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells[..self.height()]
            .iter()
            .map(|row| &row[..self.width()])
    }

    /// Iterates over occupied cells as `(x, y, cell)` in piece-local coordinates.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.rows().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, cell)| !cell.is_empty())
                .map(move |(x, &cell)| (x, y, cell))
        })
    }

    /// Whether the first row of the matrix is pure padding.
    ///
    /// Such pieces spawn one row above the grid.
    #[must_use]
    pub fn top_row_is_empty(&self) -> bool {
        self.rows()
            .next()
            .is_none_or(|row| row.iter().all(|cell| cell.is_empty()))
    }

    /// Rotates 90° counter-clockwise.
    ///
    /// A `w`×`h` matrix becomes `h`×`w` with `out[y][x] = in[x][w - 1 - y]`.
    #[must_use]
    pub fn rotated_left(&self) -> Self {
        let (width, height) = (self.width(), self.height());
        let mut cells = [[Cell::Empty; MAX_PIECE_SIZE]; MAX_PIECE_SIZE];
        for (y, row) in cells.iter_mut().enumerate().take(width) {
            for (x, cell) in row.iter_mut().enumerate().take(height) {
                *cell = self.cells[x][width - 1 - y];
            }
        }
        Self {
            width: self.height,
            height: self.width,
            cells,
        }
    }

    /// Rotates 90° clockwise (three left rotations).
    #[must_use]
    pub fn rotated_right(&self) -> Self {
        self.rotated_left().rotated_left().rotated_left()
    }
}

#[expect(clippy::cast_possible_truncation)]
const fn catalog_shape<const N: usize>(kind: PieceKind, mask: [[u8; N]; N]) -> Piece {
    let mut cells = [[Cell::Empty; MAX_PIECE_SIZE]; MAX_PIECE_SIZE];
    let mut y = 0;
    while y < N {
        let mut x = 0;
        while x < N {
            if mask[y][x] != 0 {
                cells[y][x] = Cell::Filled(kind);
            }
            x += 1;
        }
        y += 1;
    }
    Piece {
        width: N as u8,
        height: N as u8,
        cells,
    }
}

// Square matrices, padded so a rotation keeps the piece centered in its box.
static CATALOG: [Piece; PieceKind::LEN] = [
    catalog_shape(
        PieceKind::I,
        [[0, 0, 1, 0], [0, 0, 1, 0], [0, 0, 1, 0], [0, 0, 1, 0]],
    ),
    catalog_shape(PieceKind::L, [[0, 1, 0], [0, 1, 0], [0, 1, 1]]),
    catalog_shape(PieceKind::J, [[0, 1, 0], [0, 1, 0], [1, 1, 0]]),
    catalog_shape(PieceKind::Z, [[0, 0, 0], [1, 1, 0], [0, 1, 1]]),
    catalog_shape(PieceKind::S, [[0, 0, 0], [0, 1, 1], [1, 1, 0]]),
    catalog_shape(PieceKind::O, [[1, 1], [1, 1]]),
    catalog_shape(PieceKind::T, [[0, 0, 0], [1, 1, 1], [0, 1, 0]]),
];
