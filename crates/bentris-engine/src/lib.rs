pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Rejected piece matrix passed to [`Piece::from_tags`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PieceShapeError {
    #[display("piece must have at least one row and one column")]
    Empty,
    #[display("piece of {width}x{height} cells exceeds the 4x4 box")]
    TooLarge { width: usize, height: usize },
    #[display("piece row {row} differs in width from the first row")]
    Ragged { row: usize },
    #[display("invalid cell tag {tag}")]
    InvalidTag { tag: u8 },
    #[display("piece mixes cell tags {first} and {other}")]
    MixedTags { first: u8, other: u8 },
}
