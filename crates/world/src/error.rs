use minemesh_core::{ChunkPosition, PositionError};
use thiserror::Error;

/// Errors raised by chunk and storage mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldError {
    /// Section index outside the chunk's vertical range.
    #[error("section {height} outside chunk range [{min}, {max}]")]
    SectionOutOfRange {
        /// Requested section height.
        height: i32,
        /// Lowest section of the chunk.
        min: i32,
        /// Highest section of the chunk.
        max: i32,
    },
    /// No chunk is loaded at the requested column.
    #[error("chunk {0} is not loaded")]
    ChunkNotLoaded(ChunkPosition),
    /// Coordinate does not fit a packed position.
    #[error(transparent)]
    Position(#[from] PositionError),
}
