use minemesh_core::{PositionError, SectionPosition};
use thiserror::Error;

/// Reasons a mesh pass produced no result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    /// The pass was cancelled; partial geometry was discarded.
    #[error("mesh pass cancelled")]
    Cancelled,
    /// The section is not present in its chunk.
    #[error("section {0} is not loaded")]
    MissingSection(SectionPosition),
    /// The chunk lies outside the addressable world.
    #[error("section outside the world: {0}")]
    OutOfWorld(#[from] PositionError),
}
