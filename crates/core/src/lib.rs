#![warn(missing_docs)]
//! Core primitives shared across the workspace: packed positions, directions
//! and namespaced identifiers.

mod direction;
mod identifier;
mod position;

pub use direction::{Axis, Direction};
pub use identifier::{Identifier, IdentifierError, DEFAULT_NAMESPACE};
pub use position::{
    BlockPosition, ChunkPosition, InChunkPosition, InSectionPosition, PositionError,
    SectionPosition, SECTION_MAX, SECTION_SIZE, SECTION_VOLUME,
};
