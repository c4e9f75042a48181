use std::sync::Arc;

use minemesh_core::{ChunkPosition, Direction, InSectionPosition, SECTION_SIZE};

use crate::block::BlockState;
use crate::chunk::Chunk;
use crate::light::LightLevel;
use crate::section::ChunkSection;

const SIZE: i32 = SECTION_SIZE as i32;

/// A chunk together with snapshots of its eight surrounding chunks.
///
/// Lookups take coordinates relative to a section of the centre chunk and
/// may reach one chunk into any horizontal neighbour.
#[derive(Debug, Clone)]
pub struct ChunkNeighbourhood {
    chunk: Arc<Chunk>,
    neighbours: [Option<Arc<Chunk>>; 8],
}

impl ChunkNeighbourhood {
    /// Neighbours are ordered like [`ChunkPosition::NEIGHBOUR_OFFSETS`].
    pub fn new(chunk: Arc<Chunk>, neighbours: [Option<Arc<Chunk>>; 8]) -> Self {
        Self { chunk, neighbours }
    }

    /// Centre chunk.
    #[inline]
    pub fn chunk(&self) -> &Chunk {
        &self.chunk
    }

    /// Position of the centre chunk.
    pub fn position(&self) -> ChunkPosition {
        self.chunk.position()
    }

    /// True once all eight neighbours are loaded.
    pub fn is_complete(&self) -> bool {
        self.neighbours.iter().all(Option::is_some)
    }

    /// Chunk at a delta of at most one in each axis; `(0, 0)` is the centre.
    pub fn chunk_at(&self, dx: i32, dz: i32) -> Option<&Chunk> {
        if dx == 0 && dz == 0 {
            return Some(&self.chunk);
        }
        self.neighbours[ChunkPosition::neighbour_index(dx, dz)?].as_deref()
    }

    /// Horizontally adjacent chunk.
    pub fn horizontal(&self, direction: Direction) -> Option<&Chunk> {
        self.neighbours[ChunkPosition::direction_index(direction)?].as_deref()
    }

    /// The six sections around section `height` of the centre chunk, in
    /// direction order.
    pub fn section_neighbours(&self, height: i32) -> [Option<&ChunkSection>; 6] {
        Direction::VALUES.map(|direction| match direction {
            Direction::Down => self.chunk.section(height - 1),
            Direction::Up => self.chunk.section(height + 1),
            _ => self.horizontal(direction)?.section(height),
        })
    }

    fn resolve(
        &self,
        height: i32,
        x: i32,
        y: i32,
        z: i32,
    ) -> Option<(&Chunk, i32, InSectionPosition)> {
        let chunk = self.chunk_at(x.div_euclid(SIZE), z.div_euclid(SIZE))?;
        let local = InSectionPosition::new(
            x.rem_euclid(SIZE),
            y.rem_euclid(SIZE),
            z.rem_euclid(SIZE),
        );
        Some((chunk, height + y.div_euclid(SIZE), local))
    }

    /// Block at coordinates relative to section `height` of the centre chunk.
    pub fn block(&self, height: i32, x: i32, y: i32, z: i32) -> Option<&BlockState> {
        let (chunk, height, local) = self.resolve(height, x, y, z)?;
        chunk.section(height)?.block(local)
    }

    /// Light at coordinates relative to section `height` of the centre chunk.
    ///
    /// Above the highest section the chunk's top layer is used, below the
    /// lowest one its bottom layer.
    pub fn light(&self, height: i32, x: i32, y: i32, z: i32) -> LightLevel {
        let Some((chunk, height, local)) = self.resolve(height, x, y, z) else {
            return LightLevel::default();
        };
        if height > chunk.max_section() {
            return LightLevel(chunk.light.top[local.column_index()]);
        }
        if height < chunk.min_section() {
            return LightLevel(chunk.light.bottom[local.column_index()]);
        }
        chunk
            .section(height)
            .map(|section| section.light(local))
            .unwrap_or_default()
    }

    /// Heightmap value for a column relative to the centre chunk.
    pub fn height_at(&self, x: i32, z: i32) -> Option<i32> {
        let chunk = self.chunk_at(x.div_euclid(SIZE), z.div_euclid(SIZE))?;
        let column = ((z.rem_euclid(SIZE) << 4) | x.rem_euclid(SIZE)) as usize;
        Some(chunk.height_at(column))
    }
}
