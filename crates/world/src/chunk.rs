use std::sync::Arc;

use minemesh_core::{ChunkPosition, InChunkPosition};

use crate::block::BlockState;
use crate::error::WorldError;
use crate::light::{ChunkLight, LightLevel};
use crate::section::ChunkSection;

/// A vertical column of sections.
///
/// Sections are shared through `Arc` and copied on write, so a snapshot of
/// the chunk stays stable while the live chunk keeps changing.
#[derive(Debug, Clone)]
pub struct Chunk {
    position: ChunkPosition,
    min_section: i32,
    sections: Vec<Option<Arc<ChunkSection>>>,
    /// Heightmap and out-of-world light layers.
    pub light: ChunkLight,
}

impl Chunk {
    /// Empty chunk spanning sections `min_section..=max_section`.
    pub fn new(position: ChunkPosition, min_section: i32, max_section: i32) -> Self {
        let count = (max_section - min_section + 1).max(1) as usize;
        Self {
            position,
            min_section,
            sections: vec![None; count],
            light: ChunkLight::new(min_section * 16),
        }
    }

    /// Column position.
    #[inline]
    pub fn position(&self) -> ChunkPosition {
        self.position
    }

    /// Lowest section index.
    #[inline]
    pub fn min_section(&self) -> i32 {
        self.min_section
    }

    /// Highest section index.
    #[inline]
    pub fn max_section(&self) -> i32 {
        self.min_section + self.sections.len() as i32 - 1
    }

    /// Lowest block Y.
    pub fn min_y(&self) -> i32 {
        self.min_section * 16
    }

    /// Highest block Y.
    pub fn max_y(&self) -> i32 {
        (self.max_section() + 1) * 16 - 1
    }

    fn slot(&self, height: i32) -> Option<usize> {
        if height < self.min_section || height > self.max_section() {
            return None;
        }
        Some((height - self.min_section) as usize)
    }

    /// Section at vertical index `height`, `None` if empty or out of range.
    pub fn section(&self, height: i32) -> Option<&ChunkSection> {
        self.sections.get(self.slot(height)?)?.as_deref()
    }

    /// Shared handle to a section.
    pub fn section_arc(&self, height: i32) -> Option<&Arc<ChunkSection>> {
        self.sections.get(self.slot(height)?)?.as_ref()
    }

    /// Heights of all present sections, bottom to top.
    pub fn section_heights(&self) -> impl Iterator<Item = i32> + '_ {
        self.sections
            .iter()
            .enumerate()
            .filter(|(_, section)| section.is_some())
            .map(move |(index, _)| self.min_section + index as i32)
    }

    fn section_mut(&mut self, height: i32) -> Result<&mut ChunkSection, WorldError> {
        let slot = self.slot(height).ok_or(WorldError::SectionOutOfRange {
            height,
            min: self.min_section,
            max: self.max_section(),
        })?;
        let section =
            self.sections[slot].get_or_insert_with(|| Arc::new(ChunkSection::new(height)));
        Ok(Arc::make_mut(section))
    }

    /// Block at a position.
    pub fn block(&self, position: InChunkPosition) -> Option<&BlockState> {
        self.section(position.section_height())?
            .block(position.in_section_position())
    }

    /// Replace a block and update the heightmap. Returns the previous block.
    pub fn set_block(
        &mut self,
        position: InChunkPosition,
        state: Option<BlockState>,
    ) -> Result<Option<BlockState>, WorldError> {
        let blocking = state.as_ref().is_some_and(BlockState::blocks_sky);
        let in_section = position.in_section_position();
        let previous = self
            .section_mut(position.section_height())?
            .set_block(in_section, state);

        let min_section = self.min_section;
        let sections = &self.sections;
        self.light.heightmap.on_block_changed(
            position.column_index(),
            position.y(),
            blocking,
            |y| {
                usize::try_from((y >> 4) - min_section)
                    .ok()
                    .and_then(|slot| sections.get(slot)?.as_deref())
                    .and_then(|section| section.block(in_section.with_y(y & 0x0F)))
                    .is_some_and(BlockState::blocks_sky)
            },
        );
        Ok(previous)
    }

    /// Packed light at a position. Empty sections read as dark.
    pub fn light_at(&self, position: InChunkPosition) -> LightLevel {
        self.section(position.section_height())
            .map(|section| section.light(position.in_section_position()))
            .unwrap_or_default()
    }

    /// Overwrite packed light at a position.
    pub fn set_light(
        &mut self,
        position: InChunkPosition,
        light: LightLevel,
    ) -> Result<(), WorldError> {
        self.section_mut(position.section_height())?
            .set_light(position.in_section_position(), light);
        Ok(())
    }

    /// Drop sections that no longer hold any block.
    pub fn prune_empty_sections(&mut self) {
        for section in &mut self.sections {
            let empty = section
                .as_ref()
                .is_some_and(|section| section.is_empty() && section.block_entity_count() == 0);
            if empty {
                *section = None;
            }
        }
    }

    /// Sky-light heightmap value for a column index.
    #[inline]
    pub fn height_at(&self, column: usize) -> i32 {
        self.light.heightmap.get(column)
    }
}
