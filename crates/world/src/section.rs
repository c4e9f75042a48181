use std::collections::BTreeMap;

use minemesh_core::{Identifier, InSectionPosition, SECTION_VOLUME};

use crate::block::BlockState;
use crate::light::LightLevel;

/// Block entity attached to a position, e.g. a chest or a sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockEntity {
    /// Block entity type.
    pub kind: Identifier,
}

impl BlockEntity {
    /// Entity of type `kind`.
    pub fn new(kind: Identifier) -> Self {
        Self { kind }
    }
}

/// A 16³ slice of a chunk: blocks, light and block entities.
#[derive(Debug, Clone)]
pub struct ChunkSection {
    height: i32,
    blocks: Box<[Option<BlockState>]>,
    light: Box<[u8; SECTION_VOLUME]>,
    block_entities: BTreeMap<InSectionPosition, BlockEntity>,
    count: usize,
}

impl ChunkSection {
    /// Empty section at vertical index `height`.
    pub fn new(height: i32) -> Self {
        Self {
            height,
            blocks: vec![None; SECTION_VOLUME].into_boxed_slice(),
            light: Box::new([0; SECTION_VOLUME]),
            block_entities: BTreeMap::new(),
            count: 0,
        }
    }

    /// Vertical section index.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Number of non-air positions.
    pub fn block_count(&self) -> usize {
        self.count
    }

    /// True if every position is air.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Block at a position.
    #[inline]
    pub fn block(&self, position: InSectionPosition) -> Option<&BlockState> {
        self.blocks[position.index()].as_ref()
    }

    /// Replace a block, returning the previous one. Block entities are kept in
    /// sync with the new state's block type.
    pub fn set_block(
        &mut self,
        position: InSectionPosition,
        state: Option<BlockState>,
    ) -> Option<BlockState> {
        match &state {
            Some(state) if state.block().has_block_entity() => {
                self.block_entities
                    .entry(position)
                    .or_insert_with(|| BlockEntity::new(state.block().identifier().clone()));
            }
            _ => {
                self.block_entities.remove(&position);
            }
        }
        let previous = std::mem::replace(&mut self.blocks[position.index()], state);
        match (&previous, &self.blocks[position.index()]) {
            (None, Some(_)) => self.count += 1,
            (Some(_), None) => self.count -= 1,
            _ => {}
        }
        previous
    }

    /// Packed light at a position.
    #[inline]
    pub fn light(&self, position: InSectionPosition) -> LightLevel {
        LightLevel(self.light[position.index()])
    }

    /// Overwrite packed light at a position.
    pub fn set_light(&mut self, position: InSectionPosition, light: LightLevel) {
        self.light[position.index()] = light.raw();
    }

    /// Fill every position with the same light.
    pub fn fill_light(&mut self, light: LightLevel) {
        self.light.fill(light.raw());
    }

    /// Block entity at a position.
    pub fn block_entity(&self, position: InSectionPosition) -> Option<&BlockEntity> {
        self.block_entities.get(&position)
    }

    /// Replace the block entity at a position.
    pub fn set_block_entity(&mut self, position: InSectionPosition, entity: Option<BlockEntity>) {
        match entity {
            Some(entity) => {
                self.block_entities.insert(position, entity);
            }
            None => {
                self.block_entities.remove(&position);
            }
        }
    }

    /// Number of block entities.
    pub fn block_entity_count(&self) -> usize {
        self.block_entities.len()
    }
}
