//! Block types, their optional capabilities, and shared block states.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use bitflags::bitflags;
use minemesh_core::{BlockPosition, Direction, Identifier};
use serde::{Deserialize, Serialize};

use crate::fluid::{Fluid, FluidHolder};
use crate::shape::{CullShape, FaceProperties, SideProperties};

/// A block type. Capabilities are optional and discovered through the
/// accessor methods rather than by inspecting the concrete type.
pub trait Block: Send + Sync + fmt::Debug {
    /// Registry name of the block.
    fn identifier(&self) -> &Identifier;

    /// Fluid containment, for fluid blocks and waterloggable blocks.
    fn fluid_holder(&self) -> Option<&dyn FluidHolder> {
        None
    }

    /// Block-specific culling between two faces of the same transparency class.
    fn custom_culling(&self) -> Option<&dyn CustomBlockCulling> {
        None
    }

    /// Positional render offset.
    fn offset(&self) -> Option<&dyn OffsetBlock> {
        None
    }

    /// True if positions of this block carry a renderable block entity.
    fn has_block_entity(&self) -> bool {
        false
    }
}

/// Overrides the same-block rule for non-opaque faces.
pub trait CustomBlockCulling: Send + Sync {
    /// Whether `face` of `state` facing `direction` is hidden by `neighbour`.
    fn should_cull(
        &self,
        state: &BlockState,
        face: &FaceProperties,
        direction: Direction,
        neighbour: &BlockState,
    ) -> bool;
}

/// Render offset derived from the block position.
pub trait OffsetBlock: Send + Sync {
    /// Offset in blocks, applied to every vertex of the block.
    fn offset(&self, position: BlockPosition) -> [f32; 3];
}

/// Position hash used for deterministic per-block jitter.
pub fn position_hash(x: i32, y: i32, z: i32) -> i64 {
    let mut hash =
        (x as i64).wrapping_mul(3_129_871) ^ (z as i64).wrapping_mul(116_129_781) ^ y as i64;
    hash = hash
        .wrapping_mul(hash)
        .wrapping_mul(42_317_861)
        .wrapping_add(hash.wrapping_mul(11));
    hash >> 16
}

/// Jitter applied to plants and similar blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RandomOffset {
    /// Horizontal jitter only.
    XZ,
    /// Horizontal jitter plus a downward vertical one.
    XYZ,
}

impl OffsetBlock for RandomOffset {
    fn offset(&self, position: BlockPosition) -> [f32; 3] {
        let hash = position_hash(position.x(), 0, position.z());
        let nibble = |shift: u32| ((hash >> shift) & 0x0F) as f32 / 15.0;
        let x = (nibble(0) - 0.5) * 0.5;
        let z = (nibble(8) - 0.5) * 0.5;
        let y = match self {
            RandomOffset::XZ => 0.0,
            RandomOffset::XYZ => (nibble(4) - 1.0) * 0.2,
        };
        [x, y, z]
    }
}

bitflags! {
    /// Precomputed per-state facts the mesher asks for on every position.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StateFlags: u8 {
        /// Every side is a full opaque square.
        const FULLY_OPAQUE = 1 << 0;
        /// Stops sky light; feeds the heightmap.
        const BLOCKS_SKY = 1 << 1;
        /// Every side is a full square of any transparency.
        const FULL_CUBE = 1 << 2;
        /// Surface that may be left out when unlit and far away.
        const CAVE_SURFACE = 1 << 3;
        /// Small decoration like torches and flowers.
        const MINOR_VISUAL_IMPACT = 1 << 4;
        /// Carries rendered text, like signs.
        const TEXT = 1 << 5;
    }
}

/// Value of a block state property.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyValue {
    /// Boolean property, e.g. `waterlogged`.
    Bool(bool),
    /// Integer property, e.g. `level`.
    Int(i32),
    /// Enumerated property, e.g. `facing`.
    Name(String),
}

struct StateData {
    id: u32,
    block: Arc<dyn Block>,
    properties: BTreeMap<String, PropertyValue>,
    shape: Option<CullShape>,
    flags: StateFlags,
}

/// Shared, immutable block state.
///
/// Cloning is a reference count bump. Two states are equal when their ids are.
#[derive(Clone)]
pub struct BlockState(Arc<StateData>);

impl BlockState {
    /// Start building a state with a registry id.
    pub fn builder(id: u32, block: Arc<dyn Block>) -> BlockStateBuilder {
        BlockStateBuilder {
            id,
            block,
            properties: BTreeMap::new(),
            shape: None,
            blocks_sky: None,
            flags: StateFlags::empty(),
        }
    }

    /// Registry id.
    #[inline]
    pub fn id(&self) -> u32 {
        self.0.id
    }

    /// Owning block type.
    #[inline]
    pub fn block(&self) -> &dyn Block {
        self.0.block.as_ref()
    }

    /// Shared handle to the owning block type.
    pub fn block_arc(&self) -> &Arc<dyn Block> {
        &self.0.block
    }

    /// Culling shape, `None` for shapeless states like air-likes or plants.
    pub fn shape(&self) -> Option<&CullShape> {
        self.0.shape.as_ref()
    }

    /// Side used when culling against a face in `direction`.
    #[inline]
    pub fn cull_side(&self, direction: Direction) -> Option<&SideProperties> {
        self.0.shape.as_ref()?.side(direction)
    }

    /// Precomputed flags.
    #[inline]
    pub fn flags(&self) -> StateFlags {
        self.0.flags
    }

    /// Shorthand for [`StateFlags::FULLY_OPAQUE`].
    #[inline]
    pub fn is_fully_opaque(&self) -> bool {
        self.0.flags.contains(StateFlags::FULLY_OPAQUE)
    }

    /// Shorthand for [`StateFlags::BLOCKS_SKY`].
    #[inline]
    pub fn blocks_sky(&self) -> bool {
        self.0.flags.contains(StateFlags::BLOCKS_SKY)
    }

    /// True if both states belong to the same block type.
    pub fn same_block(&self, other: &BlockState) -> bool {
        Arc::ptr_eq(&self.0.block, &other.0.block)
            || self.0.block.identifier() == other.0.block.identifier()
    }

    /// True if this state belongs to the block named `identifier`.
    pub fn is(&self, identifier: &Identifier) -> bool {
        self.0.block.identifier() == identifier
    }

    /// Property lookup.
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.0.properties.get(name)
    }

    /// Integer property lookup.
    pub fn int_property(&self, name: &str) -> Option<i32> {
        match self.property(name)? {
            PropertyValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Boolean property lookup.
    pub fn bool_property(&self, name: &str) -> Option<bool> {
        match self.property(name)? {
            PropertyValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Fluid currently contained in this state.
    pub fn fluid(&self) -> Option<&dyn Fluid> {
        self.0.block.fluid_holder()?.fluid(self)
    }

    /// True if the block is a pure fluid block (not a waterlogged solid).
    pub fn is_fluid_block(&self) -> bool {
        self.0
            .block
            .fluid_holder()
            .is_some_and(|holder| holder.is_fluid_block())
    }
}

impl PartialEq for BlockState {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for BlockState {}

impl Hash for BlockState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Debug for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.0.block.identifier(), self.0.id)?;
        if !self.0.properties.is_empty() {
            f.debug_map().entries(self.0.properties.iter()).finish()?;
        }
        Ok(())
    }
}

/// Builder returned by [`BlockState::builder`].
pub struct BlockStateBuilder {
    id: u32,
    block: Arc<dyn Block>,
    properties: BTreeMap<String, PropertyValue>,
    shape: Option<CullShape>,
    blocks_sky: Option<bool>,
    flags: StateFlags,
}

impl BlockStateBuilder {
    /// Attach a property.
    pub fn property(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    /// Attach a culling shape.
    pub fn shape(mut self, shape: CullShape) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Override sky blocking. Defaults to "any opaque side".
    pub fn blocks_sky(mut self, blocks_sky: bool) -> Self {
        self.blocks_sky = Some(blocks_sky);
        self
    }

    /// Add flags that do not follow from the shape, like
    /// [`StateFlags::CAVE_SURFACE`]. Shape derived flags are recomputed on
    /// [`build`](Self::build).
    pub fn flags(mut self, flags: StateFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Finish the state.
    pub fn build(self) -> BlockState {
        let derived = StateFlags::FULLY_OPAQUE | StateFlags::BLOCKS_SKY | StateFlags::FULL_CUBE;
        let mut flags = self.flags - derived;
        if let Some(shape) = &self.shape {
            if shape.is_full_opaque() {
                flags |= StateFlags::FULLY_OPAQUE;
            }
            if shape.is_full_cube() {
                flags |= StateFlags::FULL_CUBE;
            }
        }
        let blocks_sky = self.blocks_sky.unwrap_or_else(|| {
            self.shape
                .as_ref()
                .is_some_and(CullShape::has_opaque_side)
        });
        if blocks_sky {
            flags |= StateFlags::BLOCKS_SKY;
        }
        BlockState(Arc::new(StateData {
            id: self.id,
            block: self.block,
            properties: self.properties,
            shape: self.shape,
            flags,
        }))
    }
}

/// Plain block with optional offset, block entity and culling hook.
pub struct SimpleBlock {
    identifier: Identifier,
    offset: Option<RandomOffset>,
    block_entity: bool,
    culling: Option<Arc<dyn CustomBlockCulling>>,
}

impl SimpleBlock {
    /// Block without any capability.
    pub fn new(identifier: Identifier) -> Self {
        Self {
            identifier,
            offset: None,
            block_entity: false,
            culling: None,
        }
    }

    /// Add a random render offset.
    pub fn with_offset(mut self, offset: RandomOffset) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Mark the block as carrying a block entity.
    pub fn with_block_entity(mut self) -> Self {
        self.block_entity = true;
        self
    }

    /// Install a custom culling hook.
    pub fn with_custom_culling(mut self, culling: Arc<dyn CustomBlockCulling>) -> Self {
        self.culling = Some(culling);
        self
    }
}

impl fmt::Debug for SimpleBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleBlock")
            .field("identifier", &self.identifier)
            .field("offset", &self.offset)
            .field("block_entity", &self.block_entity)
            .field("custom_culling", &self.culling.is_some())
            .finish()
    }
}

impl Block for SimpleBlock {
    fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    fn custom_culling(&self) -> Option<&dyn CustomBlockCulling> {
        self.culling.as_deref()
    }

    fn offset(&self) -> Option<&dyn OffsetBlock> {
        self.offset.as_ref().map(|offset| offset as &dyn OffsetBlock)
    }

    fn has_block_entity(&self) -> bool {
        self.block_entity
    }
}
