//! Section mesh buffers.
//!
//! A [`ChunkMeshesBuilder`] collects geometry for one section during a mesh
//! pass and turns into an immutable [`ChunkMeshes`] once the pass succeeded.

use blake3::Hasher;
use minemesh_core::{Identifier, InSectionPosition, SectionPosition, SECTION_VOLUME};
use minemesh_world::{LightLevel, Transparency};

use crate::details::ChunkMeshDetails;

const OCCUPANCY_WORDS: usize = SECTION_VOLUME / 64;
const FRONT: [u32; 6] = [0, 1, 2, 0, 2, 3];
const BACK: [u32; 6] = [0, 2, 1, 0, 3, 2];

/// Hash of all layer buffers of a section mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHash(pub [u8; 32]);

impl MeshHash {
    /// Lowercase hex form.
    pub fn to_hex(&self) -> String {
        blake3::Hash::from(self.0).to_hex().to_string()
    }
}

/// Packed vertex layout produced by the mesher.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BlockVertex {
    /// Position in section-local block units.
    pub position: [f32; 3],
    /// Texture coordinates inside the texture.
    pub uv: [f32; 2],
    /// Texture id.
    pub texture: u32,
    /// Packed light in the high byte, RGB tint in the low 24 bits.
    pub light_tint: u32,
    /// Ambient occlusion level, 0 (open) to 3 (enclosed corner).
    pub ao: u32,
}

/// Pack a light byte and an RGB tint into one word.
#[inline]
pub fn pack_light_tint(light: u8, tint: u32) -> u32 {
    (u32::from(light) << 24) | (tint & 0x00FF_FFFF)
}

/// Quad corners of one face: positions, texture coordinates and AO levels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    /// Corner positions in section-local block units.
    pub positions: [[f32; 3]; 4],
    /// Corner texture coordinates.
    pub uvs: [[f32; 2]; 4],
    /// Corner AO levels.
    pub ao: [u8; 4],
}

/// Vertex and index buffers of one transparency layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerMesh {
    /// Vertex buffer.
    pub vertices: Vec<BlockVertex>,
    /// Triangle list into `vertices`.
    pub indices: Vec<u32>,
}

impl LayerMesh {
    /// Append one quad. `front` emits the counter-clockwise triangles, `back`
    /// the reversed ones; both share the same four vertices.
    pub fn add_quad(&mut self, quad: &Quad, texture: u32, light_tint: u32, front: bool, back: bool) {
        if !front && !back {
            return;
        }
        let base = self.vertices.len() as u32;
        for corner in 0..4 {
            self.vertices.push(BlockVertex {
                position: quad.positions[corner],
                uv: quad.uvs[corner],
                texture,
                light_tint,
                ao: u32::from(quad.ao[corner]),
            });
        }
        if front {
            self.indices.extend(FRONT.iter().map(|index| base + index));
        }
        if back {
            self.indices.extend(BACK.iter().map(|index| base + index));
        }
    }

    /// True if no triangle was emitted.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of triangles.
    pub fn triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of quads; double sided quads count once.
    pub fn quads(&self) -> usize {
        self.vertices.len() / 4
    }
}

/// A block entity that gets its own renderer instead of section geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBlockEntity {
    /// Position inside the section.
    pub position: InSectionPosition,
    /// Block entity type.
    pub kind: Identifier,
    /// Light at the block, sky light already applied.
    pub light: LightLevel,
    /// True if the renderer should draw the entity's text.
    pub text: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Occupancy {
    bits: Box<[u64; OCCUPANCY_WORDS]>,
    count: usize,
    min: [i32; 3],
    max: [i32; 3],
}

impl Occupancy {
    fn new() -> Self {
        Self {
            bits: Box::new([0; OCCUPANCY_WORDS]),
            count: 0,
            min: [i32::MAX; 3],
            max: [i32::MIN; 3],
        }
    }

    fn insert(&mut self, position: InSectionPosition) {
        let index = position.index();
        let word = &mut self.bits[index / 64];
        let bit = 1u64 << (index % 64);
        if *word & bit != 0 {
            return;
        }
        *word |= bit;
        self.count += 1;
        let coordinates = [position.x(), position.y(), position.z()];
        for axis in 0..3 {
            self.min[axis] = self.min[axis].min(coordinates[axis]);
            self.max[axis] = self.max[axis].max(coordinates[axis]);
        }
    }

    fn contains(&self, position: InSectionPosition) -> bool {
        let index = position.index();
        self.bits[index / 64] & (1u64 << (index % 64)) != 0
    }
}

fn layer_index(transparency: Transparency) -> usize {
    match transparency {
        Transparency::Opaque => 0,
        Transparency::Transparent => 1,
        Transparency::Translucent => 2,
    }
}

/// Mutable mesh of one section during a mesh pass.
#[derive(Debug)]
pub struct ChunkMeshesBuilder {
    position: SectionPosition,
    details: ChunkMeshDetails,
    layers: [LayerMesh; 3],
    entities: Vec<RenderedBlockEntity>,
    occupancy: Occupancy,
}

impl ChunkMeshesBuilder {
    /// Empty builder for `position`, meshed with `details`.
    pub fn new(position: SectionPosition, details: ChunkMeshDetails) -> Self {
        Self {
            position,
            details,
            layers: Default::default(),
            entities: Vec::new(),
            occupancy: Occupancy::new(),
        }
    }

    /// Section being meshed.
    pub fn position(&self) -> SectionPosition {
        self.position
    }

    /// Details of this pass.
    #[inline]
    pub fn details(&self) -> ChunkMeshDetails {
        self.details
    }

    /// Layer receiving faces of `transparency`.
    #[inline]
    pub fn layer_mut(&mut self, transparency: Transparency) -> &mut LayerMesh {
        &mut self.layers[layer_index(transparency)]
    }

    /// Record that `position` produced geometry or a block entity.
    pub fn add_block(&mut self, position: InSectionPosition) {
        self.occupancy.insert(position);
    }

    /// Queue a block entity renderer.
    pub fn add_block_entity(&mut self, entity: RenderedBlockEntity) {
        self.entities.push(entity);
    }

    /// Throw away partial geometry of a failed pass.
    pub fn discard(self) {
        tracing::trace!(
            position = ?self.position,
            vertices = self.layers.iter().map(|layer| layer.vertices.len()).sum::<usize>(),
            "discarding partial section mesh"
        );
    }

    /// Freeze the builder.
    pub fn build(self) -> ChunkMeshes {
        let mut hasher = Hasher::new();
        for layer in &self.layers {
            hasher.update(&(layer.vertices.len() as u64).to_le_bytes());
            hasher.update(bytemuck::cast_slice(&layer.vertices));
            hasher.update(bytemuck::cast_slice(&layer.indices));
        }
        ChunkMeshes {
            position: self.position,
            details: self.details,
            layers: self.layers,
            entities: self.entities,
            occupancy: self.occupancy,
            hash: MeshHash(*hasher.finalize().as_bytes()),
        }
    }
}

/// Finished geometry of one section.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkMeshes {
    position: SectionPosition,
    details: ChunkMeshDetails,
    layers: [LayerMesh; 3],
    entities: Vec<RenderedBlockEntity>,
    occupancy: Occupancy,
    hash: MeshHash,
}

impl ChunkMeshes {
    /// Section the mesh belongs to.
    pub fn position(&self) -> SectionPosition {
        self.position
    }

    /// Details the mesh was built with.
    pub fn details(&self) -> ChunkMeshDetails {
        self.details
    }

    /// True if there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(LayerMesh::is_empty) && self.entities.is_empty()
    }

    /// Layer holding faces of `transparency`.
    pub fn layer(&self, transparency: Transparency) -> &LayerMesh {
        &self.layers[layer_index(transparency)]
    }

    /// Triangles across all layers.
    pub fn triangles(&self) -> usize {
        self.layers.iter().map(LayerMesh::triangles).sum()
    }

    /// Vertices across all layers.
    pub fn vertices(&self) -> usize {
        self.layers.iter().map(|layer| layer.vertices.len()).sum()
    }

    /// Block entity renderers.
    pub fn block_entities(&self) -> &[RenderedBlockEntity] {
        &self.entities
    }

    /// True if `position` produced anything.
    pub fn is_occupied(&self, position: InSectionPosition) -> bool {
        self.occupancy.contains(position)
    }

    /// Number of positions that produced anything.
    pub fn occupied(&self) -> usize {
        self.occupancy.count
    }

    /// Inclusive bounds of the occupied positions.
    pub fn bounds(&self) -> Option<(InSectionPosition, InSectionPosition)> {
        if self.occupancy.count == 0 {
            return None;
        }
        let [min_x, min_y, min_z] = self.occupancy.min;
        let [max_x, max_y, max_z] = self.occupancy.max;
        Some((
            InSectionPosition::new(min_x, min_y, min_z),
            InSectionPosition::new(max_x, max_y, max_z),
        ))
    }

    /// Content hash of the layer buffers.
    pub fn hash(&self) -> MeshHash {
        self.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Quad {
        Quad {
            positions: [
                [0.0, 1.0, 0.0],
                [1.0, 1.0, 0.0],
                [1.0, 1.0, 1.0],
                [0.0, 1.0, 1.0],
            ],
            uvs: [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
            ao: [0; 4],
        }
    }

    #[test]
    fn double_sided_quads_share_vertices() {
        let mut layer = LayerMesh::default();
        layer.add_quad(&quad(), 1, 0, true, false);
        layer.add_quad(&quad(), 1, 0, true, true);
        assert_eq!(layer.vertices.len(), 8);
        assert_eq!(&layer.indices[..6], &FRONT);
        assert_eq!(&layer.indices[6..12], &[4, 5, 6, 4, 6, 7]);
        assert_eq!(&layer.indices[12..], &[4, 6, 5, 4, 7, 6]);
        assert_eq!(layer.triangles(), 6);
        assert_eq!(layer.quads(), 2);
    }

    #[test]
    fn packs_light_into_high_byte() {
        assert_eq!(pack_light_tint(0xF3, 0x12_3456), 0xF312_3456);
        assert_eq!(pack_light_tint(0x01, 0xFFFF_FFFF), 0x01FF_FFFF);
    }

    #[test]
    fn occupancy_tracks_bounds() {
        let mut builder =
            ChunkMeshesBuilder::new(SectionPosition::new(0, 0, 0), ChunkMeshDetails::ALL);
        builder.add_block(InSectionPosition::new(3, 4, 5));
        builder.add_block(InSectionPosition::new(1, 9, 2));
        builder.add_block(InSectionPosition::new(1, 9, 2));
        let meshes = builder.build();
        assert_eq!(meshes.occupied(), 2);
        assert!(meshes.is_occupied(InSectionPosition::new(3, 4, 5)));
        assert!(!meshes.is_occupied(InSectionPosition::new(0, 0, 0)));
        assert_eq!(
            meshes.bounds(),
            Some((InSectionPosition::new(1, 4, 2), InSectionPosition::new(3, 9, 5)))
        );
        assert!(meshes.is_empty());
    }

    #[test]
    fn hash_follows_content() {
        let section = SectionPosition::new(0, 0, 0);
        let empty = ChunkMeshesBuilder::new(section, ChunkMeshDetails::ALL).build();
        let mut builder = ChunkMeshesBuilder::new(section, ChunkMeshDetails::ALL);
        builder
            .layer_mut(Transparency::Opaque)
            .add_quad(&quad(), 1, 0, true, false);
        let opaque = builder.build();
        let mut builder = ChunkMeshesBuilder::new(section, ChunkMeshDetails::ALL);
        builder
            .layer_mut(Transparency::Translucent)
            .add_quad(&quad(), 1, 0, true, false);
        let translucent = builder.build();
        assert_ne!(empty.hash(), opaque.hash());
        assert_ne!(opaque.hash(), translucent.hash());
        assert_eq!(opaque.triangles(), 2);
        assert!(!opaque.is_empty());
    }
}
