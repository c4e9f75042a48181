//! Baked block and fluid models.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use minemesh_core::{BlockPosition, Direction, Identifier, InSectionPosition};
use minemesh_world::{BlockState, FaceProperties, Fluid, Transparency};
use rand::rngs::StdRng;
use rand::Rng;

use crate::ao::{face_axes, AmbientOcclusion};
use crate::face_culling::cull_face;
use crate::mesh::{pack_light_tint, ChunkMeshesBuilder, Quad};
use crate::tint::{TintProvider, WHITE};

/// Index of the block's own light in [`RenderContext::light`].
pub const SELF_LIGHT_INDEX: usize = 6;

const EPSILON: f32 = 1.0e-4;

/// A texture id with the layer its faces go to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Texture {
    /// Texture id.
    pub id: u32,
    /// Transparency class of the texture.
    pub transparency: Transparency,
}

impl Texture {
    /// Construct a texture reference.
    pub const fn new(id: u32, transparency: Transparency) -> Self {
        Self { id, transparency }
    }
}

/// Everything a model needs to emit one block.
pub struct RenderContext<'a> {
    /// State being rendered.
    pub state: &'a BlockState,
    /// Position inside the section.
    pub position: InSectionPosition,
    /// World position, for tints.
    pub world_position: BlockPosition,
    /// Render offset added to every vertex.
    pub offset: [f32; 3],
    /// Neighbour states in direction order.
    pub neighbours: &'a [Option<&'a BlockState>; 6],
    /// Neighbour light in direction order, own light at [`SELF_LIGHT_INDEX`].
    pub light: &'a [u8; 7],
    /// Occlusion levels, when ambient occlusion is active.
    pub ao: Option<&'a AmbientOcclusion>,
    /// Tint source.
    pub tints: &'a dyn TintProvider,
    /// Section-wide generator for texture rotation, present while the
    /// anti-moire detail is active.
    pub random: Option<&'a mut StdRng>,
    /// Output mesh.
    pub mesh: &'a mut ChunkMeshesBuilder,
}

/// A model that emits block geometry.
pub trait BakedModel: Send + Sync + fmt::Debug {
    /// Emit the block. Returns true if any face was emitted.
    fn render(&self, context: &mut RenderContext<'_>) -> bool;
}

/// One quad of a baked model.
#[derive(Debug, Clone, PartialEq)]
pub struct BakedFace {
    /// Block-local corner positions, counter-clockwise seen from outside.
    pub positions: [[f32; 3]; 4],
    /// Corner texture coordinates.
    pub uvs: [[f32; 2]; 4],
    /// Texture and layer.
    pub texture: Texture,
    /// Tint index, `None` for untinted faces.
    pub tint_index: Option<u8>,
    /// Rectangle on the block boundary, `None` if the face is inside the block.
    pub properties: Option<FaceProperties>,
}

/// Faces grouped by the direction they point to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BakedBlockModel {
    faces: [Vec<BakedFace>; 6],
}

impl BakedBlockModel {
    /// Model without faces.
    pub fn new() -> Self {
        Self::default()
    }

    /// Full cube with one texture per direction.
    pub fn cube(textures: [Texture; 6]) -> Self {
        Self::new().with_cuboid([0.0; 3], [1.0; 3], textures)
    }

    /// Add a face pointing `direction`.
    pub fn with_face(mut self, direction: Direction, face: BakedFace) -> Self {
        self.faces[direction.ordinal()].push(face);
        self
    }

    /// Add the six faces of the box `[min, max]`.
    pub fn with_cuboid(mut self, min: [f32; 3], max: [f32; 3], textures: [Texture; 6]) -> Self {
        for direction in Direction::VALUES {
            let texture = textures[direction.ordinal()];
            self.faces[direction.ordinal()].push(cuboid_face(direction, min, max, texture));
        }
        self
    }

    /// Set the tint index of every face.
    pub fn tinted(mut self, tint_index: u8) -> Self {
        for face in self.faces.iter_mut().flatten() {
            face.tint_index = Some(tint_index);
        }
        self
    }

    /// Faces pointing `direction`.
    pub fn faces(&self, direction: Direction) -> &[BakedFace] {
        &self.faces[direction.ordinal()]
    }
}

fn cuboid_face(direction: Direction, min: [f32; 3], max: [f32; 3], texture: Texture) -> BakedFace {
    let [x0, y0, z0] = min;
    let [x1, y1, z1] = max;
    let positions = match direction {
        Direction::Down => [[x0, y0, z0], [x1, y0, z0], [x1, y0, z1], [x0, y0, z1]],
        Direction::Up => [[x0, y1, z0], [x0, y1, z1], [x1, y1, z1], [x1, y1, z0]],
        Direction::North => [[x1, y0, z0], [x0, y0, z0], [x0, y1, z0], [x1, y1, z0]],
        Direction::South => [[x0, y0, z1], [x1, y0, z1], [x1, y1, z1], [x0, y1, z1]],
        Direction::West => [[x0, y0, z0], [x0, y0, z1], [x0, y1, z1], [x0, y1, z0]],
        Direction::East => [[x1, y0, z1], [x1, y0, z0], [x1, y1, z0], [x1, y1, z1]],
    };
    let (u, v) = face_axes(direction);
    let uvs = positions.map(|position| {
        if direction.is_horizontal() {
            [position[u], 1.0 - position[v]]
        } else {
            [position[u], position[v]]
        }
    });
    let touches = match direction {
        Direction::Down => min[1] <= EPSILON,
        Direction::Up => max[1] >= 1.0 - EPSILON,
        Direction::North => min[2] <= EPSILON,
        Direction::South => max[2] >= 1.0 - EPSILON,
        Direction::West => min[0] <= EPSILON,
        Direction::East => max[0] >= 1.0 - EPSILON,
    };
    let properties = touches.then(|| {
        FaceProperties::new([min[u], min[v]], [max[u], max[v]], texture.transparency)
    });
    BakedFace {
        positions,
        uvs,
        texture,
        tint_index: None,
        properties,
    }
}

impl BakedModel for BakedBlockModel {
    fn render(&self, context: &mut RenderContext<'_>) -> bool {
        let details = context.mesh.details();
        let base = [
            context.position.x() as f32 + context.offset[0],
            context.position.y() as f32 + context.offset[1],
            context.position.z() as f32 + context.offset[2],
        ];
        // One draw per block keeps the sequence independent of culling.
        let turns = context
            .random
            .as_mut()
            .map_or(0, |random| random.gen_range(0..4usize));
        let mut rendered = false;
        for direction in Direction::VALUES {
            if !details.has_side(direction) {
                continue;
            }
            let neighbour = context.neighbours[direction.ordinal()];
            for face in &self.faces[direction.ordinal()] {
                let properties = face.properties.as_ref();
                if cull_face(details, context.state, properties, direction, neighbour) {
                    continue;
                }
                let light = if face.properties.is_some() {
                    context.light[direction.ordinal()]
                } else {
                    context.light[SELF_LIGHT_INDEX]
                };
                let tint = face.tint_index.map_or(WHITE, |index| {
                    context
                        .tints
                        .block_tint(context.state, context.world_position, index)
                });
                let ao = match context.ao {
                    Some(ao) => face.positions.map(|position| ao.vertex(direction, position)),
                    None => [0; 4],
                };
                let quad = Quad {
                    positions: face.positions.map(|position| {
                        [
                            base[0] + position[0],
                            base[1] + position[1],
                            base[2] + position[2],
                        ]
                    }),
                    uvs: if properties.is_some_and(is_full_square) {
                        rotate(face.uvs, turns)
                    } else {
                        face.uvs
                    },
                    ao,
                };
                context.mesh.layer_mut(face.texture.transparency).add_quad(
                    &quad,
                    face.texture.id,
                    pack_light_tint(light, tint),
                    true,
                    false,
                );
                rendered = true;
            }
        }
        rendered
    }
}

fn is_full_square(properties: &FaceProperties) -> bool {
    properties.area() >= 1.0 - EPSILON
}

/// Shift texture coordinates by `turns` corners, turning the texture in
/// quarter steps without moving the quad.
fn rotate(uvs: [[f32; 2]; 4], turns: usize) -> [[f32; 2]; 4] {
    std::array::from_fn(|corner| uvs[(corner + turns) % 4])
}

/// Textures of a fluid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FluidModel {
    /// Surface texture without flow.
    pub still: Texture,
    /// Surface and side texture with flow.
    pub flowing: Texture,
    /// Side texture seen through see-through neighbours.
    pub overlay: Option<Texture>,
}

/// Models by block state id and fluid identifier.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    blocks: HashMap<u32, Arc<dyn BakedModel>>,
    fluids: HashMap<Identifier, FluidModel>,
}

impl ModelRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the model of a block state.
    pub fn insert_block(&mut self, state: &BlockState, model: Arc<dyn BakedModel>) {
        self.blocks.insert(state.id(), model);
    }

    /// Register the model of a fluid.
    pub fn insert_fluid(&mut self, fluid: Identifier, model: FluidModel) {
        self.fluids.insert(fluid, model);
    }

    /// Model of `state`.
    #[inline]
    pub fn block(&self, state: &BlockState) -> Option<&dyn BakedModel> {
        self.blocks.get(&state.id()).map(Arc::as_ref)
    }

    /// Model of `fluid`.
    #[inline]
    pub fn fluid(&self, fluid: &dyn Fluid) -> Option<&FluidModel> {
        self.fluids.get(fluid.identifier())
    }

    /// Number of block models.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// True if no block model is registered.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
