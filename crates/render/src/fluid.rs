//! Mesher for fluid surfaces and sides.
//!
//! Corner heights are ordered north-west, north-east, south-east,
//! south-west. Quads are emitted counter-clockwise seen from outside.

use minemesh_core::{BlockPosition, Direction, InSectionPosition, SectionPosition};
use minemesh_world::{
    ChunkNeighbourhood, ChunkSection, StateFlags, MAX_FLUID_HEIGHT, SKY_LIGHT_MASK,
};

use crate::cancel::CancellationToken;
use crate::corner_heights::{corner_heights, fluid_heights};
use crate::details::ChunkMeshDetails;
use crate::fluid_culling::{can_fluid_cull, FluidCull};
use crate::mesh::{pack_light_tint, ChunkMeshesBuilder, Quad};
use crate::model::{FluidModel, ModelRegistry, Texture};
use crate::tint::TintProvider;
use crate::MeshError;

/// `(x, z)` of the corners.
const CORNERS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
/// Corner order of the upward facing top quad.
const TOP_ORDER: [usize; 4] = [0, 3, 2, 1];
const STILL_UV: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// Side quads as `(direction, first corner, second corner)`, walking the
/// block outline clockwise seen from above.
const SIDES: [(Direction, usize, usize); 4] = [
    (Direction::North, 0, 1),
    (Direction::South, 2, 3),
    (Direction::West, 3, 0),
    (Direction::East, 1, 2),
];

pub(crate) struct FluidSectionMesher<'a> {
    pub(crate) models: &'a ModelRegistry,
    pub(crate) tints: &'a dyn TintProvider,
}

impl FluidSectionMesher<'_> {
    pub(crate) fn mesh(
        &self,
        neighbourhood: &ChunkNeighbourhood,
        section_position: SectionPosition,
        section: &ChunkSection,
        mesh: &mut ChunkMeshesBuilder,
        cancel: &CancellationToken,
    ) -> Result<(), MeshError> {
        let height = section.height();
        let chunk = neighbourhood.chunk();
        let details = mesh.details();
        let base_y = height * 16;
        let dark_caves = details.contains(ChunkMeshDetails::DARK_CAVE_SURFACE);

        for position in InSectionPosition::all() {
            cancel.check()?;
            let Some(state) = section.block(position) else {
                continue;
            };
            let Some(fluid) = state.fluid() else {
                continue;
            };
            let Some(model) = self.models.fluid(fluid) else {
                continue;
            };
            let fluid_height = fluid.height(state);
            if fluid_height <= 0.0 {
                continue;
            }

            let (x, y, z) = (position.x(), position.y(), position.z());
            let mut light = section.light(position).raw();
            if base_y + y >= chunk.height_at(position.column_index()) {
                light |= SKY_LIGHT_MASK;
            }
            if light == 0 && !dark_caves && state.flags().contains(StateFlags::CAVE_SURFACE) {
                continue;
            }

            let block = |direction: Direction| {
                let [dx, dy, dz] = direction.vector();
                neighbourhood.block(height, x + dx, y + dy, z + dz)
            };

            let up = !fluid.matches(block(Direction::Up));
            let mut cull = [FluidCull::Culled; 6];
            for direction in Direction::VALUES {
                if direction != Direction::Up {
                    cull[direction.ordinal()] =
                        can_fluid_cull(block(direction), direction, fluid, 1.0);
                }
            }
            let sides = Direction::SIDES
                .iter()
                .any(|direction| cull[direction.ordinal()].is_visible());
            if !up && !cull[Direction::Down.ordinal()].is_visible() && !sides {
                continue;
            }

            let corners = if details.contains(ChunkMeshDetails::FLUID_HEIGHTS) {
                corner_heights(&fluid_heights(neighbourhood, height, position, fluid))
            } else if up {
                [MAX_FLUID_HEIGHT; 4]
            } else {
                [1.0; 4]
            };

            // Blocks of border sections past the world edge are not drawn.
            let Ok(world_position) = BlockPosition::try_of_section(section_position, position)
            else {
                continue;
            };
            let tint = self.tints.fluid_tint(fluid, state, world_position);
            let light_tint = pack_light_tint(light, tint);
            let origin = [x as f32, y as f32, z as f32];

            if up {
                let velocity = if details.contains(ChunkMeshDetails::FLOWING_FLUID) {
                    fluid.velocity(state, Direction::SIDES.map(&block))
                } else {
                    [0.0, 0.0]
                };
                render_up(model, velocity, &corners, origin, light_tint, mesh);
            }
            if cull[Direction::Down.ordinal()].is_visible() && details.has_side(Direction::Down) {
                render_down(model, origin, light_tint, mesh);
            }
            for (direction, first, second) in SIDES {
                if !details.has_side(direction) {
                    continue;
                }
                render_side(
                    model,
                    cull[direction.ordinal()],
                    [CORNERS[first], CORNERS[second]],
                    [corners[first], corners[second]],
                    origin,
                    light_tint,
                    mesh,
                );
            }

            mesh.add_block(position);
        }
        Ok(())
    }
}

fn flowing_uvs(velocity: [f64; 2]) -> [[f32; 2]; 4] {
    let angle = velocity[0].atan2(velocity[1]) as f32;
    let sin = angle.sin() * 0.25;
    let cos = angle.cos() * 0.25;
    let center = 0.5;
    [
        [center - cos + sin, center - cos - sin],
        [center + cos + sin, center - cos + sin],
        [center + cos - sin, center + cos + sin],
        [center - cos - sin, center + cos - sin],
    ]
}

fn render_up(
    model: &FluidModel,
    velocity: [f64; 2],
    corners: &[f32; 4],
    origin: [f32; 3],
    light_tint: u32,
    mesh: &mut ChunkMeshesBuilder,
) {
    let details = mesh.details();
    let front = details.has_side(Direction::Up);
    let back = details.has_side(Direction::Down);
    if !front && !back {
        return;
    }
    let (texture, uvs) = if velocity == [0.0, 0.0] {
        (model.still, STILL_UV)
    } else {
        (model.flowing, flowing_uvs(velocity))
    };
    let quad = Quad {
        positions: TOP_ORDER.map(|corner| {
            [
                origin[0] + CORNERS[corner][0],
                origin[1] + corners[corner],
                origin[2] + CORNERS[corner][1],
            ]
        }),
        uvs: TOP_ORDER.map(|corner| uvs[corner]),
        ao: [0; 4],
    };
    emit(mesh, texture, &quad, light_tint, front, back);
}

fn render_down(
    model: &FluidModel,
    origin: [f32; 3],
    light_tint: u32,
    mesh: &mut ChunkMeshesBuilder,
) {
    let quad = Quad {
        positions: CORNERS.map(|[x, z]| [origin[0] + x, origin[1], origin[2] + z]),
        uvs: STILL_UV,
        ao: [0; 4],
    };
    emit(mesh, model.still, &quad, light_tint, true, false);
}

fn render_side(
    model: &FluidModel,
    cull: FluidCull,
    ends: [[f32; 2]; 2],
    heights: [f32; 2],
    origin: [f32; 3],
    light_tint: u32,
    mesh: &mut ChunkMeshesBuilder,
) {
    let (texture, backface) = match (cull, model.overlay) {
        (FluidCull::Culled, _) => return,
        (FluidCull::Overlay, Some(overlay)) => (overlay, false),
        _ => (model.flowing, true),
    };
    let [[x1, z1], [x2, z2]] = ends;
    let [h1, h2] = heights;
    let quad = Quad {
        positions: [
            [origin[0] + x2, origin[1], origin[2] + z2],
            [origin[0] + x1, origin[1], origin[2] + z1],
            [origin[0] + x1, origin[1] + h1, origin[2] + z1],
            [origin[0] + x2, origin[1] + h2, origin[2] + z2],
        ],
        uvs: [
            [0.5, 0.5],
            [0.0, 0.5],
            [0.0, (1.0 - h1) * 0.5],
            [0.5, (1.0 - h2) * 0.5],
        ],
        ao: [0; 4],
    };
    emit(mesh, texture, &quad, light_tint, true, backface);
}

fn emit(
    mesh: &mut ChunkMeshesBuilder,
    texture: Texture,
    quad: &Quad,
    light_tint: u32,
    front: bool,
    back: bool,
) {
    mesh.layer_mut(texture.transparency)
        .add_quad(quad, texture.id, light_tint, front, back);
}
