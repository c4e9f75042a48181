//! Mesher for every non-fluid block of a section.

use minemesh_core::{BlockPosition, Direction, Identifier, InSectionPosition, SectionPosition};
use minemesh_world::{
    BlockState, ChunkNeighbourhood, ChunkSection, LightLevel, StateFlags, SKY_LIGHT_MASK,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::ao::AmbientOcclusion;
use crate::cancel::CancellationToken;
use crate::details::ChunkMeshDetails;
use crate::mesh::{ChunkMeshesBuilder, RenderedBlockEntity};
use crate::model::{ModelRegistry, RenderContext, SELF_LIGHT_INDEX};
use crate::tint::TintProvider;
use crate::MeshError;

pub(crate) struct SolidSectionMesher<'a> {
    pub(crate) models: &'a ModelRegistry,
    pub(crate) tints: &'a dyn TintProvider,
    pub(crate) bedrock: &'a Identifier,
    pub(crate) fast_bedrock: bool,
    pub(crate) ambient_occlusion: bool,
}

impl SolidSectionMesher<'_> {
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
        let fast_bedrock = self.fast_bedrock && height == chunk.min_section();
        let entities = details.contains(ChunkMeshDetails::ENTITIES);
        let random_offset = details.contains(ChunkMeshDetails::RANDOM_OFFSET);
        let text = details.contains(ChunkMeshDetails::TEXT);
        let minor = details.contains(ChunkMeshDetails::MINOR_VISUAL_IMPACT);
        let non_full = details.contains(ChunkMeshDetails::NON_FULL_BLOCKS);
        // Fixed seed: the same section always gets the same rotations.
        let mut random = details
            .contains(ChunkMeshDetails::ANTI_MOIRE_PATTERN)
            .then(|| StdRng::seed_from_u64(0));
        let ambient_occlusion =
            self.ambient_occlusion && details.contains(ChunkMeshDetails::AMBIENT_OCCLUSION);

        let mut neighbours: [Option<&BlockState>; 6] = [None; 6];
        let mut light = [0u8; 7];
        let mut ao = AmbientOcclusion::new();

        for position in InSectionPosition::all() {
            cancel.check()?;
            let Some(state) = section.block(position) else {
                continue;
            };
            if state.is_fluid_block() {
                continue;
            }
            let flags = state.flags();
            let model = self.models.block(state).filter(|_| {
                (minor || !flags.contains(StateFlags::MINOR_VISUAL_IMPACT))
                    && (non_full || flags.contains(StateFlags::FULL_CUBE))
            });
            let block_entity = if entities {
                section.block_entity(position)
            } else {
                None
            };
            if model.is_none() && block_entity.is_none() {
                continue;
            }

            let (x, y, z) = (position.x(), position.y(), position.z());
            let world_y = base_y + y;
            let max_height = chunk.height_at(position.column_index());

            light[SELF_LIGHT_INDEX] = section.light(position).raw();
            if world_y >= max_height {
                light[SELF_LIGHT_INDEX] |= SKY_LIGHT_MASK;
            }

            for direction in Direction::VALUES {
                let [dx, dy, dz] = direction.vector();
                let index = direction.ordinal();
                neighbours[index] = neighbourhood.block(height, x + dx, y + dy, z + dz);
                light[index] = neighbourhood.light(height, x + dx, y + dy, z + dz).raw();
                if direction.is_horizontal() {
                    let column = neighbourhood.height_at(x + dx, z + dz);
                    if column.is_some_and(|column| world_y >= column) {
                        light[index] |= SKY_LIGHT_MASK;
                    }
                }
            }
            if fast_bedrock && y == 0 && state.is(self.bedrock) {
                neighbours[Direction::Down.ordinal()] = Some(state);
            }
            if world_y > max_height {
                light[Direction::Up.ordinal()] |= SKY_LIGHT_MASK;
                light[Direction::Down.ordinal()] |= SKY_LIGHT_MASK;
            } else if world_y + 1 >= max_height {
                light[Direction::Up.ordinal()] |= SKY_LIGHT_MASK;
            }

            // Blocks of border sections past the world edge are not drawn.
            let Ok(world_position) = BlockPosition::try_of_section(section_position, position)
            else {
                continue;
            };
            let offset = match state.block().offset() {
                Some(offset) if random_offset => offset.offset(world_position),
                _ => [0.0; 3],
            };

            let occlusion = if ambient_occlusion {
                ao.compute(neighbourhood, height, position);
                Some(&ao)
            } else {
                None
            };

            let mut rendered = false;
            if let Some(model) = model {
                let mut context = RenderContext {
                    state,
                    position,
                    world_position,
                    offset,
                    neighbours: &neighbours,
                    light: &light,
                    ao: occlusion,
                    tints: self.tints,
                    random: random.as_mut(),
                    mesh: &mut *mesh,
                };
                rendered = model.render(&mut context);
            }
            if let Some(entity) = block_entity {
                mesh.add_block_entity(RenderedBlockEntity {
                    position,
                    kind: entity.kind.clone(),
                    light: LightLevel(light[SELF_LIGHT_INDEX]),
                    text: text && flags.contains(StateFlags::TEXT),
                });
                rendered = true;
            }
            if rendered {
                mesh.add_block(position);
            }
        }
        Ok(())
    }
}
