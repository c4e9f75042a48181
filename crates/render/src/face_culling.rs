use minemesh_core::Direction;
use minemesh_world::{BlockState, FaceProperties, SideProperties, Transparency};

use crate::details::ChunkMeshDetails;

const EPSILON: f32 = 1.0e-4;
/// Share of an opaque face that opaque neighbour rectangles must cover under
/// [`ChunkMeshDetails::AGGRESSIVE_CULLING`].
const AGGRESSIVE_COVERAGE: f32 = 0.5;

/// Returns true if `face` of `state`, pointing towards `direction`, is hidden
/// by `neighbour`.
///
/// `face` is `None` for faces that do not touch the block boundary; those are
/// never culled.
pub fn can_cull(
    state: &BlockState,
    face: Option<&FaceProperties>,
    direction: Direction,
    neighbour: Option<&BlockState>,
) -> bool {
    let (Some(face), Some(neighbour)) = (face, neighbour) else {
        return false;
    };
    let Some(side) = neighbour.cull_side(direction.inverse()) else {
        return false;
    };

    match side.transparency() {
        Some(Transparency::Opaque) => !face.transparency.is_opaque() || covers(side, face),
        Some(transparency) => {
            if face.transparency != transparency {
                return false;
            }
            if let Some(custom) = state.block().custom_culling() {
                return custom.should_cull(state, face, direction, neighbour);
            }
            state.same_block(neighbour)
        }
        None => {
            let same_block = state.same_block(neighbour);
            covers_with(
                side.faces().iter().filter(|other| {
                    other.transparency.is_opaque()
                        || (same_block && other.transparency == face.transparency)
                }),
                face,
            )
        }
    }
}

/// [`can_cull`] plus the looser rules of distant sections.
///
/// With [`ChunkMeshDetails::CULL_FULL_OPAQUE`] the faces of fully opaque
/// blocks hide behind any full neighbour side, see-through ones included.
/// With [`ChunkMeshDetails::AGGRESSIVE_CULLING`] opaque faces hide once
/// opaque neighbour rectangles cover half of them.
pub(crate) fn cull_face(
    details: ChunkMeshDetails,
    state: &BlockState,
    face: Option<&FaceProperties>,
    direction: Direction,
    neighbour: Option<&BlockState>,
) -> bool {
    if can_cull(state, face, direction, neighbour) {
        return true;
    }
    let (Some(face), Some(neighbour)) = (face, neighbour) else {
        return false;
    };
    if !face.transparency.is_opaque() {
        return false;
    }
    let Some(side) = neighbour.cull_side(direction.inverse()) else {
        return false;
    };
    if details.contains(ChunkMeshDetails::CULL_FULL_OPAQUE)
        && state.is_fully_opaque()
        && side.is_full()
    {
        return true;
    }
    if details.contains(ChunkMeshDetails::AGGRESSIVE_CULLING) {
        let covered: f32 = side
            .faces()
            .iter()
            .filter(|other| other.transparency.is_opaque())
            .map(|other| other.intersection_area(face))
            .sum();
        return face.area() > 0.0 && covered >= face.area() * AGGRESSIVE_COVERAGE - EPSILON;
    }
    false
}

/// True if the rectangles of `side` hide `face`.
///
/// A single rectangle containing the face is enough. Otherwise the overlap
/// areas are summed, which can over-count overlapping rectangles.
pub(crate) fn covers(side: &SideProperties, face: &FaceProperties) -> bool {
    covers_with(side.faces().iter(), face)
}

fn covers_with<'a>(
    faces: impl Iterator<Item = &'a FaceProperties>,
    face: &FaceProperties,
) -> bool {
    let area = face.area();
    let mut covered = 0.0;
    for other in faces {
        if other.contains(face, EPSILON) {
            return true;
        }
        covered += other.intersection_area(face);
    }
    area > 0.0 && covered >= area - EPSILON
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use minemesh_core::Identifier;
    use minemesh_world::{CullShape, CustomBlockCulling, SimpleBlock};

    use super::*;

    fn rect(start: [f32; 2], end: [f32; 2]) -> FaceProperties {
        FaceProperties::new(start, end, Transparency::Opaque)
    }

    fn side(faces: Vec<FaceProperties>) -> SideProperties {
        SideProperties::new(faces)
    }

    fn state_with(block: SimpleBlock, side: Option<SideProperties>) -> BlockState {
        let shape = Direction::VALUES
            .into_iter()
            .fold(CullShape::empty(), |shape, direction| {
                shape.with_side(direction, side.clone())
            });
        BlockState::builder(1, Arc::new(block)).shape(shape).build()
    }

    fn neighbour(side: Option<SideProperties>, transparency: Transparency, kind: u32) -> BlockState {
        let side = side.map(|side| {
            SideProperties::new(
                side.faces()
                    .iter()
                    .map(|face| FaceProperties::new(face.start, face.end, transparency))
                    .collect(),
            )
        });
        let block = SimpleBlock::new(Identifier::new("minemesh", format!("dummy{kind}")));
        state_with(block, side)
    }

    fn full_neighbour(transparency: Transparency) -> BlockState {
        neighbour(Some(SideProperties::full(transparency)), transparency, 0)
    }

    fn state(kind: u32) -> BlockState {
        neighbour(
            Some(SideProperties::full(Transparency::Opaque)),
            Transparency::Opaque,
            kind,
        )
    }

    fn face(transparency: Transparency) -> FaceProperties {
        FaceProperties::full(transparency)
    }

    #[derive(Debug)]
    struct NeverCull;

    impl CustomBlockCulling for NeverCull {
        fn should_cull(&self, _: &BlockState, _: &FaceProperties, _: Direction, _: &BlockState) -> bool {
            false
        }
    }

    #[derive(Debug)]
    struct Unreachable;

    impl CustomBlockCulling for Unreachable {
        fn should_cull(&self, _: &BlockState, _: &FaceProperties, _: Direction, _: &BlockState) -> bool {
            panic!("custom culling invoked");
        }
    }

    #[test]
    fn missing_face_or_neighbour_is_visible() {
        let face = face(Transparency::Opaque);
        assert!(!can_cull(&state(0), Some(&face), Direction::Down, None));
        assert!(!can_cull(
            &state(0),
            None,
            Direction::Down,
            Some(&full_neighbour(Transparency::Opaque))
        ));
        let open = neighbour(None, Transparency::Opaque, 0);
        assert!(!can_cull(&state(0), Some(&face), Direction::Down, Some(&open)));
    }

    #[test]
    fn full_opaque_neighbours_cull_each_other() {
        let face = face(Transparency::Opaque);
        let a = state(0);
        let b = state(1);
        assert!(can_cull(&a, Some(&face), Direction::East, Some(&b)));
        assert!(can_cull(&b, Some(&face), Direction::West, Some(&a)));
    }

    #[test]
    fn geometric_coverage() {
        let face = rect([0.0, 0.5], [1.0, 0.5]);
        let cull = |neighbour_side: Vec<FaceProperties>| {
            let neighbour = neighbour(Some(side(neighbour_side)), Transparency::Opaque, 0);
            can_cull(&state(0), Some(&face), Direction::East, Some(&neighbour))
        };
        assert!(cull(vec![rect([0.0, 0.5], [1.0, 0.5])]));
        assert!(cull(vec![rect([0.0, 0.5], [1.0, 0.6])]));
        assert!(!cull(vec![rect([0.0, 0.5], [1.0, 0.4])]));
        assert!(!cull(vec![rect([0.1, 0.5], [1.0, 0.5])]));
        assert!(!cull(vec![rect([0.1, 0.5], [1.0, 0.6])]));
    }

    #[test]
    fn contained_and_split_coverage() {
        let inner = rect([0.1, 0.8], [0.9, 0.9]);
        let neighbour_face = neighbour(
            Some(side(vec![rect([0.1, 0.5], [0.95, 0.95])])),
            Transparency::Opaque,
            0,
        );
        assert!(can_cull(&state(0), Some(&inner), Direction::East, Some(&neighbour_face)));

        let face = rect([0.1, 0.3], [0.9, 0.9]);
        let strips = neighbour(
            Some(side(vec![
                rect([0.1, 0.2], [0.95, 0.4]),
                rect([0.1, 0.4], [0.95, 0.6]),
                rect([0.1, 0.6], [0.95, 0.95]),
            ])),
            Transparency::Opaque,
            0,
        );
        assert!(can_cull(&state(0), Some(&face), Direction::East, Some(&strips)));
    }

    #[test]
    fn transparency_rules() {
        let opaque = full_neighbour(Transparency::Opaque);
        for transparency in [Transparency::Transparent, Transparency::Translucent] {
            let face = face(transparency);
            assert!(can_cull(&state(0), Some(&face), Direction::East, Some(&opaque)));

            let see_through = full_neighbour(transparency);
            let opaque_face = FaceProperties::full(Transparency::Opaque);
            assert!(!can_cull(&state(0), Some(&opaque_face), Direction::East, Some(&see_through)));
        }
    }

    #[test]
    fn same_block_non_opaque_faces() {
        for transparency in [Transparency::Transparent, Transparency::Translucent] {
            let face = face(transparency);
            let other = full_neighbour(transparency);
            let same = full_neighbour(transparency);
            let different = state(1);
            assert!(can_cull(&same, Some(&face), Direction::East, Some(&other)));
            assert!(!can_cull(&different, Some(&face), Direction::East, Some(&other)));
        }
    }

    #[test]
    fn same_block_culls_regardless_of_geometry() {
        let face = face(Transparency::Transparent);
        let half = neighbour(
            Some(side(vec![rect([0.0, 0.0], [1.0, 0.5])])),
            Transparency::Transparent,
            7,
        );
        let same = neighbour(
            Some(SideProperties::full(Transparency::Transparent)),
            Transparency::Transparent,
            7,
        );
        assert!(can_cull(&same, Some(&face), Direction::East, Some(&half)));
        let other = neighbour(
            Some(SideProperties::full(Transparency::Transparent)),
            Transparency::Transparent,
            8,
        );
        assert!(!can_cull(&other, Some(&face), Direction::East, Some(&half)));
    }

    #[test]
    fn custom_culling_overrides_same_block_rule() {
        let face = face(Transparency::Transparent);
        let other = full_neighbour(Transparency::Transparent);
        let forced = state_with(
            SimpleBlock::new(Identifier::new("minemesh", "dummy0"))
                .with_custom_culling(Arc::new(NeverCull)),
            Some(SideProperties::full(Transparency::Transparent)),
        );
        assert!(!can_cull(&forced, Some(&face), Direction::East, Some(&other)));
    }

    #[test]
    fn custom_culling_skipped_for_opaque_faces() {
        let face = face(Transparency::Opaque);
        let other = full_neighbour(Transparency::Opaque);
        let custom = state_with(
            SimpleBlock::new(Identifier::new("minemesh", "custom"))
                .with_custom_culling(Arc::new(Unreachable)),
            Some(SideProperties::full(Transparency::Opaque)),
        );
        assert!(can_cull(&custom, Some(&face), Direction::East, Some(&other)));
    }

    #[test]
    fn distant_rules_only_apply_with_their_detail() {
        let opaque = face(Transparency::Opaque);
        let glass = full_neighbour(Transparency::Transparent);
        let none = ChunkMeshDetails::empty();
        assert!(!cull_face(none, &state(0), Some(&opaque), Direction::East, Some(&glass)));
        assert!(cull_face(
            ChunkMeshDetails::CULL_FULL_OPAQUE,
            &state(0),
            Some(&opaque),
            Direction::East,
            Some(&glass)
        ));
        // Only fully opaque blocks hide behind see-through sides.
        let slab_face = rect([0.0, 0.0], [1.0, 0.5]);
        let slab = state_with(
            SimpleBlock::new(Identifier::new("minemesh", "slab")),
            Some(side(vec![rect([0.0, 0.0], [1.0, 0.5])])),
        );
        assert!(!cull_face(
            ChunkMeshDetails::CULL_FULL_OPAQUE,
            &slab,
            Some(&slab_face),
            Direction::East,
            Some(&glass)
        ));

        let half = neighbour(Some(side(vec![rect([0.0, 0.0], [1.0, 0.5])])), Transparency::Opaque, 0);
        let quarter = neighbour(Some(side(vec![rect([0.0, 0.0], [0.5, 0.5])])), Transparency::Opaque, 0);
        assert!(!cull_face(none, &state(0), Some(&opaque), Direction::East, Some(&half)));
        let aggressive = ChunkMeshDetails::AGGRESSIVE_CULLING;
        assert!(cull_face(aggressive, &state(0), Some(&opaque), Direction::East, Some(&half)));
        assert!(!cull_face(aggressive, &state(0), Some(&opaque), Direction::East, Some(&quarter)));
        // See-through faces keep the exact rules.
        let ice = face(Transparency::Translucent);
        let half_ice = neighbour(
            Some(side(vec![rect([0.0, 0.0], [1.0, 0.5])])),
            Transparency::Translucent,
            9,
        );
        assert!(!cull_face(aggressive, &state(0), Some(&ice), Direction::East, Some(&half_ice)));
    }

    #[test]
    fn mixed_side_only_counts_opaque_rectangles() {
        let mixed = state_with(
            SimpleBlock::new(Identifier::new("minemesh", "mixed")),
            Some(side(vec![
                FaceProperties::new([0.0, 0.0], [1.0, 0.5], Transparency::Opaque),
                FaceProperties::new([0.0, 0.5], [1.0, 1.0], Transparency::Translucent),
            ])),
        );
        let lower = rect([0.0, 0.0], [1.0, 0.5]);
        let full = face(Transparency::Opaque);
        assert!(can_cull(&state(0), Some(&lower), Direction::North, Some(&mixed)));
        assert!(!can_cull(&state(0), Some(&full), Direction::North, Some(&mixed)));
    }
}
