//! Per-vertex ambient occlusion.
//!
//! Corners of a face are indexed by the face-local axes of [`face_axes`]:
//! bit 0 is set on the high end of the first axis, bit 1 on the high end of
//! the second one.

use minemesh_core::{Direction, InSectionPosition};
use minemesh_world::{BlockState, ChunkNeighbourhood};

/// Occlusion level of a vertex from its two edge neighbours and the
/// diagonal one. Two occluded edges hide the corner regardless of the diagonal.
#[inline]
pub fn calculate_level(side1: bool, side2: bool, corner: bool) -> u8 {
    if side1 && side2 {
        return 3;
    }
    side1 as u8 + side2 as u8 + corner as u8
}

/// World axes `(u, v)` spanning the face pointing `direction`.
pub const fn face_axes(direction: Direction) -> (usize, usize) {
    match direction {
        Direction::Down | Direction::Up => (0, 2),
        Direction::North | Direction::South => (0, 1),
        Direction::West | Direction::East => (2, 1),
    }
}

/// Occlusion levels of the six faces of one block, reused across positions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmbientOcclusion {
    levels: [[u8; 4]; 6],
}

impl AmbientOcclusion {
    /// All faces unoccluded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset every level.
    pub fn clear(&mut self) {
        self.levels = [[0; 4]; 6];
    }

    /// Sample the blocks around `position` of section `height`.
    pub fn compute(
        &mut self,
        neighbourhood: &ChunkNeighbourhood,
        height: i32,
        position: InSectionPosition,
    ) {
        let origin = [position.x(), position.y(), position.z()];
        let occluded = |point: [i32; 3]| {
            neighbourhood
                .block(height, point[0], point[1], point[2])
                .is_some_and(BlockState::is_fully_opaque)
        };
        for direction in Direction::VALUES {
            let normal = direction.vector();
            let (u, v) = face_axes(direction);
            let front = [
                origin[0] + normal[0],
                origin[1] + normal[1],
                origin[2] + normal[2],
            ];
            for (corner, level) in self.levels[direction.ordinal()].iter_mut().enumerate() {
                let du = if corner & 1 != 0 { 1 } else { -1 };
                let dv = if corner & 2 != 0 { 1 } else { -1 };
                let mut side_u = front;
                side_u[u] += du;
                let mut side_v = front;
                side_v[v] += dv;
                let mut diagonal = side_u;
                diagonal[v] += dv;
                *level = calculate_level(occluded(side_u), occluded(side_v), occluded(diagonal));
            }
        }
    }

    /// Corner levels of the face pointing `direction`.
    #[inline]
    pub fn face(&self, direction: Direction) -> [u8; 4] {
        self.levels[direction.ordinal()]
    }

    /// Level of the face corner closest to a block-local vertex `position`.
    pub fn vertex(&self, direction: Direction, position: [f32; 3]) -> u8 {
        let (u, v) = face_axes(direction);
        let corner = usize::from(position[u] >= 0.5) | (usize::from(position[v] >= 0.5) << 1);
        self.levels[direction.ordinal()][corner]
    }
}
