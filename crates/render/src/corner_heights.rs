//! Interpolated fluid surface heights.
//!
//! Samples form a 3×3 grid around the fluid block indexed by
//! `(dz + 1) * 3 + (dx + 1)`. Corners are ordered north-west, north-east,
//! south-east, south-west.

use minemesh_core::InSectionPosition;
use minemesh_world::{ChunkNeighbourhood, Fluid};

/// Samples contributing to each corner.
const CORNER_SAMPLES: [[usize; 4]; 4] = [[0, 1, 3, 4], [1, 2, 4, 5], [4, 5, 7, 8], [3, 4, 6, 7]];

/// Sample the fluid height of the nine columns around `position`.
///
/// A sample is `1.0` if the same fluid sits above it, the fluid height if the
/// block holds the fluid, `None` for sky-blocking blocks and `0.0` otherwise.
pub fn fluid_heights(
    neighbourhood: &ChunkNeighbourhood,
    height: i32,
    position: InSectionPosition,
    fluid: &dyn Fluid,
) -> [Option<f32>; 9] {
    let (x, y, z) = (position.x(), position.y(), position.z());
    std::array::from_fn(|index| {
        let dx = (index % 3) as i32 - 1;
        let dz = (index / 3) as i32 - 1;
        let above = neighbourhood.block(height, x + dx, y + 1, z + dz);
        if fluid.matches(above) {
            return Some(1.0);
        }
        match neighbourhood.block(height, x + dx, y, z + dz) {
            Some(block) if fluid.matches(Some(block)) => Some(fluid.height(block)),
            Some(block) if block.blocks_sky() => None,
            _ => Some(0.0),
        }
    })
}

/// Average the samples into the four corner heights.
pub fn corner_heights(samples: &[Option<f32>; 9]) -> [f32; 4] {
    CORNER_SAMPLES.map(|indices| average(indices.iter().filter_map(|&index| samples[index])))
}

fn average(samples: impl Iterator<Item = f32>) -> f32 {
    let mut total = 0.0;
    let mut weight = 0.0;
    for sample in samples {
        if sample >= 1.0 {
            return 1.0;
        }
        let factor = if sample >= 0.8 { 10.0 } else { 1.0 };
        total += sample * factor;
        weight += factor;
    }
    if weight == 0.0 {
        return 0.0;
    }
    total / weight
}

#[cfg(test)]
mod tests {
    use super::*;
    use minemesh_world::MAX_FLUID_HEIGHT;

    #[test]
    fn surrounded_source_stays_flat() {
        let samples = [Some(MAX_FLUID_HEIGHT); 9];
        for corner in corner_heights(&samples) {
            assert!((corner - MAX_FLUID_HEIGHT).abs() < 1.0e-6);
        }
    }

    #[test]
    fn fluid_above_fills_corner() {
        let mut samples = [Some(0.0); 9];
        samples[4] = Some(MAX_FLUID_HEIGHT);
        samples[0] = Some(1.0);
        let corners = corner_heights(&samples);
        assert_eq!(corners[0], 1.0);
        assert!(corners[2] < 1.0);
    }

    #[test]
    fn source_weighs_more_than_air() {
        let mut samples = [Some(0.0); 9];
        samples[4] = Some(MAX_FLUID_HEIGHT);
        let expected = MAX_FLUID_HEIGHT * 10.0 / 13.0;
        for corner in corner_heights(&samples) {
            assert!((corner - expected).abs() < 1.0e-6);
        }
    }

    #[test]
    fn solid_samples_are_skipped() {
        let mut samples = [None; 9];
        samples[4] = Some(0.5);
        samples[5] = Some(0.3);
        let corners = corner_heights(&samples);
        assert!((corners[0] - 0.5).abs() < 1.0e-6);
        assert!((corners[1] - 0.4).abs() < 1.0e-6);
        assert!((corners[2] - 0.4).abs() < 1.0e-6);
        assert!((corners[3] - 0.5).abs() < 1.0e-6);
    }
}
