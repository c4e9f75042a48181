//! Distance based mesh detail levels.
//!
//! Distances are squared section distances with the vertical delta weighted
//! by a quarter. [`ChunkMeshDetails::update`] widens every threshold into a
//! band so that a section hovering around a boundary does not flip its level
//! on every camera move.

use bitflags::bitflags;
use minemesh_core::{Direction, SectionPosition};

bitflags! {
    /// Features a section mesh is built with.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ChunkMeshDetails: u32 {
        /// Block entity renderers.
        const ENTITIES = 1 << 0;
        /// Text of block entities that carry it.
        const TEXT = 1 << 1;
        /// Per-vertex ambient occlusion.
        const AMBIENT_OCCLUSION = 1 << 2;
        /// Seeded quarter turns of full face textures against tiling patterns.
        const ANTI_MOIRE_PATTERN = 1 << 3;
        /// Positional jitter of plants.
        const RANDOM_OFFSET = 1 << 4;
        /// Flow-rotated fluid textures.
        const FLOWING_FLUID = 1 << 5;
        /// Interpolated fluid surface heights.
        const FLUID_HEIGHTS = 1 << 6;
        /// Faces of fully opaque blocks hide behind any full neighbour side.
        const CULL_FULL_OPAQUE = 1 << 7;
        /// Models of small decorations like torches.
        const MINOR_VISUAL_IMPACT = 1 << 8;
        /// Models of blocks that are not full cubes.
        const NON_FULL_BLOCKS = 1 << 9;
        /// Opaque faces hide once opaque neighbours cover half of them.
        const AGGRESSIVE_CULLING = 1 << 10;
        /// Unlit cave surface fluids.
        const DARK_CAVE_SURFACE = 1 << 11;
        /// Faces pointing down.
        const SIDE_DOWN = 1 << 12;
        /// Faces pointing up.
        const SIDE_UP = 1 << 13;
        /// Faces pointing north.
        const SIDE_NORTH = 1 << 14;
        /// Faces pointing south.
        const SIDE_SOUTH = 1 << 15;
        /// Faces pointing west.
        const SIDE_WEST = 1 << 16;
        /// Faces pointing east.
        const SIDE_EAST = 1 << 17;
    }
}

const SIDE_MIN: i32 = 2;
const SIDE_NORMAL: i32 = 3;
const SIDE_MAX: i32 = 5;

const fn squared(value: i32) -> i32 {
    value * value
}

struct Delta {
    x: i32,
    y: i32,
    z: i32,
    xz: i32,
    distance: i32,
}

impl Delta {
    fn new(position: SectionPosition, camera: SectionPosition) -> Self {
        let [x, y, z] = position.delta(camera);
        let xz = x * x + z * z;
        Self {
            x,
            y,
            z,
            xz,
            distance: xz + y * y / 4,
        }
    }
}

impl ChunkMeshDetails {
    /// Every detail a section next to the camera gets.
    pub const ALL: Self = Self::all()
        .difference(Self::AGGRESSIVE_CULLING)
        .difference(Self::CULL_FULL_OPAQUE);

    /// Face flag for a direction.
    pub const fn side(direction: Direction) -> Self {
        match direction {
            Direction::Down => Self::SIDE_DOWN,
            Direction::Up => Self::SIDE_UP,
            Direction::North => Self::SIDE_NORTH,
            Direction::South => Self::SIDE_SOUTH,
            Direction::West => Self::SIDE_WEST,
            Direction::East => Self::SIDE_EAST,
        }
    }

    /// True if faces pointing `direction` are meshed.
    #[inline]
    pub fn has_side(self, direction: Direction) -> bool {
        self.contains(Self::side(direction))
    }

    /// Details for a section seen for the first time.
    pub fn of(position: SectionPosition, camera: SectionPosition) -> Self {
        let delta = Delta::new(position, camera);
        let distance = delta.distance;
        let mut details = Self::ALL;

        if distance >= squared(10) {
            details -= Self::ENTITIES;
        }
        if distance >= squared(5) {
            details -= Self::TEXT;
        }
        if distance >= squared(24) {
            details -= Self::AMBIENT_OCCLUSION;
        }
        if distance >= squared(15) {
            details -= Self::ANTI_MOIRE_PATTERN;
        }
        if distance >= squared(12) {
            details -= Self::RANDOM_OFFSET;
        }
        if distance >= squared(6) {
            details -= Self::FLOWING_FLUID;
        }
        if distance >= squared(8) {
            details -= Self::FLUID_HEIGHTS;
        }
        if distance >= squared(2) {
            details |= Self::CULL_FULL_OPAQUE;
        }
        if distance >= squared(36) {
            details -= Self::NON_FULL_BLOCKS;
        }
        let minor = if delta.y.abs() < 3 { 14 } else { 32 };
        if distance >= squared(minor) {
            details -= Self::MINOR_VISUAL_IMPACT;
        }
        if distance >= squared(12) {
            details |= Self::AGGRESSIVE_CULLING;
        }

        if delta.xz >= squared(8)
            || (delta.xz >= squared(5) && delta.y.abs() >= 5)
            || (delta.xz >= squared(2) && delta.y.abs() >= 8)
        {
            details -= Self::DARK_CAVE_SURFACE;
        }

        details.remove_far_sides(&delta, SIDE_NORMAL);
        details
    }

    /// Details for a section that was already meshed with `self`.
    pub fn update(self, position: SectionPosition, camera: SectionPosition) -> Self {
        let delta = Delta::new(position, camera);
        let distance = delta.distance;
        let mut details = self;

        details.band(Self::ENTITIES, distance, 9, 12);
        details.band(Self::TEXT, distance, 4, 8);
        details.band(Self::AMBIENT_OCCLUSION, distance, 20, 32);
        if distance < squared(13) {
            details |= Self::ANTI_MOIRE_PATTERN;
        }
        if distance < squared(10) {
            details |= Self::RANDOM_OFFSET;
        }
        if distance < squared(5) {
            details |= Self::FLOWING_FLUID;
        }
        if distance < squared(7) {
            details |= Self::FLUID_HEIGHTS;
        }
        if distance < squared(1) {
            details -= Self::CULL_FULL_OPAQUE;
        }
        details.band(Self::NON_FULL_BLOCKS, distance, 18, 24);

        if distance < squared(10) {
            details -= Self::AGGRESSIVE_CULLING;
        }
        if distance >= squared(16) {
            details |= Self::AGGRESSIVE_CULLING;
        }

        let (keep, drop) = if delta.y.abs() < 3 { (12, 18) } else { (28, 36) };
        if distance >= squared(drop) {
            details -= Self::MINOR_VISUAL_IMPACT;
        }
        if distance <= squared(keep) {
            details |= Self::MINOR_VISUAL_IMPACT;
        }

        let y = delta.y.abs();
        if delta.xz <= squared(7)
            || (delta.xz <= squared(3) && y < 4)
            || (delta.xz <= squared(5) && y < 7)
        {
            details |= Self::DARK_CAVE_SURFACE;
        }
        if delta.xz >= squared(10)
            || (delta.xz >= squared(7) && y >= 6)
            || (delta.xz >= squared(3) && y >= 10)
        {
            details -= Self::DARK_CAVE_SURFACE;
        }

        details.add_near_sides(&delta, SIDE_MIN);
        details.remove_far_sides(&delta, SIDE_MAX);
        details
    }

    fn band(&mut self, flag: Self, distance: i32, add_below: i32, remove_from: i32) {
        if distance < squared(add_below) {
            *self |= flag;
        }
        if distance >= squared(remove_from) {
            *self -= flag;
        }
    }

    fn add_near_sides(&mut self, delta: &Delta, limit: i32) {
        for (offset, negative, positive) in [
            (delta.y, Self::SIDE_DOWN, Self::SIDE_UP),
            (delta.z, Self::SIDE_NORTH, Self::SIDE_SOUTH),
            (delta.x, Self::SIDE_WEST, Self::SIDE_EAST),
        ] {
            if offset >= -limit {
                *self |= negative;
            }
            if offset <= limit {
                *self |= positive;
            }
        }
    }

    fn remove_far_sides(&mut self, delta: &Delta, limit: i32) {
        for (offset, negative, positive) in [
            (delta.y, Self::SIDE_DOWN, Self::SIDE_UP),
            (delta.z, Self::SIDE_NORTH, Self::SIDE_SOUTH),
            (delta.x, Self::SIDE_WEST, Self::SIDE_EAST),
        ] {
            if offset < -limit {
                *self -= negative;
            }
            if offset > limit {
                *self -= positive;
            }
        }
    }
}
