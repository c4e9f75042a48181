//! Culling geometry of block faces.
//!
//! Face rectangles live in a face-local unit square. The axes per side are:
//! - down/up: `(x, z)`
//! - north/south: `(x, y)`
//! - west/east: `(z, y)`
//!
//! The second component is therefore the vertical axis on every horizontal side.

use minemesh_core::Direction;
use serde::{Deserialize, Serialize};

/// Texture transparency class of a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transparency {
    /// Fully covers whatever is behind it.
    Opaque,
    /// Cut-out: pixels are either fully opaque or fully transparent.
    Transparent,
    /// Alpha blended.
    Translucent,
}

impl Transparency {
    /// True for [`Transparency::Opaque`].
    #[inline]
    pub const fn is_opaque(self) -> bool {
        matches!(self, Transparency::Opaque)
    }
}

/// One rectangle of a block side.
///
/// `start <= end` component-wise; a zero-area rectangle is legal and covers nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceProperties {
    /// Lower corner.
    pub start: [f32; 2],
    /// Upper corner.
    pub end: [f32; 2],
    /// Texture class of the face.
    pub transparency: Transparency,
}

impl FaceProperties {
    /// Construct a face rectangle.
    pub const fn new(start: [f32; 2], end: [f32; 2], transparency: Transparency) -> Self {
        Self {
            start,
            end,
            transparency,
        }
    }

    /// The whole unit square.
    pub const fn full(transparency: Transparency) -> Self {
        Self::new([0.0, 0.0], [1.0, 1.0], transparency)
    }

    /// Covered area (zero for degenerate rectangles).
    pub fn area(&self) -> f32 {
        (self.end[0] - self.start[0]).max(0.0) * (self.end[1] - self.start[1]).max(0.0)
    }

    /// True if `other` lies inside `self`, with `epsilon` slack on every edge.
    pub fn contains(&self, other: &FaceProperties, epsilon: f32) -> bool {
        self.start[0] <= other.start[0] + epsilon
            && self.start[1] <= other.start[1] + epsilon
            && self.end[0] + epsilon >= other.end[0]
            && self.end[1] + epsilon >= other.end[1]
    }

    /// Area of the overlap between both rectangles.
    pub fn intersection_area(&self, other: &FaceProperties) -> f32 {
        let width = self.end[0].min(other.end[0]) - self.start[0].max(other.start[0]);
        let height = self.end[1].min(other.end[1]) - self.start[1].max(other.start[1]);
        width.max(0.0) * height.max(0.0)
    }
}

/// All face rectangles of one side of a block shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideProperties {
    faces: Vec<FaceProperties>,
    transparency: Option<Transparency>,
}

impl SideProperties {
    /// Group rectangles into a side. The aggregate transparency is the shared
    /// class of all faces, or `None` when they disagree.
    pub fn new(faces: Vec<FaceProperties>) -> Self {
        let transparency = match faces.split_first() {
            Some((first, rest)) => rest
                .iter()
                .all(|face| face.transparency == first.transparency)
                .then_some(first.transparency),
            None => None,
        };
        Self {
            faces,
            transparency,
        }
    }

    /// A side fully covered by one rectangle.
    pub fn full(transparency: Transparency) -> Self {
        Self::new(vec![FaceProperties::full(transparency)])
    }

    /// Rectangles of this side.
    pub fn faces(&self) -> &[FaceProperties] {
        &self.faces
    }

    /// Shared transparency, `None` for mixed sides.
    pub fn transparency(&self) -> Option<Transparency> {
        self.transparency
    }

    /// True if one opaque rectangle covers the whole side.
    pub fn is_full_opaque(&self) -> bool {
        self.transparency == Some(Transparency::Opaque) && self.is_full()
    }

    /// True if one rectangle of any transparency covers the whole side.
    pub fn is_full(&self) -> bool {
        self.faces
            .iter()
            .any(|face| face.contains(&FaceProperties::full(face.transparency), 1.0e-4))
    }
}

/// Per-direction culling geometry of a block state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CullShape {
    sides: [Option<SideProperties>; 6],
}

impl CullShape {
    /// Shape that touches no block boundary.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Full cube with one transparency class on every side.
    pub fn full(transparency: Transparency) -> Self {
        Self {
            sides: std::array::from_fn(|_| Some(SideProperties::full(transparency))),
        }
    }

    /// Axis-aligned box `[min, max]` inside the unit cube. Only sides that
    /// touch the block boundary get a rectangle.
    pub fn cuboid(min: [f32; 3], max: [f32; 3], transparency: Transparency) -> Self {
        const EPSILON: f32 = 1.0e-4;
        let mut shape = Self::empty();
        for direction in Direction::VALUES {
            let touches = match direction {
                Direction::Down => min[1] <= EPSILON,
                Direction::Up => max[1] >= 1.0 - EPSILON,
                Direction::North => min[2] <= EPSILON,
                Direction::South => max[2] >= 1.0 - EPSILON,
                Direction::West => min[0] <= EPSILON,
                Direction::East => max[0] >= 1.0 - EPSILON,
            };
            if !touches {
                continue;
            }
            let (start, end) = match direction {
                Direction::Down | Direction::Up => ([min[0], min[2]], [max[0], max[2]]),
                Direction::North | Direction::South => ([min[0], min[1]], [max[0], max[1]]),
                Direction::West | Direction::East => ([min[2], min[1]], [max[2], max[1]]),
            };
            shape.sides[direction.ordinal()] = Some(SideProperties::new(vec![
                FaceProperties::new(start, end, transparency),
            ]));
        }
        shape
    }

    /// Replace one side.
    pub fn with_side(mut self, direction: Direction, side: Option<SideProperties>) -> Self {
        self.sides[direction.ordinal()] = side;
        self
    }

    /// Side facing `direction`.
    #[inline]
    pub fn side(&self, direction: Direction) -> Option<&SideProperties> {
        self.sides[direction.ordinal()].as_ref()
    }

    /// True if every side is a full opaque square.
    pub fn is_full_opaque(&self) -> bool {
        self.sides
            .iter()
            .all(|side| side.as_ref().is_some_and(SideProperties::is_full_opaque))
    }

    /// True if every side is a full square, whatever its transparency.
    pub fn is_full_cube(&self) -> bool {
        self.sides
            .iter()
            .all(|side| side.as_ref().is_some_and(SideProperties::is_full))
    }

    /// True if any side carries an opaque rectangle.
    pub fn has_opaque_side(&self) -> bool {
        self.sides.iter().flatten().any(|side| {
            side.faces()
                .iter()
                .any(|face| face.transparency.is_opaque() && face.area() > 0.0)
        })
    }
}
