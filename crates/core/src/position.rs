//! Bit-packed world positions.
//!
//! Every position type is a thin newtype over a fixed-width integer. Signed
//! components are stored two's-complement in their bit field and
//! sign-extended on read. Construction always range-checks.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Direction;

/// Edge length of a section in blocks.
pub const SECTION_SIZE: usize = 16;
/// Largest in-section coordinate.
pub const SECTION_MAX: i32 = 15;
/// Number of blocks in a section.
pub const SECTION_VOLUME: usize = SECTION_SIZE * SECTION_SIZE * SECTION_SIZE;

/// Raised when a coordinate does not fit its packed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{axis} coordinate {value} out of range [{min}, {max}]")]
pub struct PositionError {
    /// Offending axis (`x`, `y` or `z`).
    pub axis: char,
    /// Rejected value.
    pub value: i32,
    /// Inclusive lower bound.
    pub min: i32,
    /// Inclusive upper bound.
    pub max: i32,
}

#[inline]
fn check(axis: char, value: i32, min: i32, max: i32) -> Result<(), PositionError> {
    if value < min || value > max {
        return Err(PositionError {
            axis,
            value,
            min,
            max,
        });
    }
    Ok(())
}

#[inline]
const fn pack(value: i32, bits: u32, shift: u32) -> u64 {
    ((value as i64 as u64) & ((1u64 << bits) - 1)) << shift
}

#[inline]
const fn unpack(raw: u64, bits: u32, shift: u32) -> i32 {
    (((raw >> shift) << (64 - bits)) as i64 >> (64 - bits)) as i32
}

/// Chunk column coordinate (X, Z) in chunk space.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct ChunkPosition {
    /// Chunk X.
    pub x: i32,
    /// Chunk Z.
    pub z: i32,
}

impl ChunkPosition {
    /// Offsets of the eight surrounding chunks, in neighbour-array order.
    pub const NEIGHBOUR_OFFSETS: [(i32, i32); 8] = [
        (-1, -1),
        (-1, 0),
        (-1, 1),
        (0, -1),
        (0, 1),
        (1, -1),
        (1, 0),
        (1, 1),
    ];

    /// Construct a chunk position.
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Translate by a chunk delta.
    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.z + dz)
    }

    /// Index into a neighbour array for a delta, `None` for `(0, 0)` or
    /// anything further than one chunk away.
    pub const fn neighbour_index(dx: i32, dz: i32) -> Option<usize> {
        match (dx, dz) {
            (-1, -1) => Some(0),
            (-1, 0) => Some(1),
            (-1, 1) => Some(2),
            (0, -1) => Some(3),
            (0, 1) => Some(4),
            (1, -1) => Some(5),
            (1, 0) => Some(6),
            (1, 1) => Some(7),
            _ => None,
        }
    }

    /// Neighbour array index for a horizontal direction.
    pub const fn direction_index(direction: Direction) -> Option<usize> {
        let [dx, _, dz] = direction.vector();
        if !direction.is_horizontal() {
            return None;
        }
        Self::neighbour_index(dx, dz)
    }
}

impl fmt::Display for ChunkPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c({} {})", self.x, self.z)
    }
}

/// Global block position packed into 64 bits (26-bit X, 26-bit Z, 12-bit Y).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockPosition(u64);

impl BlockPosition {
    const BITS_X: u32 = 26;
    const BITS_Z: u32 = 26;
    const BITS_Y: u32 = 12;
    const SHIFT_X: u32 = 0;
    const SHIFT_Z: u32 = Self::BITS_X;
    const SHIFT_Y: u32 = Self::BITS_X + Self::BITS_Z;

    /// Largest absolute X coordinate.
    pub const MAX_X: i32 = 30_000_000;
    /// Smallest Y coordinate.
    pub const MIN_Y: i32 = -2048;
    /// Largest Y coordinate.
    pub const MAX_Y: i32 = 2047;
    /// Largest absolute Z coordinate.
    pub const MAX_Z: i32 = 30_000_000;

    /// Checked construction.
    pub fn try_new(x: i32, y: i32, z: i32) -> Result<Self, PositionError> {
        check('x', x, -Self::MAX_X, Self::MAX_X)?;
        check('y', y, Self::MIN_Y, Self::MAX_Y)?;
        check('z', z, -Self::MAX_Z, Self::MAX_Z)?;
        Ok(Self(
            pack(x, Self::BITS_X, Self::SHIFT_X)
                | pack(z, Self::BITS_Z, Self::SHIFT_Z)
                | pack(y, Self::BITS_Y, Self::SHIFT_Y),
        ))
    }

    /// Construct a position, panicking on out-of-range components.
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        match Self::try_new(x, y, z) {
            Ok(position) => position,
            Err(err) => panic!("invalid block position: {err}"),
        }
    }

    /// Packed representation.
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// X component.
    #[inline]
    pub const fn x(self) -> i32 {
        unpack(self.0, Self::BITS_X, Self::SHIFT_X)
    }

    /// Y component.
    #[inline]
    pub const fn y(self) -> i32 {
        unpack(self.0, Self::BITS_Y, Self::SHIFT_Y)
    }

    /// Z component.
    #[inline]
    pub const fn z(self) -> i32 {
        unpack(self.0, Self::BITS_Z, Self::SHIFT_Z)
    }

    /// Neighbouring position, checked.
    pub fn try_offset(self, direction: Direction) -> Result<Self, PositionError> {
        let [dx, dy, dz] = direction.vector();
        Self::try_new(self.x() + dx, self.y() + dy, self.z() + dz)
    }

    /// Neighbouring position.
    pub fn offset(self, direction: Direction) -> Self {
        let [dx, dy, dz] = direction.vector();
        Self::new(self.x() + dx, self.y() + dy, self.z() + dz)
    }

    /// Chunk column containing this block.
    pub const fn chunk_position(self) -> ChunkPosition {
        ChunkPosition::new(self.x() >> 4, self.z() >> 4)
    }

    /// Section containing this block.
    pub fn section_position(self) -> SectionPosition {
        SectionPosition::new(self.x() >> 4, self.y() >> 4, self.z() >> 4)
    }

    /// Vertical section index.
    pub const fn section_height(self) -> i32 {
        self.y() >> 4
    }

    /// Position relative to the containing chunk column.
    pub fn in_chunk_position(self) -> InChunkPosition {
        InChunkPosition::new(self.x() & 0x0F, self.y(), self.z() & 0x0F)
    }

    /// Position relative to the containing section.
    pub fn in_section_position(self) -> InSectionPosition {
        InSectionPosition::new(self.x() & 0x0F, self.y() & 0x0F, self.z() & 0x0F)
    }

    /// Combine a section and an in-section offset.
    pub fn of_section(section: SectionPosition, in_section: InSectionPosition) -> Self {
        Self::new(
            (section.x() << 4) | in_section.x(),
            (section.y() << 4) | in_section.y(),
            (section.z() << 4) | in_section.z(),
        )
    }

    /// Checked [`of_section`](Self::of_section). Sections on the world border
    /// hold blocks past [`MAX_X`](Self::MAX_X) and [`MAX_Z`](Self::MAX_Z).
    pub fn try_of_section(
        section: SectionPosition,
        in_section: InSectionPosition,
    ) -> Result<Self, PositionError> {
        Self::try_new(
            (section.x() << 4) | in_section.x(),
            (section.y() << 4) | in_section.y(),
            (section.z() << 4) | in_section.z(),
        )
    }

    /// Combine a chunk column and an in-chunk offset.
    pub fn of_chunk(chunk: ChunkPosition, in_chunk: InChunkPosition) -> Self {
        Self::new(
            (chunk.x << 4) | in_chunk.x(),
            in_chunk.y(),
            (chunk.z << 4) | in_chunk.z(),
        )
    }
}

impl fmt::Debug for BlockPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b({} {} {})", self.x(), self.y(), self.z())
    }
}

impl fmt::Display for BlockPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Section coordinate packed into 64 bits (22-bit X, 22-bit Z, 8-bit Y).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectionPosition(u64);

impl SectionPosition {
    const BITS_X: u32 = 22;
    const BITS_Z: u32 = 22;
    const BITS_Y: u32 = 8;
    const SHIFT_X: u32 = 0;
    const SHIFT_Z: u32 = Self::BITS_X;
    const SHIFT_Y: u32 = Self::BITS_X + Self::BITS_Z;

    /// Largest absolute X coordinate.
    pub const MAX_X: i32 = BlockPosition::MAX_X >> 4;
    /// Smallest Y coordinate.
    pub const MIN_Y: i32 = BlockPosition::MIN_Y >> 4;
    /// Largest Y coordinate.
    pub const MAX_Y: i32 = BlockPosition::MAX_Y >> 4;
    /// Largest absolute Z coordinate.
    pub const MAX_Z: i32 = BlockPosition::MAX_Z >> 4;

    /// Checked construction.
    pub fn try_new(x: i32, y: i32, z: i32) -> Result<Self, PositionError> {
        check('x', x, -Self::MAX_X, Self::MAX_X)?;
        check('y', y, Self::MIN_Y, Self::MAX_Y)?;
        check('z', z, -Self::MAX_Z, Self::MAX_Z)?;
        Ok(Self(
            pack(x, Self::BITS_X, Self::SHIFT_X)
                | pack(z, Self::BITS_Z, Self::SHIFT_Z)
                | pack(y, Self::BITS_Y, Self::SHIFT_Y),
        ))
    }

    /// Construct a section position, panicking on out-of-range components.
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        match Self::try_new(x, y, z) {
            Ok(position) => position,
            Err(err) => panic!("invalid section position: {err}"),
        }
    }

    /// Section in `chunk` at vertical index `height`.
    pub fn of_chunk(chunk: ChunkPosition, height: i32) -> Self {
        Self::new(chunk.x, height, chunk.z)
    }

    /// Checked [`of_chunk`](Self::of_chunk); chunk columns themselves are unbounded.
    pub fn try_of_chunk(chunk: ChunkPosition, height: i32) -> Result<Self, PositionError> {
        Self::try_new(chunk.x, height, chunk.z)
    }

    /// X component.
    #[inline]
    pub const fn x(self) -> i32 {
        unpack(self.0, Self::BITS_X, Self::SHIFT_X)
    }

    /// Y component (section height).
    #[inline]
    pub const fn y(self) -> i32 {
        unpack(self.0, Self::BITS_Y, Self::SHIFT_Y)
    }

    /// Z component.
    #[inline]
    pub const fn z(self) -> i32 {
        unpack(self.0, Self::BITS_Z, Self::SHIFT_Z)
    }

    /// Neighbouring section.
    pub fn offset(self, direction: Direction) -> Self {
        let [dx, dy, dz] = direction.vector();
        Self::new(self.x() + dx, self.y() + dy, self.z() + dz)
    }

    /// Chunk column containing this section.
    pub const fn chunk_position(self) -> ChunkPosition {
        ChunkPosition::new(self.x(), self.z())
    }

    /// Component-wise `self - other`.
    pub const fn delta(self, other: SectionPosition) -> [i32; 3] {
        [
            self.x() - other.x(),
            self.y() - other.y(),
            self.z() - other.z(),
        ]
    }

    /// Squared euclidean distance in section units.
    pub const fn distance_squared(self, other: SectionPosition) -> i64 {
        let [dx, dy, dz] = self.delta(other);
        (dx as i64) * (dx as i64) + (dy as i64) * (dy as i64) + (dz as i64) * (dz as i64)
    }
}

impl fmt::Debug for SectionPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s({} {} {})", self.x(), self.y(), self.z())
    }
}

impl fmt::Display for SectionPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Block offset inside a 16³ section, packed as `(y << 8) | (z << 4) | x`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InSectionPosition(u16);

impl InSectionPosition {
    /// Checked construction.
    pub fn try_new(x: i32, y: i32, z: i32) -> Result<Self, PositionError> {
        check('x', x, 0, SECTION_MAX)?;
        check('y', y, 0, SECTION_MAX)?;
        check('z', z, 0, SECTION_MAX)?;
        Ok(Self(((y << 8) | (z << 4) | x) as u16))
    }

    /// Construct an in-section position, panicking on out-of-range components.
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        match Self::try_new(x, y, z) {
            Ok(position) => position,
            Err(err) => panic!("invalid in-section position: {err}"),
        }
    }

    /// Position for a dense array index.
    pub fn from_index(index: usize) -> Self {
        assert!(index < SECTION_VOLUME, "section index {index} out of range");
        Self(index as u16)
    }

    /// Dense array index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Column index `(z << 4) | x`, shared with heightmaps and light layers.
    #[inline]
    pub const fn column_index(self) -> usize {
        (self.0 & 0xFF) as usize
    }

    /// X component.
    #[inline]
    pub const fn x(self) -> i32 {
        (self.0 & 0x0F) as i32
    }

    /// Y component.
    #[inline]
    pub const fn y(self) -> i32 {
        ((self.0 >> 8) & 0x0F) as i32
    }

    /// Z component.
    #[inline]
    pub const fn z(self) -> i32 {
        ((self.0 >> 4) & 0x0F) as i32
    }

    /// Neighbour inside the same section, `None` when crossing its border.
    pub fn neighbour(self, direction: Direction) -> Option<Self> {
        let [dx, dy, dz] = direction.vector();
        Self::try_new(self.x() + dx, self.y() + dy, self.z() + dz).ok()
    }

    /// Same column, different Y.
    pub fn with_y(self, y: i32) -> Self {
        Self::new(self.x(), y, self.z())
    }

    /// Iterate every position in index order.
    pub fn all() -> impl Iterator<Item = InSectionPosition> {
        (0..SECTION_VOLUME as u16).map(InSectionPosition)
    }
}

impl fmt::Debug for InSectionPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "is({} {} {})", self.x(), self.y(), self.z())
    }
}

/// Block offset inside a chunk column: 4-bit X/Z plus a signed 12-bit Y.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InChunkPosition(u32);

impl InChunkPosition {
    const BITS_Y: u32 = 12;
    const SHIFT_Y: u32 = 8;

    /// Checked construction.
    pub fn try_new(x: i32, y: i32, z: i32) -> Result<Self, PositionError> {
        check('x', x, 0, SECTION_MAX)?;
        check('y', y, BlockPosition::MIN_Y, BlockPosition::MAX_Y)?;
        check('z', z, 0, SECTION_MAX)?;
        let y = pack(y, Self::BITS_Y, Self::SHIFT_Y) as u32;
        Ok(Self(y | ((z as u32) << 4) | x as u32))
    }

    /// Construct an in-chunk position, panicking on out-of-range components.
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        match Self::try_new(x, y, z) {
            Ok(position) => position,
            Err(err) => panic!("invalid in-chunk position: {err}"),
        }
    }

    /// X component.
    #[inline]
    pub const fn x(self) -> i32 {
        (self.0 & 0x0F) as i32
    }

    /// Y component (world height).
    #[inline]
    pub const fn y(self) -> i32 {
        unpack(self.0 as u64, Self::BITS_Y, Self::SHIFT_Y)
    }

    /// Z component.
    #[inline]
    pub const fn z(self) -> i32 {
        ((self.0 >> 4) & 0x0F) as i32
    }

    /// Column index `(z << 4) | x`.
    #[inline]
    pub const fn column_index(self) -> usize {
        (self.0 & 0xFF) as usize
    }

    /// Vertical section index.
    pub const fn section_height(self) -> i32 {
        self.y() >> 4
    }

    /// Position inside the containing section.
    pub fn in_section_position(self) -> InSectionPosition {
        InSectionPosition::new(self.x(), self.y() & 0x0F, self.z())
    }
}

impl fmt::Debug for InChunkPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ic({} {} {})", self.x(), self.y(), self.z())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_position_extremes_round_trip() {
        let corners = [
            (-BlockPosition::MAX_X, BlockPosition::MIN_Y, -BlockPosition::MAX_Z),
            (BlockPosition::MAX_X, BlockPosition::MAX_Y, BlockPosition::MAX_Z),
            (0, 0, 0),
            (-1, -1, -1),
        ];
        for (x, y, z) in corners {
            let position = BlockPosition::new(x, y, z);
            assert_eq!((position.x(), position.y(), position.z()), (x, y, z));
        }
    }

    #[test]
    fn block_position_rejects_out_of_range() {
        let err = BlockPosition::try_new(BlockPosition::MAX_X + 1, 0, 0).unwrap_err();
        assert_eq!(err.axis, 'x');
        assert!(BlockPosition::try_new(0, BlockPosition::MAX_Y + 1, 0).is_err());
        assert!(BlockPosition::try_new(0, 0, -BlockPosition::MAX_Z - 1).is_err());
    }

    #[test]
    #[should_panic(expected = "invalid block position")]
    fn block_position_new_fails_fast() {
        let _ = BlockPosition::new(0, 5000, 0);
    }

    #[test]
    fn block_position_decomposes_into_chunk_and_section() {
        let position = BlockPosition::new(-17, -65, 33);
        assert_eq!(position.chunk_position(), ChunkPosition::new(-2, 2));
        assert_eq!(position.section_position(), SectionPosition::new(-2, -5, 2));
        let in_section = position.in_section_position();
        assert_eq!((in_section.x(), in_section.y(), in_section.z()), (15, 15, 1));
        let in_chunk = position.in_chunk_position();
        assert_eq!((in_chunk.x(), in_chunk.y(), in_chunk.z()), (15, -65, 1));
        assert_eq!(
            BlockPosition::of_section(position.section_position(), in_section),
            position
        );
        assert_eq!(
            BlockPosition::of_chunk(position.chunk_position(), in_chunk),
            position
        );
    }

    #[test]
    fn offset_follows_direction_vector() {
        let position = BlockPosition::new(10, 20, 30);
        assert_eq!(position.offset(Direction::North), BlockPosition::new(10, 20, 29));
        assert_eq!(position.offset(Direction::East), BlockPosition::new(11, 20, 30));
        assert_eq!(position.offset(Direction::Down), BlockPosition::new(10, 19, 30));
        let top = BlockPosition::new(0, BlockPosition::MAX_Y, 0);
        assert!(top.try_offset(Direction::Up).is_err());
    }

    #[test]
    fn section_position_limits_follow_block_limits() {
        assert_eq!(SectionPosition::MIN_Y, -128);
        assert_eq!(SectionPosition::MAX_Y, 127);
        let position = SectionPosition::new(-SectionPosition::MAX_X, -128, SectionPosition::MAX_Z);
        assert_eq!(position.x(), -SectionPosition::MAX_X);
        assert_eq!(position.y(), -128);
        assert_eq!(position.z(), SectionPosition::MAX_Z);
        assert!(SectionPosition::try_new(0, 128, 0).is_err());
    }

    #[test]
    fn chunks_past_the_border_have_no_sections() {
        let edge = ChunkPosition::new(SectionPosition::MAX_X, 0);
        assert!(SectionPosition::try_of_chunk(edge, 0).is_ok());
        let err = SectionPosition::try_of_chunk(ChunkPosition::new(2_000_000, 0), 0).unwrap_err();
        assert_eq!(err.axis, 'x');
        assert!(SectionPosition::try_of_chunk(ChunkPosition::new(0, 0), 200).is_err());

        // The border section is only partly inside the world.
        let border = SectionPosition::new(SectionPosition::MAX_X, 0, 0);
        let inside = BlockPosition::try_of_section(border, InSectionPosition::new(0, 0, 0))
            .expect("first column is inside");
        assert_eq!(inside.x(), BlockPosition::MAX_X);
        assert!(BlockPosition::try_of_section(border, InSectionPosition::new(1, 0, 0)).is_err());
    }

    #[test]
    fn in_section_index_layout() {
        let position = InSectionPosition::new(3, 2, 1);
        assert_eq!(position.index(), (2 << 8) | (1 << 4) | 3);
        assert_eq!(position.column_index(), (1 << 4) | 3);
        assert_eq!(InSectionPosition::from_index(position.index()), position);
        assert_eq!(position.neighbour(Direction::Up), Some(InSectionPosition::new(3, 3, 1)));
        assert_eq!(InSectionPosition::new(0, 0, 0).neighbour(Direction::West), None);
        assert_eq!(InSectionPosition::all().count(), SECTION_VOLUME);
    }

    #[test]
    fn in_chunk_position_keeps_negative_heights() {
        let position = InChunkPosition::new(15, -64, 0);
        assert_eq!(position.y(), -64);
        assert_eq!(position.section_height(), -4);
        assert_eq!(position.in_section_position(), InSectionPosition::new(15, 0, 0));
    }

    #[test]
    fn neighbour_indices_match_offsets() {
        for (index, (dx, dz)) in ChunkPosition::NEIGHBOUR_OFFSETS.iter().enumerate() {
            assert_eq!(ChunkPosition::neighbour_index(*dx, *dz), Some(index));
        }
        assert_eq!(ChunkPosition::neighbour_index(0, 0), None);
        assert_eq!(ChunkPosition::direction_index(Direction::West), Some(1));
        assert_eq!(ChunkPosition::direction_index(Direction::Up), None);
    }
}
