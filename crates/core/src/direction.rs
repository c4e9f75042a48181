use serde::{Deserialize, Serialize};

/// Coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// West/east.
    X,
    /// Down/up.
    Y,
    /// North/south.
    Z,
}

/// One of the six block faces.
///
/// The declaration order is the wire/ordinal order and is relied upon for
/// array indexing (`direction as usize`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    /// Negative Y.
    Down = 0,
    /// Positive Y.
    Up = 1,
    /// Negative Z.
    North = 2,
    /// Positive Z.
    South = 3,
    /// Negative X.
    West = 4,
    /// Positive X.
    East = 5,
}

impl Direction {
    /// All directions in ordinal order.
    pub const VALUES: [Direction; 6] = [
        Direction::Down,
        Direction::Up,
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// The four horizontal directions in ordinal order.
    pub const SIDES: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Ordinal index (0..6).
    #[inline]
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// Look up a direction by ordinal.
    pub const fn from_ordinal(ordinal: usize) -> Option<Self> {
        if ordinal < 6 {
            Some(Self::VALUES[ordinal])
        } else {
            None
        }
    }

    /// Opposite direction. Opposites differ only in the lowest ordinal bit.
    #[inline]
    pub const fn inverse(self) -> Self {
        Self::VALUES[self.ordinal() ^ 1]
    }

    /// Unit offset `[x, y, z]`.
    pub const fn vector(self) -> [i32; 3] {
        match self {
            Direction::Down => [0, -1, 0],
            Direction::Up => [0, 1, 0],
            Direction::North => [0, 0, -1],
            Direction::South => [0, 0, 1],
            Direction::West => [-1, 0, 0],
            Direction::East => [1, 0, 0],
        }
    }

    /// Axis this direction points along.
    pub const fn axis(self) -> Axis {
        match self {
            Direction::Down | Direction::Up => Axis::Y,
            Direction::North | Direction::South => Axis::Z,
            Direction::West | Direction::East => Axis::X,
        }
    }

    /// True for north/south/west/east.
    #[inline]
    pub const fn is_horizontal(self) -> bool {
        !matches!(self, Direction::Down | Direction::Up)
    }

    /// True if the direction points towards a positive coordinate.
    #[inline]
    pub const fn is_positive(self) -> bool {
        self.ordinal() & 1 == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverse_flips_every_direction() {
        assert_eq!(Direction::Down.inverse(), Direction::Up);
        assert_eq!(Direction::North.inverse(), Direction::South);
        assert_eq!(Direction::East.inverse(), Direction::West);
        for direction in Direction::VALUES {
            assert_ne!(direction, direction.inverse());
            let [x, y, z] = direction.vector();
            let [ix, iy, iz] = direction.inverse().vector();
            assert_eq!([x + ix, y + iy, z + iz], [0, 0, 0]);
        }
    }

    #[test]
    fn ordinals_match_declaration_order() {
        for (index, direction) in Direction::VALUES.iter().enumerate() {
            assert_eq!(direction.ordinal(), index);
            assert_eq!(Direction::from_ordinal(index), Some(*direction));
        }
        assert_eq!(Direction::from_ordinal(6), None);
    }

    #[test]
    fn positive_directions_have_positive_vectors() {
        for direction in Direction::VALUES {
            let sum: i32 = direction.vector().iter().sum();
            assert_eq!(direction.is_positive(), sum > 0);
        }
    }
}
