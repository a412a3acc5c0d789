//! # Face Directions
//!
//! The six axis-aligned faces of a block, with the geometry each one
//! contributes when emitted: a unit offset to the neighbor cell, an
//! outward normal, and the four corner offsets of the face quad.
//!
//! Corner tables are wound counter-clockwise as seen from outside the
//! block; the mesher builds the two triangles as 0-1-2 and 2-3-0.

/// One of the six axis-aligned block faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaceDirection {
    /// +Y.
    Up,
    /// -Y.
    Down,
    /// -Z.
    North,
    /// +X.
    East,
    /// +Z.
    South,
    /// -X.
    West,
}

impl FaceDirection {
    /// All six faces, in enum order.
    pub const ALL: [Self; 6] = [
        Self::Up,
        Self::Down,
        Self::North,
        Self::East,
        Self::South,
        Self::West,
    ];

    /// Unit offset to the neighboring cell behind this face.
    #[inline]
    #[must_use]
    pub const fn offset(self) -> [i32; 3] {
        match self {
            Self::Up => [0, 1, 0],
            Self::Down => [0, -1, 0],
            Self::North => [0, 0, -1],
            Self::East => [1, 0, 0],
            Self::South => [0, 0, 1],
            Self::West => [-1, 0, 0],
        }
    }

    /// Outward face normal.
    #[inline]
    #[must_use]
    pub const fn normal(self) -> [f32; 3] {
        match self {
            Self::Up => [0.0, 1.0, 0.0],
            Self::Down => [0.0, -1.0, 0.0],
            Self::North => [0.0, 0.0, -1.0],
            Self::East => [1.0, 0.0, 0.0],
            Self::South => [0.0, 0.0, 1.0],
            Self::West => [-1.0, 0.0, 0.0],
        }
    }

    /// Corner offsets of the face quad, relative to the cell center.
    ///
    /// CCW from outside; corners 0 and 1 are the texture-bottom edge.
    #[must_use]
    pub const fn corners(self) -> [[f32; 3]; 4] {
        match self {
            Self::Up => [
                [-0.5, 0.5, 0.5],
                [0.5, 0.5, 0.5],
                [0.5, 0.5, -0.5],
                [-0.5, 0.5, -0.5],
            ],
            Self::Down => [
                [-0.5, -0.5, -0.5],
                [0.5, -0.5, -0.5],
                [0.5, -0.5, 0.5],
                [-0.5, -0.5, 0.5],
            ],
            Self::North => [
                [0.5, -0.5, -0.5],
                [-0.5, -0.5, -0.5],
                [-0.5, 0.5, -0.5],
                [0.5, 0.5, -0.5],
            ],
            Self::East => [
                [0.5, -0.5, 0.5],
                [0.5, -0.5, -0.5],
                [0.5, 0.5, -0.5],
                [0.5, 0.5, 0.5],
            ],
            Self::South => [
                [-0.5, -0.5, 0.5],
                [0.5, -0.5, 0.5],
                [0.5, 0.5, 0.5],
                [-0.5, 0.5, 0.5],
            ],
            Self::West => [
                [-0.5, -0.5, -0.5],
                [-0.5, -0.5, 0.5],
                [-0.5, 0.5, 0.5],
                [-0.5, 0.5, -0.5],
            ],
        }
    }

    /// Key used for this face in the block catalog file.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
        }
    }

    /// Resolves a catalog key back to a face.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "north" => Some(Self::North),
            "east" => Some(Self::East),
            "south" => Some(Self::South),
            "west" => Some(Self::West),
            _ => None,
        }
    }

    /// Dense index for per-face lookup tables.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}
