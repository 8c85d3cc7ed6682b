use vox_geom::Vec3;

/// One of the six sweep directions, in `dir` index order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    PosX = 0,
    NegX = 1,
    PosY = 2,
    NegY = 3,
    PosZ = 4,
    NegZ = 5,
}

/// Triangle split used for a quad's four vertices.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Winding {
    /// +X, +Y, +Z.
    Forward,
    /// -X, -Y.
    Mirrored,
    /// -Z: mirrored orientation, split along the other diagonal.
    Down,
}

impl Winding {
    /// Index pattern relative to the quad's first vertex.
    ///
    /// Vertex 1 lies along the first in-plane axis, vertex 2 along the second,
    /// vertex 3 at the far corner.
    #[inline]
    pub const fn indices(self) -> [u32; 6] {
        match self {
            Winding::Forward => [0, 1, 2, 1, 3, 2],
            Winding::Mirrored => [0, 2, 1, 1, 2, 3],
            Winding::Down => [0, 3, 1, 0, 2, 3],
        }
    }
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::PosX,
        Face::NegX,
        Face::PosY,
        Face::NegY,
        Face::PosZ,
        Face::NegZ,
    ];

    /// Returns the `[0..6)` index of this face.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Converts a face index `[0..6)` back into a `Face` value.
    /// Falls back to `PosX` for out-of-range indices.
    #[inline]
    pub fn from_index(i: usize) -> Face {
        match i {
            0 => Face::PosX,
            1 => Face::NegX,
            2 => Face::PosY,
            3 => Face::NegY,
            4 => Face::PosZ,
            5 => Face::NegZ,
            _ => Face::PosX,
        }
    }

    /// Sweep axis (0=X, 1=Y, 2=Z).
    #[inline]
    pub fn axis(self) -> usize {
        self.index() / 2
    }

    /// The two in-plane axes `((A+1)%3, (A+2)%3)`.
    #[inline]
    pub fn plane_axes(self) -> (usize, usize) {
        let a = self.axis();
        ((a + 1) % 3, (a + 2) % 3)
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        self.index() % 2 == 0
    }

    /// Returns the integer grid delta `(dx,dy,dz)` when stepping out of this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::PosX => (1, 0, 0),
            Face::NegX => (-1, 0, 0),
            Face::PosY => (0, 1, 0),
            Face::NegY => (0, -1, 0),
            Face::PosZ => (0, 0, 1),
            Face::NegZ => (0, 0, -1),
        }
    }

    /// Returns the unit-normal vector for this face.
    #[inline]
    pub fn normal(self) -> Vec3 {
        let (dx, dy, dz) = self.delta();
        Vec3::new(dx as f32, dy as f32, dz as f32)
    }

    #[inline]
    pub fn winding(self) -> Winding {
        match self {
            Face::PosX | Face::PosY | Face::PosZ => Winding::Forward,
            Face::NegX | Face::NegY => Winding::Mirrored,
            Face::NegZ => Winding::Down,
        }
    }
}
