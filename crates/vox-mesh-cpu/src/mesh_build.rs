use std::fmt;

use vox_geom::{Aabb, Vec2, Vec3};

/// Indices are `u32`, so one buffer addresses at most this many vertices.
pub const MAX_VERTICES: usize = u32::MAX as usize + 1;

/// Flat triangle mesh: parallel per-vertex arrays plus a `u32` index list.
///
/// Every quad contributes four vertices and six indices, so
/// `vertices.len() == 4 * quads` and `triangles.len() == 6 * quads`.
/// A buffer holds at most [`MAX_VERTICES`] vertices; [`MeshBuffer::merge`]
/// and [`MeshBuffer::append_offset`] refuse to grow past it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffer {
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<u32>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
}

/// Structural defect found by [`MeshBuffer::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvalidMesh {
    /// `normals` or `uvs` differ in length from `vertices`.
    ArrayLengths {
        vertices: usize,
        normals: usize,
        uvs: usize,
    },
    /// The index list is not a whole number of triangles.
    PartialTriangle { indices: usize },
    /// An index points past the vertex arrays.
    IndexOutOfRange { at: usize, index: u32, vertices: usize },
    /// The combined vertex count does not fit `u32` indices.
    TooManyVertices { vertices: usize },
}

impl fmt::Display for InvalidMesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidMesh::ArrayLengths {
                vertices,
                normals,
                uvs,
            } => write!(
                f,
                "vertex arrays disagree: vertices={} normals={} uvs={}",
                vertices, normals, uvs
            ),
            InvalidMesh::PartialTriangle { indices } => {
                write!(f, "index count {} is not a multiple of 3", indices)
            }
            InvalidMesh::IndexOutOfRange {
                at,
                index,
                vertices,
            } => write!(
                f,
                "index {} at position {} exceeds vertex count {}",
                index, at, vertices
            ),
            InvalidMesh::TooManyVertices { vertices } => write!(
                f,
                "{} vertices exceed the u32 index limit of {}",
                vertices, MAX_VERTICES
            ),
        }
    }
}

impl std::error::Error for InvalidMesh {}

/// First index for `added` vertices appended after `len` existing ones.
pub(crate) fn index_base(len: usize, added: usize) -> Result<u32, InvalidMesh> {
    let total = len.saturating_add(added);
    if total > MAX_VERTICES {
        return Err(InvalidMesh::TooManyVertices { vertices: total });
    }
    u32::try_from(len).map_err(|_| InvalidMesh::TooManyVertices { vertices: total })
}

impl MeshBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty buffer with room for roughly `n_quads` quads.
    pub fn with_quad_capacity(n_quads: usize) -> Self {
        let mut m = Self::default();
        m.reserve_quads(n_quads);
        m
    }

    /// Pre-reserve capacity for approximately `n_quads` quads worth of data.
    #[inline]
    pub fn reserve_quads(&mut self, n_quads: usize) {
        self.vertices.reserve(n_quads * 4);
        self.normals.reserve(n_quads * 4);
        self.uvs.reserve(n_quads * 4);
        self.triangles.reserve(n_quads * 6);
    }

    /// Clears all arrays but retains capacity for reuse.
    #[inline]
    pub fn clear_keep_capacity(&mut self) {
        self.vertices.clear();
        self.triangles.clear();
        self.normals.clear();
        self.uvs.clear();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Appends `other`, shifting its indices by this buffer's vertex count.
    pub fn append_offset(&mut self, other: &MeshBuffer) -> Result<(), InvalidMesh> {
        let offset = index_base(self.vertices.len(), other.vertices.len())?;
        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);
        self.uvs.extend_from_slice(&other.uvs);
        self.triangles
            .extend(other.triangles.iter().map(|&i| i + offset));
        Ok(())
    }

    /// Concatenates partial meshes in order into one buffer.
    pub fn merge<I>(parts: I) -> Result<MeshBuffer, InvalidMesh>
    where
        I: IntoIterator<Item = MeshBuffer>,
    {
        let parts: Vec<MeshBuffer> = parts.into_iter().collect();
        let verts: usize = parts.iter().map(|p| p.vertices.len()).sum();
        index_base(0, verts)?;
        let idx: usize = parts.iter().map(|p| p.triangles.len()).sum();
        let mut out = MeshBuffer {
            vertices: Vec::with_capacity(verts),
            triangles: Vec::with_capacity(idx),
            normals: Vec::with_capacity(verts),
            uvs: Vec::with_capacity(verts),
        };
        for p in &parts {
            out.append_offset(p)?;
        }
        Ok(out)
    }

    /// Bounding box of all vertices; empty for an empty mesh.
    pub fn bounds(&self) -> Aabb {
        let mut bb = Aabb::empty();
        for &v in &self.vertices {
            bb.include(v);
        }
        bb
    }

    /// Total area of all triangles.
    pub fn surface_area(&self) -> f32 {
        self.triangles
            .chunks_exact(3)
            .map(|t| {
                let a = self.vertices[t[0] as usize];
                let b = self.vertices[t[1] as usize];
                let c = self.vertices[t[2] as usize];
                (b - a).cross(c - a).length() * 0.5
            })
            .sum()
    }

    /// Checks the array-length and index-range invariants.
    pub fn validate(&self) -> Result<(), InvalidMesh> {
        let n = self.vertices.len();
        if self.normals.len() != n || self.uvs.len() != n {
            return Err(InvalidMesh::ArrayLengths {
                vertices: n,
                normals: self.normals.len(),
                uvs: self.uvs.len(),
            });
        }
        if self.triangles.len() % 3 != 0 {
            return Err(InvalidMesh::PartialTriangle {
                indices: self.triangles.len(),
            });
        }
        if let Some((at, &index)) = self
            .triangles
            .iter()
            .enumerate()
            .find(|&(_, &i)| i as usize >= n)
        {
            return Err(InvalidMesh::IndexOutOfRange {
                at,
                index,
                vertices: n,
            });
        }
        Ok(())
    }
}
