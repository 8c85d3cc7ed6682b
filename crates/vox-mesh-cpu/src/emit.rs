use vox_geom::{Vec2, Vec3};

use crate::face::Face;
use crate::mesh_build::{MAX_VERTICES, MeshBuffer};

/// Appends one greedy rectangle as a quad.
///
/// `corner` is the world position of cell `(D, V1, V2)`'s minimum corner.
/// `height` cells run along the first in-plane axis and `width` cells along
/// the second. Positive faces sit one voxel further along the normal.
///
/// Vertex `i` gets UV `(i < 2 ? 0 : width, i even ? 0 : height)`, so texture
/// coordinates count voxels and tile across the merged face.
///
/// `mesh` must have room for four more vertices below [`MAX_VERTICES`].
/// Buffers are only combined through [`MeshBuffer::merge`], which checks it.
pub fn emit_quad(
    mesh: &mut MeshBuffer,
    face: Face,
    corner: Vec3,
    width: usize,
    height: usize,
    scale: f32,
) {
    let a = face.axis();
    let (a1, a2) = face.plane_axes();
    let mut base = corner;
    if face.is_positive() {
        base.set(a, base.get(a) + scale);
    }
    let du = Vec3::along(a1, height as f32 * scale);
    let dv = Vec3::along(a2, width as f32 * scale);
    debug_assert!(mesh.vertices.len() + 4 <= MAX_VERTICES);
    let start = mesh.vertices.len() as u32;
    mesh.vertices
        .extend_from_slice(&[base, base + du, base + dv, base + du + dv]);
    let n = face.normal();
    mesh.normals.extend_from_slice(&[n; 4]);
    let (w, h) = (width as f32, height as f32);
    for i in 0..4 {
        let u = if i < 2 { 0.0 } else { w };
        let v = if i % 2 == 0 { 0.0 } else { h };
        mesh.uvs.push(Vec2::new(u, v));
    }
    mesh.triangles
        .extend(face.winding().indices().iter().map(|&k| start + k));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri_normal(m: &MeshBuffer, t: usize) -> Vec3 {
        let i = &m.triangles[t * 3..t * 3 + 3];
        let a = m.vertices[i[0] as usize];
        let b = m.vertices[i[1] as usize];
        let c = m.vertices[i[2] as usize];
        (b - a).cross(c - a)
    }

    #[test]
    fn every_face_winds_outward() {
        for face in Face::ALL {
            let mut m = MeshBuffer::new();
            emit_quad(&mut m, face, Vec3::ZERO, 2, 3, 1.0);
            for t in 0..2 {
                let n = tri_normal(&m, t);
                assert!(
                    n.dot(face.normal()) > 0.0,
                    "{:?} triangle {} faces inward",
                    face,
                    t
                );
            }
        }
    }

    #[test]
    fn positive_faces_shift_one_voxel_along_the_normal() {
        let mut m = MeshBuffer::new();
        emit_quad(&mut m, Face::PosZ, Vec3::new(0.0, 0.0, 2.0), 1, 1, 10.0);
        assert!(m.vertices.iter().all(|v| v.z == 30.0));
        let mut m = MeshBuffer::new();
        emit_quad(&mut m, Face::NegZ, Vec3::new(0.0, 0.0, 2.0), 1, 1, 10.0);
        assert!(m.vertices.iter().all(|v| v.z == 2.0));
    }

    #[test]
    fn extents_and_uvs_follow_width_and_height() {
        let mut m = MeshBuffer::new();
        // PosZ: V1 = X (height), V2 = Y (width).
        emit_quad(&mut m, Face::PosZ, Vec3::ZERO, 3, 2, 1.0);
        assert_eq!(m.vertices[1], Vec3::new(2.0, 0.0, 1.0));
        assert_eq!(m.vertices[2], Vec3::new(0.0, 3.0, 1.0));
        assert_eq!(m.vertices[3], Vec3::new(2.0, 3.0, 1.0));
        assert_eq!(
            m.uvs,
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(0.0, 2.0),
                Vec2::new(3.0, 0.0),
                Vec2::new(3.0, 2.0),
            ]
        );
        assert!(m.normals.iter().all(|&n| n == Vec3::new(0.0, 0.0, 1.0)));
    }
}
