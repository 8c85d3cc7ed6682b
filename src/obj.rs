use std::io::{self, Write};

use vox_mesh_cpu::MeshBuffer;

/// Writes `mesh` as Wavefront OBJ with positions, texture coordinates and normals.
pub fn write_obj<W: Write>(mesh: &MeshBuffer, mut out: W) -> io::Result<()> {
    writeln!(out, "# voxmesh: {} quads", mesh.quad_count())?;
    for v in &mesh.vertices {
        writeln!(out, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for t in &mesh.uvs {
        writeln!(out, "vt {} {}", t.x, t.y)?;
    }
    for n in &mesh.normals {
        writeln!(out, "vn {} {} {}", n.x, n.y, n.z)?;
    }
    for tri in mesh.triangles.chunks_exact(3) {
        let (a, b, c) = (tri[0] + 1, tri[1] + 1, tri[2] + 1);
        writeln!(out, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vox_blocks::VoxelType;
    use vox_mesh_cpu::{MeshOptions, build_single};
    use vox_volume::{VolumeDims, VoxelVolume};

    #[test]
    fn cube_has_one_based_faces() {
        let vol = VoxelVolume::filled(VolumeDims::new(1, 1, 1), 1.0, VoxelType::STONE);
        let mesh = build_single(&vol, &MeshOptions::default());
        let mut buf = Vec::new();
        write_obj(&mesh, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 24);
        assert_eq!(text.lines().filter(|l| l.starts_with("vt ")).count(), 24);
        assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 12);
        assert!(text.contains("f 1/1/1 2/2/2 3/3/3"));
        assert!(!text.contains(" 0/"));
    }
}
