use vox_mesh_cpu::MeshBuffer;

/// Receives finished meshes on the consumer side.
pub trait MeshApplySink {
    fn apply_mesh(&mut self, rev: u64, mesh: &MeshBuffer);
}

/// Records every applied mesh.
impl MeshApplySink for Vec<(u64, MeshBuffer)> {
    fn apply_mesh(&mut self, rev: u64, mesh: &MeshBuffer) {
        self.push((rev, mesh.clone()));
    }
}
