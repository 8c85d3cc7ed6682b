use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Parser;
use vox_blocks::{VoxelRegistry, VoxelType};
use vox_mesh_cpu::{
    MeshBuffer, MeshOptions, MeshOrigin, MeshStats, build_single, resolve_workers, slab_overlay,
};
use vox_runtime::{MeshApplySink, Runtime, VoxModel};
use vox_volume::VolumeDims;

mod config;
mod obj;
mod shapes;

use config::Config;
use shapes::Shape;

#[derive(Debug, Parser)]
#[command(name = "voxmesh", about = "Greedy voxel meshing over Z slabs")]
struct Args {
    /// Config file (defaults to ./voxmesh.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = Shape::Terrain)]
    shape: Shape,
    /// Volume extents; negative values mesh to nothing.
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true, default_values_t = [64, 64, 32])]
    dims: Vec<i32>,
    /// Slab workers (0 = all cores). Overrides `[mesher] workers`.
    #[arg(long)]
    workers: Option<usize>,
    /// World size of one voxel. Overrides `[mesher] voxel_scale`.
    #[arg(long)]
    scale: Option<f32>,
    /// Center the mesh on X/Y.
    #[arg(long)]
    centered: bool,
    /// Voxel type name for the shape's fill.
    #[arg(long, default_value = "stone")]
    material: String,
    #[arg(long, default_value_t = 1337)]
    seed: i32,
    /// Also mesh single-threaded and compare with the slab build.
    #[arg(long)]
    compare: bool,
    /// Carve a sphere of air at X Y Z and rebuild.
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    edit: Option<Vec<i32>>,
    /// Write the final mesh as Wavefront OBJ.
    #[arg(long)]
    obj: Option<PathBuf>,
    /// Log the slab partition as colored boxes.
    #[arg(long)]
    show_slabs: bool,
}

/// Keeps the newest applied mesh.
#[derive(Default)]
struct CurrentMesh {
    rev: Option<u64>,
    mesh: MeshBuffer,
}

impl MeshApplySink for CurrentMesh {
    fn apply_mesh(&mut self, rev: u64, mesh: &MeshBuffer) {
        log::debug!(target: "runtime", "applying mesh rev={} quads={}", rev, mesh.quad_count());
        self.rev = Some(rev);
        self.mesh = mesh.clone();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let cfg = Config::resolve(args.config.as_deref())?;

    env_logger::Builder::new()
        .parse_filters(&cfg.log.level)
        .parse_env("RUST_LOG")
        .init();

    let registry = match &cfg.voxels {
        Some(path) => VoxelRegistry::from_path(path)?,
        None => VoxelRegistry::builtin(),
    };
    let fill = registry
        .code_of(&args.material)
        .ok_or_else(|| format!("unknown voxel type '{}'", args.material))?;
    if !fill.is_solid() {
        log::warn!("fill type '{}' is not solid; the volume will mesh to nothing", args.material);
    }

    let dims = VolumeDims::from_signed(args.dims[0], args.dims[1], args.dims[2]);
    let scale = args.scale.unwrap_or(cfg.mesher.voxel_scale);
    let origin = if args.centered {
        MeshOrigin::CenteredXY
    } else {
        cfg.mesher.origin
    };
    let options = MeshOptions::with_origin(origin);
    let workers = resolve_workers(args.workers.unwrap_or(cfg.mesher.workers));

    let volume = shapes::generate(args.shape, dims, scale, fill, args.seed);
    log::info!(
        "{:?} volume {}x{}x{} scale={} fill={} workers={}",
        args.shape,
        dims.x,
        dims.y,
        dims.z,
        scale,
        fill,
        workers
    );

    if args.show_slabs {
        for b in slab_overlay(dims, scale, workers, origin) {
            log::info!(
                target: "mesh",
                "slab {} z=[{}, {}) box=({:.1}, {:.1}, {:.1})..({:.1}, {:.1}, {:.1}) rgba={:?}",
                b.slab.index,
                b.slab.start,
                b.slab.end,
                b.bounds.min.x,
                b.bounds.min.y,
                b.bounds.min.z,
                b.bounds.max.x,
                b.bounds.max.y,
                b.bounds.max.z,
                b.color
            );
        }
    }

    let runtime = Runtime::new(workers)?;
    let mut model = VoxModel::new(volume, runtime, options, cfg.runtime.queue_policy);
    model.rebuild();
    if let Some(e) = &args.edit {
        let outcome = model.modify_voxel((e[0], e[1], e[2]), VoxelType::AIR, cfg.edit.brush_radius);
        log::info!(target: "edit", "edit at ({}, {}, {}): {:?}", e[0], e[1], e[2], outcome);
    }
    model.wait_idle();

    let mut current = CurrentMesh::default();
    model.apply_mesh(&mut current);
    let Some(rev) = current.rev else {
        return Err("mesh build failed; see log for details".into());
    };
    let mesh = current.mesh;
    mesh.validate()?;

    let stats = MeshStats::of(&mesh);
    let bb = mesh.bounds();
    println!(
        "rev {}: {} quads, {} vertices, {} triangles, area {:.1}",
        rev,
        stats.quads,
        stats.vertices,
        stats.triangles,
        mesh.surface_area()
    );
    if !bb.is_empty() {
        println!(
            "bounds ({:.1}, {:.1}, {:.1})..({:.1}, {:.1}, {:.1})",
            bb.min.x, bb.min.y, bb.min.z, bb.max.x, bb.max.y, bb.max.z
        );
    }

    if args.compare {
        let single = build_single(model.volume(), &options);
        let area_diff = (single.surface_area() - mesh.surface_area()).abs();
        println!(
            "single-threaded: {} quads ({} with {} slabs), area diff {:.3}, bounds {}",
            single.quad_count(),
            stats.quads,
            workers,
            area_diff,
            if single.bounds() == bb { "match" } else { "differ" }
        );
        if area_diff > 1e-3 * scale * scale || single.bounds() != bb {
            log::warn!(target: "mesh", "slab build disagrees with single-threaded build");
        }
    }

    if let Some(path) = &args.obj {
        let file = File::create(path).map_err(|e| format!("create {}: {}", path.display(), e))?;
        obj::write_obj(&mesh, BufWriter::new(file))?;
        log::info!("wrote {}", path.display());
    }
    Ok(())
}
