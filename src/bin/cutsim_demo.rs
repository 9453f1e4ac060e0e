//! Machining demo: rasters a ball-end cutter across the top of a stock block.
//!
//! Usage: cargo run --release --bin cutsim_demo -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>    Octree config JSON (default: built-in defaults)
//!   --depth <N>        Override max_depth
//!   --passes <N>       Number of raster passes (default: 8)
//!   --radius <R>       Cutter radius (default: 1.5)
//!   --cut-depth <D>    Depth of cut below the stock top (default: 2.0)
//!   --stats <PATH>     Also write the stats JSON to a file

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use glam::Vec3;

use cutsim::octree::{Octree, OctreeConfig};
use cutsim::volume::CapsuleVolume;

fn main() -> ExitCode {
    cutsim::core::logging::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("cutsim_demo: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> cutsim::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let mut config = match parse_str_arg(&args, "--config") {
        Some(path) => OctreeConfig::load_sync(&PathBuf::from(path))?,
        None => OctreeConfig::default(),
    };
    if let Some(depth) = parse_u8_arg(&args, "--depth") {
        config.max_depth = depth;
    }
    let passes = parse_usize_arg(&args, "--passes").unwrap_or(8);
    let radius = parse_f32_arg(&args, "--radius").unwrap_or(1.5);
    let cut_depth = parse_f32_arg(&args, "--cut-depth").unwrap_or(2.0);
    let stats_path = parse_str_arg(&args, "--stats").map(PathBuf::from);

    println!("=== Cutsim Raster Demo ===");
    println!("Stock:  half-width {} at {:?}", config.root_scale, config.center);
    println!("Depth:  {} (init {})", config.max_depth, config.init_depth);
    println!("Cutter: ball r={} x {} passes, {} deep", radius, passes, cut_depth);
    println!();

    let start = Instant::now();
    let mut octree = Octree::from_config(&config)?;

    // Ball-end passes along X, stepping across Y, with the ball center one
    // radius above the cut floor.
    let center = config.center();
    let s = config.root_scale;
    let top = center.z + s;
    let z = top - cut_depth + radius;
    let step = if passes > 1 { 2.0 * s / (passes - 1) as f32 } else { 0.0 };
    for i in 0..passes {
        let y = center.y - s + step * i as f32;
        let sweep = CapsuleVolume::new(
            Vec3::new(center.x - s - radius, y, z),
            Vec3::new(center.x + s + radius, y, z),
            radius,
        );
        octree.diff_negative_root(&sweep)?;
    }
    octree.check_invariants()?;
    let cut_time = start.elapsed();

    let start = Instant::now();
    let surface = octree.mc();
    let sides = octree.side_triangles();
    let mesh_time = start.elapsed();

    print!("{}", octree);
    println!();
    println!("Cut:  {:.1}ms, {} nodes", cut_time.as_secs_f64() * 1000.0, octree.node_count());
    println!(
        "Mesh: {:.1}ms, {} surface + {} side triangles ({} bytes)",
        mesh_time.as_secs_f64() * 1000.0,
        surface.len(),
        sides.len(),
        cutsim::math::triangles_as_bytes(&surface).len()
            + cutsim::math::triangles_as_bytes(&sides).len()
    );

    let stats = serde_json::to_string_pretty(&octree.stats())?;
    println!();
    println!("{}", stats);
    if let Some(path) = stats_path {
        std::fs::write(&path, &stats)?;
        println!("Stats written to {}", path.display());
    }
    Ok(())
}

fn parse_f32_arg(args: &[String], flag: &str) -> Option<f32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_u8_arg(args: &[String], flag: &str) -> Option<u8> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
