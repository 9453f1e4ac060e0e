use criterion::{criterion_group, criterion_main, Criterion, black_box};

use cutsim::octree::Octree;
use cutsim::volume::{CapsuleVolume, SphereVolume};

use glam::Vec3;

fn fresh_stock(depth: u8) -> Octree {
    let mut octree = Octree::new(10.0, depth, Vec3::ZERO).expect("valid octree");
    octree.init(2).expect("init");
    octree
}

fn cut_stock(depth: u8) -> Octree {
    let mut octree = fresh_stock(depth);
    octree
        .diff_negative_root(&SphereVolume::new(Vec3::new(0.0, 0.0, 10.0), 6.0))
        .expect("diff");
    octree
}

fn bench_sphere_cut_depth_6(c: &mut Criterion) {
    let stock = fresh_stock(6);
    let sphere = SphereVolume::new(Vec3::new(0.0, 0.0, 10.0), 6.0);

    c.bench_function("sphere_cut_depth_6", |b| {
        b.iter(|| {
            let mut octree = stock.clone();
            octree.diff_negative_root(black_box(&sphere)).expect("diff");
            octree
        });
    });
}

fn bench_sphere_cut_depth_8(c: &mut Criterion) {
    let stock = fresh_stock(8);
    let sphere = SphereVolume::new(Vec3::new(0.0, 0.0, 10.0), 6.0);

    c.bench_function("sphere_cut_depth_8", |b| {
        b.iter(|| {
            let mut octree = stock.clone();
            octree.diff_negative_root(black_box(&sphere)).expect("diff");
            octree
        });
    });
}

fn bench_capsule_pass(c: &mut Criterion) {
    let stock = fresh_stock(7);
    let pass = CapsuleVolume::new(Vec3::new(-12.0, 0.0, 8.0), Vec3::new(12.0, 0.0, 8.0), 2.0);

    c.bench_function("capsule_pass_depth_7", |b| {
        b.iter(|| {
            let mut octree = stock.clone();
            octree.diff_negative_root(black_box(&pass)).expect("diff");
            octree
        });
    });
}

fn bench_raster(c: &mut Criterion) {
    let stock = fresh_stock(6);
    let passes: Vec<CapsuleVolume> = (0..8)
        .map(|i| {
            let y = -8.75 + 2.5 * i as f32;
            CapsuleVolume::new(Vec3::new(-12.0, y, 9.0), Vec3::new(12.0, y, 9.0), 1.5)
        })
        .collect();

    c.bench_function("raster_8_passes_depth_6", |b| {
        b.iter(|| {
            let mut octree = stock.clone();
            for pass in &passes {
                octree.diff_negative_root(black_box(pass)).expect("diff");
            }
            octree
        });
    });
}

fn bench_mc(c: &mut Criterion) {
    let octree = cut_stock(7);

    c.bench_function("mc_depth_7", |b| {
        b.iter(|| black_box(&octree).mc());
    });
}

fn bench_side_triangles(c: &mut Criterion) {
    let octree = cut_stock(7);

    c.bench_function("side_triangles_depth_7", |b| {
        b.iter(|| black_box(&octree).side_triangles());
    });
}

criterion_group!(
    benches,
    bench_sphere_cut_depth_6,
    bench_sphere_cut_depth_8,
    bench_capsule_pass,
    bench_raster,
    bench_mc,
    bench_side_triangles,
);
criterion_main!(benches);
