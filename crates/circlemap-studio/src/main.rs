use anyhow::{Context, Result};

use circlemap_engine::device::{GpuInit, HeadlessGpu};
use circlemap_engine::geometry::{circle_quad, CircleVertex};
use circlemap_engine::logging::{init_logging, LoggingConfig};
use circlemap_engine::paint::{PaintArrays, PaintAttributeData, PaintBinder};
use circlemap_engine::tile::{TileAddress, TileKey};
use circlemap_engine::{BatchConfig, WgpuCircleBatch};

/// Tile extent in layout units.
const EXTENT: u32 = 8192;
const GRID: u32 = 3;
const CIRCLES_PER_TILE: usize = 400;
const ZOOM: u8 = 14;

fn main() -> Result<()> {
    init_logging(LoggingConfig::verbose());

    println!();
    println!("  ┌──────────────────────────────────────────┐");
    println!("  │   CIRCLEMAP STUDIO  ·  headless upload   │");
    println!("  └──────────────────────────────────────────┘");
    println!();

    let gpu = pollster::block_on(HeadlessGpu::new(GpuInit::default()))
        .context("headless GPU unavailable")?;
    let mut ctx = gpu.context();

    let binders = vec![
        PaintBinder::new("circle-radius", 2, wgpu::VertexFormat::Float32),
        PaintBinder::new("circle-color", 3, wgpu::VertexFormat::Unorm8x4),
    ];
    let mut batch = WgpuCircleBatch::new(BatchConfig::default(), binders)?;

    let mut rng = Lcg(0x5eed);
    for ty in 0..GRID {
        for tx in 0..GRID {
            let key = TileKey::new("poi-circles", TileAddress::new(ZOOM, 8000 + tx, 5000 + ty));
            let (vertices, paint) = synthetic_tile(&mut rng);
            batch.attach(key, vertices, paint, f32::from(ZOOM))?;
        }
    }

    let outcome = batch.upload(&mut ctx)?;
    report("initial upload", &batch, outcome);

    let center = TileKey::new("poi-circles", TileAddress::new(ZOOM, 8001, 5001));
    batch.detach(&center);
    let outcome = batch.upload(&mut ctx)?;
    report("after detaching center tile", &batch, outcome);

    let outcome = batch.upload(&mut ctx)?;
    report("idle upload", &batch, outcome);

    batch.destroy()?;
    log::info!("batch destroyed");
    Ok(())
}

fn report(stage: &str, batch: &WgpuCircleBatch, outcome: circlemap_engine::UploadOutcome) {
    println!("  [{stage}] {outcome:?}");
    println!(
        "    tiles {:>3}   vertices {:>6}   indices {:>6}   version {}",
        batch.registry().len(),
        batch.vertices().len(),
        batch.indices().len(),
        batch.geometry_version()
    );
    for (i, segment) in batch.segments().iter().enumerate() {
        println!(
            "    segment {i}: base vertex {:>6}  indices {:?}",
            segment.base_vertex(),
            segment.index_range()
        );
    }
    for binder in batch.binders() {
        if let Some(merged) = batch.merged_paint(binder.property()) {
            println!(
                "    paint {:<14} {:>6} bytes  max {:?}",
                binder.property().as_str(),
                merged.bytes().len(),
                merged.max_value()
            );
        }
    }
    println!();
}

fn synthetic_tile(rng: &mut Lcg) -> (Vec<CircleVertex>, PaintArrays) {
    let mut vertices = Vec::with_capacity(CIRCLES_PER_TILE * 4);
    let mut radii = Vec::with_capacity(CIRCLES_PER_TILE * 4);
    let mut colors = Vec::with_capacity(CIRCLES_PER_TILE * 16);

    for _ in 0..CIRCLES_PER_TILE {
        let x = (rng.next_u32() % EXTENT) as i16;
        let y = (rng.next_u32() % EXTENT) as i16;
        let radius = 2.0 + (rng.next_u32() % 10) as f32;
        let rgba = rng.next_u32().to_le_bytes();

        vertices.extend_from_slice(&circle_quad(x, y));
        for _ in 0..4 {
            radii.push(radius);
            colors.extend_from_slice(&rgba);
        }
    }

    let paint = PaintArrays::new()
        .with("circle-radius", PaintAttributeData::from_f32(&radii))
        .with("circle-color", PaintAttributeData::new(colors, 1.0));
    (vertices, paint)
}

/// Deterministic generator so runs are comparable.
struct Lcg(u64);

impl Lcg {
    fn next_u32(&mut self) -> u32 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }
}
