//! Command-line driver: runs the DLA pipeline and writes the heightmap out as
//! a 16-bit grayscale PNG and, optionally, as JSON.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use serde::Serialize;

use dla_core::{GenerationParams, GenerationResult, HeightField, HeightmapGenerator, TierSummary};

#[derive(Parser, Debug)]
#[command(name = "dla-heightmap", about = "Generate a heightmap by diffusion-limited aggregation")]
struct Args {
    /// JSON file with generation parameters. Missing fields use defaults.
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Override the RNG seed.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override the first-tier grid size.
    #[arg(short, long)]
    grid_size: Option<usize>,

    /// Override the per-tier particle counts, e.g. `12,24,216`.
    #[arg(short, long, value_delimiter = ',')]
    tiers: Option<Vec<usize>>,

    /// Output PNG path.
    #[arg(long, default_value = "heightmap.png")]
    png: PathBuf,

    /// Also write the heightfield and per-tier statistics as JSON.
    #[arg(long)]
    json: Option<PathBuf>,

    /// Stretch values to the full [0, 1] range before writing the PNG.
    #[arg(long)]
    normalize: bool,

    /// Print the effective parameters as JSON and exit.
    #[arg(long)]
    print_params: bool,
}

/// Contents of the `--json` output.
#[derive(Serialize)]
struct JsonReport<'a> {
    seed: u64,
    node_count: usize,
    grid_size: usize,
    tiers: &'a [TierSummary],
    heightfield: &'a HeightField,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let params = resolve_params(&args)?;
    if args.print_params {
        println!("{}", serde_json::to_string_pretty(&params)?);
        return Ok(());
    }

    info!(
        "seed {} grid {} tiers {:?} -> final grid {}",
        params.seed,
        params.grid_size,
        params.tiers,
        params.final_grid_size()
    );
    let result = HeightmapGenerator::new()
        .generate(&params)
        .context("heightmap generation failed")?;

    let GenerationResult { heightfield, node_count, grid_size, tiers } = result;
    for (i, tier) in tiers.iter().enumerate() {
        info!(
            "tier {i}: grid {} +{} nodes ({} total), max depth {}",
            tier.grid_size, tier.nodes_added, tier.total_nodes, tier.max_depth
        );
    }

    let hf = if args.normalize { heightfield.normalized() } else { heightfield };
    write_png(&hf, &args.png)?;
    println!("Wrote {}", args.png.display());

    if let Some(path) = &args.json {
        let report = JsonReport { seed: params.seed, node_count, grid_size, tiers: &tiers, heightfield: &hf };
        write_json(&report, path)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

/// Defaults, then the params file, then command-line overrides.
fn resolve_params(args: &Args) -> Result<GenerationParams> {
    let mut params = match &args.params {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            GenerationParams::from_json(&json)
                .with_context(|| format!("invalid parameters in {}", path.display()))?
        }
        None => GenerationParams::default(),
    };
    if let Some(seed) = args.seed {
        params.seed = seed;
    }
    if let Some(size) = args.grid_size {
        params.grid_size = size;
    }
    if let Some(tiers) = &args.tiers {
        params.tiers = tiers.clone();
    }
    params.validate().context("invalid parameters")?;
    Ok(params)
}

/// Values in [0, 1] → 16-bit luminance. Image x is the field column.
fn write_png(hf: &HeightField, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("cannot create {}", dir.display()))?;
    }
    let img = image::ImageBuffer::from_fn(hf.width as u32, hf.height as u32, |x, y| {
        let v = hf.get(y as usize, x as usize).clamp(0.0, 1.0);
        image::Luma([(v * u16::MAX as f32).round() as u16])
    });
    img.save(path).with_context(|| format!("failed to save {}", path.display()))?;
    Ok(())
}

fn write_json(report: &JsonReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string(report).context("failed to serialise report")?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
