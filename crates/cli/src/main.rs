//! Voxelomics CLI - radiomics feature extraction for volumetric images

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use voxelomics_core::io::{read_image, read_mask};
use voxelomics_features::preprocessing::Discretization;
use voxelomics_features::{ExtractionConfig, FeatureClass, FeatureExtractor, ImageFilter};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "voxelomics")]
#[command(author, version, about = "Radiomics feature extraction", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a volumetric image file
    Info {
        /// Input image file (.nii, .nii.gz or .dcm)
        input: PathBuf,
    },
    /// Extract radiomic features from an image and ROI mask
    Extract {
        /// Input image file
        image: PathBuf,
        /// ROI label mask file, co-registered with the image
        mask: PathBuf,
        /// Mask label marking the region of interest
        #[arg(short, long, default_value = "1")]
        label: u32,
        /// Feature classes as a comma-separated list
        /// (firstorder, shape, glcm, glrlm; default: all)
        #[arg(short, long)]
        classes: Option<String>,
        /// Gray-level bin width for histogram/texture features
        #[arg(short, long, default_value = "25.0")]
        bin_width: f64,
        /// Use a fixed gray-level bin count instead of a bin width
        #[arg(long, conflicts_with = "bin_width")]
        bin_count: Option<usize>,
        /// Also compute features over wavelet sub-bands
        #[arg(short, long)]
        wavelet: bool,
        /// Z-score normalize intensities before extraction
        #[arg(short, long)]
        normalize: bool,
        /// Resample both volumes to this spacing, as "x,y,z" in mm
        #[arg(short, long)]
        resample: Option<String>,
        /// Write features to a file instead of standard output
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn read_image_volume(path: &PathBuf) -> Result<voxelomics_core::Volume<f64>> {
    let pb = spinner("Reading image...");
    let volume = read_image(path).context("Failed to read image")?;
    pb.finish_and_clear();
    let (nx, ny, nz) = volume.dims();
    info!("Image: {} x {} x {}", nx, ny, nz);
    Ok(volume)
}

fn read_mask_volume(path: &PathBuf) -> Result<voxelomics_core::Volume<u32>> {
    let pb = spinner("Reading mask...");
    let volume = read_mask(path).context("Failed to read mask")?;
    pb.finish_and_clear();
    Ok(volume)
}

fn parse_classes(s: &str) -> Result<Vec<FeatureClass>> {
    s.split(',')
        .map(|name| {
            name.trim()
                .parse::<FeatureClass>()
                .map_err(|e| anyhow::anyhow!("{}", e))
        })
        .collect()
}

fn parse_spacing(s: &str) -> Result<[f64; 3]> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        anyhow::bail!("Spacing must be 'x,y,z', got: {}", s);
    }
    let mut spacing = [0.0; 3];
    for (out, part) in spacing.iter_mut().zip(parts.iter()) {
        *out = part.trim().parse().context("Invalid spacing value")?;
    }
    Ok(spacing)
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        // ── Info ─────────────────────────────────────────────────────
        Commands::Info { input } => {
            let volume = read_image_volume(&input)?;
            let (nx, ny, nz) = volume.dims();
            let geometry = volume.geometry();
            let stats = volume.statistics();

            println!("File: {}", input.display());
            println!("Dimensions: {} x {} x {} ({} voxels)", nx, ny, nz, volume.len());
            println!(
                "Spacing: {} x {} x {} mm",
                geometry.spacing[0], geometry.spacing[1], geometry.spacing[2]
            );
            println!(
                "Origin: ({:.3}, {:.3}, {:.3})",
                geometry.origin[0], geometry.origin[1], geometry.origin[2]
            );
            println!("Axis-aligned: {}", geometry.is_axis_aligned());
            println!("Voxel volume: {:.6} mm3", geometry.voxel_volume());
            println!("\nStatistics:");
            if let Some(min) = stats.min {
                println!("  Min: {:.4}", min);
            }
            if let Some(max) = stats.max {
                println!("  Max: {:.4}", max);
            }
            if let Some(mean) = stats.mean {
                println!("  Mean: {:.4}", mean);
            }
            println!(
                "  Valid voxels: {} ({:.1}%)",
                stats.valid_count,
                100.0 * stats.valid_count as f64 / volume.len() as f64
            );
        }

        // ── Extract ──────────────────────────────────────────────────
        Commands::Extract {
            image,
            mask,
            label,
            classes,
            bin_width,
            bin_count,
            wavelet,
            normalize,
            resample,
            output,
        } => {
            let classes = match classes {
                Some(list) => parse_classes(&list)?,
                None => FeatureClass::all().to_vec(),
            };
            let discretization = match bin_count {
                Some(n) => Discretization::FixedBinCount(n),
                None => Discretization::FixedBinWidth(bin_width),
            };
            let mut filters = vec![ImageFilter::Original];
            if wavelet {
                filters.push(ImageFilter::Wavelet);
            }
            let resample_spacing = resample.as_deref().map(parse_spacing).transpose()?;

            let config = ExtractionConfig {
                classes,
                filters,
                label,
                discretization,
                normalize,
                resample_spacing,
                ..Default::default()
            };
            let extractor =
                FeatureExtractor::new(config).context("Invalid extraction configuration")?;

            let image_volume = read_image_volume(&image)?;
            let mask_volume = read_mask_volume(&mask)?;

            let pb = spinner("Extracting features...");
            let start = Instant::now();
            let features = extractor
                .execute(&image_volume, &mask_volume)
                .context("Feature extraction failed")?;
            let elapsed = start.elapsed();
            pb.finish_and_clear();

            match output {
                Some(path) => {
                    let mut file = std::fs::File::create(&path)
                        .context("Failed to create output file")?;
                    for (name, value) in &features {
                        writeln!(file, "{}: {}", name, value)?;
                    }
                    println!("{} features saved to: {}", features.len(), path.display());
                }
                None => {
                    for (name, value) in &features {
                        println!("{}: {}", name, value);
                    }
                }
            }
            info!("Extracted {} features in {:.2?}", features.len(), elapsed);
        }
    }

    Ok(())
}
