use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;
use std::error::Error;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use weed_detect::image_utils::annotate::draw_regions;
use weed_detect::image_utils::image_io::{has_image_extension, read_image};
use weed_detect::{
    DetectionResult, DetectorConfig, WeedDetector, WeedType, control_recommendation, get_weed_info,
};

#[derive(Parser, Debug)]
#[command(name = "weed-detect", about = "Identify weed species in field photos")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true, env = "WEED_DETECT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a simulated detection result.
    Simulate {
        /// Seed for a reproducible result.
        #[arg(long)]
        seed: Option<u64>,
        /// Simulate a wide field photo with more regions.
        #[arg(long)]
        field_scan: bool,
    },
    /// Run the trained models on an image file, every image in a directory, or `-` for stdin.
    Detect {
        path: PathBuf,
        /// Write the image with detected regions drawn on it (single file only).
        #[arg(long)]
        annotate: Option<PathBuf>,
    },
    /// Show the catalog entry for a species.
    Info { weed: String },
    /// List the species the classifier knows.
    Species,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let config = DetectorConfig::load_from(cli.config.as_deref())?;

    match cli.command {
        Command::Simulate { seed, field_scan } => {
            let detector = WeedDetector::new(config);
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            let result = if field_scan {
                detector.simulate_field_scan_with(&mut rng)
            } else {
                detector.simulate_prediction_with(&mut rng)
            };
            print_result(&result, None)?;
        }
        Command::Detect { path, annotate } => {
            let mut detector = WeedDetector::new(config);
            detector.load_models()?;
            if path.as_os_str() == "-" {
                if annotate.is_some() {
                    return Err("--annotate needs an image file, not stdin".into());
                }
                let mut bytes = Vec::new();
                std::io::stdin().read_to_end(&mut bytes)?;
                let result = detector.detect_weed_in_bytes(&bytes)?;
                print_result(&result, None)?;
            } else if path.is_dir() {
                if annotate.is_some() {
                    return Err("--annotate only works with a single image".into());
                }
                for entry in WalkDir::new(&path)
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file() && has_image_extension(e.path()))
                {
                    match detector.detect_weed_in_file(entry.path()) {
                        Ok(result) => print_result(&result, Some(entry.path()))?,
                        Err(e) => log::error!("{}: {}", entry.path().display(), e),
                    }
                }
            } else {
                let image = read_image(&path)?;
                let result = detector.detect_weed(&image)?;
                if let Some(out) = annotate {
                    draw_regions(&image, &result.regions).save(&out)?;
                    log::info!("Wrote annotated image to {}", out.display());
                }
                print_result(&result, Some(&path))?;
            }
        }
        Command::Info { weed } => {
            let weed_type: WeedType = weed.parse()?;
            let output = json!({
                "weedType": weed_type,
                "info": get_weed_info(weed_type),
                "recommendation": control_recommendation(weed_type),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Species => {
            for weed_type in WeedType::CLASS_NAMES {
                println!("{}", weed_type);
            }
        }
    }
    Ok(())
}

fn print_result(result: &DetectionResult, source: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let output = json!({
        "source": source.map(|p| p.display().to_string()),
        "result": result,
        "recommendation": control_recommendation(result.weed_type),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
