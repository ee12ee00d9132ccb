//! Cairn batch generation utility.
//!
//! Generates seeded cairns in parallel and writes them as SVG or JSON.

use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use cairn::core::{logging, Result};
use cairn::generation::{Cairn, EntropySource, StackBuilder, StackConfig};
use cairn::math::Rect;
use cairn::render::SvgRenderer;

const DEFAULT_OUTPUT_DIR: &str = "output/cairns";
const DEFAULT_COUNT: usize = 10;
const DEFAULT_SEED: u64 = 42;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Svg,
    Json,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Json => "json",
        }
    }
}

#[derive(Debug)]
struct Args {
    output_dir: PathBuf,
    count: usize,
    seed: u64,
    format: Format,
    config: Option<PathBuf>,
}

fn parse_args() -> std::result::Result<Args, String> {
    let mut args = std::env::args().skip(1);

    let mut output_dir = PathBuf::from(DEFAULT_OUTPUT_DIR);
    let mut count = DEFAULT_COUNT;
    let mut seed = DEFAULT_SEED;
    let mut format = Format::Svg;
    let mut config: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-o" | "--output-dir" => {
                if let Some(v) = args.next() {
                    output_dir = PathBuf::from(v);
                }
            }
            "-c" | "--count" => {
                if let Some(v) = args.next() {
                    count = v.parse().unwrap_or(DEFAULT_COUNT);
                }
            }
            "-s" | "--seed" => {
                if let Some(v) = args.next() {
                    seed = v.parse().unwrap_or(DEFAULT_SEED);
                }
            }
            "-f" | "--format" => {
                format = match args.next().as_deref() {
                    Some("svg") => Format::Svg,
                    Some("json") => Format::Json,
                    other => return Err(format!("unknown format: {}", other.unwrap_or(""))),
                };
            }
            "--config" => {
                if let Some(v) = args.next() {
                    config = Some(PathBuf::from(v));
                }
            }
            "-h" | "--help" | "help" => {
                return Err("show_help".to_string());
            }
            _ => {}
        }
    }

    Ok(Args { output_dir, count, seed, format, config })
}

fn print_help() {
    println!("Cairn Generation Utility");
    println!("========================");
    println!();
    println!("Usage: generate_cairn [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -o, --output-dir <DIR>   Output directory (default: {})", DEFAULT_OUTPUT_DIR);
    println!("  -c, --count <N>          Number of cairns to generate (default: {})", DEFAULT_COUNT);
    println!("  -s, --seed <N>           Base seed; cairn i uses seed + i (default: {})", DEFAULT_SEED);
    println!("  -f, --format <svg|json>  Output format (default: svg)");
    println!("  --config <FILE>          Generator config JSON");
    println!();
    println!("Examples:");
    println!("  generate_cairn --count 20");
    println!("  generate_cairn --seed 7 --format json --output-dir out");
}

fn write_cairn(cairn: &Cairn, renderer: &SvgRenderer, format: Format, path: &Path) -> Result<()> {
    let contents = match format {
        Format::Svg => renderer.render(cairn),
        Format::Json => cairn.to_json()?,
    };
    std::fs::write(path, contents)?;
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => StackConfig::load(path)?,
        None => StackConfig::default(),
    };
    let builder = StackBuilder::try_new(config)?;
    let renderer = SvgRenderer::default();

    std::fs::create_dir_all(&args.output_dir)?;

    let start = Instant::now();
    let summaries: Vec<(usize, Option<Rect>)> = (0..args.count)
        .into_par_iter()
        .map(|i| {
            // Each cairn owns its source, so output is stable per seed
            let mut rng = EntropySource::seeded(args.seed.wrapping_add(i as u64));
            let cairn = builder.build(&mut rng);
            let path = args
                .output_dir
                .join(format!("cairn_{:03}.{}", i, args.format.extension()));
            write_cairn(&cairn, &renderer, args.format, &path)?;
            let bounds = cairn.bounds();
            log::debug!("Wrote {} ({} rocks, bounds {:?})", path.display(), cairn.rock_count(), bounds);
            Ok((cairn.rock_count(), bounds))
        })
        .collect::<Result<_>>()?;

    let elapsed = start.elapsed();
    log::info!(
        "Generated {} cairns ({} rocks) in {:.2}s ({:.1} cairns/sec)",
        summaries.len(),
        summaries.iter().map(|(rocks, _)| rocks).sum::<usize>(),
        elapsed.as_secs_f64(),
        summaries.len() as f64 / elapsed.as_secs_f64().max(f64::EPSILON),
    );
    if let Some(combined) = summaries
        .iter()
        .filter_map(|(_, bounds)| *bounds)
        .reduce(|a, b| a.merged(&b))
    {
        log::info!(
            "Combined outline bounds: ({:.1}, {:.1}) to ({:.1}, {:.1}), {:.1} x {:.1}",
            combined.min.x,
            combined.min.y,
            combined.max.x,
            combined.max.y,
            combined.extent().x,
            combined.extent().y,
        );
    }
    Ok(())
}

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            if e == "show_help" {
                print_help();
                return;
            }
            eprintln!("Error: {}", e);
            print_help();
            std::process::exit(1);
        }
    };

    logging::init();

    println!("Cairn Generation Utility");
    println!("========================");
    println!("Output directory: {}", args.output_dir.display());
    println!("Number of cairns: {}", args.count);
    println!("Base seed: {}", args.seed);
    println!("Format: {}", args.format.extension());
    println!();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    println!("Output directory: {}", args.output_dir.display());
}
