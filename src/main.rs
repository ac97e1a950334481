use anyhow::{Context, Result};
use clap::Parser;
use sealcraft::renderer::DEFAULT_CANVAS_SIZE;
use sealcraft::{FontBook, Preset, RenderOptions, SealRenderer, StampConfig, UnitScale};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sealcraft")]
#[command(about = "Render an official seal from a JSON config to PNG", long_about = None)]
struct Args {
    /// Path to the seal config JSON file (defaults or --preset when omitted)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output PNG path (defaults to the config filename with .png, or seal.png)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Start from a built-in seal: official, contract, invoice,
    /// financial or legal
    #[arg(long)]
    preset: Option<Preset>,

    /// Side length of the exported square image in pixels
    #[arg(long, default_value_t = 512)]
    size: u32,

    /// Seed for the security pattern and aging draws
    #[arg(long)]
    seed: Option<u64>,

    /// Force the aging effect on
    #[arg(long)]
    aging: bool,

    /// Extra font files to load before the system fonts are searched
    #[arg(long = "font", value_name = "FILE")]
    fonts: Vec<PathBuf>,

    /// Fill the exported image with the config's background colour
    #[arg(long)]
    opaque: bool,

    /// Save the whole canvas (ruler included) instead of the cropped seal
    #[arg(long)]
    canvas: bool,

    /// Print the effective config as JSON and exit
    #[arg(long)]
    print_config: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "sealcraft=debug" } else { "sealcraft=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = match &args.input {
        Some(input) => {
            let json_content = fs::read_to_string(input)
                .with_context(|| format!("Failed to read input file: {input:?}"))?;
            StampConfig::from_json(&json_content).context("Failed to parse seal config JSON")?
        }
        None => args.preset.map(Preset::config).unwrap_or_default(),
    };
    if args.aging {
        config.aging.apply_aging = true;
    }

    if args.print_config {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    let mut fonts = FontBook::with_system_fonts();
    for font in &args.fonts {
        fonts
            .load_font_file(font)
            .with_context(|| format!("Failed to load font: {font:?}"))?;
    }

    let mut renderer = SealRenderer::with_fonts(
        DEFAULT_CANVAS_SIZE,
        DEFAULT_CANVAS_SIZE,
        UnitScale::default(),
        fonts,
    )
    .context("Failed to create drawing surface")?;
    if let Some(seed) = args.seed {
        renderer = renderer.with_seed(seed);
    }
    renderer.configure(config).context("Invalid seal config")?;
    renderer
        .render(RenderOptions {
            draw_ruler: args.canvas,
            ..RenderOptions::default()
        })
        .context("Failed to render seal")?;

    let output_path = args.output.unwrap_or_else(|| match &args.input {
        Some(input) => input.with_extension("png"),
        None => PathBuf::from("seal.png"),
    });

    if args.canvas {
        renderer
            .save_surface_png(&output_path)
            .with_context(|| format!("Failed to write PNG file: {output_path:?}"))?;
    } else {
        renderer
            .export_png(args.size, &output_path, args.opaque)
            .with_context(|| format!("Failed to export PNG: {output_path:?}"))?;
    }

    println!("Successfully rendered seal to {}", output_path.display());
    Ok(())
}
