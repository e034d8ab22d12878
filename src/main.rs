use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use opera_face::{
    config::Config,
    landmarks::LandmarkFrame,
    render::{LayoutEngine, RasterCanvas, RenderOutcome, RenderSink, SkipReason},
    styles::StyleCatalog,
};

#[derive(Parser)]
#[command(
    name = "opera-face",
    version,
    about = "Paint Peking Opera face makeup over facial landmarks",
    long_about = "Opera-Face lays out traditional Peking Opera face-paint (role categories and historical characters) over a 468-point facial landmark frame and renders it as a PNG overlay or a list of draw primitives."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (optional)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List the available categories and characters
    Styles,

    /// Render one landmark frame with a style
    Render {
        /// Category or character key (sheng, dan, jing, chou, guanyu, ...)
        #[arg(short, long)]
        style: String,

        /// Landmark frame as JSON; a neutral face is used when omitted
        #[arg(short, long)]
        landmarks: Option<PathBuf>,

        /// Photo to paint over; sets the canvas size
        #[arg(short, long)]
        background: Option<PathBuf>,

        /// Output PNG path
        #[arg(short, long, default_value = "face.png")]
        output: PathBuf,

        /// Print the laid-out primitives as JSON instead of rasterizing
        #[arg(long)]
        dump: bool,

        /// Override the configured opacity (0.0-1.0)
        #[arg(long)]
        opacity: Option<f32>,

        /// Override the configured stroke intensity (0.0-2.0)
        #[arg(long)]
        intensity: Option<f32>,

        /// Draw the landmark mesh on top
        #[arg(long)]
        show_landmarks: bool,
    },

    /// Write the active catalog to a TOML file
    ExportCatalog {
        /// Destination file
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    info!("Starting Opera-Face v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path).map_err(|e| anyhow::anyhow!(e.user_message()))?
        }
        None => Config::default(),
    };
    config.validate()?;

    let catalog = load_catalog(&config)?;

    match cli.command {
        Command::Styles => list_styles(&catalog),
        Command::ExportCatalog { path } => {
            catalog.save_to_file(&path)?;
            info!("Catalog with {} styles written to {:?}", catalog.len(), path);
            Ok(())
        }
        Command::Render {
            style,
            landmarks,
            background,
            output,
            dump,
            opacity,
            intensity,
            show_landmarks,
        } => {
            let mut options = config.render.clone();
            if let Some(opacity) = opacity {
                options.opacity = opacity;
            }
            if let Some(intensity) = intensity {
                options.intensity = intensity;
            }
            options.show_landmarks |= show_landmarks;
            options.validate()?;

            let frame = match &landmarks {
                Some(path) => LandmarkFrame::from_file(path)
                    .with_context(|| format!("reading landmarks from {:?}", path))?,
                None => {
                    info!("No landmarks given, using the neutral face");
                    LandmarkFrame::neutral_face()
                }
            };

            let background = background
                .as_ref()
                .map(|path| image::open(path).with_context(|| format!("opening background {:?}", path)))
                .transpose()?;

            let (width, height) = match &background {
                Some(image) => (image.width(), image.height()),
                None => (config.canvas.width, config.canvas.height),
            };
            let mut canvas = RasterCanvas::new(width, height).with_anti_aliasing(config.canvas.anti_aliasing);
            let mut engine = LayoutEngine::new(Arc::new(catalog), config.engine.clone());

            if dump {
                let Some(layout) = engine.layout_style(&style, &frame, canvas.surface(), &options) else {
                    bail!("Style '{}' not found. Run `opera-face styles` to list styles.", style);
                };
                println!("{}", serde_json::to_string_pretty(&layout)?);
                return Ok(());
            }

            info!("🎭 Rendering '{}' on a {}x{} canvas", style, width, height);
            match engine.render(&frame, &style, &options, &mut canvas) {
                RenderOutcome::Completed { primitives } => {
                    info!("   ✅ Drew {} primitives", primitives);
                }
                RenderOutcome::Skipped(SkipReason::UnknownStyle) => {
                    bail!("Style '{}' not found. Run `opera-face styles` to list styles.", style);
                }
                RenderOutcome::Skipped(reason) => {
                    warn!("Nothing drawn: {:?}", reason);
                }
                RenderOutcome::Aborted { emitted, error } => {
                    bail!("Rendering stopped after {} primitives: {}", emitted, error);
                }
            }

            match &background {
                Some(image) => canvas.composite_over(image).save(&output)?,
                None => canvas.save_png(&output)?,
            }
            info!("Output saved to: {:?}", output);
            Ok(())
        }
    }
}

fn load_catalog(config: &Config) -> Result<StyleCatalog> {
    match &config.catalog {
        Some(path) => {
            info!("Loading style catalog from {:?}", path);
            Ok(StyleCatalog::from_file(path)?)
        }
        None => Ok(StyleCatalog::new()),
    }
}

fn list_styles(catalog: &StyleCatalog) -> Result<()> {
    println!("Categories:");
    for key in catalog.available_categories() {
        if let Some(recipe) = catalog.lookup(&key) {
            println!("  {:<10} {:<8} {}", key, recipe.name, recipe.description);
        }
    }

    println!("\nCharacters:");
    for key in catalog.available_characters() {
        if let Some(character) = catalog.character(&key) {
            println!(
                "  {:<10} {:<10} ({}) {}",
                key, character.name, character.base_type, character.description
            );
        }
    }
    Ok(())
}
