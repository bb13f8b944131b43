use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use stylevision::compositor::compose_scene;
use stylevision::encoding::ExportFormat;
use stylevision::filters::parse_filter;
use stylevision::manifest::load_and_validate_scene;

#[derive(Debug, Parser)]
#[command(name = "stylevision")]
#[command(about = "Headless virtual try-on image compositor")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Render a scene manifest to an image file or data URL.
    Compose {
        scene: PathBuf,
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
        /// Print the result as a base64 data URL instead of writing a file.
        #[arg(long = "data-url")]
        data_url: bool,
        /// Export format for --data-url (png or jpeg).
        #[arg(long, default_value = "png")]
        format: String,
        /// Quality for lossy formats, in [0, 1].
        #[arg(long, default_value_t = 0.92)]
        quality: f32,
    },
    /// Validate a scene manifest and print a summary.
    Check {
        scene: PathBuf,
        /// Emit the summary as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Compose {
            scene,
            output,
            data_url,
            format,
            quality,
        } => run_compose(&scene, output.as_deref(), data_url, &format, quality),
        Commands::Check { scene, json } => run_check(&scene, json),
    }
}

fn run_check(scene_path: &Path, json: bool) -> Result<()> {
    let scene = load_and_validate_scene(scene_path)?;
    let unknown_filters = scene
        .filters
        .iter()
        .filter(|spec| parse_filter(spec).is_none())
        .cloned()
        .collect::<Vec<_>>();

    if json {
        let summary = serde_json::json!({
            "scene": scene_path.display().to_string(),
            "viewport": { "width": scene.viewport.width, "height": scene.viewport.height },
            "base_image": scene.base_image.as_ref().map(|p| p.display().to_string()),
            "items": scene.items.len(),
            "filters": scene.filters,
            "unknown_filters": unknown_filters,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "OK: {} ({}x{}, {} items, {} filters)",
        scene_path.display(),
        scene.viewport.width,
        scene.viewport.height,
        scene.items.len(),
        scene.filters.len()
    );
    for spec in &unknown_filters {
        eprintln!("warning: unknown filter '{spec}' will be skipped");
    }
    Ok(())
}

fn run_compose(
    scene_path: &Path,
    output: Option<&Path>,
    data_url: bool,
    format: &str,
    quality: f32,
) -> Result<()> {
    let scene = load_and_validate_scene(scene_path)?;
    let compositor = compose_scene(&scene)?;

    if data_url {
        let Some(format) = ExportFormat::parse(format) else {
            bail!("unsupported export format '{format}' (expected png or jpeg)");
        };
        println!("{}", compositor.image_data_url(format, quality)?);
        return Ok(());
    }

    let Some(output) = output else {
        bail!("compose needs --output <path> or --data-url");
    };
    compositor.write_image(output)?;
    println!("Wrote {}", output.display());
    Ok(())
}
