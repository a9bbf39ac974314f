//! tilebake CLI: flatten tilemaps into single images.
//!
//! Usage:
//!   tilebake generate <MAP>    Render a tilemap to an image file
//!   tilebake info <MAP>        Show tilemap information
//!   tilebake validate <MAP>    Check that a tilemap can be exported
//!   tilebake init <NAME>       Create an empty tilemap document
//!   tilebake config            Show or change where images are written

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tilebake_common::config::AppConfig;
use tilebake_tilemap_model::OutputFormat;

mod commands;

#[derive(Parser)]
#[command(
    name = "tilebake",
    about = "Flatten tile-grid maps into a single image",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a tilemap into an image file
    Generate {
        /// Path to the tilemap document
        path: PathBuf,

        /// Output file name without extension (defaults to the map name)
        #[arg(long)]
        file_name: Option<String>,

        /// Output format: png|bmp|jpg
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Pixel size of one grid cell
        #[arg(long)]
        pixel_resolution: Option<u32>,

        /// Keep the stored grid bounds instead of shrinking to occupied cells
        #[arg(long)]
        no_compress: bool,

        /// Base directory that receives the "Tilemap Images" folder
        #[arg(long)]
        base_dir: Option<PathBuf>,
    },

    /// Show tilemap information
    Info {
        /// Path to the tilemap document
        path: PathBuf,
    },

    /// Check that a tilemap can be exported
    Validate {
        /// Path to the tilemap document
        path: PathBuf,
    },

    /// Create a new empty tilemap document
    Init {
        /// Tilemap name
        name: String,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Pixel size of one grid cell
        #[arg(long, default_value = "32")]
        pixel_resolution: u32,
    },

    /// Show or change the application configuration
    Config {
        /// Base directory that receives the output folder
        #[arg(long)]
        output_base_dir: Option<PathBuf>,

        /// Name of the output folder below the base directory
        #[arg(long)]
        output_subdir: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load();

    tilebake_common::logging::init_logging(&config.logging, cli.verbose);
    tracing::debug!(?config, "Loaded configuration");

    match cli.command {
        Commands::Generate {
            path,
            file_name,
            format,
            pixel_resolution,
            no_compress,
            base_dir,
        } => commands::generate::run(
            &config,
            path,
            commands::generate::GenerateArgs {
                file_name,
                format,
                pixel_resolution,
                no_compress,
                base_dir,
            },
        ),
        Commands::Info { path } => commands::info::run(&config, path),
        Commands::Validate { path } => commands::validate::run(path),
        Commands::Init {
            name,
            output,
            pixel_resolution,
        } => commands::init::run(name, output, pixel_resolution),
        Commands::Config {
            output_base_dir,
            output_subdir,
        } => commands::config::run(config, output_base_dir, output_subdir),
    }
}
