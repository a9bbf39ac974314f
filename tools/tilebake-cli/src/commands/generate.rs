//! Render a tilemap into an image file.

use std::path::PathBuf;

use tilebake_common::config::AppConfig;
use tilebake_render_engine::export::{export_tilemap_file, ExportJob, SettingsOverrides};
use tilebake_tilemap_model::OutputFormat;

/// Per-run overrides taken from the command line.
pub struct GenerateArgs {
    pub file_name: Option<String>,
    pub format: Option<OutputFormat>,
    pub pixel_resolution: Option<u32>,
    pub no_compress: bool,
    pub base_dir: Option<PathBuf>,
}

pub fn run(config: &AppConfig, path: PathBuf, args: GenerateArgs) -> anyhow::Result<()> {
    println!("Generating image for tilemap: {}", path.display());

    let job = ExportJob {
        overrides: SettingsOverrides {
            file_name: args.file_name,
            compress_bounds: args.no_compress.then_some(false),
            pixel_resolution: args.pixel_resolution,
            format: args.format,
        },
        ..ExportJob::from_config(config, args.base_dir.as_deref())
    };

    let report =
        export_tilemap_file(&path, &job).map_err(|e| anyhow::anyhow!("Export failed: {e}"))?;

    println!("  Format: {}", report.format);
    println!("  Resolution: {}x{}", report.width, report.height);
    println!("  Cells drawn: {}", report.cells_drawn);
    if report.cells_failed > 0 {
        println!(
            "  Cells skipped: {} (source unavailable, left transparent)",
            report.cells_failed
        );
    }
    println!("\nImage written: {}", report.output_path.display());

    Ok(())
}
