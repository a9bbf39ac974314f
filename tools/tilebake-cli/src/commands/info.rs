//! Show tilemap information.

use std::path::PathBuf;

use tilebake_common::config::AppConfig;
use tilebake_render_engine::export::{plan_output, ExportJob};
use tilebake_tilemap_model::{LoadedTilemap, TileGrid};

pub fn run(config: &AppConfig, path: PathBuf) -> anyhow::Result<()> {
    let tilemap =
        LoadedTilemap::load(&path).map_err(|e| anyhow::anyhow!("Failed to load tilemap: {e}"))?;

    let doc = &tilemap.document;

    println!("Tilemap: {}", doc.name);
    println!("  Version: {}", doc.version);
    println!("  File: {}", tilemap.path.display());
    println!();

    println!("Grid:");
    match &doc.grid {
        None => println!("  (none)"),
        Some(grid) => {
            println!("  Occupied cells: {}", grid.occupied_count());
            match grid.cell_bounds() {
                Some(bounds) => println!("  Stored bounds: {bounds}"),
                None => println!("  Stored bounds: (empty)"),
            }
            if let Some(bounds) = grid.occupied_bounds() {
                println!("  Occupied bounds: {bounds}");
            }
        }
    }
    println!();

    println!("Tilesets:");
    for set in &doc.tilesets {
        println!("  {}: {}", set.name, set.image.display());
    }
    println!("  Tiles defined: {}", doc.tiles.len());
    println!();

    let settings = &doc.export;
    println!("Export settings:");
    println!("  File name: {}", settings.effective_file_name(&doc.name));
    println!("  Format: {}", settings.format);
    println!("  Pixel resolution: {}", settings.pixel_resolution);
    println!("  Compress bounds: {}", settings.compress_bounds);

    let job = ExportJob::from_config(config, None);
    if let Ok((_, output)) = plan_output(&tilemap, &job) {
        println!("  Output: {}", output.display());
    }

    Ok(())
}
