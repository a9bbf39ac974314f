//! Initialize a new tilemap document.

use std::path::PathBuf;

use tilebake_tilemap_model::LoadedTilemap;

pub fn run(name: String, output: PathBuf, pixel_resolution: u32) -> anyhow::Result<()> {
    if pixel_resolution == 0 {
        anyhow::bail!("Pixel resolution must be greater than zero");
    }

    println!("Creating tilemap '{}' in {}", name, output.display());

    let mut tilemap = LoadedTilemap::create(&output, &name)
        .map_err(|e| anyhow::anyhow!("Failed to create tilemap: {e}"))?;
    if tilemap.document.export.pixel_resolution != pixel_resolution {
        tilemap.document.export.pixel_resolution = pixel_resolution;
        tilemap
            .save()
            .map_err(|e| anyhow::anyhow!("Failed to save tilemap: {e}"))?;
    }

    println!("Tilemap created successfully:");
    println!("  File: {}", tilemap.path.display());
    println!("  Pixel resolution: {pixel_resolution}");
    println!();
    println!("Next steps:");
    println!("  1. Add tilesets (atlas images) and tile rects to the document");
    println!("  2. Place cells in the grid");
    println!("  3. Run `tilebake generate {}`", tilemap.path.display());

    Ok(())
}
