//! Validate a tilemap document before export.

use std::path::PathBuf;

use tilebake_tilemap_model::LoadedTilemap;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating tilemap at: {}", path.display());

    let tilemap =
        LoadedTilemap::load(&path).map_err(|e| anyhow::anyhow!("Failed to load tilemap: {e}"))?;

    let doc = &tilemap.document;
    println!("  Name: {}", doc.name);
    println!("  Tilesets: {}", doc.tilesets.len());
    println!("  Tiles: {}", doc.tiles.len());
    println!("  Pixel resolution: {}", doc.export.pixel_resolution);

    let errors = tilemap.validate_references();
    if errors.is_empty() {
        println!("\nTilemap is valid.");
    } else {
        println!("\nValidation issues:");
        for error in &errors {
            println!("  - {error}");
        }
        println!(
            "\n{} issue(s) found. Export may fail or leave cells transparent.",
            errors.len()
        );
    }

    Ok(())
}
