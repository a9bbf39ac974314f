//! Image encoding and atomic file output.

use std::io::{Cursor, Write};
use std::path::Path;

use image::{DynamicImage, ImageFormat};
use tilebake_common::error::{TilebakeError, TilebakeResult};
use tilebake_tilemap_model::OutputFormat;

use crate::pixels::PixelBuffer;

/// Encode a buffer into the bytes of an image file.
///
/// PNG and BMP keep the alpha channel. JPEG has none, so alpha is dropped
/// and fully transparent pixels come out black.
pub fn encode_to_bytes(buffer: PixelBuffer, format: OutputFormat) -> image::ImageResult<Vec<u8>> {
    let image = buffer.into_rgba_image();
    let mut out = Cursor::new(Vec::new());
    match format {
        OutputFormat::Png => image.write_to(&mut out, ImageFormat::Png)?,
        OutputFormat::Bmp => image.write_to(&mut out, ImageFormat::Bmp)?,
        OutputFormat::Jpg => DynamicImage::ImageRgba8(image)
            .to_rgb8()
            .write_to(&mut out, ImageFormat::Jpeg)?,
    }
    Ok(out.into_inner())
}

/// Encode a buffer and write it to `path`, creating parent directories.
///
/// The bytes go to a temporary file beside the target which is then renamed
/// over it, so a failed export never leaves a truncated image behind.
pub fn encode_to_file(buffer: PixelBuffer, path: &Path, format: OutputFormat) -> TilebakeResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| TilebakeError::io(dir, e))?;

    let (width, height) = (buffer.width(), buffer.height());
    let bytes = encode_to_bytes(buffer, format).map_err(|e| TilebakeError::encode(path, e.to_string()))?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".tilebake-")
        .suffix(".part")
        .tempfile_in(dir)
        .map_err(|e| TilebakeError::io(dir, e))?;
    tmp.write_all(&bytes)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| TilebakeError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| TilebakeError::io(path, e.error))?;

    tracing::debug!(
        path = %path.display(),
        format = %format,
        width,
        height,
        bytes = bytes.len(),
        "Wrote image"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_keeps_alpha_and_channel_order() {
        let mut buffer = PixelBuffer::new(2, 1);
        buffer.put_pixel(0, 0, [255, 0, 0, 255]);
        buffer.put_pixel(1, 0, [0, 0, 255, 128]);

        let bytes = encode_to_bytes(buffer, OutputFormat::Png).unwrap();
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
            .unwrap()
            .into_rgba8();
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(decoded.get_pixel(1, 0).0, [0, 0, 255, 128]);
    }

    #[test]
    fn test_encode_to_file_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Tilemap Images").join("map.bmp");

        encode_to_file(PixelBuffer::filled(3, 2, [1, 2, 3, 255]), &path, OutputFormat::Bmp).unwrap();
        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
    }

    #[test]
    fn test_encode_to_file_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.png");
        encode_to_file(PixelBuffer::new(1, 1), &path, OutputFormat::Png).unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("map.png")]);
    }

    #[test]
    fn test_failed_write_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.png");
        std::fs::write(&path, b"previous").unwrap();

        // A directory where the parent should be makes the target unreachable.
        let blocked = path.join("inner.png");
        let err = encode_to_file(PixelBuffer::new(1, 1), &blocked, OutputFormat::Png).unwrap_err();
        assert!(err.to_string().contains("map.png"));
        assert_eq!(std::fs::read(&path).unwrap(), b"previous");
    }
}
