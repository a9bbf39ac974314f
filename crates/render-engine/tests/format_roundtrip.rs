use image::ImageFormat;
use tilebake_render_engine::{encode_to_bytes, PixelBuffer};
use tilebake_tilemap_model::OutputFormat;

/// Buffer with distinct opaque colors and a transparent corner.
fn sample_buffer() -> PixelBuffer {
    let mut buffer = PixelBuffer::new(5, 3);
    for row in 0..3 {
        for x in 0..5 {
            buffer.put_pixel(x, row, [(x * 50) as u8, (row * 80) as u8, 200, 255]);
        }
    }
    buffer.put_pixel(4, 2, [0, 0, 0, 0]);
    buffer
}

fn decode(bytes: &[u8], format: ImageFormat) -> image::RgbaImage {
    image::load_from_memory_with_format(bytes, format)
        .unwrap()
        .into_rgba8()
}

#[test]
fn png_round_trip_is_exact() {
    let original = sample_buffer();
    let bytes = encode_to_bytes(original.clone(), OutputFormat::Png).unwrap();
    let decoded = PixelBuffer::from_rgba_image(decode(&bytes, ImageFormat::Png));
    assert_eq!(decoded, original);
}

#[test]
fn bmp_round_trip_is_exact() {
    let original = sample_buffer();
    let bytes = encode_to_bytes(original.clone(), OutputFormat::Bmp).unwrap();
    let decoded = PixelBuffer::from_rgba_image(decode(&bytes, ImageFormat::Bmp));
    assert_eq!(decoded, original);
}

#[test]
fn jpg_round_trip_keeps_dimensions() {
    let bytes = encode_to_bytes(sample_buffer(), OutputFormat::Jpg).unwrap();
    let decoded = decode(&bytes, ImageFormat::Jpeg);
    assert_eq!(decoded.dimensions(), (5, 3));
}

#[test]
fn lossless_formats_are_flagged() {
    assert!(OutputFormat::Png.is_lossless());
    assert!(OutputFormat::Bmp.is_lossless());
    assert!(!OutputFormat::Jpg.is_lossless());
}
