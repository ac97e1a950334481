use crate::error::Result;
use crate::models::{StampConfig, ViewBox};
use crate::units::UnitScale;
use std::path::Path;
use tiny_skia::Pixmap;

/// Save a pixmap to PNG with compression quality control (0-100).
/// Maps 0-100 to PNG compression types:
/// - 0-25: Fast (fastest encoding, larger files)
/// - 26-75: Default (balanced)
/// - 76-100: Best (slowest encoding, smallest files)
pub fn save_png_with_quality(pixmap: &Pixmap, output_path: &Path, quality: u8) -> Result<()> {
    use std::fs::File;
    use std::io::BufWriter;

    let file = File::create(output_path)?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, pixmap.width(), pixmap.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_filter(png::FilterType::Paeth);

    let compression_type = if quality <= 25 {
        png::Compression::Fast
    } else if quality <= 75 {
        png::Compression::Default
    } else {
        png::Compression::Best
    };
    encoder.set_compression(compression_type);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(&demultiplied_rgba(pixmap))?;
    writer.finish()?;
    Ok(())
}

/// Straight-alpha RGBA bytes of a (premultiplied) pixmap.
pub fn demultiplied_rgba(pixmap: &Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|px| {
            let c = px.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect()
}

/// Square surface region that holds the seal plus `padding_mm` of slack,
/// centred on the surface centre moved by `offset_mm`.
pub fn calculate_seal_region(
    config: &StampConfig,
    scale: UnitScale,
    surface_size: (u32, u32),
    offset_mm: (f32, f32),
    padding_mm: f32,
) -> ViewBox {
    let side = scale.mm_to_px(config.width.max(config.height) + padding_mm);
    ViewBox {
        min_x: (surface_size.0 as f32 - side) / 2.0 + scale.mm_to_px(offset_mm.0),
        min_y: (surface_size.1 as f32 - side) / 2.0 + scale.mm_to_px(offset_mm.1),
        width: side,
        height: side,
    }
}
