//! Millimetre ruler overlay, a layout aid drawn on top of the finished seal.
use crate::font_utils::{draw_text_run, measure_advances, FontBook, TextBaseline, TextStyle};
use crate::layout::{layout_text, LayoutStrategy, TextPath};
use crate::models::RulerConfig;
use crate::shapes::{draw_line, solid_paint};
use crate::units::UnitScale;
use euclid::default::Point2D;
use tiny_skia::{Color, PathBuilder, PixmapMut, Rect, Stroke, StrokeDash, Transform};

pub const RULER_WIDTH: f32 = 80.0;
pub const RULER_HEIGHT: f32 = 80.0;
/// Spacing of the full-ruler grid lines, in mm
const GRID_STEP_MM: f32 = 5.0;
const LABEL_FONT: &str = "Arial";
const LABEL_SIZE_PX: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Draw the enabled parts of the ruler onto `pixmap`.
pub fn draw_rulers(pixmap: &mut PixmapMut, fonts: &FontBook, config: &RulerConfig, scale: UnitScale) {
    let (width, height) = (pixmap.width() as f32, pixmap.height() as f32);
    if config.show_ruler {
        draw_ruler(pixmap, fonts, scale, width, RULER_HEIGHT, Orientation::Horizontal);
        draw_ruler(pixmap, fonts, scale, height, RULER_WIDTH, Orientation::Vertical);
    }
    if config.show_full_ruler {
        draw_full_ruler(pixmap, scale, width, height);
    }
}

/// One ruler band with ticks every 0.1 mm, 1 mm and 5 mm (labelled).
pub fn draw_ruler(
    pixmap: &mut PixmapMut,
    fonts: &FontBook,
    scale: UnitScale,
    length: f32,
    size: f32,
    orientation: Orientation,
) {
    let band = match orientation {
        Orientation::Horizontal => Rect::from_xywh(0.0, 0.0, length, size),
        Orientation::Vertical => Rect::from_xywh(0.0, 0.0, size, length),
    };
    if let Some(band) = band {
        pixmap.fill_rect(
            band,
            &solid_paint(Color::from_rgba8(211, 211, 211, 255), false),
            Transform::identity(),
            None,
        );
    }

    let ink = solid_paint(Color::BLACK, true);
    let step = scale.mm_to_px(0.1);
    if step <= 0.0 {
        return;
    }
    let ticks = ((length - size) / step).floor().max(0.0) as u32;
    for tenth in 0..=ticks {
        let pos = size + tenth as f32 * step;
        let (extent, line_width) = if tenth % 50 == 0 {
            (0.8, 1.0)
        } else if tenth % 10 == 0 {
            (0.6, 0.5)
        } else {
            (0.2, 0.5)
        };
        let (from, to) = match orientation {
            Orientation::Horizontal => ((pos, 0.0), (pos, size * extent)),
            Orientation::Vertical => ((0.0, pos), (size * extent, pos)),
        };
        draw_line(pixmap, from, to, line_width, &ink);

        if tenth % 50 == 0 {
            let label = (tenth / 10).to_string();
            let anchor = match orientation {
                Orientation::Horizontal => Transform::from_translate(pos, size * 0.8),
                Orientation::Vertical => {
                    Transform::from_translate(size * 0.8, pos).pre_concat(Transform::from_rotate(-90.0))
                }
            };
            draw_label(pixmap, fonts, &label, anchor, &ink);
        }
    }
}

fn draw_label(
    pixmap: &mut PixmapMut,
    fonts: &FontBook,
    label: &str,
    anchor: Transform,
    paint: &tiny_skia::Paint,
) {
    let style = TextStyle::new(LABEL_FONT, LABEL_SIZE_PX, TextBaseline::Top);
    let advances = measure_advances(fonts, &style, label);
    let path = TextPath::Line {
        center: Point2D::origin(),
        span: advances.iter().sum(),
    };
    let placements = layout_text(
        label,
        &path,
        LayoutStrategy::EqualWidth { letter_spacing: 0.0 },
        &advances,
    );
    draw_text_run(pixmap, fonts, &style, &placements, paint, anchor);
}

/// Dashed grid every 5 mm over the drawing area.
pub fn draw_full_ruler(pixmap: &mut PixmapMut, scale: UnitScale, width: f32, height: f32) {
    let step = scale.mm_to_px(GRID_STEP_MM);
    if step <= 0.0 {
        return;
    }
    let paint = solid_paint(Color::from_rgba8(0xbb, 0xbb, 0xbb, 255), true);
    let stroke = Stroke {
        width: 1.0,
        dash: StrokeDash::new(vec![5.0, 5.0], 0.0),
        ..Default::default()
    };
    let mut pb = PathBuilder::new();
    let mut x = RULER_WIDTH;
    while x < width {
        pb.move_to(x, RULER_HEIGHT);
        pb.line_to(x, height);
        x += step;
    }
    let mut y = RULER_HEIGHT;
    while y < height {
        pb.move_to(RULER_WIDTH, y);
        pb.line_to(width, y);
        y += step;
    }
    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }
}
