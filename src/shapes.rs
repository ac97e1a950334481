use tiny_skia::{
    Color, FillRule, LineCap, Paint, PathBuilder, PixmapMut, Rect, Stroke, Transform,
};

/// Unit five-pointed star (radius 1, first point straight up), as
/// move/line vertices of a single closed contour.
pub const STAR_PATH: [(f32, f32); 5] = [
    (0.0, -1.0),
    (0.588, 0.809),
    (-0.951, -0.309),
    (0.951, -0.309),
    (-0.588, 0.809),
];

pub fn solid_paint(color: Color, anti_alias: bool) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = anti_alias;
    paint
}

/// Stroke an axis-aligned ellipse; a circle when `radius_x == radius_y`.
pub fn draw_ellipse_stroke(
    pixmap: &mut PixmapMut,
    center: (f32, f32),
    radius_x: f32,
    radius_y: f32,
    stroke_width: f32,
    paint: &Paint,
) {
    if radius_x <= 0.0 || radius_y <= 0.0 || stroke_width <= 0.0 {
        return;
    }
    let Some(rect) = Rect::from_ltrb(
        center.0 - radius_x,
        center.1 - radius_y,
        center.0 + radius_x,
        center.1 + radius_y,
    ) else {
        return;
    };
    if let Some(path) = PathBuilder::from_oval(rect) {
        let stroke = Stroke {
            width: stroke_width,
            ..Default::default()
        };
        pixmap.stroke_path(&path, paint, &stroke, Transform::identity(), None);
    }
}

/// Fill the fixed star contour scaled to `radius` around `center`.
pub fn draw_star(pixmap: &mut PixmapMut, center: (f32, f32), radius: f32, paint: &Paint) {
    if radius <= 0.0 {
        return;
    }
    let mut pb = PathBuilder::new();
    let (x0, y0) = STAR_PATH[0];
    pb.move_to(x0, y0);
    for &(x, y) in &STAR_PATH[1..] {
        pb.line_to(x, y);
    }
    pb.close();
    if let Some(path) = pb.finish() {
        let transform = Transform::from_row(radius, 0.0, 0.0, radius, center.0, center.1);
        pixmap.fill_path(&path, paint, FillRule::Winding, transform, None);
    }
}

/// Straight segment with butt caps.
pub fn draw_line(
    pixmap: &mut PixmapMut,
    from: (f32, f32),
    to: (f32, f32),
    width: f32,
    paint: &Paint,
) {
    let mut pb = PathBuilder::new();
    pb.move_to(from.0, from.1);
    pb.line_to(to.0, to.1);
    if let Some(path) = pb.finish() {
        let stroke = Stroke {
            width,
            line_cap: LineCap::Butt,
            ..Default::default()
        };
        pixmap.stroke_path(&path, paint, &stroke, Transform::identity(), None);
    }
}
